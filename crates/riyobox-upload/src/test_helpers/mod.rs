//! Test helpers for coordinator unit tests
//!
//! In-memory implementations of the control plane, data plane and CDN
//! uploader that record every call, plus file fixtures.

pub mod fixtures;
pub mod mock_control_plane;
pub mod mock_data_plane;

pub use fixtures::*;
pub use mock_control_plane::*;
pub use mock_data_plane::*;

use crate::UploadCoordinator;
use std::sync::Arc;

/// Coordinator wired to fresh mocks
pub fn mock_coordinator() -> (UploadCoordinator, Arc<MockControlPlane>, Arc<MockDataPlane>) {
    let control = Arc::new(MockControlPlane::new());
    let data = Arc::new(MockDataPlane::new());
    let coordinator = UploadCoordinator::new(control.clone(), data.clone(), None);
    (coordinator, control, data)
}
