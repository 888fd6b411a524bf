use riyobox_core::format_bytes;
use riyobox_upload::UploadProgress;

const MIB: u64 = 1024 * 1024;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Convert a `--chunk-size-mb` value to bytes.
pub fn chunk_size_from_mb(megabytes: u64) -> anyhow::Result<u64> {
    if megabytes == 0 {
        anyhow::bail!("Chunk size must be at least 1 MB");
    }
    megabytes
        .checked_mul(MIB)
        .ok_or_else(|| anyhow::anyhow!("Chunk size of {} MB is too large", megabytes))
}

/// One-line description of a progress update, e.g. `part 3/25 12% (30 MB of 250 MB)`.
pub fn describe_progress(progress: &UploadProgress) -> String {
    let loaded = progress.loaded.min(progress.total);
    let amount = format!(
        "{}% ({} of {})",
        progress.progress,
        format_bytes(loaded, 1),
        format_bytes(progress.total, 1)
    );

    match (progress.chunk, progress.total_chunks) {
        (Some(chunk), Some(total)) => format!("part {}/{} {}", chunk, total, amount),
        _ => amount,
    }
}

/// Log progress updates for the file named `file_name`.
pub fn progress_logger(file_name: String) -> impl Fn(UploadProgress) + Send + Sync + 'static {
    move |progress| {
        tracing::info!(file = %file_name, "{}", describe_progress(&progress));
    }
}
