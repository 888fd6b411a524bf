//! Riyobox CLI: upload media through the Riyobox control plane.
//!
//! Set RIYOBOX_API_TOKEN (or JWT_TOKEN) and RIYOBOX_API_URL (or API_URL).

use anyhow::Context;
use clap::{Parser, Subcommand};
use riyobox_cli::{chunk_size_from_mb, init_tracing, progress_logger};
use riyobox_core::{format_bytes, validate_file, ClientConfig, UploadCategory, UploadProvider};
use riyobox_upload::{UploadCoordinator, UploadFile, UploadOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "riyobox", about = "Riyobox upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// videos, thumbnails, posters or subtitles
        #[arg(long, default_value = "videos")]
        category: UploadCategory,
        /// r2 or cloudinary
        #[arg(long, default_value = "r2")]
        provider: UploadProvider,
        /// CDN folder (cloudinary only)
        #[arg(long)]
        folder: Option<String>,
        /// Part size of chunked uploads in MB
        #[arg(long)]
        chunk_size_mb: Option<u64>,
        /// Attempts for whole-file uploads
        #[arg(long)]
        max_retries: Option<u32>,
    },
    /// Upload several files
    UploadMany {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value = "videos")]
        category: UploadCategory,
        #[arg(long, default_value = "r2")]
        provider: UploadProvider,
        /// Maximum uploads in flight
        #[arg(long, default_value = "3")]
        concurrency: usize,
    },
    /// Check a file against the upload rules without uploading it
    Validate {
        file: PathBuf,
        #[arg(long, default_value = "videos")]
        category: UploadCategory,
    },
    /// Delete an uploaded file by its public URL
    Delete { url: String },
    /// Get the status of an upload
    Status { upload_id: String },
    /// Show the storage configuration
    Config,
}

#[derive(Serialize)]
struct ValidateOutput {
    file: String,
    content_type: String,
    size: String,
    valid: bool,
    errors: Vec<String>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn open_file(path: &Path) -> anyhow::Result<UploadFile> {
    UploadFile::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))
}

/// Load configuration (`.env` included, validated) and build the upload client.
fn connect() -> anyhow::Result<(ClientConfig, UploadCoordinator)> {
    let config = ClientConfig::from_env().context(
        "Failed to load configuration. Set RIYOBOX_API_TOKEN and RIYOBOX_API_URL (or API_URL)",
    )?;
    let coordinator =
        UploadCoordinator::from_config(&config).context("Failed to create upload client")?;
    Ok((config, coordinator))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        // Local check, no credentials needed
        Commands::Validate { file, category } => {
            let upload = open_file(&file).await?;
            let report = validate_file(upload.size(), upload.content_type(), category);
            print_json(&ValidateOutput {
                file: upload.name().to_string(),
                content_type: upload.content_type().to_string(),
                size: format_bytes(upload.size(), 2),
                valid: report.valid,
                errors: report.errors,
            })?;
        }
        Commands::Upload {
            file,
            category,
            provider,
            folder,
            chunk_size_mb,
            max_retries,
        } => {
            let (config, client) = connect()?;
            let upload = open_file(&file).await?;
            let mut options = UploadOptions::from_config(&config)
                .with_category(category)
                .with_provider(provider)
                .with_progress(progress_logger(upload.name().to_string()));
            if let Some(folder) = folder {
                options = options.with_folder(folder);
            }
            if let Some(mb) = chunk_size_mb {
                options = options.with_chunk_size(chunk_size_from_mb(mb)?);
            }
            if let Some(max_retries) = max_retries {
                options = options.with_max_retries(max_retries);
            }

            let outcome = client
                .upload(&upload, &options)
                .await
                .with_context(|| format!("Upload of {} failed", file.display()))?;
            print_json(&outcome)?;
        }
        Commands::UploadMany {
            files,
            category,
            provider,
            concurrency,
        } => {
            let (config, client) = connect()?;
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(open_file(path).await?);
            }

            let options = UploadOptions::from_config(&config)
                .with_category(category)
                .with_provider(provider)
                .with_progress(progress_logger(format!("{} files", uploads.len())));

            let outcomes = client
                .upload_many_bounded(&uploads, &options, concurrency)
                .await
                .context("Batch upload failed")?;
            print_json(&outcomes)?;
        }
        Commands::Delete { url } => {
            let (_, client) = connect()?;
            client.delete_file(&url).await?;
            print_json(
                &serde_json::json!({ "success": true, "message": format!("{} deleted", url) }),
            )?;
        }
        Commands::Status { upload_id } => {
            let (_, client) = connect()?;
            let status = client.upload_status(&upload_id).await?;
            print_json(&status)?;
        }
        Commands::Config => {
            let (_, client) = connect()?;
            let storage = client.storage_config().await?;
            print_json(&storage)?;
        }
    }

    Ok(())
}
