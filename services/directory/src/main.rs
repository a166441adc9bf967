use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use workforce_core::config::Config;
use workforce_core::tracing::init_tracing;
use workforce_directory::config::DirectoryConfig;
use workforce_directory::infra::blob::S3BlobStore;
use workforce_directory::state::AppState;
use workforce_directory::usecase::sweep::SweepOrphanBlobsUseCase;

#[derive(Parser)]
#[command(name = "directory", about = "Workforce directory maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Delete stored pictures and documents that no row references.
    Sweep {
        /// Report orphans without deleting them.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = DirectoryConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    let blobs = S3BlobStore::connect(
        config.s3_bucket.clone(),
        config.s3_region.clone(),
        config.blob_timeout(),
    )
    .await;
    let state = AppState {
        db,
        blobs,
        presign_ttl: config.presign_ttl(),
    };

    match cli.command {
        Command::Sweep { dry_run } => {
            let uc = SweepOrphanBlobsUseCase {
                employees: state.employees(),
                documents: state.documents(),
                blobs: state.blobs.clone(),
            };
            let report = uc
                .execute(config.orphan_grace(), dry_run)
                .await
                .expect("orphan sweep failed");
            info!(
                scanned = report.scanned,
                orphaned = report.orphaned.len(),
                deleted = report.deleted,
                "sweep complete"
            );
        }
    }
}
