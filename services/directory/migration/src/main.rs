use sea_orm_migration::prelude::*;

use workforce_directory_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
