use sea_orm_migration::prelude::*;

mod m20241016_000001_create_users;
mod m20241016_000002_create_employees;
mod m20241016_000003_create_tickets;
mod m20241016_000004_create_training_records;
mod m20241016_000005_create_documents;
mod m20241016_000006_create_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241016_000001_create_users::Migration),
            Box::new(m20241016_000002_create_employees::Migration),
            Box::new(m20241016_000003_create_tickets::Migration),
            Box::new(m20241016_000004_create_training_records::Migration),
            Box::new(m20241016_000005_create_documents::Migration),
            Box::new(m20241016_000006_create_messages::Migration),
        ]
    }
}
