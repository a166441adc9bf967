use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::infra::blob::S3BlobStore;
use crate::infra::db::{
    DbDocumentRepository, DbEmployeeRepository, DbMessageRepository, DbTicketRepository,
    DbTrainingRecordRepository, DbUserRepository,
};

/// Shared collaborators handed to every use case by the caller boundary.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub blobs: S3BlobStore,
    pub presign_ttl: Duration,
}

impl AppState {
    pub fn users(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn employees(&self) -> DbEmployeeRepository {
        DbEmployeeRepository {
            db: self.db.clone(),
        }
    }

    pub fn tickets(&self) -> DbTicketRepository {
        DbTicketRepository {
            db: self.db.clone(),
        }
    }

    pub fn training_records(&self) -> DbTrainingRecordRepository {
        DbTrainingRecordRepository {
            db: self.db.clone(),
        }
    }

    pub fn documents(&self) -> DbDocumentRepository {
        DbDocumentRepository {
            db: self.db.clone(),
        }
    }

    pub fn messages(&self) -> DbMessageRepository {
        DbMessageRepository {
            db: self.db.clone(),
        }
    }
}
