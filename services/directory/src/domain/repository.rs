#![allow(async_fn_in_trait)]

use std::time::Duration;

use workforce_domain::id::{DocumentId, EmployeeId, MessageId, TicketId, TrainingRecordId, UserId};

use crate::domain::types::{
    BlobRef, Document, Employee, Message, NewDocument, NewEmployee, NewMessage, NewTicket,
    NewTrainingRecord, NewUser, RemovedEmployee, StoredBlob, Ticket, TicketResponse, TicketView,
    TrainingFields, TrainingRecord, User,
};
use crate::error::DirectoryError;

/// Repository for registered accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError>;

    /// Insert a new account. The account is created admin and approved iff no
    /// user existed before it; concurrent first registrations must yield exactly
    /// one bootstrap admin.
    ///
    /// Fails with `UserAlreadyExists` on a duplicate username or email.
    async fn register(&self, user: &NewUser) -> Result<User, DirectoryError>;

    /// Users awaiting approval, oldest first.
    async fn list_pending(&self) -> Result<Vec<User>, DirectoryError>;

    /// Returns `false` if the user does not exist.
    async fn set_approved(&self, id: UserId) -> Result<bool, DirectoryError>;

    /// Returns `false` if the user does not exist.
    async fn set_admin(&self, id: UserId) -> Result<bool, DirectoryError>;
}

/// Repository for employee profiles.
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DirectoryError>;
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Employee>, DirectoryError>;
    async fn list(&self) -> Result<Vec<Employee>, DirectoryError>;

    /// Fails with `EmployeeAlreadyExists` if the user already has a profile and
    /// with `EmployeeEmailTaken` if the email is in use.
    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DirectoryError>;

    /// Delete the employee with its tickets, training records and documents in
    /// one transaction. Returns `None` if the employee does not exist.
    async fn remove_cascade(&self, id: EmployeeId)
    -> Result<Option<RemovedEmployee>, DirectoryError>;

    /// Every picture ref currently held by an employee row.
    async fn list_picture_refs(&self) -> Result<Vec<BlobRef>, DirectoryError>;
}

/// Repository for support tickets.
pub trait TicketRepository: Send + Sync {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<TicketView>, DirectoryError>;
    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, DirectoryError>;

    /// Tickets joined with their owners, newest first. `None` lists every ticket.
    async fn list_with_owner(
        &self,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<TicketView>, DirectoryError>;

    /// Apply an admin response. Returns `None` if the ticket does not exist.
    async fn respond(
        &self,
        id: TicketId,
        response: &TicketResponse,
    ) -> Result<Option<Ticket>, DirectoryError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: TicketId) -> Result<bool, DirectoryError>;
}

/// Repository for training and certification history.
pub trait TrainingRecordRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: TrainingRecordId,
    ) -> Result<Option<TrainingRecord>, DirectoryError>;

    /// Records of one employee, most recent start date first.
    async fn list_by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TrainingRecord>, DirectoryError>;

    async fn create(&self, record: &NewTrainingRecord) -> Result<TrainingRecord, DirectoryError>;

    /// Returns `None` if the record does not exist.
    async fn update(
        &self,
        id: TrainingRecordId,
        fields: &TrainingFields,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<TrainingRecord>, DirectoryError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: TrainingRecordId) -> Result<bool, DirectoryError>;
}

/// Repository for uploaded document metadata.
pub trait DocumentRepository: Send + Sync {
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DirectoryError>;

    /// Documents of one employee, newest upload first.
    async fn list_by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<Document>, DirectoryError>;

    async fn create(&self, document: &NewDocument) -> Result<Document, DirectoryError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: DocumentId) -> Result<bool, DirectoryError>;

    /// Every blob ref currently held by a document row.
    async fn list_blob_refs(&self) -> Result<Vec<BlobRef>, DirectoryError>;
}

/// Repository for user-to-user messages.
pub trait MessageRepository: Send + Sync {
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DirectoryError>;
    async fn create(&self, message: &NewMessage) -> Result<Message, DirectoryError>;

    /// Messages received by `user_id`, newest first.
    async fn list_received(&self, user_id: UserId) -> Result<Vec<Message>, DirectoryError>;

    /// Messages sent by `user_id`, newest first.
    async fn list_sent(&self, user_id: UserId) -> Result<Vec<Message>, DirectoryError>;

    /// Returns `false` if the message does not exist.
    async fn mark_read(&self, id: MessageId) -> Result<bool, DirectoryError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: MessageId) -> Result<bool, DirectoryError>;
}

/// Port to the external object store holding pictures and documents.
///
/// Every operation is bounded by a timeout and fails with
/// `DirectoryError::Storage` instead of hanging.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`. Never overwrites an existing object.
    async fn put(
        &self,
        key: &BlobRef,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobRef, DirectoryError>;

    /// Delete the object. Deleting a missing object is not an error.
    async fn delete(&self, key: &BlobRef) -> Result<(), DirectoryError>;

    /// Time-limited URL granting read access to the object.
    async fn presigned_url(&self, key: &BlobRef, ttl: Duration)
    -> Result<String, DirectoryError>;

    /// Every object whose key starts with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<StoredBlob>, DirectoryError>;
}
