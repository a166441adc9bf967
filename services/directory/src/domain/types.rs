use std::fmt;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use uuid::Uuid;

use workforce_domain::id::{DocumentId, EmployeeId, MessageId, TicketId, TrainingRecordId, UserId};
use workforce_domain::ticket::{TicketApproval, TicketStatus, TicketType};
use workforce_domain::training::{CourseType, TrainingStatus};

/// Key prefix for employee profile pictures.
pub const PICTURE_PREFIX: &str = "pictures";

/// Key prefix for uploaded documents.
pub const DOCUMENT_PREFIX: &str = "documents";

/// Extensions accepted for profile pictures.
pub const PICTURE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// argon2 PHC string.
    pub password_hash: String,
    pub is_admin: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_active_admin(&self) -> bool {
        self.is_admin && self.is_approved
    }
}

/// Registration payload. Flags are decided by the repository at insert time.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Opaque key of an object in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobRef(pub String);

impl BlobRef {
    /// Allocate a fresh collision-free key: `{prefix}/{uuid}[.{ext}]`.
    pub fn generate(prefix: &str, extension: Option<&str>) -> Self {
        let id = Uuid::new_v4();
        match extension {
            Some(ext) => Self(format!("{prefix}/{id}.{ext}")),
            None => Self(format!("{prefix}/{id}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object listed from the blob store.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub key: BlobRef,
    pub last_modified: DateTime<Utc>,
}

/// Binary payload supplied by the caller together with its original filename.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Lower-cased extension of the original filename, if it is plain ASCII alphanumeric.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.filename)
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_owned()
    }
}

/// Employee profile.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: EmployeeId,
    pub user_id: UserId,
    pub full_name: String,
    pub age: i32,
    pub phone_number: String,
    pub email: String,
    pub role: String,
    pub picture_ref: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub user_id: UserId,
    pub full_name: String,
    pub age: i32,
    pub phone_number: String,
    pub email: String,
    pub role: String,
    pub picture_ref: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
}

/// What was deleted by an employee cascade; the blob refs still need cleanup.
#[derive(Debug, Clone)]
pub struct RemovedEmployee {
    pub employee: Employee,
    pub document_refs: Vec<BlobRef>,
}

impl RemovedEmployee {
    /// Every blob the removed aggregate referenced: documents first, then the picture.
    pub fn blob_refs(&self) -> Vec<BlobRef> {
        let mut refs = self.document_refs.clone();
        refs.extend(self.employee.picture_ref.clone());
        refs
    }
}

/// Support ticket.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub employee_id: EmployeeId,
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
    pub status: TicketStatus,
    pub admin_response: Option<String>,
    pub approval: TicketApproval,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub employee_id: EmployeeId,
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
    pub status: TicketStatus,
    pub approval: TicketApproval,
    pub created_at: DateTime<Utc>,
}

/// Admin response applied to a ticket in one write.
#[derive(Debug, Clone)]
pub struct TicketResponse {
    pub admin_response: String,
    pub status: TicketStatus,
    pub approval: TicketApproval,
    pub updated_at: DateTime<Utc>,
}

/// Identity of the employee and user owning a ticket.
#[derive(Debug, Clone)]
pub struct TicketOwner {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub user_id: UserId,
    pub username: String,
}

/// Ticket joined with its owner, as shown in ticket listings.
#[derive(Debug, Clone)]
pub struct TicketView {
    pub ticket: Ticket,
    pub owner: TicketOwner,
}

/// Training or certification history entry.
#[derive(Debug, Clone)]
pub struct TrainingRecord {
    pub id: TrainingRecordId,
    pub employee_id: EmployeeId,
    pub fields: TrainingFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-editable part of a training record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingFields {
    pub course_name: String,
    pub course_type: CourseType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: TrainingStatus,
    pub certification_name: Option<String>,
    pub certification_expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewTrainingRecord {
    pub employee_id: EmployeeId,
    pub fields: TrainingFields,
    pub created_at: DateTime<Utc>,
}

/// Uploaded document metadata.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub employee_id: EmployeeId,
    pub filename: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    pub blob_ref: BlobRef,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub employee_id: EmployeeId,
    pub filename: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    pub blob_ref: BlobRef,
}

/// Store-and-forward message between two users.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// A mutation timestamp strictly later than `previous`, at database precision.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + TimeDelta::microseconds(1))
}

/// Lower-cased extension of `filename` when it is 1-10 ASCII alphanumerics.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether `filename` has an accepted picture extension.
pub fn is_picture_filename(filename: &str) -> bool {
    file_extension(filename).is_some_and(|ext| PICTURE_EXTENSIONS.contains(&ext.as_str()))
}
