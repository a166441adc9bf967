use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use workforce_directory::domain::repository::{
    BlobStore, DocumentRepository, EmployeeRepository, MessageRepository, TicketRepository,
    TrainingRecordRepository, UserRepository,
};
use workforce_directory::domain::types::{
    BlobRef, Document, Employee, Message, NewDocument, NewEmployee, NewMessage, NewTicket,
    NewTrainingRecord, NewUser, RemovedEmployee, StoredBlob, Ticket, TicketOwner, TicketResponse,
    TicketView, TrainingFields, TrainingRecord, User,
};
use workforce_directory::error::DirectoryError;
use workforce_domain::id::{DocumentId, EmployeeId, MessageId, TicketId, TrainingRecordId, UserId};
use workforce_domain::training::{CourseType, TrainingStatus};

// ── InMemoryDirectory ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub employees: Vec<Employee>,
    pub tickets: Vec<Ticket>,
    pub training: Vec<TrainingRecord>,
    pub documents: Vec<Document>,
    pub messages: Vec<Message>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory repository implementing every directory repository trait, with
/// the same uniqueness and foreign-key rules as the database schema.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Inspect the stored rows.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.lock())
    }

    pub fn seed_user(&self, username: &str, is_admin: bool, is_approved: bool) -> User {
        let mut t = self.lock();
        let user = User {
            id: UserId(t.next_id()),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            is_admin,
            is_approved,
            created_at: Utc::now(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn seed_admin(&self) -> User {
        self.seed_user("admin", true, true)
    }

    pub fn seed_member(&self, username: &str) -> User {
        self.seed_user(username, false, true)
    }

    pub fn seed_employee(&self, user: &User) -> Employee {
        self.seed_employee_with_picture(user, None)
    }

    pub fn seed_employee_with_picture(&self, user: &User, picture_ref: Option<&str>) -> Employee {
        let mut t = self.lock();
        let employee = Employee {
            id: EmployeeId(t.next_id()),
            user_id: user.id,
            full_name: format!("{} Example", user.username),
            age: 30,
            phone_number: "555-0100".into(),
            email: format!("{}@corp.example.com", user.username),
            role: "Engineer".into(),
            picture_ref: picture_ref.map(|r| BlobRef(r.to_owned())),
            created_at: Utc::now(),
        };
        t.employees.push(employee.clone());
        employee
    }

    pub fn seed_document(&self, employee: &Employee, blob_ref: &str) -> Document {
        let mut t = self.lock();
        let document = Document {
            id: DocumentId(t.next_id()),
            employee_id: employee.id,
            filename: "contract.pdf".into(),
            file_type: "pdf".into(),
            upload_date: Utc::now(),
            blob_ref: BlobRef(blob_ref.to_owned()),
        };
        t.documents.push(document.clone());
        document
    }
}

impl UserRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn register(&self, user: &NewUser) -> Result<User, DirectoryError> {
        let mut t = self.lock();
        if t
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(DirectoryError::UserAlreadyExists);
        }
        let bootstrap = t.users.is_empty();
        let created = User {
            id: UserId(t.next_id()),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_admin: bootstrap,
            is_approved: bootstrap,
            created_at: user.created_at,
        };
        t.users.push(created.clone());
        Ok(created)
    }

    async fn list_pending(&self) -> Result<Vec<User>, DirectoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| !u.is_approved)
            .cloned()
            .collect())
    }

    async fn set_approved(&self, id: UserId) -> Result<bool, DirectoryError> {
        let mut t = self.lock();
        match t.users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.is_approved = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_admin(&self, id: UserId) -> Result<bool, DirectoryError> {
        let mut t = self.lock();
        match t.users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.is_admin = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl EmployeeRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DirectoryError> {
        Ok(self.lock().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Employee>, DirectoryError> {
        Ok(self
            .lock()
            .employees
            .iter()
            .find(|e| e.user_id == user_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Employee>, DirectoryError> {
        let mut employees = self.lock().employees.clone();
        employees.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
        Ok(employees)
    }

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DirectoryError> {
        let mut t = self.lock();
        if !t.users.iter().any(|u| u.id == employee.user_id) {
            return Err(DirectoryError::Constraint("employees_user_id_fkey".into()));
        }
        if t.employees.iter().any(|e| e.user_id == employee.user_id) {
            return Err(DirectoryError::EmployeeAlreadyExists);
        }
        if t.employees.iter().any(|e| e.email == employee.email) {
            return Err(DirectoryError::EmployeeEmailTaken);
        }
        let created = Employee {
            id: EmployeeId(t.next_id()),
            user_id: employee.user_id,
            full_name: employee.full_name.clone(),
            age: employee.age,
            phone_number: employee.phone_number.clone(),
            email: employee.email.clone(),
            role: employee.role.clone(),
            picture_ref: employee.picture_ref.clone(),
            created_at: employee.created_at,
        };
        t.employees.push(created.clone());
        Ok(created)
    }

    async fn remove_cascade(
        &self,
        id: EmployeeId,
    ) -> Result<Option<RemovedEmployee>, DirectoryError> {
        let mut t = self.lock();
        let Some(pos) = t.employees.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let employee = t.employees.remove(pos);
        let document_refs = t
            .documents
            .iter()
            .filter(|d| d.employee_id == id)
            .map(|d| d.blob_ref.clone())
            .collect();
        t.tickets.retain(|x| x.employee_id != id);
        t.training.retain(|x| x.employee_id != id);
        t.documents.retain(|x| x.employee_id != id);
        Ok(Some(RemovedEmployee {
            employee,
            document_refs,
        }))
    }

    async fn list_picture_refs(&self) -> Result<Vec<BlobRef>, DirectoryError> {
        Ok(self
            .lock()
            .employees
            .iter()
            .filter_map(|e| e.picture_ref.clone())
            .collect())
    }
}

fn ticket_view(t: &Tables, ticket: &Ticket) -> Option<TicketView> {
    let employee = t.employees.iter().find(|e| e.id == ticket.employee_id)?;
    let user = t.users.iter().find(|u| u.id == employee.user_id)?;
    Some(TicketView {
        ticket: ticket.clone(),
        owner: TicketOwner {
            employee_id: employee.id,
            employee_name: employee.full_name.clone(),
            user_id: user.id,
            username: user.username.clone(),
        },
    })
}

impl TicketRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<TicketView>, DirectoryError> {
        let t = self.lock();
        Ok(t.tickets
            .iter()
            .find(|x| x.id == id)
            .and_then(|x| ticket_view(&t, x)))
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, DirectoryError> {
        let mut t = self.lock();
        if !t.employees.iter().any(|e| e.id == ticket.employee_id) {
            return Err(DirectoryError::Constraint("tickets_employee_id_fkey".into()));
        }
        let created = Ticket {
            id: TicketId(t.next_id()),
            employee_id: ticket.employee_id,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            ticket_type: ticket.ticket_type,
            status: ticket.status,
            admin_response: None,
            approval: ticket.approval,
            created_at: ticket.created_at,
            updated_at: ticket.created_at,
        };
        t.tickets.push(created.clone());
        Ok(created)
    }

    async fn list_with_owner(
        &self,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<TicketView>, DirectoryError> {
        let t = self.lock();
        let mut views: Vec<TicketView> = t
            .tickets
            .iter()
            .filter(|x| employee_id.is_none_or(|id| x.employee_id == id))
            .filter_map(|x| ticket_view(&t, x))
            .collect();
        views.sort_by(|a, b| {
            b.ticket
                .created_at
                .cmp(&a.ticket.created_at)
                .then(b.ticket.id.cmp(&a.ticket.id))
        });
        Ok(views)
    }

    async fn respond(
        &self,
        id: TicketId,
        response: &TicketResponse,
    ) -> Result<Option<Ticket>, DirectoryError> {
        let mut t = self.lock();
        let Some(ticket) = t.tickets.iter_mut().find(|x| x.id == id) else {
            return Ok(None);
        };
        ticket.admin_response = Some(response.admin_response.clone());
        ticket.status = response.status;
        ticket.approval = response.approval;
        ticket.updated_at = response.updated_at;
        Ok(Some(ticket.clone()))
    }

    async fn delete(&self, id: TicketId) -> Result<bool, DirectoryError> {
        let mut t = self.lock();
        let before = t.tickets.len();
        t.tickets.retain(|x| x.id != id);
        Ok(t.tickets.len() < before)
    }
}

impl TrainingRecordRepository for InMemoryDirectory {
    async fn find_by_id(
        &self,
        id: TrainingRecordId,
    ) -> Result<Option<TrainingRecord>, DirectoryError> {
        Ok(self.lock().training.iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TrainingRecord>, DirectoryError> {
        let mut records: Vec<TrainingRecord> = self
            .lock()
            .training
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.fields
                .start_date
                .cmp(&a.fields.start_date)
                .then(b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn create(&self, record: &NewTrainingRecord) -> Result<TrainingRecord, DirectoryError> {
        let mut t = self.lock();
        if !t.employees.iter().any(|e| e.id == record.employee_id) {
            return Err(DirectoryError::Constraint(
                "training_records_employee_id_fkey".into(),
            ));
        }
        let created = TrainingRecord {
            id: TrainingRecordId(t.next_id()),
            employee_id: record.employee_id,
            fields: record.fields.clone(),
            created_at: record.created_at,
            updated_at: record.created_at,
        };
        t.training.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: TrainingRecordId,
        fields: &TrainingFields,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<TrainingRecord>, DirectoryError> {
        let mut t = self.lock();
        let Some(record) = t.training.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.fields = fields.clone();
        record.updated_at = updated_at;
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: TrainingRecordId) -> Result<bool, DirectoryError> {
        let mut t = self.lock();
        let before = t.training.len();
        t.training.retain(|r| r.id != id);
        Ok(t.training.len() < before)
    }
}

impl DocumentRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DirectoryError> {
        Ok(self.lock().documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list_by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<Document>, DirectoryError> {
        let mut documents: Vec<Document> = self
            .lock()
            .documents
            .iter()
            .filter(|d| d.employee_id == employee_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.upload_date.cmp(&a.upload_date).then(b.id.cmp(&a.id)));
        Ok(documents)
    }

    async fn create(&self, document: &NewDocument) -> Result<Document, DirectoryError> {
        let mut t = self.lock();
        if !t.employees.iter().any(|e| e.id == document.employee_id) {
            return Err(DirectoryError::Constraint(
                "documents_employee_id_fkey".into(),
            ));
        }
        if t.documents.iter().any(|d| d.blob_ref == document.blob_ref) {
            return Err(DirectoryError::DocumentAlreadyExists);
        }
        let created = Document {
            id: DocumentId(t.next_id()),
            employee_id: document.employee_id,
            filename: document.filename.clone(),
            file_type: document.file_type.clone(),
            upload_date: document.upload_date,
            blob_ref: document.blob_ref.clone(),
        };
        t.documents.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: DocumentId) -> Result<bool, DirectoryError> {
        let mut t = self.lock();
        let before = t.documents.len();
        t.documents.retain(|d| d.id != id);
        Ok(t.documents.len() < before)
    }

    async fn list_blob_refs(&self) -> Result<Vec<BlobRef>, DirectoryError> {
        Ok(self
            .lock()
            .documents
            .iter()
            .map(|d| d.blob_ref.clone())
            .collect())
    }
}

impl MessageRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DirectoryError> {
        Ok(self.lock().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, message: &NewMessage) -> Result<Message, DirectoryError> {
        let mut t = self.lock();
        let created = Message {
            id: MessageId(t.next_id()),
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            subject: message.subject.clone(),
            body: message.body.clone(),
            sent_at: message.sent_at,
            read: false,
        };
        t.messages.push(created.clone());
        Ok(created)
    }

    async fn list_received(&self, user_id: UserId) -> Result<Vec<Message>, DirectoryError> {
        let mut messages: Vec<Message> = self
            .lock()
            .messages
            .iter()
            .filter(|m| m.recipient_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(messages)
    }

    async fn list_sent(&self, user_id: UserId) -> Result<Vec<Message>, DirectoryError> {
        let mut messages: Vec<Message> = self
            .lock()
            .messages
            .iter()
            .filter(|m| m.sender_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(messages)
    }

    async fn mark_read(&self, id: MessageId) -> Result<bool, DirectoryError> {
        let mut t = self.lock();
        match t.messages.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: MessageId) -> Result<bool, DirectoryError> {
        let mut t = self.lock();
        let before = t.messages.len();
        t.messages.retain(|m| m.id != id);
        Ok(t.messages.len() < before)
    }
}

// ── FakeBlobStore ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct BlobState {
    pub objects: HashMap<BlobRef, StoredObject>,
    /// Every key passed to `put`, including failed attempts.
    pub puts: Vec<BlobRef>,
    /// Every key passed to `delete`, including failed attempts.
    pub deletes: Vec<BlobRef>,
    pub fail_put: bool,
    pub fail_delete: bool,
}

pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

/// Recording blob store with switchable failures.
#[derive(Clone, Default)]
pub struct FakeBlobStore {
    state: Arc<Mutex<BlobState>>,
}

impl FakeBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_put() -> Self {
        let store = Self::default();
        store.lock().fail_put = true;
        store
    }

    pub fn failing_delete() -> Self {
        let store = Self::default();
        store.lock().fail_delete = true;
        store
    }

    pub fn lock(&self) -> MutexGuard<'_, BlobState> {
        self.state.lock().unwrap()
    }

    /// Place an object directly, as if uploaded at `last_modified`.
    pub fn insert(&self, key: &str, last_modified: DateTime<Utc>) {
        self.lock().objects.insert(
            BlobRef(key.to_owned()),
            StoredObject {
                bytes: vec![0],
                content_type: "application/octet-stream".into(),
                last_modified,
            },
        );
    }

    pub fn contains(&self, key: &BlobRef) -> bool {
        self.lock().objects.contains_key(key)
    }
}

impl BlobStore for FakeBlobStore {
    async fn put(
        &self,
        key: &BlobRef,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobRef, DirectoryError> {
        let mut s = self.lock();
        s.puts.push(key.clone());
        if s.fail_put {
            return Err(DirectoryError::Storage(anyhow::anyhow!("put refused")));
        }
        if s.objects.contains_key(key) {
            return Err(DirectoryError::Storage(anyhow::anyhow!(
                "precondition failed: {key} exists"
            )));
        }
        s.objects.insert(
            key.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_owned(),
                last_modified: Utc::now(),
            },
        );
        Ok(key.clone())
    }

    async fn delete(&self, key: &BlobRef) -> Result<(), DirectoryError> {
        let mut s = self.lock();
        s.deletes.push(key.clone());
        if s.fail_delete {
            return Err(DirectoryError::Storage(anyhow::anyhow!("delete refused")));
        }
        s.objects.remove(key);
        Ok(())
    }

    async fn presigned_url(&self, key: &BlobRef, ttl: Duration) -> Result<String, DirectoryError> {
        Ok(format!(
            "https://blobs.example.com/{key}?expires={}",
            ttl.as_secs()
        ))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredBlob>, DirectoryError> {
        let mut blobs: Vec<StoredBlob> = self
            .lock()
            .objects
            .iter()
            .filter(|(k, _)| k.as_str().starts_with(prefix))
            .map(|(k, o)| StoredBlob {
                key: k.clone(),
                last_modified: o.last_modified,
            })
            .collect();
        blobs.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(blobs)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn training_fields(course_name: &str) -> TrainingFields {
    TrainingFields {
        course_name: course_name.to_owned(),
        course_type: CourseType::Certification,
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        end_date: None,
        status: TrainingStatus::InProgress,
        certification_name: Some("Cloud Practitioner".into()),
        certification_expiry: NaiveDate::from_ymd_opt(2027, 3, 1),
    }
}
