use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait, sea_query::Expr,
};

use workforce_directory_schema::{
    documents, employees, messages, tickets, training_records, users,
};
use workforce_domain::id::{DocumentId, EmployeeId, MessageId, TicketId, TrainingRecordId, UserId};
use workforce_domain::ticket::{TicketApproval, TicketStatus, TicketType};
use workforce_domain::training::{CourseType, TrainingStatus};

use crate::domain::repository::{
    DocumentRepository, EmployeeRepository, MessageRepository, TicketRepository,
    TrainingRecordRepository, UserRepository,
};
use crate::domain::types::{
    BlobRef, Document, Employee, Message, NewDocument, NewEmployee, NewMessage, NewTicket,
    NewTrainingRecord, NewUser, RemovedEmployee, Ticket, TicketOwner, TicketResponse, TicketView,
    TrainingFields, TrainingRecord, User,
};
use crate::error::DirectoryError;

/// Translate a failed write: unique violations through `conflict`, foreign-key
/// violations to `Constraint`, anything else to `Internal`.
fn classify_write_error(
    err: DbErr,
    op: &'static str,
    conflict: impl FnOnce(&str) -> DirectoryError,
) -> DirectoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => conflict(&detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => DirectoryError::Constraint(detail),
        _ => DirectoryError::Internal(anyhow::Error::new(err).context(op)),
    }
}

fn unwrap_txn_error(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn register(&self, user: &NewUser) -> Result<User, DirectoryError> {
        let model = self
            .db
            .transaction::<_, users::Model, DbErr>(|txn| {
                let user = user.clone();
                Box::pin(async move {
                    // Blocks concurrent inserts (not reads) so exactly one
                    // registration observes the empty table.
                    txn.execute_unprepared("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
                        .await?;
                    let bootstrap = users::Entity::find().count(txn).await? == 0;
                    users::ActiveModel {
                        username: Set(user.username),
                        email: Set(user.email),
                        password_hash: Set(user.password_hash),
                        is_admin: Set(bootstrap),
                        is_approved: Set(bootstrap),
                        created_at: Set(user.created_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                })
            })
            .await
            .map_err(|e| {
                classify_write_error(unwrap_txn_error(e), "register user", |_| {
                    DirectoryError::UserAlreadyExists
                })
            })?;
        Ok(user_from_model(model))
    }

    async fn list_pending(&self) -> Result<Vec<User>, DirectoryError> {
        let models = users::Entity::find()
            .filter(users::Column::IsApproved.eq(false))
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list pending users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn set_approved(&self, id: UserId) -> Result<bool, DirectoryError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsApproved, Expr::value(true))
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("approve user")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_admin(&self, id: UserId) -> Result<bool, DirectoryError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsAdmin, Expr::value(true))
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("grant admin")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        is_admin: model.is_admin,
        is_approved: model.is_approved,
        created_at: model.created_at,
    }
}

// ── Employee repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmployeeRepository {
    pub db: DatabaseConnection,
}

impl EmployeeRepository for DbEmployeeRepository {
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DirectoryError> {
        let model = employees::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find employee by id")?;
        Ok(model.map(employee_from_model))
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Employee>, DirectoryError> {
        let model = employees::Entity::find()
            .filter(employees::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .context("find employee by user id")?;
        Ok(model.map(employee_from_model))
    }

    async fn list(&self) -> Result<Vec<Employee>, DirectoryError> {
        let models = employees::Entity::find()
            .order_by_asc(employees::Column::FullName)
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await
            .context("list employees")?;
        Ok(models.into_iter().map(employee_from_model).collect())
    }

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DirectoryError> {
        let model = employees::ActiveModel {
            user_id: Set(employee.user_id.0),
            full_name: Set(employee.full_name.clone()),
            age: Set(employee.age),
            phone_number: Set(employee.phone_number.clone()),
            email: Set(employee.email.clone()),
            role: Set(employee.role.clone()),
            picture_ref: Set(employee.picture_ref.as_ref().map(|r| r.0.clone())),
            created_at: Set(employee.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            classify_write_error(e, "create employee", |detail| {
                if detail.contains("email") {
                    DirectoryError::EmployeeEmailTaken
                } else {
                    DirectoryError::EmployeeAlreadyExists
                }
            })
        })?;
        Ok(employee_from_model(model))
    }

    async fn remove_cascade(
        &self,
        id: EmployeeId,
    ) -> Result<Option<RemovedEmployee>, DirectoryError> {
        let removed = self
            .db
            .transaction::<_, Option<(employees::Model, Vec<String>)>, DbErr>(|txn| {
                Box::pin(async move {
                    // Row lock serializes concurrent removals of the same employee.
                    let Some(model) = employees::Entity::find_by_id(id.0)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let document_refs: Vec<String> = documents::Entity::find()
                        .select_only()
                        .column(documents::Column::BlobRef)
                        .filter(documents::Column::EmployeeId.eq(id.0))
                        .order_by_asc(documents::Column::Id)
                        .into_tuple()
                        .all(txn)
                        .await?;
                    tickets::Entity::delete_many()
                        .filter(tickets::Column::EmployeeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    training_records::Entity::delete_many()
                        .filter(training_records::Column::EmployeeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    documents::Entity::delete_many()
                        .filter(documents::Column::EmployeeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    employees::Entity::delete_by_id(id.0).exec(txn).await?;
                    Ok(Some((model, document_refs)))
                })
            })
            .await
            .context("remove employee cascade")?;
        Ok(removed.map(|(model, refs)| RemovedEmployee {
            employee: employee_from_model(model),
            document_refs: refs.into_iter().map(BlobRef).collect(),
        }))
    }

    async fn list_picture_refs(&self) -> Result<Vec<BlobRef>, DirectoryError> {
        let refs: Vec<String> = employees::Entity::find()
            .select_only()
            .column(employees::Column::PictureRef)
            .filter(employees::Column::PictureRef.is_not_null())
            .into_tuple()
            .all(&self.db)
            .await
            .context("list picture refs")?;
        Ok(refs.into_iter().map(BlobRef).collect())
    }
}

fn employee_from_model(model: employees::Model) -> Employee {
    Employee {
        id: EmployeeId(model.id),
        user_id: UserId(model.user_id),
        full_name: model.full_name,
        age: model.age,
        phone_number: model.phone_number,
        email: model.email,
        role: model.role,
        picture_ref: model.picture_ref.map(BlobRef),
        created_at: model.created_at,
    }
}

// ── Ticket repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTicketRepository {
    pub db: DatabaseConnection,
}

impl DbTicketRepository {
    /// Attach owner identity to ticket rows with one lookup per table.
    async fn with_owners(
        &self,
        rows: Vec<(tickets::Model, Option<employees::Model>)>,
    ) -> Result<Vec<TicketView>, DirectoryError> {
        let user_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, employee)| employee.as_ref().map(|e| e.user_id))
            .collect();
        let usernames: HashMap<i32, String> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .context("load ticket owners")?
                .into_iter()
                .map(|u| (u.id, u.username))
                .collect()
        };

        let mut views = Vec::with_capacity(rows.len());
        for (ticket, employee) in rows {
            let employee = employee
                .with_context(|| format!("ticket {} has no employee", ticket.id))?;
            let username = usernames
                .get(&employee.user_id)
                .cloned()
                .with_context(|| format!("employee {} has no user", employee.id))?;
            views.push(TicketView {
                ticket: ticket_from_model(ticket)?,
                owner: TicketOwner {
                    employee_id: EmployeeId(employee.id),
                    employee_name: employee.full_name,
                    user_id: UserId(employee.user_id),
                    username,
                },
            });
        }
        Ok(views)
    }
}

impl TicketRepository for DbTicketRepository {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<TicketView>, DirectoryError> {
        let Some(row) = tickets::Entity::find_by_id(id.0)
            .find_also_related(employees::Entity)
            .one(&self.db)
            .await
            .context("find ticket by id")?
        else {
            return Ok(None);
        };
        Ok(self.with_owners(vec![row]).await?.pop())
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, DirectoryError> {
        let model = tickets::ActiveModel {
            employee_id: Set(ticket.employee_id.0),
            title: Set(ticket.title.clone()),
            description: Set(ticket.description.clone()),
            ticket_type: Set(ticket.ticket_type.as_str().to_owned()),
            status: Set(ticket.status.as_str().to_owned()),
            admin_response: Set(None),
            approval: Set(ticket.approval.as_str().to_owned()),
            created_at: Set(ticket.created_at),
            updated_at: Set(ticket.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            classify_write_error(e, "create ticket", |d| DirectoryError::Constraint(d.to_owned()))
        })?;
        ticket_from_model(model)
    }

    async fn list_with_owner(
        &self,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<TicketView>, DirectoryError> {
        let mut query = tickets::Entity::find()
            .find_also_related(employees::Entity)
            .order_by_desc(tickets::Column::CreatedAt)
            .order_by_desc(tickets::Column::Id);
        if let Some(employee_id) = employee_id {
            query = query.filter(tickets::Column::EmployeeId.eq(employee_id.0));
        }
        let rows = query.all(&self.db).await.context("list tickets")?;
        self.with_owners(rows).await
    }

    async fn respond(
        &self,
        id: TicketId,
        response: &TicketResponse,
    ) -> Result<Option<Ticket>, DirectoryError> {
        let updated = tickets::ActiveModel {
            id: Set(id.0),
            admin_response: Set(Some(response.admin_response.clone())),
            status: Set(response.status.as_str().to_owned()),
            approval: Set(response.approval.as_str().to_owned()),
            updated_at: Set(response.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await;
        match updated {
            Ok(model) => Ok(Some(ticket_from_model(model)?)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("respond to ticket").into()),
        }
    }

    async fn delete(&self, id: TicketId) -> Result<bool, DirectoryError> {
        let result = tickets::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete ticket")?;
        Ok(result.rows_affected > 0)
    }
}

fn ticket_from_model(model: tickets::Model) -> Result<Ticket, DirectoryError> {
    Ok(Ticket {
        id: TicketId(model.id),
        employee_id: EmployeeId(model.employee_id),
        title: model.title,
        description: model.description,
        ticket_type: model.ticket_type.parse::<TicketType>().context("decode ticket type")?,
        status: model.status.parse::<TicketStatus>().context("decode ticket status")?,
        admin_response: model.admin_response,
        approval: model.approval.parse::<TicketApproval>().context("decode ticket approval")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Training record repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTrainingRecordRepository {
    pub db: DatabaseConnection,
}

impl TrainingRecordRepository for DbTrainingRecordRepository {
    async fn find_by_id(
        &self,
        id: TrainingRecordId,
    ) -> Result<Option<TrainingRecord>, DirectoryError> {
        let model = training_records::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find training record by id")?;
        model.map(training_from_model).transpose()
    }

    async fn list_by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TrainingRecord>, DirectoryError> {
        let models = training_records::Entity::find()
            .filter(training_records::Column::EmployeeId.eq(employee_id.0))
            .order_by_desc(training_records::Column::StartDate)
            .order_by_desc(training_records::Column::Id)
            .all(&self.db)
            .await
            .context("list training records")?;
        models.into_iter().map(training_from_model).collect()
    }

    async fn create(&self, record: &NewTrainingRecord) -> Result<TrainingRecord, DirectoryError> {
        let mut am = training_records::ActiveModel {
            employee_id: Set(record.employee_id.0),
            created_at: Set(record.created_at),
            updated_at: Set(record.created_at),
            ..Default::default()
        };
        apply_training_fields(&mut am, &record.fields);
        let model = am.insert(&self.db).await.map_err(|e| {
            classify_write_error(e, "create training record", |d| {
                DirectoryError::Constraint(d.to_owned())
            })
        })?;
        training_from_model(model)
    }

    async fn update(
        &self,
        id: TrainingRecordId,
        fields: &TrainingFields,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<TrainingRecord>, DirectoryError> {
        let mut am = training_records::ActiveModel {
            id: Set(id.0),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        apply_training_fields(&mut am, fields);
        match am.update(&self.db).await {
            Ok(model) => Ok(Some(training_from_model(model)?)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context("update training record")
                .into()),
        }
    }

    async fn delete(&self, id: TrainingRecordId) -> Result<bool, DirectoryError> {
        let result = training_records::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete training record")?;
        Ok(result.rows_affected > 0)
    }
}

fn apply_training_fields(am: &mut training_records::ActiveModel, fields: &TrainingFields) {
    am.course_name = Set(fields.course_name.clone());
    am.course_type = Set(fields.course_type.as_str().to_owned());
    am.start_date = Set(fields.start_date);
    am.end_date = Set(fields.end_date);
    am.status = Set(fields.status.as_str().to_owned());
    am.certification_name = Set(fields.certification_name.clone());
    am.certification_expiry = Set(fields.certification_expiry);
}

fn training_from_model(model: training_records::Model) -> Result<TrainingRecord, DirectoryError> {
    Ok(TrainingRecord {
        id: TrainingRecordId(model.id),
        employee_id: EmployeeId(model.employee_id),
        fields: TrainingFields {
            course_name: model.course_name,
            course_type: model.course_type.parse::<CourseType>().context("decode course type")?,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.parse::<TrainingStatus>().context("decode training status")?,
            certification_name: model.certification_name,
            certification_expiry: model.certification_expiry,
        },
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Document repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDocumentRepository {
    pub db: DatabaseConnection,
}

impl DocumentRepository for DbDocumentRepository {
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DirectoryError> {
        let model = documents::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find document by id")?;
        Ok(model.map(document_from_model))
    }

    async fn list_by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<Document>, DirectoryError> {
        let models = documents::Entity::find()
            .filter(documents::Column::EmployeeId.eq(employee_id.0))
            .order_by_desc(documents::Column::UploadDate)
            .order_by_desc(documents::Column::Id)
            .all(&self.db)
            .await
            .context("list documents")?;
        Ok(models.into_iter().map(document_from_model).collect())
    }

    async fn create(&self, document: &NewDocument) -> Result<Document, DirectoryError> {
        let model = documents::ActiveModel {
            employee_id: Set(document.employee_id.0),
            filename: Set(document.filename.clone()),
            file_type: Set(document.file_type.clone()),
            upload_date: Set(document.upload_date),
            blob_ref: Set(document.blob_ref.0.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            classify_write_error(e, "create document", |_| DirectoryError::DocumentAlreadyExists)
        })?;
        Ok(document_from_model(model))
    }

    async fn delete(&self, id: DocumentId) -> Result<bool, DirectoryError> {
        let result = documents::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete document")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_blob_refs(&self) -> Result<Vec<BlobRef>, DirectoryError> {
        let refs: Vec<String> = documents::Entity::find()
            .select_only()
            .column(documents::Column::BlobRef)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list document blob refs")?;
        Ok(refs.into_iter().map(BlobRef).collect())
    }
}

fn document_from_model(model: documents::Model) -> Document {
    Document {
        id: DocumentId(model.id),
        employee_id: EmployeeId(model.employee_id),
        filename: model.filename,
        file_type: model.file_type,
        upload_date: model.upload_date,
        blob_ref: BlobRef(model.blob_ref),
    }
}

// ── Message repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMessageRepository {
    pub db: DatabaseConnection,
}

impl MessageRepository for DbMessageRepository {
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DirectoryError> {
        let model = messages::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find message by id")?;
        Ok(model.map(message_from_model))
    }

    async fn create(&self, message: &NewMessage) -> Result<Message, DirectoryError> {
        let model = messages::ActiveModel {
            sender_id: Set(message.sender_id.0),
            recipient_id: Set(message.recipient_id.0),
            subject: Set(message.subject.clone()),
            body: Set(message.body.clone()),
            sent_at: Set(message.sent_at),
            is_read: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            classify_write_error(e, "create message", |d| DirectoryError::Constraint(d.to_owned()))
        })?;
        Ok(message_from_model(model))
    }

    async fn list_received(&self, user_id: UserId) -> Result<Vec<Message>, DirectoryError> {
        let models = messages::Entity::find()
            .filter(messages::Column::RecipientId.eq(user_id.0))
            .order_by_desc(messages::Column::SentAt)
            .order_by_desc(messages::Column::Id)
            .all(&self.db)
            .await
            .context("list received messages")?;
        Ok(models.into_iter().map(message_from_model).collect())
    }

    async fn list_sent(&self, user_id: UserId) -> Result<Vec<Message>, DirectoryError> {
        let models = messages::Entity::find()
            .filter(messages::Column::SenderId.eq(user_id.0))
            .order_by_desc(messages::Column::SentAt)
            .order_by_desc(messages::Column::Id)
            .all(&self.db)
            .await
            .context("list sent messages")?;
        Ok(models.into_iter().map(message_from_model).collect())
    }

    async fn mark_read(&self, id: MessageId) -> Result<bool, DirectoryError> {
        let result = messages::Entity::update_many()
            .col_expr(messages::Column::IsRead, Expr::value(true))
            .filter(messages::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("mark message read")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: MessageId) -> Result<bool, DirectoryError> {
        let result = messages::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete message")?;
        Ok(result.rows_affected > 0)
    }
}

fn message_from_model(model: messages::Model) -> Message {
    Message {
        id: MessageId(model.id),
        sender_id: UserId(model.sender_id),
        recipient_id: UserId(model.recipient_id),
        subject: model.subject,
        body: model.body,
        sent_at: model.sent_at,
        read: model.is_read,
    }
}
