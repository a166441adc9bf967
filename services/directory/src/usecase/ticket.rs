use chrono::Utc;

use workforce_domain::id::TicketId;
use workforce_domain::ticket::{TicketApproval, TicketStatus, TicketType};

use crate::domain::policy::{Action, authorize, can_perform};
use crate::domain::repository::{EmployeeRepository, TicketRepository};
use crate::domain::types::{
    NewTicket, Ticket, TicketResponse, TicketView, User, next_timestamp,
};
use crate::error::DirectoryError;

// ── CreateTicket ─────────────────────────────────────────────────────────────

pub struct CreateTicketInput {
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
}

pub struct CreateTicketUseCase<T: TicketRepository, E: EmployeeRepository> {
    pub tickets: T,
    pub employees: E,
}

impl<T: TicketRepository, E: EmployeeRepository> CreateTicketUseCase<T, E> {
    /// Files a ticket against the actor's own employee record.
    pub async fn execute(
        &self,
        actor: &User,
        input: CreateTicketInput,
    ) -> Result<Ticket, DirectoryError> {
        authorize(actor, Action::CreateTicket { owner: actor.id })?;
        let employee = self
            .employees
            .find_by_user_id(actor.id)
            .await?
            .ok_or(DirectoryError::EmployeeNotFound)?;
        self.tickets
            .create(&NewTicket {
                employee_id: employee.id,
                title: input.title,
                description: input.description,
                ticket_type: input.ticket_type,
                status: TicketStatus::Open,
                approval: TicketApproval::Unset,
                created_at: Utc::now(),
            })
            .await
    }
}

// ── RespondToTicket ──────────────────────────────────────────────────────────

pub struct RespondInput {
    pub admin_response: String,
    pub status: TicketStatus,
    pub approval: TicketApproval,
}

pub struct RespondToTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> RespondToTicketUseCase<T> {
    /// Status and approval are written as given; any status may follow any other.
    pub async fn execute(
        &self,
        actor: &User,
        id: TicketId,
        input: RespondInput,
    ) -> Result<Ticket, DirectoryError> {
        authorize(actor, Action::RespondToTicket)?;
        let current = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::TicketNotFound)?;
        let response = TicketResponse {
            admin_response: input.admin_response,
            status: input.status,
            approval: input.approval,
            updated_at: next_timestamp(current.ticket.updated_at),
        };
        let ticket = self
            .tickets
            .respond(id, &response)
            .await?
            .ok_or(DirectoryError::TicketNotFound)?;
        tracing::info!(
            ticket_id = %id,
            responder = %actor.id,
            status = ticket.status.as_str(),
            approval = ticket.approval.as_str(),
            "ticket responded"
        );
        Ok(ticket)
    }
}

// ── ListTickets ──────────────────────────────────────────────────────────────

/// Non-fatal condition reported alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListWarning {
    /// The actor has no employee record, so there is nothing of theirs to list.
    NoEmployeeRecord,
}

#[derive(Debug, Clone)]
pub struct TicketListing {
    pub tickets: Vec<TicketView>,
    pub warning: Option<ListWarning>,
}

pub struct ListTicketsUseCase<T: TicketRepository, E: EmployeeRepository> {
    pub tickets: T,
    pub employees: E,
}

impl<T: TicketRepository, E: EmployeeRepository> ListTicketsUseCase<T, E> {
    /// Admins see every ticket; members see their own employee's tickets.
    pub async fn execute(&self, actor: &User) -> Result<TicketListing, DirectoryError> {
        if can_perform(Some(actor), Action::ViewAllTickets) {
            return Ok(TicketListing {
                tickets: self.tickets.list_with_owner(None).await?,
                warning: None,
            });
        }
        authorize(actor, Action::ManageEmployeeRecords { owner: actor.id })?;
        let Some(employee) = self.employees.find_by_user_id(actor.id).await? else {
            return Ok(TicketListing {
                tickets: Vec::new(),
                warning: Some(ListWarning::NoEmployeeRecord),
            });
        };
        Ok(TicketListing {
            tickets: self.tickets.list_with_owner(Some(employee.id)).await?,
            warning: None,
        })
    }
}

// ── GetTicket ────────────────────────────────────────────────────────────────

pub struct GetTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> GetTicketUseCase<T> {
    pub async fn execute(&self, actor: &User, id: TicketId) -> Result<TicketView, DirectoryError> {
        let view = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::TicketNotFound)?;
        authorize(
            actor,
            Action::ManageEmployeeRecords {
                owner: view.owner.user_id,
            },
        )?;
        Ok(view)
    }
}

// ── DeleteTicket ─────────────────────────────────────────────────────────────

pub struct DeleteTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> DeleteTicketUseCase<T> {
    pub async fn execute(&self, actor: &User, id: TicketId) -> Result<(), DirectoryError> {
        let view = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::TicketNotFound)?;
        authorize(
            actor,
            Action::ManageEmployeeRecords {
                owner: view.owner.user_id,
            },
        )?;
        if !self.tickets.delete(id).await? {
            return Err(DirectoryError::TicketNotFound);
        }
        Ok(())
    }
}
