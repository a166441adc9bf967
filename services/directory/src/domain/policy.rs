//! Stateless authorization policy.
//!
//! Precedence, first match wins:
//! 1. no actor or an unapproved actor may only use public actions;
//! 2. an admin may do anything;
//! 3. an approved member may act on their own records and browse the directory.

use workforce_domain::id::UserId;

use crate::domain::types::User;
use crate::error::DirectoryError;

/// Operation an actor wants to perform, carrying the owner of the target where it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
    ViewPublicPage,
    ApproveUser,
    GrantAdmin,
    ListPendingUsers,
    DeleteEmployee,
    RespondToTicket,
    ViewAllTickets,
    ViewDirectory,
    /// Create an employee profile owned by `owner`.
    CreateEmployee { owner: UserId },
    /// Read or change tickets, training records or documents of `owner`'s employee.
    ManageEmployeeRecords { owner: UserId },
    CreateTicket { owner: UserId },
    SendMessage { sender: UserId },
    ReadMessage { sender: UserId, recipient: UserId },
}

impl Action {
    fn is_public(self) -> bool {
        matches!(self, Self::Register | Self::Login | Self::ViewPublicPage)
    }
}

pub fn can_perform(actor: Option<&User>, action: Action) -> bool {
    if action.is_public() {
        return true;
    }
    let Some(actor) = actor else {
        return false;
    };
    if actor.is_active_admin() {
        return true;
    }
    if !actor.is_approved {
        return false;
    }
    match action {
        Action::ViewDirectory => true,
        Action::CreateEmployee { owner }
        | Action::ManageEmployeeRecords { owner }
        | Action::CreateTicket { owner } => owner == actor.id,
        Action::SendMessage { sender } => sender == actor.id,
        Action::ReadMessage { sender, recipient } => sender == actor.id || recipient == actor.id,
        Action::ApproveUser
        | Action::GrantAdmin
        | Action::ListPendingUsers
        | Action::DeleteEmployee
        | Action::RespondToTicket
        | Action::ViewAllTickets => false,
        Action::Register | Action::Login | Action::ViewPublicPage => true,
    }
}

/// [`can_perform`] for an authenticated actor, failing with `Forbidden` on deny.
pub fn authorize(actor: &User, action: Action) -> Result<(), DirectoryError> {
    if can_perform(Some(actor), action) {
        Ok(())
    } else {
        tracing::debug!(user_id = %actor.id, ?action, "action denied");
        Err(DirectoryError::Forbidden)
    }
}
