use chrono::Utc;

use workforce_domain::id::{MessageId, UserId};

use crate::domain::policy::{Action, authorize};
use crate::domain::repository::{MessageRepository, UserRepository};
use crate::domain::types::{Message, NewMessage, User};
use crate::error::DirectoryError;

// ── SendMessage ──────────────────────────────────────────────────────────────

pub struct SendMessageInput {
    pub recipient_id: UserId,
    pub subject: String,
    pub body: String,
}

pub struct SendMessageUseCase<M: MessageRepository, U: UserRepository> {
    pub messages: M,
    pub users: U,
}

impl<M: MessageRepository, U: UserRepository> SendMessageUseCase<M, U> {
    pub async fn execute(
        &self,
        actor: &User,
        input: SendMessageInput,
    ) -> Result<Message, DirectoryError> {
        authorize(actor, Action::SendMessage { sender: actor.id })?;
        if self.users.find_by_id(input.recipient_id).await?.is_none() {
            return Err(DirectoryError::UserNotFound);
        }
        self.messages
            .create(&NewMessage {
                sender_id: actor.id,
                recipient_id: input.recipient_id,
                subject: input.subject,
                body: input.body,
                sent_at: Utc::now(),
            })
            .await
    }
}

// ── Inbox / Sent ─────────────────────────────────────────────────────────────

pub struct InboxUseCase<M: MessageRepository> {
    pub messages: M,
}

impl<M: MessageRepository> InboxUseCase<M> {
    pub async fn execute(&self, actor: &User) -> Result<Vec<Message>, DirectoryError> {
        authorize(
            actor,
            Action::ReadMessage {
                sender: actor.id,
                recipient: actor.id,
            },
        )?;
        self.messages.list_received(actor.id).await
    }
}

pub struct SentMessagesUseCase<M: MessageRepository> {
    pub messages: M,
}

impl<M: MessageRepository> SentMessagesUseCase<M> {
    pub async fn execute(&self, actor: &User) -> Result<Vec<Message>, DirectoryError> {
        authorize(
            actor,
            Action::ReadMessage {
                sender: actor.id,
                recipient: actor.id,
            },
        )?;
        self.messages.list_sent(actor.id).await
    }
}

// ── OpenMessage ──────────────────────────────────────────────────────────────

pub struct OpenMessageUseCase<M: MessageRepository> {
    pub messages: M,
}

impl<M: MessageRepository> OpenMessageUseCase<M> {
    /// Marks the message read only when its recipient opens it.
    pub async fn execute(&self, actor: &User, id: MessageId) -> Result<Message, DirectoryError> {
        let mut message = self
            .messages
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::MessageNotFound)?;
        authorize(
            actor,
            Action::ReadMessage {
                sender: message.sender_id,
                recipient: message.recipient_id,
            },
        )?;
        if message.recipient_id == actor.id && !message.read {
            if !self.messages.mark_read(id).await? {
                return Err(DirectoryError::MessageNotFound);
            }
            message.read = true;
        }
        Ok(message)
    }
}

// ── DeleteMessage ────────────────────────────────────────────────────────────

pub struct DeleteMessageUseCase<M: MessageRepository> {
    pub messages: M,
}

impl<M: MessageRepository> DeleteMessageUseCase<M> {
    /// Either party may delete; the message disappears for both.
    pub async fn execute(&self, actor: &User, id: MessageId) -> Result<(), DirectoryError> {
        let message = self
            .messages
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::MessageNotFound)?;
        authorize(
            actor,
            Action::ReadMessage {
                sender: message.sender_id,
                recipient: message.recipient_id,
            },
        )?;
        if !self.messages.delete(id).await? {
            return Err(DirectoryError::MessageNotFound);
        }
        Ok(())
    }
}
