use chrono::Utc;

use workforce_core::password::{hash_password, verify_absent, verify_password};
use workforce_domain::id::UserId;

use crate::domain::policy::{Action, authorize};
use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, User};
use crate::error::DirectoryError;

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUseCase<R> {
    /// The first account ever registered becomes an approved admin; every later
    /// one starts pending.
    pub async fn execute(&self, input: RegisterInput) -> Result<User, DirectoryError> {
        let password_hash = hash_password(&input.password)
            .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
        let user = self
            .repo
            .register(&NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;
        if user.is_admin {
            tracing::info!(user_id = %user.id, "bootstrap admin registered");
        } else {
            tracing::info!(user_id = %user.id, "user registered, pending approval");
        }
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> LoginUseCase<R> {
    /// Credential is checked before approval, so a wrong password never reveals
    /// whether the account is pending. Unknown usernames pay the same hashing
    /// cost as known ones.
    pub async fn execute(&self, username: &str, password: &str) -> Result<User, DirectoryError> {
        let Some(user) = self.repo.find_by_username(username).await? else {
            verify_absent(password);
            return Err(DirectoryError::InvalidCredential);
        };
        if !verify_password(password, &user.password_hash) {
            return Err(DirectoryError::InvalidCredential);
        }
        if !user.is_approved {
            return Err(DirectoryError::NotApproved);
        }
        Ok(user)
    }
}

// ── ApproveUser ──────────────────────────────────────────────────────────────

pub struct ApproveUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ApproveUserUseCase<R> {
    /// Idempotent: approving an approved user succeeds.
    pub async fn execute(&self, actor: &User, target: UserId) -> Result<(), DirectoryError> {
        authorize(actor, Action::ApproveUser)?;
        if !self.repo.set_approved(target).await? {
            return Err(DirectoryError::UserNotFound);
        }
        tracing::info!(user_id = %target, approved_by = %actor.id, "user approved");
        Ok(())
    }
}

// ── ListPendingUsers ─────────────────────────────────────────────────────────

pub struct ListPendingUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListPendingUsersUseCase<R> {
    pub async fn execute(&self, actor: &User) -> Result<Vec<User>, DirectoryError> {
        authorize(actor, Action::ListPendingUsers)?;
        self.repo.list_pending().await
    }
}

// ── GrantAdmin ───────────────────────────────────────────────────────────────

pub struct GrantAdminUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GrantAdminUseCase<R> {
    /// Sets only the admin flag; approval stays an independent transition.
    pub async fn execute(&self, actor: &User, target: UserId) -> Result<(), DirectoryError> {
        authorize(actor, Action::GrantAdmin)?;
        if !self.repo.set_admin(target).await? {
            return Err(DirectoryError::UserNotFound);
        }
        tracing::info!(user_id = %target, granted_by = %actor.id, "admin granted");
        Ok(())
    }
}
