use std::time::Duration;

use chrono::Utc;

use workforce_domain::id::{EmployeeId, UserId};

use crate::domain::policy::{Action, authorize};
use crate::domain::repository::{BlobStore, EmployeeRepository, UserRepository};
use crate::domain::types::{
    BlobRef, Employee, NewEmployee, PICTURE_PREFIX, RemovedEmployee, Upload, User,
    is_picture_filename,
};
use crate::error::DirectoryError;
use crate::usecase::delete_blob_best_effort;

// ── AddEmployee ──────────────────────────────────────────────────────────────

pub struct AddEmployeeInput {
    /// Account that will own the profile.
    pub user_id: UserId,
    pub full_name: String,
    pub age: i32,
    pub phone_number: String,
    pub email: String,
    pub role: String,
    pub picture: Option<Upload>,
}

pub struct AddEmployeeUseCase<E: EmployeeRepository, U: UserRepository, B: BlobStore> {
    pub employees: E,
    pub users: U,
    pub blobs: B,
}

impl<E: EmployeeRepository, U: UserRepository, B: BlobStore> AddEmployeeUseCase<E, U, B> {
    /// The picture is uploaded before the row is written. A failed upload
    /// creates nothing; a failed insert removes the uploaded picture again.
    pub async fn execute(
        &self,
        actor: &User,
        input: AddEmployeeInput,
    ) -> Result<Employee, DirectoryError> {
        authorize(
            actor,
            Action::CreateEmployee {
                owner: input.user_id,
            },
        )?;
        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(DirectoryError::UserNotFound);
        }
        if self
            .employees
            .find_by_user_id(input.user_id)
            .await?
            .is_some()
        {
            return Err(DirectoryError::EmployeeAlreadyExists);
        }

        let picture_ref = match input.picture {
            Some(picture) => Some(self.store_picture(picture).await?),
            None => None,
        };

        let created = self
            .employees
            .create(&NewEmployee {
                user_id: input.user_id,
                full_name: input.full_name,
                age: input.age,
                phone_number: input.phone_number,
                email: input.email,
                role: input.role,
                picture_ref: picture_ref.clone(),
                created_at: Utc::now(),
            })
            .await;

        match created {
            Ok(employee) => {
                tracing::info!(employee_id = %employee.id, user_id = %employee.user_id, "employee added");
                Ok(employee)
            }
            Err(e) => {
                if let Some(key) = picture_ref {
                    delete_blob_best_effort(&self.blobs, &key).await;
                }
                Err(e)
            }
        }
    }

    async fn store_picture(&self, picture: Upload) -> Result<BlobRef, DirectoryError> {
        if !is_picture_filename(&picture.filename) {
            return Err(DirectoryError::UnsupportedFileType);
        }
        let content_type = picture.content_type();
        let key = BlobRef::generate(PICTURE_PREFIX, picture.extension().as_deref());
        self.blobs.put(&key, picture.bytes, &content_type).await
    }
}

// ── RemoveEmployee ───────────────────────────────────────────────────────────

pub struct RemoveEmployeeUseCase<E: EmployeeRepository, B: BlobStore> {
    pub employees: E,
    pub blobs: B,
}

impl<E: EmployeeRepository, B: BlobStore> RemoveEmployeeUseCase<E, B> {
    /// Rows go first in one transaction; then one blob delete per document and
    /// one for the picture. Blob failures never undo the removal.
    pub async fn execute(
        &self,
        actor: &User,
        id: EmployeeId,
    ) -> Result<RemovedEmployee, DirectoryError> {
        authorize(actor, Action::DeleteEmployee)?;
        let removed = self
            .employees
            .remove_cascade(id)
            .await?
            .ok_or(DirectoryError::EmployeeNotFound)?;

        let refs = removed.blob_refs();
        let mut failed = 0usize;
        for key in &refs {
            if !delete_blob_best_effort(&self.blobs, key).await {
                failed += 1;
            }
        }
        tracing::info!(
            employee_id = %id,
            removed_by = %actor.id,
            blobs = refs.len(),
            blob_failures = failed,
            "employee removed"
        );
        Ok(removed)
    }
}

// ── ListEmployees ────────────────────────────────────────────────────────────

pub struct ListEmployeesUseCase<E: EmployeeRepository> {
    pub employees: E,
}

impl<E: EmployeeRepository> ListEmployeesUseCase<E> {
    pub async fn execute(&self, actor: &User) -> Result<Vec<Employee>, DirectoryError> {
        authorize(actor, Action::ViewDirectory)?;
        self.employees.list().await
    }
}

// ── GetEmployee ──────────────────────────────────────────────────────────────

pub struct GetEmployeeUseCase<E: EmployeeRepository> {
    pub employees: E,
}

impl<E: EmployeeRepository> GetEmployeeUseCase<E> {
    pub async fn execute(&self, actor: &User, id: EmployeeId) -> Result<Employee, DirectoryError> {
        authorize(actor, Action::ViewDirectory)?;
        self.employees
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::EmployeeNotFound)
    }
}

// ── EmployeePictureUrl ───────────────────────────────────────────────────────

pub struct EmployeePictureUrlUseCase<E: EmployeeRepository, B: BlobStore> {
    pub employees: E,
    pub blobs: B,
    pub ttl: Duration,
}

impl<E: EmployeeRepository, B: BlobStore> EmployeePictureUrlUseCase<E, B> {
    /// `None` when the employee has no picture.
    pub async fn execute(
        &self,
        actor: &User,
        id: EmployeeId,
    ) -> Result<Option<String>, DirectoryError> {
        authorize(actor, Action::ViewDirectory)?;
        let employee = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::EmployeeNotFound)?;
        match employee.picture_ref {
            Some(key) => Ok(Some(self.blobs.presigned_url(&key, self.ttl).await?)),
            None => Ok(None),
        }
    }
}
