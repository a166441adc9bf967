use chrono::Utc;

use workforce_domain::id::{EmployeeId, TrainingRecordId};

use crate::domain::repository::{EmployeeRepository, TrainingRecordRepository};
use crate::domain::types::{
    NewTrainingRecord, TrainingFields, TrainingRecord, User, next_timestamp,
};
use crate::error::DirectoryError;
use crate::usecase::managed_employee;

// ── CreateTrainingRecord ─────────────────────────────────────────────────────

pub struct CreateTrainingRecordUseCase<T: TrainingRecordRepository, E: EmployeeRepository> {
    pub records: T,
    pub employees: E,
}

impl<T: TrainingRecordRepository, E: EmployeeRepository> CreateTrainingRecordUseCase<T, E> {
    pub async fn execute(
        &self,
        actor: &User,
        employee_id: EmployeeId,
        fields: TrainingFields,
    ) -> Result<TrainingRecord, DirectoryError> {
        let employee = managed_employee(&self.employees, actor, employee_id).await?;
        self.records
            .create(&NewTrainingRecord {
                employee_id: employee.id,
                fields,
                created_at: Utc::now(),
            })
            .await
    }
}

// ── ListTrainingRecords ──────────────────────────────────────────────────────

pub struct ListTrainingRecordsUseCase<T: TrainingRecordRepository, E: EmployeeRepository> {
    pub records: T,
    pub employees: E,
}

impl<T: TrainingRecordRepository, E: EmployeeRepository> ListTrainingRecordsUseCase<T, E> {
    pub async fn execute(
        &self,
        actor: &User,
        employee_id: EmployeeId,
    ) -> Result<Vec<TrainingRecord>, DirectoryError> {
        let employee = managed_employee(&self.employees, actor, employee_id).await?;
        self.records.list_by_employee(employee.id).await
    }
}

// ── UpdateTrainingRecord ─────────────────────────────────────────────────────

pub struct UpdateTrainingRecordUseCase<T: TrainingRecordRepository, E: EmployeeRepository> {
    pub records: T,
    pub employees: E,
}

impl<T: TrainingRecordRepository, E: EmployeeRepository> UpdateTrainingRecordUseCase<T, E> {
    /// Replaces every editable field. Any status may follow any other.
    pub async fn execute(
        &self,
        actor: &User,
        id: TrainingRecordId,
        fields: TrainingFields,
    ) -> Result<TrainingRecord, DirectoryError> {
        let current = self
            .records
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::TrainingRecordNotFound)?;
        managed_employee(&self.employees, actor, current.employee_id).await?;
        self.records
            .update(id, &fields, next_timestamp(current.updated_at))
            .await?
            .ok_or(DirectoryError::TrainingRecordNotFound)
    }
}

// ── DeleteTrainingRecord ─────────────────────────────────────────────────────

pub struct DeleteTrainingRecordUseCase<T: TrainingRecordRepository, E: EmployeeRepository> {
    pub records: T,
    pub employees: E,
}

impl<T: TrainingRecordRepository, E: EmployeeRepository> DeleteTrainingRecordUseCase<T, E> {
    pub async fn execute(&self, actor: &User, id: TrainingRecordId) -> Result<(), DirectoryError> {
        let current = self
            .records
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::TrainingRecordNotFound)?;
        managed_employee(&self.employees, actor, current.employee_id).await?;
        if !self.records.delete(id).await? {
            return Err(DirectoryError::TrainingRecordNotFound);
        }
        Ok(())
    }
}
