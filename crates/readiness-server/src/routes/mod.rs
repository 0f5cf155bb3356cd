pub mod assessments;
pub mod auth;
pub mod catalog;
pub mod reports;

use readiness_core::assessment::Assessment;
use readiness_core::store::Store;
use uuid::Uuid;

use crate::error::AppError;

/// Load an assessment and check that `user_id` owns it.
pub(crate) fn load_owned(store: &Store, id: Uuid, user_id: Uuid) -> Result<Assessment, AppError> {
    let assessment = store.assessment(id)?;
    if !assessment.owned_by(user_id) {
        tracing::warn!(assessment = %id, user = %user_id, "assessment access denied");
        return Err(AppError::forbidden("unauthorized access to assessment"));
    }
    Ok(assessment)
}

pub(crate) fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError(anyhow::anyhow!("task join error: {e}"))
}
