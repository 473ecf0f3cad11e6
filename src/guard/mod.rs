//! Ownership checks between a resolved principal and the coach/client
//! resources it is trying to act on.
//!
//! Denials are deliberately asymmetric: callers get a generic Forbidden,
//! while the logs record both the requesting identity and the target
//! resource so an operator can reconstruct what was attempted.

use uuid::Uuid;

use crate::auth::{Principal, Role};
use crate::error::ApiError;
use crate::store::ClientDirectory;

const FORBIDDEN_MESSAGE: &str = "Not authorized";

/// A principal may act as a coach only if it literally is that coach.
/// There is no delegation; staff acting for a coach would need their own
/// role model, which this platform does not have.
pub fn authorize_coach(principal: &Principal, claimed_coach_id: Uuid) -> Result<(), ApiError> {
    if principal.id == claimed_coach_id {
        return Ok(());
    }

    tracing::warn!(
        "coach authorization denied: principal '{}' claimed coach '{}'",
        principal.id,
        claimed_coach_id
    );
    Err(ApiError::forbidden(FORBIDDEN_MESSAGE))
}

/// Two-sided trust boundary around a client record: the owning client or
/// the assigned coach may act on it, nobody else. A missing record and an
/// unreachable directory both deny.
pub async fn authorize_client_access(
    directory: &dyn ClientDirectory,
    principal: &Principal,
    claimed_client_id: Uuid,
) -> Result<Role, ApiError> {
    let record = directory
        .client_record(claimed_client_id)
        .await
        .map_err(|e| {
            tracing::error!(
                "client lookup failed for '{}' (principal '{}'): {}",
                claimed_client_id,
                principal.id,
                e
            );
            ApiError::forbidden(FORBIDDEN_MESSAGE)
        })?;

    let Some(record) = record else {
        tracing::warn!(
            "client access denied: client '{}' not found (principal '{}')",
            claimed_client_id,
            principal.id
        );
        return Err(ApiError::forbidden(FORBIDDEN_MESSAGE));
    };

    if record.user_id == principal.id {
        return Ok(Role::Client);
    }
    if record.coach_id == principal.id {
        return Ok(Role::Coach);
    }

    tracing::warn!(
        "client access denied: principal '{}' is neither owner nor coach of client '{}'",
        principal.id,
        claimed_client_id
    );
    Err(ApiError::forbidden(FORBIDDEN_MESSAGE))
}
