use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::guard;

/// Middleware for coach-scoped routes (`/api/coaches/:coach_id/...`):
/// the authenticated principal must be the coach named in the path.
pub async fn validate_coach_middleware(
    Path(coach_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| {
            ApiError::internal_server_error("authentication required before coach validation")
        })?;

    guard::authorize_coach(principal, coach_id)?;

    Ok(next.run(request).await)
}
