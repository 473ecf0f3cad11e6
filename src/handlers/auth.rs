use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct PrincipalView {
    pub id: Uuid,
    pub email: Option<String>,
}

/// GET /api/auth/whoami - the principal the gate resolved for this request.
pub async fn whoami(Extension(principal): Extension<Principal>) -> ApiResult<PrincipalView> {
    Ok(ApiResponse::success(PrincipalView {
        id: principal.id,
        email: principal.email,
    }))
}
