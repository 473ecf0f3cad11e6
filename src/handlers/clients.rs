use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{ClientAccess, Role};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct ClientAccessView {
    pub client_id: Uuid,
    pub role: Role,
}

/// GET /api/clients/:client_id/access - which side of the client
/// relationship the caller matched. Frontends use this to decide whether
/// to render the coach or the client view of a profile.
pub async fn client_access(Extension(access): Extension<ClientAccess>) -> ApiResult<ClientAccessView> {
    Ok(ApiResponse::success(ClientAccessView {
        client_id: access.client_id,
        role: access.role,
    }))
}
