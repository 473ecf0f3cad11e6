use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{ClientAccess, Principal};
use crate::error::ApiError;
use crate::guard;
use crate::state::AppState;

/// Middleware for client-scoped routes (`/api/clients/:client_id/...`):
/// the authenticated principal must be the client's own user or the
/// client's assigned coach. The granted [`ClientAccess`] (principal, role,
/// client id) is injected for the handler.
pub async fn validate_client_middleware(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| {
            ApiError::internal_server_error("authentication required before client validation")
        })?;

    let role = guard::authorize_client_access(state.directory.as_ref(), &principal, client_id).await?;

    tracing::debug!(
        "principal '{}' granted {:?} access to client '{}'",
        principal.id,
        role,
        client_id
    );

    request.extensions_mut().insert(ClientAccess {
        principal,
        role,
        client_id,
    });

    Ok(next.run(request).await)
}
