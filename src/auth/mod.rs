use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verified identity making a request.
///
/// Produced by the authentication middleware from the identity provider's
/// session resolution, injected into request extensions, and dropped when
/// the request completes. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Which side of a client relationship a principal matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Client,
}

/// Granted access to a specific client record, injected by the
/// client-access middleware for handlers downstream.
#[derive(Clone, Debug)]
pub struct ClientAccess {
    pub principal: Principal,
    pub role: Role,
    pub client_id: Uuid,
}
