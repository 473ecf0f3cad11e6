pub mod auth;
pub mod method;
pub mod rate_limit;
pub mod response;
pub mod validate_client;
pub mod validate_coach;

pub use auth::authenticate_middleware;
pub use method::allow_get;
pub use rate_limit::rate_limit_api;
pub use response::{ApiResponse, ApiResult};
pub use validate_client::validate_client_middleware;
pub use validate_coach::validate_coach_middleware;
