pub mod auth;
pub mod response;

pub use auth::token_auth_middleware;
pub use response::{ApiResponse, ApiResult, Envelope, Message};
