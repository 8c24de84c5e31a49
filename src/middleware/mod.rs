pub mod auth;
pub mod response;
pub mod validate;

pub use auth::Credential;
pub use response::{ApiResponse, ApiResult};
pub use validate::{PathIds, Validate, ValidationErrors, ValidJson};
