pub mod bearer;
pub mod credential;
pub mod guard;

pub use bearer::extract_bearer_token;
pub use credential::AdminCredential;
pub use guard::require_auth;
