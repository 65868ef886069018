//! Credential record and access tokens

mod session;
mod token;

pub use session::Session;
pub use session::SessionToken;
pub use session::DEFAULT_STORAGE_KEY;
pub use token::AccessToken;
