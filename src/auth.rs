//! GitHub App identity, token claims, and the issuer that signs for the App.

pub mod claims;
pub mod credential;
pub mod issuer;
pub mod token;

pub use claims::*;
pub use credential::*;
pub use issuer::*;
pub use token::*;
