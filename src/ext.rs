//! Public extension contracts (admission policy, request signing).
//!
//! The crate never performs HTTP itself. Executors consult an [`AdmissionPolicy`] before a
//! call and use a [`RequestSignerExt`] to attach the App token to whatever request type their
//! client builds.

pub mod admission;
pub mod request_signer;

pub use admission::*;
pub use request_signer::*;
