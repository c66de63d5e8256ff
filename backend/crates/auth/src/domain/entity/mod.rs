//! Entity Module

pub mod profile;
pub mod registration;
pub mod session;

pub use profile::{Profile, ProfilePatch};
pub use registration::Registration;
pub use session::{AuthEvent, AuthStateChange, AuthUser, Session};
