//! Application Layer
//!
//! Use cases and the session store that drives them.

pub mod config;
pub mod session_store;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod update_profile;

// Re-exports
pub use config::AuthConfig;
pub use session_store::{ProfileState, SessionHandle, SessionState, SessionStore};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
