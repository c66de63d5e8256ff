//! Presentation Layer
//!
//! HTTP handlers, DTOs, and the gated router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ArenaAppState;
pub use router::arena_router;
