//! Presentation Layer
//!
//! Access gate, HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use gate::{Decision, RouteAccess, RouteTable, decide, role_dashboard_path};
pub use handlers::AuthAppState;
pub use middleware::{AccessGateState, require_access};
pub use router::auth_router;
