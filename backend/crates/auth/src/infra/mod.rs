//! Infrastructure Layer
//!
//! Hosted-backend implementation and an in-memory double.

pub mod memory;
pub mod supabase;

pub use memory::MemoryAuthRepository;
pub use supabase::SupabaseAuthRepository;
