//! Infrastructure Layer
//!
//! Hosted-backend implementation and an in-memory double.

pub mod memory;
pub mod supabase;

pub use memory::MemoryArenaRepository;
pub use supabase::SupabaseArenaRepository;
