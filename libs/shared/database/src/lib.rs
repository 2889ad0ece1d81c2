pub mod error;
pub mod memory;
pub mod postgrest;

pub use error::DatabaseError;
pub use memory::MemoryTable;
pub use postgrest::PostgrestClient;
