// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod profiles;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use memory::MemoryStore;
pub use postgres::PostgresClient;
pub use profiles::{ProfileStoreClient, ProfileStoreError, SyncOutcome};
