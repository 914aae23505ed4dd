//! Storage layer: SurrealDB connection handling and repositories.

pub mod repository;
pub mod surrealdb;

pub use repository::{
    ConversationStore, MemoryEntryStore, MessageStore, SurrealConversationStore,
    SurrealMemoryEntryStore, SurrealMessageStore,
};
pub use surrealdb::SurrealPool;
