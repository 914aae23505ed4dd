//! Service modules.

pub mod catalog;
pub mod chat;
pub mod extraction;
pub mod generator;
pub mod memory;
pub mod retrieval;
pub mod scoring;
pub mod session;

pub use catalog::{SurrealVehicleCatalog, VehicleCatalog, create_vehicle_catalog};
pub use chat::{ChatPipeline, ChatService, TurnOutcome, TurnRequest, create_chat_service};
pub use extraction::{EntityExtractor, Extraction};
pub use generator::{HttpResponder, Responder, build_prompt, create_responder};
pub use memory::{
    ConversationDetail, ConversationHistory, MemoryService, MemoryServiceImpl,
    create_memory_service,
};
pub use retrieval::{
    ContextItem, ContextRetriever, RetrievalService, context_note, create_retrieval_service,
};
pub use scoring::{RelevanceScorer, importance};
pub use session::{SessionResolver, SessionService, create_session_service};
