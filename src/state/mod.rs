//! State management module
//!
//! This module handles per-user conversation states, their data, and the
//! storage engines that keep them.

pub mod context;
pub mod filter;
pub mod key;
pub mod manager;
pub mod resolve;
pub mod states;
pub mod storage;

// Re-export commonly used state components
pub use context::StateContext;
pub use filter::StateFilter;
pub use key::{ContextKey, KeyBuilder};
pub use manager::{StateDataGuard, StateManager};
pub use resolve::ContextSource;
pub use states::State;
pub use storage::{open_storage, FileStorage, MemoryStorage, RedisStorage, StateData, StateRecord, StateStorage};
