//! Data store implementations
//!
//! - `memory` - single-owner in-memory store
//! - `shared` - cloneable, thread-safe store for concurrent sessions
//! - `text_file` - flat-file store, one file per record set
//! - `inventory` - collection helpers shared by the stores

pub mod inventory;
pub mod memory;
pub mod shared;
pub mod text_file;

pub use inventory::Inventory;
pub use memory::InMemoryStore;
pub use shared::SharedStore;
pub use text_file::TextFileStore;
