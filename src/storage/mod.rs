mod codec;
mod file;
mod in_memory;
mod store;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
pub use store::DurableStore;
pub use store::StorageError;
