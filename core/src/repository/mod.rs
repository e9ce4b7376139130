pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use traits::KeyValueStore;
