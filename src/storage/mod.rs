//! Local persistence: a key-value store and the debounced autosaver

pub mod autosave;
pub mod store;

pub use autosave::{AutoSaveHandle, AutoSaver, SaveEvent};
pub use store::{FileStore, KeyValueStore, MemoryStore, AUTOSAVE_KEY};
