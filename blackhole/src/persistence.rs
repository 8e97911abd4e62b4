//! Saving and restoring sessions.
//!
//! Sessions are stored as a small JSON document, conventionally in files with the `.stl`
//! extension. [`write_session`] and [`read_session`] work on any byte stream;
//! [`Storage`] abstracts over where named streams come from.

pub use self::{
    errors::{GameDataError, MalformedDataError, MalformedReason},
    format::{read_session, write_session, FORMAT_TAG, FORMAT_VERSION},
    storage::{FileStorage, MemoryStorage, MemoryWriter, Storage},
};

mod errors;
mod format;
mod storage;
