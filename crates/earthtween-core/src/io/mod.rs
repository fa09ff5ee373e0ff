pub mod image_io;
pub mod metadata;
pub mod source;
pub mod store;

pub use source::DirectorySource;
pub use store::{DirectoryStore, FrameStore, MemoryStore};
