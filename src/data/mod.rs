//! Data module - Feed loading and flattening

mod loader;
mod processor;

pub use loader::{FeedDocument, FeedLoader, LoaderError};
pub use processor::{DataProcessor, Earthquake, ProcessorError};
