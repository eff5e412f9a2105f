//! Data module - timing table loading and pairing

mod collection;
pub(crate) mod loader;
pub(crate) mod table;

pub use collection::{resolve_labels, DatasetCollection};
pub use loader::TableLoader;
