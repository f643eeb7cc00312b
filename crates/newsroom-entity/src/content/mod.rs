//! Curated content, its sources and categories.

pub mod category;
pub mod model;
pub mod source;

pub use category::Category;
pub use model::{ContentItem, ContentStatus};
pub use source::Source;
