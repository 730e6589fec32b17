pub mod client;
pub mod media;
pub mod normalize;
pub mod query;

pub use client::{CmsClient, CmsError, ContentSource, Entries, Pagination, fetch_entries};
pub use media::MediaResolver;
