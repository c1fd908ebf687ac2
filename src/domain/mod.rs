//! Domain logic - version identifiers and tags, independent of git operations

pub mod segment;
pub mod tag;
pub mod version;

pub use segment::Segment;
pub use tag::{Tag, TagFilter, RELEASE_TAG_GLOB};
pub use version::Version;
