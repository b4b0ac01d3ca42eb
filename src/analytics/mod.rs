pub mod groups;
pub mod summary;

pub use groups::GroupCounts;
pub use summary::{summarize, PriorityCounts, Summary};
