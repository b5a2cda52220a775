pub mod clock;
pub mod record;
pub mod store;

pub use record::{sort_newest_first, ExperimentRecord, COLUMNS};
pub use store::LogStore;
