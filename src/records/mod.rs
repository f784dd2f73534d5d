pub mod loader;
pub mod normalize;

pub use loader::{load_records, RecordTable};
pub use normalize::{normalize_record, normalize_table};
