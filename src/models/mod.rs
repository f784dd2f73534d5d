pub mod finding;
pub mod kpi;
pub mod report;

pub use finding::*;
pub use kpi::*;
pub use report::*;
