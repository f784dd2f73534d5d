pub mod cleanup;
pub mod requester;

pub use cleanup::{clean_narrative, insight_lines, strip_markup};
pub use requester::NarrativeRequester;
