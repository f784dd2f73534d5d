pub mod assembler;
pub mod assets;
pub mod document;
pub mod formatter;
pub mod html;
pub mod pptx;

pub use assembler::{deck_file_name, write_reports, AssemblyOutcome, OutputTarget};
pub use assets::{load_logo, LogoAsset};
pub use document::{build_dashboard, build_deck, ReportInputs};
