//! Preview rendering in several formats

pub mod formatter;
pub mod preview;

pub use formatter::{save_preview_to_file, PreviewRenderer};
pub use preview::ResumePreview;
