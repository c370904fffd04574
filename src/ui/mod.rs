//! Terminal front end for previewing the storefront.

pub mod preview;

pub use preview::{render_lines, run_headless, run_interactive, Preview, PreviewKey, PreviewOptions};
