//! User interface module.
//!
//! git-versions never prompts; everything here is output. Formatting lives in `formatter`.

pub mod formatter;

pub use formatter::{
    display_error, display_outcome, display_status, display_success, display_summary,
    display_versions, display_warning, format_tap_line, format_tap_plan,
};
