//! Output configuration types

/// Configuration for report output.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Print every file, including those without changes.
    pub show_unchanged: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            show_unchanged: false,
        }
    }
}
