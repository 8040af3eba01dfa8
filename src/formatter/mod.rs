//! Output formatting and colorization for script values
//!
//! This module renders the value of each script statement:
//! - Shell format with mongosh type wrappers (`ObjectId('...')`, `ISODate('...')`)
//! - JSON format as relaxed Extended JSON
//! - Optional color highlighting for shell output and errors

mod colorizer;
mod json;
mod shell;

pub use colorizer::{AnsiColors, Colorizer};
pub use json::JsonFormatter;
pub use shell::ShellFormatter;

use crate::config::{DisplayConfig, OutputFormat};
use crate::error::{Result, ShellError};
use crate::script::Value;

/// Main formatter for script values
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Colorizer for error messages
    colorizer: Colorizer,

    shell: ShellFormatter,

    json: JsonFormatter,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    /// * `indent` - Spaces per nesting level
    pub fn new(format_type: OutputFormat, use_colors: bool, indent: usize) -> Self {
        Self {
            format_type,
            colorizer: Colorizer::new(use_colors),
            shell: ShellFormatter::new(use_colors, indent),
            json: JsonFormatter::new(indent),
        }
    }

    /// Create a formatter from the display settings
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self::new(display.format, display.color_output, display.indent)
    }

    /// Format a statement value according to the configured format
    pub fn format_value(&self, value: &Value) -> Result<String> {
        match self.format_type {
            OutputFormat::Shell => Ok(self.shell.format_value(value)),
            OutputFormat::Json => self.json.format_value(value),
        }
    }

    /// Format an error message
    pub fn format_error(&self, error: &ShellError) -> String {
        self.colorizer.error(&error.to_string())
    }

    pub fn format_type(&self) -> OutputFormat {
        self.format_type
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}
