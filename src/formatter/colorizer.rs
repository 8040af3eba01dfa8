//! Color output support for terminal formatting
//!
//! Shell-style output highlights each kind of value the way mongosh does:
//! type wrappers such as `ObjectId('...')` and `ISODate('...')`, strings,
//! numbers, `null`/`undefined`, and field keys.

/// ANSI color codes for terminal output
pub struct AnsiColors;

impl AnsiColors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const DIM: &'static str = "\x1b[2m";

    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const MAGENTA: &'static str = "\x1b[35m";
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Color scheme for output highlighting
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    /// Enable colors
    enabled: bool,
}

impl Colorizer {
    /// Create a new colorizer
    ///
    /// # Arguments
    /// * `enabled` - Enable color output
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", color, text, AnsiColors::RESET)
        } else {
            text.to_string()
        }
    }

    /// Error message with an `Error: ` prefix (red)
    pub fn error(&self, text: &str) -> String {
        self.paint(AnsiColors::RED, &format!("Error: {}", text))
    }

    /// Document field key, unquoted
    pub fn field_key(&self, key: &str) -> String {
        self.paint(AnsiColors::CYAN, &quote_key(key))
    }

    /// String value in single quotes (green)
    pub fn string(&self, text: &str) -> String {
        self.paint(AnsiColors::GREEN, &quote(text))
    }

    /// Number or boolean (yellow)
    pub fn number(&self, text: &str) -> String {
        self.paint(AnsiColors::YELLOW, text)
    }

    /// `null` / `undefined` (dim)
    pub fn null(&self, text: &str) -> String {
        self.paint(AnsiColors::DIM, text)
    }

    /// Type wrapper such as `ObjectId('...')` or `Long('...')` (magenta)
    pub fn type_wrapper(&self, name: &str, value: &str) -> String {
        self.paint(AnsiColors::MAGENTA, &format!("{}({})", name, quote(value)))
    }

    /// `ISODate('...')`
    pub fn iso_date(&self, iso: &str) -> String {
        self.type_wrapper("ISODate", iso)
    }

    /// `BinData(subtype, 'hex')`
    pub fn bin_data(&self, subtype: u8, hex: &str) -> String {
        self.paint(
            AnsiColors::MAGENTA,
            &format!("BinData({}, {})", subtype, quote(hex)),
        )
    }

    /// `/pattern/options` (red)
    pub fn regex(&self, pattern: &str, options: &str) -> String {
        self.paint(AnsiColors::RED, &format!("/{}/{}", pattern, options))
    }

    /// `Timestamp({ t: .., i: .. })`
    pub fn timestamp(&self, time: u32, increment: u32) -> String {
        self.paint(
            AnsiColors::MAGENTA,
            &format!("Timestamp({{ t: {}, i: {} }})", time, increment),
        )
    }
}

/// Single-quote a string, escaping backslashes and quotes
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Keys that are plain identifiers print bare, anything else is quoted
fn quote_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        key.to_string()
    } else {
        quote(key)
    }
}
