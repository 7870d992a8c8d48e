//! Logging utilities with colored output.
//!
//! Provides the `log!` macro for formatted terminal output with colored,
//! bracketed module prefixes:
//!
//! ```ignore
//! log!("build"; "rendering {} pages", count);
//! log!("error"; "{err:#}");
//! ```

use colored::{ColoredString, Colorize};
use std::io::{Write, stdout};

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold(),
        "watch" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_prefix_brackets() {
        // Prefix always wraps the module name in brackets, whatever the color
        for module in ["serve", "watch", "error", "content", "assets"] {
            let prefix = colorize_prefix(module);
            let plain = format!("{prefix}");
            assert!(plain.contains(&format!("[{module}]")));
        }
    }
}
