//! Output formatting utilities

use colored::Colorize;
use std::io::IsTerminal;
use xray_report_diagnostics::ConvertError;

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stderr().is_terminal()),
    }
}

/// Format an error for display
///
/// Conversion errors are rendered as diagnostics with their code and help
/// text; anything else falls back to the error chain.
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ConvertError>() {
        Some(convert_error) => format!(
            "{} {}",
            "Error:".red().bold(),
            convert_error.to_diagnostic().render_colored()
        ),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_uses_diagnostic() {
        setup_colors("never");
        let err = anyhow::Error::new(ConvertError::missing_root("<testsuites>"));
        let text = format_error(&err);

        assert!(text.starts_with("Error: "));
        assert!(text.contains("XRP0001"));
        assert!(text.contains("help:"));
    }

    #[test]
    fn test_format_success() {
        setup_colors("never");
        assert_eq!(format_success("done"), "Success: done");
    }
}
