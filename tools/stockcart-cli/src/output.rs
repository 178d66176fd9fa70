//! Output formatting for the CLI.

use console::style;
use serde::Serialize;
use stockcart_commerce::CommerceError;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

/// Error body printed in JSON mode.
#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    status: u16,
    message: String,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Report a failed command.
    ///
    /// Domain errors anywhere in the chain are rendered with their kind.
    pub fn failure(&self, err: &anyhow::Error) {
        let domain = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<CommerceError>());

        if self.json {
            let body = match domain {
                Some(e) => ErrorBody {
                    kind: e.kind().as_str(),
                    status: e.kind().status_code(),
                    message: format!("{:#}", err),
                },
                None => ErrorBody {
                    kind: "internal",
                    status: 500,
                    message: format!("{:#}", err),
                },
            };
            let json = serde_json::json!({ "error": body });
            eprintln!("{}", json);
            return;
        }

        match domain {
            Some(e) => eprintln!(
                "{} {} {}",
                style("✗").red(),
                style(format!("[{}]", e.kind())).red().bold(),
                style(format!("{:#}", err)).red()
            ),
            None => eprintln!("{} {}", style("✗").red(), style(format!("{:#}", err)).red()),
        }
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a bare value, for piping into other tools.
    pub fn value(&self, value: &str) {
        if self.json {
            return;
        }
        println!("{}", value);
    }

    /// Print JSON output.
    pub fn json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table header row.
    pub fn table_header(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        println!("  {}", style(pad_columns(cols, widths)).bold());
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        println!("  {}", pad_columns(cols, widths));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn pad_columns(cols: &[&str], widths: &[usize]) -> String {
    cols.iter()
        .zip(widths.iter())
        .map(|(col, width)| format!("{:width$}", col, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Stock badge for the products table.
pub fn stock_badge(stock: i64) -> String {
    match stock {
        0 => style("out of stock").red().to_string(),
        1..=5 => style(format!("{stock} left")).yellow().to_string(),
        _ => stock.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_columns() {
        assert_eq!(pad_columns(&["a", "bb"], &[3, 4]), "a    bb");
    }

    #[test]
    fn test_stock_badge_plain_when_plenty() {
        assert_eq!(stock_badge(42), "42");
    }
}
