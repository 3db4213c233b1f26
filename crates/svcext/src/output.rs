//! Terminal output utilities

use console::style;

/// Print a success line
pub fn success(msg: &str) {
    println!("{} {}", style("ok").green().bold(), msg);
}

/// Print an informational line
pub fn info(msg: &str) {
    println!("{} {}", style("--").blue().bold(), msg);
}

/// Print a section header
pub fn header(msg: &str) {
    println!("\n{}:", style(msg).bold());
}

/// Print an indented key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {:<28} {}", style(key).dim(), value);
}
