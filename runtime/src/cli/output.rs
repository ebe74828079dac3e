//! Output mode flags shared by all commands.
//!
//! `main` records the global `--json`/`--quiet` flags in the environment so
//! every command can consult them without threading arguments through.

use serde::Serialize;

pub fn is_json() -> bool {
    std::env::var_os("PAPERFLOW_JSON").is_some()
}

pub fn is_quiet() -> bool {
    std::env::var_os("PAPERFLOW_QUIET").is_some()
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: failed to serialize output: {e}"),
    }
}

/// Print a human-readable line unless `--quiet` or `--json` is active.
pub fn say(line: impl AsRef<str>) {
    if !is_quiet() && !is_json() {
        println!("{}", line.as_ref());
    }
}

/// Shorten text to `max` characters for one-line display.
pub fn truncate(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a  b\nc", 10), "a b c");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
