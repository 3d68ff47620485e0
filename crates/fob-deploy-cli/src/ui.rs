//! Status lines for humans, written to stderr.
//!
//! Colors are applied only when stderr supports them; `NO_COLOR` and
//! `--no-color` turn them off. Failures are not printed here: they surface
//! as miette reports from `main`.

use owo_colors::{OwoColorize, Stream::Stderr};

/// Apply `--no-color` to every line printed afterwards.
pub fn init_colors(no_color: bool) {
    if no_color {
        owo_colors::set_override(false);
    }
}

/// Print a success message to stderr.
///
/// # Arguments
///
/// * `message` - Message to display
///
/// # Examples
///
/// ```no_run
/// use fob_deploy_cli::ui::success;
///
/// success("Resolved built-in target \"node\"");
/// ```
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".if_supports_color(Stderr, |s| s.green()), message);
}

/// Print an info message to stderr.
///
/// # Arguments
///
/// * `message` - Message to display
///
/// # Examples
///
/// ```no_run
/// use fob_deploy_cli::ui::info;
///
/// info("Detected from VERCEL=1");
/// ```
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".if_supports_color(Stderr, |s| s.blue()), message);
}

/// Print a warning message to stderr, message text in yellow.
///
/// # Arguments
///
/// * `message` - Message to display
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        "⚠".if_supports_color(Stderr, |s| s.yellow()),
        message.if_supports_color(Stderr, |s| s.yellow())
    );
}

/// Dimmed secondary line, indented under the previous one.
pub fn detail(message: &str) {
    eprintln!("  {}", message.if_supports_color(Stderr, |s| s.dimmed()));
}
