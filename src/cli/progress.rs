//! CLI progress display utilities.

use std::time::Duration;

use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

pub static SPARKLE: console::Emoji<'_, '_> = console::Emoji("\u{2728} ", "");

/// Print completion message: `Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Create a simple spinner (not part of a multi-progress group).
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn simple_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
