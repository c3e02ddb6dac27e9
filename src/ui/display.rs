//! Final report printed once the search settles.

use std::time::Duration;

use console::style;

use crate::config::APP_NAME;
use crate::types::{Outcome, Recovery, SearchReport};

/// Formats a candidate rate as a short human-readable string.
pub fn format_rate(tried: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= f64::EPSILON {
        return String::from("n/a");
    }

    #[allow(clippy::cast_precision_loss)]
    let rate = tried as f64 / secs;
    if rate >= 1000.0 { format!("{:.1}k/s", rate / 1000.0) } else { format!("{rate:.1}/s") }
}

/// Prints the outcome and run statistics to standard output.
pub fn show_report(report: &SearchReport) {
    match &report.outcome {
        Outcome::Found(recovery) => show_recovery(recovery),
        Outcome::Exhausted => show_exhausted(),
        Outcome::Failed { line, failure } => {
            println!();
            println!("{} {}", style("✗").red(), style(format!("Search stopped at dictionary line {line}: {failure}")).bold());
        }
    }

    println!(
        "  {} candidates tried, {} with decrypt failures, {:.1?} elapsed ({})",
        report.tried,
        report.failures,
        report.elapsed,
        format_rate(report.tried, report.elapsed)
    );
}

fn show_recovery(recovery: &Recovery) {
    println!();
    println!("{} {}", style("✓").green(), style("Wallet decoded successfully").bold());
    println!("  {:<10} {}", style("Passphrase").bold(), style(recovery.passphrase.expose_secret()).green());
    println!("  {:<10} {}", style("Format").bold(), recovery.format);
    println!("  {:<10} {}", style("Line").bold(), recovery.line);
    println!();
    println!("Decoded: {}", String::from_utf8_lossy(&recovery.plaintext));
}

fn show_exhausted() {
    println!();
    println!("{} {}", style("✗").yellow(), style(format!("{APP_NAME}: no match found in dictionary")).bold());
}
