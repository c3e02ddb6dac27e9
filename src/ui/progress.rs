use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Live candidate counter with periodic health-check lines.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(description: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {pos} tried ({per_sec}, {elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("●○◌ ");

        bar.set_style(style);
        bar.set_message(description.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    /// A spinner that draws nothing. Health-check lines are still printed.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    #[inline]
    pub fn set_position(&self, tried: u64) {
        self.bar.set_position(tried);
    }

    /// Prints a line to standard output without tearing the spinner.
    pub fn println(&self, line: &str) {
        self.bar.suspend(|| println!("{line}"));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
