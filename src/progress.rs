//! Progress reporting for long listings.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Receiver of counting progress.
pub trait Progress {
    /// Announce the expected number of items.
    fn set_total(&mut self, total: u64);

    /// Record `delta` newly counted items.
    fn increment(&mut self, delta: u64);

    /// Close the indicator. Called once, after the last page.
    fn finish(&mut self);
}

/// Progress sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_total(&mut self, _total: u64) {}

    fn increment(&mut self, _delta: u64) {}

    fn finish(&mut self) {}
}

/// Terminal progress bar drawn on stderr.
///
/// The bar stays hidden until a total is set, so creating one for a listing
/// that ends up not tracking progress prints nothing.
pub struct TerminalProgress {
    bar: ProgressBar,
    label: String,
}

impl TerminalProgress {
    /// Create a bar labelled `label` (e.g. "Comments").
    pub fn new(label: impl Into<String>) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template(
                "{msg}: {percent:>3}%|{wide_bar}| {pos}/{len} [{elapsed_precise}<{eta_precise}, {per_sec}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self {
            bar,
            label: label.into(),
        }
    }

    /// Current position of the bar.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Progress for TerminalProgress {
    fn set_total(&mut self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_message(self.label.clone());
        self.bar
            .set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        self.bar.enable_steady_tick(Duration::from_millis(120));
    }

    fn increment(&mut self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&mut self) {
        // Position may be above or below the length; both are valid end states.
        self.bar.abandon();
    }
}

impl std::fmt::Debug for TerminalProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalProgress")
            .field("label", &self.label)
            .field("position", &self.bar.position())
            .field("length", &self.bar.length())
            .finish()
    }
}
