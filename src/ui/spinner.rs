use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::output;

/// Live indicator for one streaming model call.
///
/// Shows the model, the characters received so far and the elapsed time.
/// Cleared when dropped; hidden in quiet mode.
pub struct Spinner {
    progress_bar: ProgressBar,
    model: String,
}

impl Spinner {
    #[allow(clippy::unwrap_used)]
    pub fn new(model: &str) -> Self {
        let progress_bar = ProgressBar::new_spinner();
        if output::is_quiet() {
            progress_bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        // unwrap is safe: template string is a compile-time constant
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("     {spinner} {msg} [{elapsed}]")
                .unwrap(),
        );
        progress_bar.set_message(format!("{model} waiting for first token..."));
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            progress_bar,
            model: model.to_string(),
        }
    }

    /// Reports how much text has streamed in.
    pub fn received(&self, chars: usize) {
        self.progress_bar
            .set_message(format!("{} generating... {chars} chars", self.model));
    }

    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}
