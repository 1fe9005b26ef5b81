// Sun Oct 18 2026 - Alex

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Overall bar of collected segments. When disabled or not drawable, lines are
/// printed directly instead of through the bar.
pub struct SegmentProgress {
    bar: Option<ProgressBar>,
}

impl SegmentProgress {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░ "),
        );
        Self { bar: Some(bar) }
    }

    pub fn hidden() -> Self {
        Self { bar: None }
    }

    fn visible_bar(&self) -> Option<&ProgressBar> {
        self.bar.as_ref().filter(|bar| !bar.is_hidden())
    }

    pub fn is_visible(&self) -> bool {
        self.visible_bar().is_some()
    }

    pub fn start(&self, segments: u64) {
        if let Some(bar) = &self.bar {
            bar.set_length(segments);
            bar.set_message("collecting segments");
            bar.enable_steady_tick(Duration::from_millis(100));
        }
    }

    pub fn advance(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(message.to_string());
        }
    }

    pub fn println(&self, line: &str) {
        match self.visible_bar() {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }

    pub fn eprintln(&self, line: &str) {
        match self.visible_bar() {
            Some(bar) => bar.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Default for SegmentProgress {
    fn default() -> Self {
        Self::hidden()
    }
}
