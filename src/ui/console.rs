// Sun Oct 18 2026 - Alex

use crate::engine::result::{SegmentOutcome, TaskResult};
use crate::engine::segment::Segment;
use crate::engine::worker::ShutdownReport;
use crate::orchestration::aggregator::RunSummary;
use crate::orchestration::observer::{RunObserver, RunPlan};
use crate::primes::ProgressUpdate;
use crate::ui::progress::SegmentProgress;
use crate::utils::{format_duration, pluralize};
use colored::Colorize;
use std::time::Duration;

/// Human-readable run report on stdout, failures and warnings on stderr.
pub struct ConsoleObserver {
    progress: SegmentProgress,
    show_worker_lines: bool,
    show_progress_lines: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            progress: SegmentProgress::hidden(),
            show_worker_lines: true,
            show_progress_lines: true,
        }
    }

    /// Drops per-worker start, progress and finish lines.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.show_worker_lines = !quiet;
        self.show_progress_lines = !quiet;
        self
    }

    /// Replaces progress lines with an overall bar of collected segments.
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.progress = SegmentProgress::new(enabled);
        if self.progress.is_visible() {
            self.show_progress_lines = false;
        }
        self
    }

    fn line(&self, line: String) {
        self.progress.println(&line);
    }

    fn error_line(&self, line: String) {
        self.progress.eprintln(&line);
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ConsoleObserver {
    fn run_started(&self, plan: &RunPlan) {
        self.line(format!(
            "\n{} Starting segmented prime count up to {} using {} threads and {}.\n",
            "[*]".blue(),
            plan.upper_limit,
            plan.pool_size,
            pluralize(plan.segment_count, "segment", "segments")
        ));
        self.progress.start(plan.segment_count as u64);
    }

    fn segment_submitted(&self, segment: &Segment) {
        self.line(format!(
            "{} Submitting segment {}: {}",
            "[*]".blue(),
            segment.ordinal(),
            segment.range()
        ));
    }

    fn segment_started(&self, worker: &str, segment: &Segment) {
        if self.show_worker_lines {
            self.line(format!("{}: starting segment {}", worker.cyan(), segment.range()));
        }
    }

    fn segment_progress(&self, worker: &str, update: &ProgressUpdate) {
        if self.show_progress_lines {
            self.line(format!(
                "{}: processed {}/{} (~{}%) in {}",
                worker.cyan(),
                update.processed,
                update.total,
                update.percent,
                update.range
            ));
        }
    }

    fn segment_finished(&self, worker: &str, segment: &Segment, count: u64, elapsed: Duration) {
        if self.show_worker_lines {
            self.line(format!(
                "{}: finished segment {}, found {} primes in {}",
                worker.cyan(),
                segment.range(),
                count,
                format_duration(elapsed)
            ));
        }
    }

    fn segment_collected(&self, outcome: &SegmentOutcome) {
        match &outcome.result {
            TaskResult::Success(count) => self.line(format!(
                "{} Collected segment {}: {} primes ({})",
                "[+]".green(),
                outcome.segment.ordinal(),
                count,
                outcome.label()
            )),
            TaskResult::Error(e) => self.error_line(format!(
                "{} Segment {} {} failed ({}): {}",
                "[!]".red(),
                outcome.segment.ordinal(),
                outcome.segment.range(),
                outcome.label(),
                e
            )),
        }
        self.progress
            .advance(&format!("segment {}", outcome.segment.ordinal()));
    }

    fn run_finished(&self, summary: &RunSummary) {
        self.progress.finish();

        if !summary.is_complete() {
            self.error_line(format!(
                "{} {} did not contribute to the total",
                "[!]".yellow(),
                pluralize(summary.failed(), "failed segment", "failed segments")
            ));
        }

        self.line(format!("{} {}", "[+]".green(), summary.total_line().bold()));
        self.line(format!("{} {}", "[*]".blue(), summary.timing_line()));
    }

    fn pool_shutdown(&self, report: &ShutdownReport) {
        self.progress.finish();

        if !report.graceful {
            self.error_line(format!(
                "{} Timed out waiting for tasks to finish, {}",
                "[!]".yellow(),
                report
            ));
        }
    }
}
