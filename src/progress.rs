//! Progress indicator for table probing

use footprint::{ProbeProgress, TableMeta};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar on stderr, one tick per probed table
pub struct ProbeBar {
    pb: ProgressBar,
}

impl ProbeBar {
    /// Create a bar; hidden bars do nothing, for `--quiet` and `--json`
    pub fn new(visible: bool) -> Self {
        let pb = ProgressBar::with_draw_target(None, draw_target(visible));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Self { pb }
    }
}

fn draw_target(visible: bool) -> ProgressDrawTarget {
    if visible {
        ProgressDrawTarget::stderr()
    } else {
        ProgressDrawTarget::hidden()
    }
}

impl ProbeProgress for ProbeBar {
    fn on_start(&mut self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn on_table(&mut self, table: &TableMeta, _disk_size: u64) {
        self.pb.set_message(table.qualified_name());
        self.pb.inc(1);
    }

    fn on_complete(&mut self) {
        self.pb.finish_and_clear();
    }
}
