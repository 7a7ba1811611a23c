//! Progress indicators for the publish run
//!
//! Uses `linya` for allocation-free progress bars

use linya::{Bar, Progress};

/// Progress bar over the stages of a publish run
pub struct StageProgress {
  progress: Progress,
  bar: Bar,
}

impl StageProgress {
  /// Create a new progress bar for `total` stages
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
