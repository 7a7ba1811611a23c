//! Terminal output for publish runs
//!
//! Status lines go to stdout; `--json` runs are silent here so stdout only
//! carries the report.

pub mod progress;

use crate::publish::Stage;
use progress::StageProgress;

/// Prints a status line per stage and advances the stage bar
pub struct StageReporter {
  enabled: bool,
  progress: Option<StageProgress>,
}

impl StageReporter {
  /// Reporter that prints stage banners and draws a bar over `total` stages
  pub fn terminal(total: usize) -> Self {
    Self {
      enabled: true,
      progress: Some(StageProgress::new(total, "Publishing")),
    }
  }

  /// Reporter that prints nothing
  pub fn quiet() -> Self {
    Self {
      enabled: false,
      progress: None,
    }
  }

  pub fn start(&mut self, stage: Stage) {
    if self.enabled {
      println!("{} {}...", stage.icon(), stage.description());
    }
  }

  pub fn detail(&mut self, message: impl AsRef<str>) {
    if self.enabled {
      println!("   {}", message.as_ref());
    }
  }

  pub fn finish(&mut self, _stage: Stage) {
    if let Some(progress) = self.progress.as_mut() {
      progress.inc();
    }
  }

  pub fn fail(&mut self, stage: Stage) {
    if self.enabled {
      eprintln!("   ⛔ {} failed, remaining stages skipped", stage.name());
    }
  }
}
