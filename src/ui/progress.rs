//! Progress indicators for build and upload loops
//!
//! Uses `linya` for allocation-free progress bars drawn on stderr.

use linya::{Bar, Progress};

/// Single progress bar over a known number of steps
///
/// A zero-step bar draws nothing.
pub struct StepProgress {
  inner: Option<(Progress, Bar)>,
}

impl StepProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let inner = (total > 0).then(|| {
      let mut progress = Progress::new();
      let bar = progress.bar(total, label.into());
      (progress, bar)
    });
    Self { inner }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    if let Some((progress, bar)) = self.inner.as_mut() {
      progress.inc_and_draw(bar, 1);
    }
  }
}
