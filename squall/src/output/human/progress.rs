use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) struct HumanProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl HumanProgress {
    pub(crate) fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    /// Created on the first update so runs that finish within one interval draw nothing.
    pub(crate) fn update(&self, planned: u64, sent: u64, message: String) {
        let mut bar = self
            .bar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let pb = bar.get_or_insert_with(|| new_bar(planned));
        pb.set_message(message);
        if planned > 0 {
            pb.set_position(sent.min(planned));
        } else {
            pb.tick();
        }
    }

    pub(crate) fn finish(&self) {
        let mut bar = self
            .bar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(pb) = bar.take() {
            pb.finish_and_clear();
        }
    }
}

fn new_bar(planned: u64) -> ProgressBar {
    let pb = if planned > 0 {
        let pb = ProgressBar::new(planned);
        pb.set_style(bar_style());
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(5));
    pb
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("run [ {bar:20.cyan/blue} ] {percent:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█░")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("run {spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
