use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use sweetbox::ProgressSink;

/// One file's progress line. Batches stack their bars in a shared [`MultiProgress`].
pub struct Bar {
    bar: ProgressBar,
}

impl Bar {
    pub fn new(multi: &MultiProgress, label: &str) -> Self {
        let bar = multi.add(ProgressBar::new(100));
        if let Ok(style) = ProgressStyle::default_bar().template("{prefix:.bold} [{bar:40.cyan/blue}] {pos:>3}% {msg}") {
            bar.set_style(style.progress_chars("●○ "));
        }

        bar.set_prefix(label.to_owned());

        Self { bar }
    }

    pub fn finish(&self, succeeded: bool) {
        if succeeded {
            self.bar.finish_with_message("done");
        } else {
            self.bar.abandon_with_message("failed");
        }
    }
}

impl ProgressSink for Bar {
    fn report(&self, percent: u8, phase: &str) {
        self.bar.set_position(u64::from(percent));
        self.bar.set_message(phase.to_owned());
    }
}

impl Drop for Bar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
