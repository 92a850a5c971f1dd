//! Byte-based progress over the input file.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

pub fn make_progress_bar_labeled(total_bytes: u64, label: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    let style = ProgressStyle::with_template(
        "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}"
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if let Some(msg) = label {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Optional bar driven by absolute positions (bytes consumed from the file).
/// Disabled scopes are no-ops, so the driver never branches on the setting.
pub struct ProgressScope {
    pb: Option<ProgressBar>,
}

impl ProgressScope {
    pub fn for_file(path: &Path, label: Option<&str>, enabled: bool) -> Self {
        if !enabled {
            return Self { pb: None };
        }
        let total = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Self { pb: Some(make_progress_bar_labeled(total, label)) }
    }

    #[inline]
    pub fn set_position(&self, bytes: u64) {
        if let Some(pb) = &self.pb { pb.set_position(bytes); }
    }

    pub fn finish<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb { pb.finish_with_message(msg.into()); }
    }
}
