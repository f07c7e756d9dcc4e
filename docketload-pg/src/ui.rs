//! Progress feedback for the row loop
//!
//! Progress bars are suppressed when:
//! - `--quiet` flag is passed
//! - `DOCKETLOAD_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output, CI logs)

use std::io::IsTerminal;
use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};

static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Call once at startup with the --quiet flag value.
pub fn init_quiet_mode(quiet_flag: bool) {
    let is_quiet = quiet_flag
        || std::env::var("DOCKETLOAD_QUIET").map(|v| v == "1").unwrap_or(false)
        || !std::io::stderr().is_terminal();

    QUIET_MODE.set(is_quiet).ok();
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// Bar over the rows of one table; `None` in quiet mode. The loader sets
/// the length once the source has been read.
pub fn row_progress(table: &str) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let style = ProgressStyle::default_bar()
        .template("{msg:>16} [{bar:30.cyan/dim}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─");
    let pb = ProgressBar::new(0);
    pb.set_style(style);
    pb.set_message(table.to_owned());
    Some(pb)
}

pub fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}
