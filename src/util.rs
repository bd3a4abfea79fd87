//! Shared utility functions

use std::borrow::Cow;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width given to file names in tables and headless output
pub const FILENAME_WIDTH: usize = 25;

/// Shorten `s` to at most `max_width` terminal columns, marking the cut with
/// an ellipsis.
///
/// Width is measured with `unicode-width`, so wide CJK characters count as
/// two columns and the result never splits a character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_display("admin_1234.json", 40), "admin_1234.json");
/// assert_eq!(truncate_display("admin_1234.json", 8), "admin_1…");
/// ```
pub fn truncate_display(s: &str, max_width: usize) -> Cow<'_, str> {
    if s.width() <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Leave one column for the ellipsis
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    Cow::Owned(out)
}

/// Open a URL with the platform's default handler (browser)
pub fn open_external(url: &str) -> io::Result<()> {
    let command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    spawn_detached(command).map(|_| ())
}

/// Run `command` with null stdio and reap it on a background thread, so a
/// long-running TUI does not collect zombie children
fn spawn_detached(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    // The child must not write over the TUI
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    thread::Builder::new()
        .name("opener-reaper".into())
        .spawn(move || child.wait())
}
