//! Best-effort system clipboard access.
//!
//! Callers treat a failed write as non-fatal; on headless machines there
//! may be no clipboard to talk to at all.

use arboard::Clipboard;

/// Copy `text` to the system clipboard.
///
/// Opens a fresh clipboard handle per call; handles are cheap and some
/// platforms invalidate them across threads.
pub fn copy(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)
}
