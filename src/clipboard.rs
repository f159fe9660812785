use anyhow::{Context, Result};

/// Destination for the "copy digest" action.
///
/// The controller only needs to know whether the copy went through, so the
/// platform clipboard sits behind this trait and tests swap in a fake.
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// System clipboard backed by arboard.
///
/// A fresh handle is opened per copy; on X11 the contents stay owned by
/// arboard's background thread after the handle drops.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Failed to open clipboard")?;
        clipboard
            .set_text(text.to_owned())
            .context("Failed to write to clipboard")?;
        Ok(())
    }
}
