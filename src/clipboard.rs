use arboard::Clipboard;
use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Destination for copied text.
pub trait ClipboardWriter {
    fn write(&self, text: &str) -> Result<()>;
}

/// The OS clipboard. The handle is opened on first use and kept for the rest
/// of the session; X11 clipboards lose their contents when it is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write(&self, text: &str) -> Result<()> {
        let mut guard = self.inner.lock();
        if guard.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| Error::Clipboard(format!("init failed: {e}")))?;
            *guard = Some(clipboard);
        }
        let cb = guard.as_mut().ok_or_else(|| Error::Clipboard("no handle".into()))?;
        cb.set_text(text.to_string()).map_err(|e| Error::Clipboard(e.to_string()))
    }
}

/// Read UTF-8 text from the OS clipboard.
pub fn read_text() -> Result<String> {
    let mut cb = Clipboard::new().map_err(|e| Error::Clipboard(format!("init failed: {e}")))?;
    cb.get_text()
        .map_err(|e| Error::Clipboard(format!("failed reading clipboard text: {e}")))
}

/// Keeps copied text in memory. Used by tests and hosts without a clipboard.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn last(&self) -> Option<String> {
        self.contents.lock().last().cloned()
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write(&self, text: &str) -> Result<()> {
        self.contents.lock().push(text.to_string());
        Ok(())
    }
}

impl<T: ClipboardWriter + ?Sized> ClipboardWriter for std::sync::Arc<T> {
    fn write(&self, text: &str) -> Result<()> {
        (**self).write(text)
    }
}
