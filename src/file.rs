use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    sync::Arc,
};

use serde_json::Value;
use tracing::info;

use crate::clipboard;
use crate::error::Result;

/// A parsed document plus what the header shows about where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub value: Arc<Value>,
    pub name: Option<String>,
    pub size: Option<u64>,
}

impl Document {
    pub fn from_value(value: Value) -> Self {
        Self {
            value: Arc::new(value),
            name: None,
            size: None,
        }
    }

    pub fn open_file(path: &Path) -> Result<Self> {
        let f = File::open(path)?;
        let size = f.metadata().ok().map(|m| m.len());
        let value: Value = serde_json::from_reader(BufReader::new(f))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!(file = %path.display(), bytes = size.unwrap_or(0), "document loaded");
        Ok(Self {
            value: Arc::new(value),
            name: Some(name),
            size,
        })
    }

    pub fn from_reader<R: Read>(reader: R, name: Option<String>) -> Result<Self> {
        let mut counted = CountingReader {
            inner: reader,
            read_bytes: 0,
        };
        let value: Value = serde_json::from_reader(BufReader::new(&mut counted))?;
        info!(bytes = counted.read_bytes, "document loaded from stream");
        Ok(Self {
            value: Arc::new(value),
            name,
            size: Some(counted.read_bytes),
        })
    }

    pub fn open_stdin() -> Result<Self> {
        Self::from_reader(std::io::stdin().lock(), Some("<stdin>".into()))
    }

    /// Parse the clipboard's text as a JSON document.
    pub fn open_clipboard() -> Result<Self> {
        let text = clipboard::read_text()?;
        let value: Value = serde_json::from_str(&text)?;
        info!(bytes = text.len(), "document loaded from clipboard");
        Ok(Self {
            value: Arc::new(value),
            name: Some("<clipboard>".into()),
            size: Some(text.len() as u64),
        })
    }
}

struct CountingReader<R: Read> {
    inner: R,
    read_bytes: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read_bytes += n as u64;
        Ok(n)
    }
}
