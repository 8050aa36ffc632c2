use std::{
    io::Cursor,
    path::Path,
};

use tokio::{
    fs::File,
    io::AsyncRead,
};

use crate::error::{
    LpdError,
    Result,
};

/// The bytes to print, their declared length and a display name.
///
/// The reader must yield exactly `size` bytes; it is read once, during
/// submission.
#[derive(Debug)]
pub struct Document<R> {
    pub reader: R,
    pub size: u64,
    pub name: String,
}

impl<R: AsyncRead + Unpin> Document<R> {
    pub fn new(reader: R, size: u64, name: impl Into<String>) -> Self {
        Self {
            reader,
            size,
            name: name.into(),
        }
    }
}

impl Document<Cursor<Vec<u8>>> {
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(Cursor::new(data), size, name)
    }
}

impl Document<File> {
    /// Opens a local file, taking its size from metadata and its name from
    /// the last path component.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document_error = |source| LpdError::Document {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).await.map_err(document_error)?;
        let size = file.metadata().await.map_err(document_error)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file, size, name))
    }
}
