use thiserror::Error;

/// Errors raised while talking to a line printer daemon.
#[derive(Debug, Error)]
pub enum LpdError {
    /// Dialing, reading, writing or closing the connection failed.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The daemon answered with a non-zero acknowledgement byte.
    #[error("daemon rejected {step} (ack byte {code:#04x})")]
    Rejected { step: &'static str, code: u8 },

    /// Fewer bytes than declared could be read or written.
    #[error("truncated data: expected {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: u64 },

    /// A control file or command line could not be serialized.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// A local document could not be opened.
    #[error("cannot open document {}: {source}", path.display())]
    Document {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Received bytes do not form a valid control file.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl LpdError {
    pub(crate) fn closed() -> Self {
        LpdError::Connection(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed by daemon",
        ))
    }
}

pub type Result<T> = std::result::Result<T, LpdError>;
