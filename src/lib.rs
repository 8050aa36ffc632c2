//! Client side of the Line Printer Daemon protocol (RFC 1179).
//!
//! Jobs are submitted with [`Client::print`], which runs the whole
//! receive-job exchange on one connection and aborts the job if any step
//! fails after the daemon has accepted it. The queue commands each dial a
//! connection of their own.

pub mod client;
pub mod codec;
pub mod control;
pub mod error;
pub mod model;
pub mod print;
pub mod queue;

pub use client::{
    Client,
    LPD_PORT,
};
pub use control::ControlFile;
pub use error::{
    LpdError,
    Result,
};
pub use model::{
    command::{
        ControlFileCommand,
        DaemonCommand,
        OutputFormat,
        SubCommand,
    },
    document::Document,
    job::{
        Job,
        Origin,
    },
};
pub use queue::StatusFormat;
