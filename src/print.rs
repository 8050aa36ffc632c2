use log::{
    debug,
    info,
    warn,
};
use tokio::io::{
    AsyncRead,
    AsyncReadExt,
    AsyncWrite,
    AsyncWriteExt,
};

use crate::{
    codec::{
        check_acknowledge,
        send_command_line,
    },
    control::ControlFile,
    error::{
        LpdError,
        Result,
    },
    model::{
        command::{
            DaemonCommand,
            SubCommand,
        },
        document::Document,
        job::Job,
    },
};

/// A receive-job session the daemon has accepted.
///
/// Subcommands may only be sent while the session is open; dropping it
/// leaves the connection to the caller.
pub struct JobSession<'s, S> {
    stream: &'s mut S,
}

impl<'s, S> JobSession<'s, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Sends the receive-job command for `queue` and waits for the daemon to
    /// accept it.
    pub async fn open(stream: &'s mut S, queue: &str) -> Result<Self> {
        send_command_line(stream, DaemonCommand::ReceiveJob, &[queue]).await?;
        check_acknowledge(stream, "receive job").await?;
        debug!("Daemon accepted job for queue {}", queue);

        Ok(Self { stream })
    }

    pub async fn send_control_file(&mut self, name: &str, cf: &ControlFile) -> Result<()> {
        let encoded = cf.encode()?;
        let size = encoded.len().to_string();

        send_command_line(self.stream, SubCommand::SendControlFile, &[size.as_str(), name]).await?;
        check_acknowledge(self.stream, "control file command").await?;

        self.stream.write_all(&encoded).await?;
        self.stream.flush().await?;
        check_acknowledge(self.stream, "control file").await
    }

    /// Streams exactly `document.size` bytes from the document's reader.
    pub async fn send_data_file<R>(&mut self, name: &str, document: &mut Document<R>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let size = document.size.to_string();

        send_command_line(self.stream, SubCommand::SendDataFile, &[size.as_str(), name]).await?;
        check_acknowledge(self.stream, "data file command").await?;

        let mut body = (&mut document.reader).take(document.size);
        let sent = tokio::io::copy(&mut body, &mut *self.stream).await?;
        if sent != document.size {
            return Err(LpdError::Truncated {
                expected: document.size,
                actual: sent,
            });
        }

        self.stream.flush().await?;
        check_acknowledge(self.stream, "data file").await
    }

    /// Asks the daemon to drop whatever this session created. Failures are
    /// logged and otherwise ignored; no acknowledgement is read.
    pub async fn abort(&mut self) {
        warn!("Aborting job");
        if let Err(e) = send_command_line(self.stream, SubCommand::AbortJob, &[]).await {
            warn!("Failed to send abort; error = {}", e);
        }
    }

    async fn transfer<R>(&mut self, job: &Job, document: &mut Document<R>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let cf = ControlFile::for_job(job, &document.name)?;
        self.send_control_file(&job.origin.control_file_name(), &cf)
            .await?;
        self.send_data_file(&job.origin.data_file_name(), document)
            .await
    }
}

/// Submits `document` to `queue` over an already connected stream.
///
/// Once the daemon has accepted the job, any failure sends an abort before
/// the stream is closed. The stream is shut down on every path and the first
/// error is the one returned.
pub async fn submit_job<S, R>(mut stream: S, queue: &str, job: &Job, mut document: Document<R>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    info!(
        "Printing {} to queue {} as {} [size={}]",
        document.name, queue, job.origin, document.size
    );

    let outcome = match JobSession::open(&mut stream, queue).await {
        Ok(mut session) => {
            let result = session.transfer(job, &mut document).await;
            if result.is_err() {
                session.abort().await;
            }
            result
        }
        Err(e) => Err(e),
    };

    let closed = stream.shutdown().await;
    outcome?;
    closed?;

    info!("Job {} sent to queue {}", document.name, queue);
    Ok(())
}
