use log::{
    debug,
    info,
};
use tokio::io::{
    AsyncRead,
    AsyncWrite,
    AsyncWriteExt,
};
use tokio_util::codec::{
    BytesCodec,
    FramedRead,
};

use crate::{
    codec::{
        check_acknowledge,
        send_command_line,
    },
    error::Result,
    model::command::DaemonCommand,
};

/// Which queue listing to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFormat {
    #[default]
    Short,
    Long,
}

impl From<StatusFormat> for DaemonCommand {
    fn from(format: StatusFormat) -> Self {
        match format {
            StatusFormat::Short => DaemonCommand::QueueStatusShort,
            StatusFormat::Long => DaemonCommand::QueueStatusLong,
        }
    }
}

/// Raw queue listing as sent by the daemon, until it hangs up.
pub type StatusStream<S> = FramedRead<S, BytesCodec>;

/// Asks the daemon to start printing `queue` if it is idle.
pub async fn start_printing<S>(mut stream: S, queue: &str) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!("Starting queue {}", queue);
    send_command_line(&mut stream, DaemonCommand::StartPrinting, &[queue]).await?;
    check_acknowledge(&mut stream, "start printing").await?;
    stream.shutdown().await?;
    Ok(())
}

/// Requests a queue listing. `list` optionally narrows it to user names or
/// job numbers. The returned stream yields the response unparsed.
pub async fn queue_status<S>(
    mut stream: S,
    queue: &str,
    format: StatusFormat,
    list: &[&str],
) -> Result<StatusStream<S>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let command = DaemonCommand::from(format);
    debug!("Requesting {} for {}", command, queue);

    let mut operands = vec![queue];
    operands.extend_from_slice(list);
    send_command_line(&mut stream, command, &operands).await?;

    Ok(FramedRead::new(stream, BytesCodec::new()))
}

/// Removes jobs from `queue` on behalf of `agent`. With an empty `list` the
/// daemon removes the agent's active job. Permission checks are the daemon's.
pub async fn remove_jobs<S>(mut stream: S, queue: &str, agent: &str, list: &[&str]) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!("Removing jobs {:?} from queue {} as {}", list, queue, agent);

    let mut operands = vec![queue, agent];
    operands.extend_from_slice(list);
    send_command_line(&mut stream, DaemonCommand::RemoveJobs, &operands).await?;
    check_acknowledge(&mut stream, "remove jobs").await?;
    stream.shutdown().await?;
    Ok(())
}
