use bytes::{
    BufMut,
    BytesMut,
};
use futures::SinkExt;
use log::debug;
use tokio::io::{
    AsyncRead,
    AsyncReadExt,
    AsyncWrite,
};
use tokio_util::codec::{
    Encoder,
    FramedWrite,
};

use crate::error::{
    LpdError,
    Result,
};

pub const LINE_END: u8 = b'\n';
pub const SEPARATOR: u8 = b' ';
/// The daemon accepts a command by answering with a single zero octet.
pub const ACKNOWLEDGE: u8 = 0x00;

/// One command byte followed by space separated operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub command: u8,
    pub operands: Vec<String>,
}

impl CommandLine {
    pub fn new(command: impl Into<u8>, operands: &[&str]) -> Self {
        Self {
            command: command.into(),
            operands: operands.iter().map(|op| op.to_string()).collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct CommandLineCodec;

impl Encoder<CommandLine> for CommandLineCodec {
    type Error = LpdError;

    fn encode(&mut self, line: CommandLine, dst: &mut BytesMut) -> Result<()> {
        // operands are framed by SP and LF, so neither may appear inside one
        if let Some(op) = line
            .operands
            .iter()
            .find(|op| op.bytes().any(|b| b == SEPARATOR || b == LINE_END))
        {
            return Err(LpdError::Encoding(format!(
                "operand {:?} of command {:#04x} contains a space or line feed",
                op, line.command
            )));
        }

        let operands_len: usize = line.operands.iter().map(|op| op.len() + 1).sum();
        dst.reserve(operands_len + 2);

        dst.put_u8(line.command);
        for (i, op) in line.operands.iter().enumerate() {
            if i > 0 {
                dst.put_u8(SEPARATOR);
            }
            dst.put_slice(op.as_bytes());
        }
        dst.put_u8(LINE_END);

        Ok(())
    }
}

/// Writes a framed command line in a single buffer and flushes it.
pub async fn send_command_line<W>(stream: &mut W, command: impl Into<u8>, operands: &[&str]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = CommandLine::new(command, operands);
    debug!("Sending command {:#04x} {:?}", line.command, line.operands);

    let mut framed = FramedWrite::new(stream, CommandLineCodec);
    framed.send(line).await
}

/// Reads one acknowledgement octet; `step` names what is being acknowledged.
pub async fn check_acknowledge<R>(stream: &mut R, step: &'static str) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut ack = [0u8; 1];
    if stream.read(&mut ack).await? == 0 {
        return Err(LpdError::closed());
    }

    match ack[0] {
        ACKNOWLEDGE => {
            debug!("Daemon acknowledged {}", step);
            Ok(())
        }
        code => Err(LpdError::Rejected { step, code }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::command::{
        DaemonCommand,
        SubCommand,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_control_file_subcommand() {
        let mut buf = BytesMut::new();
        CommandLineCodec
            .encode(CommandLine::new(SubCommand::SendControlFile, &["10", "cfA000host"]), &mut buf)
            .unwrap();

        assert_eq!(
            &buf[..],
            &[0x02, 0x31, 0x30, 0x20, 0x63, 0x66, 0x41, 0x30, 0x30, 0x30, 0x68, 0x6f, 0x73, 0x74, 0x0a][..]
        );
    }

    #[test]
    fn encodes_command_without_operands() {
        let mut buf = BytesMut::new();
        CommandLineCodec
            .encode(CommandLine::new(SubCommand::AbortJob, &[]), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"\x01\n");
    }

    #[tokio::test]
    async fn send_command_line_writes_whole_line() {
        let (mut client, mut server) = tokio::io::duplex(64);
        send_command_line(&mut client, DaemonCommand::ReceiveJob, &["lp"])
            .await
            .unwrap();
        drop(client);

        let mut received = Vec::new();
        server.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"\x02lp\n");
    }

    #[test]
    fn operand_with_separator_or_line_end_is_refused() {
        for op in ["two words", "line\nbreak", " ", "\n"] {
            let mut buf = BytesMut::new();
            let err = CommandLineCodec
                .encode(CommandLine::new(DaemonCommand::ReceiveJob, &[op]), &mut buf)
                .unwrap_err();
            assert!(matches!(err, LpdError::Encoding(_)), "{op:?}: {err:?}");
            assert!(buf.is_empty());
        }
    }

    #[tokio::test]
    async fn refused_operand_writes_nothing() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let err = send_command_line(&mut client, DaemonCommand::RemoveJobs, &["lp", "root", "alice bob"])
            .await
            .unwrap_err();
        assert!(matches!(err, LpdError::Encoding(_)));
        drop(client);

        let mut received = Vec::new();
        server.read_to_end(&mut received).await.unwrap();
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn zero_ack_is_accepted() {
        let mut reader: &[u8] = &[0x00];
        check_acknowledge(&mut reader, "test").await.unwrap();
    }

    #[tokio::test]
    async fn non_zero_ack_is_rejected() {
        for byte in [0x01u8, 0x02, 0xff] {
            let mut reader: &[u8] = &[byte];
            let err = check_acknowledge(&mut reader, "test").await.unwrap_err();
            assert!(matches!(err, LpdError::Rejected { code, .. } if code == byte));
        }
    }

    #[tokio::test]
    async fn closed_stream_is_a_connection_error() {
        let mut reader: &[u8] = &[];
        let err = check_acknowledge(&mut reader, "test").await.unwrap_err();
        assert!(matches!(err, LpdError::Connection(_)));
    }

    #[tokio::test]
    async fn ack_reads_a_single_byte() {
        let mut reader: &[u8] = &[0x00, 0x07];
        check_acknowledge(&mut reader, "first").await.unwrap();
        assert_eq!(reader, &[0x07u8]);
    }
}
