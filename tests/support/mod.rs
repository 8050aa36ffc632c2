//! A scripted line printer daemon on a loopback socket.

use std::net::SocketAddr;

use lpd_client::{
    control::read_control_file,
    ControlFile,
};
use tokio::{
    io::{
        AsyncReadExt,
        AsyncWriteExt,
    },
    net::{
        TcpListener,
        TcpStream,
    },
    task::JoinHandle,
};

/// What the daemon saw on one receive-job connection.
#[derive(Debug, Default)]
pub struct Received {
    pub queue: String,
    pub control_file_name: String,
    pub control_file: Option<ControlFile>,
    pub data_file_name: String,
    pub data: Vec<u8>,
    /// Bytes the client sent after the daemon stopped following the job.
    pub trailer: Vec<u8>,
}

async fn read_line(stream: &mut TcpStream) -> Vec<u8> {
    let mut line = Vec::new();
    loop {
        match stream.read_u8().await {
            Ok(b'\n') | Err(_) => return line,
            Ok(b) => line.push(b),
        }
    }
}

fn subcommand(line: &[u8], expected: u8) -> (usize, String) {
    assert_eq!(line[0], expected, "unexpected subcommand in {:?}", line);
    let text = String::from_utf8(line[1..].to_vec()).unwrap();
    let (count, name) = text.split_once(' ').unwrap();
    (count.parse().unwrap(), name.to_string())
}

/// Accepts one connection and walks it through a receive-job exchange,
/// answering with `acks` in order. A non-zero ack ends the script and the
/// rest of the connection is collected as the trailer.
pub async fn receive_job_daemon(acks: Vec<u8>) -> (SocketAddr, JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Received::default();
        let mut acks = acks.into_iter();

        'script: {
            let line = read_line(&mut stream).await;
            assert_eq!(line[0], 0x02);
            received.queue = String::from_utf8(line[1..].to_vec()).unwrap();
            let Some(ack) = acks.next() else { break 'script };
            stream.write_u8(ack).await.unwrap();
            if ack != 0 {
                break 'script;
            }

            let (size, name) = subcommand(&read_line(&mut stream).await, 0x02);
            received.control_file_name = name;
            let Some(ack) = acks.next() else { break 'script };
            stream.write_u8(ack).await.unwrap();
            if ack != 0 {
                break 'script;
            }

            received.control_file = Some(read_control_file(&mut stream, size).await.unwrap());
            let Some(ack) = acks.next() else { break 'script };
            stream.write_u8(ack).await.unwrap();
            if ack != 0 {
                break 'script;
            }

            let (size, name) = subcommand(&read_line(&mut stream).await, 0x03);
            received.data_file_name = name;
            let Some(ack) = acks.next() else { break 'script };
            stream.write_u8(ack).await.unwrap();
            if ack != 0 {
                break 'script;
            }

            received.data = vec![0u8; size];
            stream.read_exact(&mut received.data).await.unwrap();
            if let Some(ack) = acks.next() {
                stream.write_u8(ack).await.unwrap();
            }
        }

        stream.read_to_end(&mut received.trailer).await.unwrap();
        received
    });

    (addr, handle)
}

/// Accepts `connections` connections, each answered with `reply` after the
/// command line is read. Returns the command lines in accept order.
pub async fn status_daemon(connections: usize, reply: &'static [u8]) -> (SocketAddr, JoinHandle<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut lines = Vec::new();
        for _ in 0..connections {
            let (mut stream, _) = listener.accept().await.unwrap();
            lines.push(read_line(&mut stream).await);
            stream.write_all(reply).await.unwrap();
        }
        lines
    });

    (addr, handle)
}
