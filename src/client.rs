use std::time::Duration;

use log::info;
use tokio::{
    io::AsyncRead,
    net::TcpStream,
    time::timeout,
};

use crate::{
    error::{
        LpdError,
        Result,
    },
    model::{
        document::Document,
        job::Job,
    },
    print::submit_job,
    queue::{
        self,
        StatusFormat,
        StatusStream,
    },
};

/// Well known LPD port.
pub const LPD_PORT: u16 = 515;

/// A remote line printer daemon. Every operation dials its own connection.
#[derive(Debug, Clone)]
pub struct Client {
    dest: String,
    connect_timeout: Option<Duration>,
}

impl Client {
    /// `dest` is a `host:port` pair.
    pub fn new(dest: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            connect_timeout: None,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    async fn connect(&self) -> Result<TcpStream> {
        info!("Connecting to {}", self.dest);

        let stream = match self.connect_timeout {
            Some(limit) => timeout(limit, TcpStream::connect(&self.dest))
                .await
                .map_err(|_| {
                    LpdError::Connection(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("connecting to {} timed out after {:?}", self.dest, limit),
                    ))
                })??,
            None => TcpStream::connect(&self.dest).await?,
        };

        Ok(stream)
    }

    pub async fn print<R>(&self, queue: &str, job: &Job, document: Document<R>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let stream = self.connect().await?;
        submit_job(stream, queue, job, document).await
    }

    pub async fn start_printing(&self, queue: &str) -> Result<()> {
        queue::start_printing(self.connect().await?, queue).await
    }

    pub async fn queue_status(
        &self,
        queue: &str,
        format: StatusFormat,
        list: &[&str],
    ) -> Result<StatusStream<TcpStream>> {
        queue::queue_status(self.connect().await?, queue, format, list).await
    }

    pub async fn remove_jobs(&self, queue: &str, agent: &str, list: &[&str]) -> Result<()> {
        queue::remove_jobs(self.connect().await?, queue, agent, list).await
    }
}
