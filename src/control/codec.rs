use bytes::{
    BufMut,
    BytesMut,
};
use tokio::io::{
    AsyncRead,
    AsyncReadExt,
};
use tokio_stream::StreamExt;
use tokio_util::codec::{
    Decoder,
    Encoder,
    FramedRead,
};

use crate::{
    codec::LINE_END,
    control::ControlFile,
    error::{
        LpdError,
        Result,
    },
    model::command::ControlFileCommand,
};

/// Encodes control files and decodes a control file of a known size.
#[derive(Debug, Copy, Clone, Default)]
pub struct ControlFileCodec {
    size: usize,
    finished: bool,
}

impl ControlFileCodec {
    /// A decoder expecting exactly `size` bytes of control file.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            finished: false,
        }
    }
}

impl<'a> Encoder<&'a ControlFile> for ControlFileCodec {
    type Error = LpdError;

    fn encode(&mut self, cf: &'a ControlFile, dst: &mut BytesMut) -> Result<()> {
        for (cmd, value) in cf.iter() {
            if value.as_bytes().contains(&LINE_END) {
                return Err(LpdError::Encoding(format!(
                    "value for '{}' contains a line feed",
                    cmd
                )));
            }

            dst.reserve(value.len() + 2);
            dst.put_u8(cmd.as_byte());
            dst.put_slice(value.as_bytes());
            dst.put_u8(LINE_END);
        }

        Ok(())
    }
}

impl Decoder for ControlFileCodec {
    type Error = LpdError;
    type Item = ControlFile;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if self.finished {
            return Ok(None);
        }

        if src.len() < self.size {
            src.reserve(self.size - src.len());
            return Ok(None);
        }

        self.finished = true;
        let data = src.split_to(self.size);
        parse(&data).map(Some)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if !self.finished && src.len() < self.size {
            return Err(LpdError::Truncated {
                expected: self.size as u64,
                actual: src.len() as u64,
            });
        }

        self.decode(src)
    }
}

fn parse(data: &[u8]) -> Result<ControlFile> {
    let mut cf = ControlFile::new();

    // a single final line feed terminates the last line
    let body = data.strip_suffix(&[LINE_END]).unwrap_or(data);
    if body.is_empty() {
        return Ok(cf);
    }

    for line in body.split(|b| *b == LINE_END) {
        let (&tag, value) = line
            .split_first()
            .ok_or_else(|| LpdError::Protocol("empty line in control file".to_string()))?;
        let cmd = ControlFileCommand::try_from(tag)?;
        let value = std::str::from_utf8(value)
            .map_err(|e| LpdError::Protocol(format!("value for '{}' is not UTF-8: {}", cmd, e)))?;

        cf.insert(cmd, value);
    }

    Ok(cf)
}

/// Reads exactly `size` bytes from `reader` and decodes them as a control
/// file. Nothing past `size` is consumed.
pub async fn read_control_file<R>(reader: &mut R, size: usize) -> Result<ControlFile>
where
    R: AsyncRead + Unpin,
{
    let mut framed = FramedRead::new(reader.take(size as u64), ControlFileCodec::with_size(size));

    match framed.next().await {
        Some(cf) => cf,
        None => Err(LpdError::Truncated {
            expected: size as u64,
            actual: 0,
        }),
    }
}
