//! RFC 1179 control files: the per-job metadata sent ahead of the data file.

use std::collections::BTreeMap;

use bytes::{
    Bytes,
    BytesMut,
};
use tokio_util::codec::Encoder;

use crate::{
    error::{
        LpdError,
        Result,
    },
    model::{
        command::ControlFileCommand,
        job::Job,
    },
};

pub mod codec;

pub use codec::{
    read_control_file,
    ControlFileCodec,
};

/// Control file lines keyed by tag. Each tag holds one value; inserting a
/// tag again replaces its value. Iteration runs in ascending tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFile {
    entries: BTreeMap<ControlFileCommand, String>,
}

impl ControlFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines every submitted job carries, before caller overrides.
    pub fn defaults(job: &Job, document_name: &str) -> Self {
        let origin = &job.origin;
        let data_file = origin.data_file_name();

        let mut cf = Self::new();
        cf.insert(ControlFileCommand::Hostname, origin.hostname.as_str());
        cf.insert(ControlFileCommand::UserId, origin.user.as_str());
        cf.insert(ControlFileCommand::JobName, document_name);
        cf.insert(ControlFileCommand::BannerClass, origin.hostname.as_str());
        cf.insert(ControlFileCommand::PrintBanner, origin.user.as_str());
        cf.insert(ControlFileCommand::UnlinkDataFile, data_file.as_str());
        cf.insert(ControlFileCommand::SourceFileName, document_name);
        cf.insert(job.format.into(), data_file);
        cf
    }

    /// Defaults for `job` with its overrides applied on top.
    ///
    /// A job prints one data file in one format, so an override naming any
    /// other output format tag is refused.
    pub fn for_job(job: &Job, document_name: &str) -> Result<Self> {
        let format = ControlFileCommand::from(job.format);
        if let Some((cmd, _)) = job
            .overrides
            .iter()
            .find(|(cmd, _)| cmd.is_output_format() && *cmd != format)
        {
            return Err(LpdError::Encoding(format!(
                "override '{}' adds a second output format to a '{}' job",
                cmd, format
            )));
        }

        let mut cf = Self::defaults(job, document_name);
        cf.extend(job.overrides.iter().cloned());
        Ok(cf)
    }

    pub fn insert(&mut self, cmd: ControlFileCommand, value: impl Into<String>) -> Option<String> {
        self.entries.insert(cmd, value.into())
    }

    pub fn get(&self, cmd: ControlFileCommand) -> Option<&str> {
        self.entries.get(&cmd).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlFileCommand, &str)> {
        self.entries.iter().map(|(cmd, value)| (*cmd, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        ControlFileCodec::default().encode(self, &mut buf)?;
        Ok(buf.freeze())
    }
}

impl Extend<(ControlFileCommand, String)> for ControlFile {
    fn extend<T: IntoIterator<Item = (ControlFileCommand, String)>>(&mut self, iter: T) {
        for (cmd, value) in iter {
            self.insert(cmd, value);
        }
    }
}

impl FromIterator<(ControlFileCommand, String)> for ControlFile {
    fn from_iter<T: IntoIterator<Item = (ControlFileCommand, String)>>(iter: T) -> Self {
        let mut cf = Self::new();
        cf.extend(iter);
        cf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        command::OutputFormat,
        job::Origin,
    };
    use pretty_assertions::assert_eq;

    fn job() -> Job {
        Job::new(Origin::new("myhost", "testuser"))
    }

    #[test]
    fn defaults_fill_mandatory_lines() {
        let cf = ControlFile::for_job(&job(), "test job").unwrap();

        assert_eq!(cf.len(), 8);
        assert_eq!(cf.get(ControlFileCommand::Hostname), Some("myhost"));
        assert_eq!(cf.get(ControlFileCommand::UserId), Some("testuser"));
        assert_eq!(cf.get(ControlFileCommand::JobName), Some("test job"));
        assert_eq!(cf.get(ControlFileCommand::BannerClass), Some("myhost"));
        assert_eq!(cf.get(ControlFileCommand::PrintBanner), Some("testuser"));
        assert_eq!(cf.get(ControlFileCommand::UnlinkDataFile), Some("dfA000myhost"));
        assert_eq!(cf.get(ControlFileCommand::SourceFileName), Some("test job"));
        assert_eq!(cf.get(ControlFileCommand::PlainTextFile), Some("dfA000myhost"));
    }

    #[test]
    fn format_selects_the_data_file_line() {
        let job = job().format(OutputFormat::Postscript);
        let cf = ControlFile::for_job(&job, "doc.ps").unwrap();

        assert_eq!(cf.get(ControlFileCommand::PostscriptFile), Some("dfA000myhost"));
        assert_eq!(cf.get(ControlFileCommand::PlainTextFile), None);
        assert_eq!(cf.iter().filter(|(cmd, _)| cmd.is_output_format()).count(), 1);
    }

    #[test]
    fn overrides_win_and_last_write_wins() {
        let job = job()
            .set(ControlFileCommand::JobName, "renamed")
            .set(ControlFileCommand::Title, "draft")
            .set(ControlFileCommand::Title, "final");
        let cf = ControlFile::for_job(&job, "test job").unwrap();

        assert_eq!(cf.get(ControlFileCommand::JobName), Some("renamed"));
        assert_eq!(cf.get(ControlFileCommand::SourceFileName), Some("test job"));
        assert_eq!(cf.get(ControlFileCommand::Title), Some("final"));
    }

    #[test]
    fn non_format_tag_is_not_an_output_format() {
        let err = OutputFormat::try_from(ControlFileCommand::Hostname).unwrap_err();
        assert!(matches!(err, LpdError::Encoding(_)));

        // the mandatory host line survives whichever format is chosen
        for cmd in ControlFileCommand::ALL {
            if let Ok(format) = OutputFormat::try_from(cmd) {
                let cf = ControlFile::for_job(&job().format(format), "a").unwrap();
                assert_eq!(cf.get(ControlFileCommand::Hostname), Some("myhost"));
                assert_eq!(cf.get(cmd), Some("dfA000myhost"));
                assert_eq!(cf.iter().filter(|(cmd, _)| cmd.is_output_format()).count(), 1);
            }
        }
    }

    #[test]
    fn second_output_format_override_is_refused() {
        let job = job().set(ControlFileCommand::PostscriptFile, "dfA000myhost");
        let err = ControlFile::for_job(&job, "a").unwrap_err();
        assert!(matches!(err, LpdError::Encoding(_)));
    }

    #[test]
    fn override_of_the_chosen_format_is_kept() {
        let job = job()
            .format(OutputFormat::Raster)
            .set(ControlFileCommand::RasterFormat, "dfA000other");
        let cf = ControlFile::for_job(&job, "a").unwrap();
        assert_eq!(cf.get(ControlFileCommand::RasterFormat), Some("dfA000other"));
    }

    #[test]
    fn encode_writes_every_line() {
        let cf: ControlFile = [
            (ControlFileCommand::Hostname, "h".to_string()),
            (ControlFileCommand::UserId, "u".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(&cf.encode().unwrap()[..], b"Hh\nPu\n");
    }
}
