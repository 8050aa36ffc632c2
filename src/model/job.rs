use std::fmt::Display;

use crate::model::command::{
    ControlFileCommand,
    OutputFormat,
};

/// Three digit job sequence used for every submitted job.
pub const JOB_NUMBER: &str = "A000";

/// Host and user a job is submitted on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub hostname: String,
    pub user: String,
}

impl Origin {
    pub fn new(hostname: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            user: user.into(),
        }
    }

    pub fn control_file_name(&self) -> String {
        format!("cf{}{}", JOB_NUMBER, self.hostname)
    }

    pub fn data_file_name(&self) -> String {
        format!("df{}{}", JOB_NUMBER, self.hostname)
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.user, self.hostname)
    }
}

/// Everything about a print job except the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub origin: Origin,
    /// Output format the data file is listed under.
    pub format: OutputFormat,
    /// Extra control file lines, applied in order over the defaults.
    pub overrides: Vec<(ControlFileCommand, String)>,
}

impl Job {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            format: OutputFormat::default(),
            overrides: Vec::new(),
        }
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn set(mut self, cmd: ControlFileCommand, value: impl Into<String>) -> Self {
        self.overrides.push((cmd, value.into()));
        self
    }
}
