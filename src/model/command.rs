use std::fmt::Display;

use crate::error::LpdError;

/// Top level commands understood by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DaemonCommand {
    StartPrinting = 0x01,
    ReceiveJob = 0x02,
    QueueStatusShort = 0x03,
    QueueStatusLong = 0x04,
    RemoveJobs = 0x05,
}

/// Second level commands, only valid inside a receive-job session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SubCommand {
    AbortJob = 0x01,
    SendControlFile = 0x02,
    SendDataFile = 0x03,
}

impl From<DaemonCommand> for u8 {
    fn from(cmd: DaemonCommand) -> u8 {
        cmd as u8
    }
}

impl From<SubCommand> for u8 {
    fn from(cmd: SubCommand) -> u8 {
        cmd as u8
    }
}

impl Display for DaemonCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            DaemonCommand::StartPrinting => "start printing",
            DaemonCommand::ReceiveJob => "receive job",
            DaemonCommand::QueueStatusShort => "short queue status",
            DaemonCommand::QueueStatusLong => "long queue status",
            DaemonCommand::RemoveJobs => "remove jobs",
        };
        write!(f, "{}", str)
    }
}

/// Line tags of an RFC 1179 control file.
///
/// The lowercase tags select how a data file is rendered and carry the data
/// file name as their value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ControlFileCommand {
    TroffRFont = b'1',
    TroffIFont = b'2',
    TroffBFont = b'3',
    TroffSFont = b'4',
    BannerClass = b'C',
    Hostname = b'H',
    Indent = b'I',
    JobName = b'J',
    PrintBanner = b'L',
    MailWhenPrinted = b'M',
    SourceFileName = b'N',
    UserId = b'P',
    SymbolicLink = b'S',
    Title = b'T',
    UnlinkDataFile = b'U',
    WidthOfOutput = b'W',
    CifFile = b'c',
    DviFile = b'd',
    PlainTextFile = b'f',
    PlotFile = b'g',
    PrintWithControlCharacters = b'l',
    DitroffFile = b'n',
    PostscriptFile = b'o',
    PrFormat = b'p',
    FortranCarriageControl = b'r',
    TroffFormat = b't',
    RasterFormat = b'v',
}

impl ControlFileCommand {
    pub const ALL: [ControlFileCommand; 27] = [
        Self::TroffRFont,
        Self::TroffIFont,
        Self::TroffBFont,
        Self::TroffSFont,
        Self::BannerClass,
        Self::Hostname,
        Self::Indent,
        Self::JobName,
        Self::PrintBanner,
        Self::MailWhenPrinted,
        Self::SourceFileName,
        Self::UserId,
        Self::SymbolicLink,
        Self::Title,
        Self::UnlinkDataFile,
        Self::WidthOfOutput,
        Self::CifFile,
        Self::DviFile,
        Self::PlainTextFile,
        Self::PlotFile,
        Self::PrintWithControlCharacters,
        Self::DitroffFile,
        Self::PostscriptFile,
        Self::PrFormat,
        Self::FortranCarriageControl,
        Self::TroffFormat,
        Self::RasterFormat,
    ];

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// True for tags whose value is the name of a data file to print.
    pub fn is_output_format(self) -> bool {
        self.as_byte().is_ascii_lowercase()
    }
}

/// How the daemon should render a data file. Each variant is one of the
/// lowercase control file tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Cif,
    Dvi,
    #[default]
    PlainText,
    Plot,
    WithControlCharacters,
    Ditroff,
    Postscript,
    Pr,
    FortranCarriageControl,
    Troff,
    Raster,
}

impl From<OutputFormat> for ControlFileCommand {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Cif => ControlFileCommand::CifFile,
            OutputFormat::Dvi => ControlFileCommand::DviFile,
            OutputFormat::PlainText => ControlFileCommand::PlainTextFile,
            OutputFormat::Plot => ControlFileCommand::PlotFile,
            OutputFormat::WithControlCharacters => ControlFileCommand::PrintWithControlCharacters,
            OutputFormat::Ditroff => ControlFileCommand::DitroffFile,
            OutputFormat::Postscript => ControlFileCommand::PostscriptFile,
            OutputFormat::Pr => ControlFileCommand::PrFormat,
            OutputFormat::FortranCarriageControl => ControlFileCommand::FortranCarriageControl,
            OutputFormat::Troff => ControlFileCommand::TroffFormat,
            OutputFormat::Raster => ControlFileCommand::RasterFormat,
        }
    }
}

impl TryFrom<ControlFileCommand> for OutputFormat {
    type Error = LpdError;

    fn try_from(cmd: ControlFileCommand) -> Result<Self, Self::Error> {
        let format = match cmd {
            ControlFileCommand::CifFile => OutputFormat::Cif,
            ControlFileCommand::DviFile => OutputFormat::Dvi,
            ControlFileCommand::PlainTextFile => OutputFormat::PlainText,
            ControlFileCommand::PlotFile => OutputFormat::Plot,
            ControlFileCommand::PrintWithControlCharacters => OutputFormat::WithControlCharacters,
            ControlFileCommand::DitroffFile => OutputFormat::Ditroff,
            ControlFileCommand::PostscriptFile => OutputFormat::Postscript,
            ControlFileCommand::PrFormat => OutputFormat::Pr,
            ControlFileCommand::FortranCarriageControl => OutputFormat::FortranCarriageControl,
            ControlFileCommand::TroffFormat => OutputFormat::Troff,
            ControlFileCommand::RasterFormat => OutputFormat::Raster,
            other => {
                return Err(LpdError::Encoding(format!(
                    "'{}' is not an output format",
                    other
                )))
            }
        };
        Ok(format)
    }
}

impl TryFrom<u8> for ControlFileCommand {
    type Error = LpdError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.as_byte() == byte)
            .ok_or_else(|| LpdError::Protocol(format!("unknown control file command {:#04x}", byte)))
    }
}

impl Display for ControlFileCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}
