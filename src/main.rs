use std::{
    path::PathBuf,
    time::Duration,
};

use anyhow::{
    anyhow,
    bail,
    Result,
};
use clap::{
    Parser,
    Subcommand,
    ValueEnum,
};
use log::info;
use lpd_client::{
    Client,
    ControlFileCommand,
    Document,
    Job,
    Origin,
    OutputFormat,
    StatusFormat,
    LPD_PORT,
};
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Submit and manage jobs on a remote line printer daemon
struct Cli {
    /// Printer host to connect to
    #[clap(short, long, default_value = "127.0.0.1", env = "LPD_ADDRESS")]
    address: String,
    /// Printer port
    #[clap(short, long, default_value_t = LPD_PORT, env = "LPD_PORT")]
    port: u16,
    /// Queue on the printer
    #[clap(short, long, default_value = "lp", env = "LPD_QUEUE")]
    queue: String,
    /// Seconds to wait for the connection to be established
    #[clap(short, long, env = "LPD_TIMEOUT")]
    timeout: Option<u64>,
    /// Host name to submit jobs as, defaults to this machine's
    #[clap(long, env = "LPD_HOSTNAME")]
    hostname: Option<String>,
    /// User to submit jobs as
    #[clap(short, long, env = "USER")]
    user: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a file to the queue
    Print {
        file: PathBuf,
        /// How the printer should interpret the file
        #[clap(short, long, value_enum, default_value = "text")]
        format: Format,
        /// Title for pr formatted output
        #[clap(short = 'T', long)]
        title: Option<String>,
        /// Class name for the banner page
        #[clap(short = 'C', long)]
        class: Option<String>,
        /// Job name for the banner page
        #[clap(short = 'J', long)]
        job_name: Option<String>,
        /// Mail this user when the job is done
        #[clap(short, long)]
        mail: Option<String>,
        /// Page width in columns
        #[clap(short, long)]
        width: Option<u32>,
        /// Indent text output by this many columns
        #[clap(short, long)]
        indent: Option<u32>,
    },
    /// Start the queue if it is not printing
    Start,
    /// Show the queue
    Status {
        /// Ask for the long listing
        #[clap(short, long)]
        long: bool,
        /// Only show these users or job numbers
        list: Vec<String>,
    },
    /// Remove jobs from the queue
    Remove {
        /// User the removal is requested as
        #[clap(short, long)]
        agent: Option<String>,
        /// Users or job numbers to remove
        list: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Raw,
    Postscript,
    Pr,
    Dvi,
    Troff,
    Ditroff,
    Cif,
    Plot,
    Fortran,
    Raster,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::PlainText,
            Format::Raw => OutputFormat::WithControlCharacters,
            Format::Postscript => OutputFormat::Postscript,
            Format::Pr => OutputFormat::Pr,
            Format::Dvi => OutputFormat::Dvi,
            Format::Troff => OutputFormat::Troff,
            Format::Ditroff => OutputFormat::Ditroff,
            Format::Cif => OutputFormat::Cif,
            Format::Plot => OutputFormat::Plot,
            Format::Fortran => OutputFormat::FortranCarriageControl,
            Format::Raster => OutputFormat::Raster,
        }
    }
}

fn local_hostname() -> Result<String> {
    let mut buf = [0u8; 256];
    // SAFETY: `buf` is a live, writable array of `buf.len()` bytes for the
    // whole call and gethostname writes at most that many. The name may be
    // left unterminated on truncation, so it is read only up to the first NUL
    // or the end of `buf`.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc != 0 {
        bail!("gethostname failed: {}", std::io::Error::last_os_error());
    }

    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let mut client = Client::new(format!("{}:{}", args.address, args.port));
    if let Some(secs) = args.timeout {
        client = client.with_connect_timeout(Duration::from_secs(secs));
    }

    match args.command {
        Command::Print {
            file,
            format,
            title,
            class,
            job_name,
            mail,
            width,
            indent,
        } => {
            let hostname = match args.hostname {
                Some(hostname) => hostname,
                None => local_hostname()?,
            };

            let user = args.user.ok_or_else(|| anyhow!("no user given, set --user or USER"))?;

            let mut job = Job::new(Origin::new(hostname, user)).format(format.into());
            let overrides = [
                (ControlFileCommand::Title, title),
                (ControlFileCommand::BannerClass, class),
                (ControlFileCommand::JobName, job_name),
                (ControlFileCommand::MailWhenPrinted, mail),
                (ControlFileCommand::WidthOfOutput, width.map(|w| w.to_string())),
                (ControlFileCommand::Indent, indent.map(|i| i.to_string())),
            ];
            for (cmd, value) in overrides {
                if let Some(value) = value {
                    job = job.set(cmd, value);
                }
            }

            let document = Document::open(&file).await?;
            client.print(&args.queue, &job, document).await?;
            info!("Printed {}", file.display());
        }
        Command::Start => {
            client.start_printing(&args.queue).await?;
        }
        Command::Status { long, list } => {
            let format = if long {
                StatusFormat::Long
            } else {
                StatusFormat::Short
            };
            let list: Vec<&str> = list.iter().map(String::as_str).collect();

            let mut status = client.queue_status(&args.queue, format, &list).await?;
            let mut stdout = tokio::io::stdout();
            while let Some(chunk) = status.next().await {
                stdout.write_all(&chunk?).await?;
            }
            stdout.flush().await?;
        }
        Command::Remove { agent, list } => {
            let agent = agent
                .or(args.user)
                .ok_or_else(|| anyhow!("no agent given, set --agent, --user or USER"))?;
            let list: Vec<&str> = list.iter().map(String::as_str).collect();
            client.remove_jobs(&args.queue, &agent, &list).await?;
        }
    }

    Ok(())
}
