#![deny(unsafe_code)]

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use barr::{BinaryArrayFile, OpenMode};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Inspect and verify typed binary array files.
#[derive(Debug, Parser)]
#[clap(name = NAME, version = VERSION, about)]
#[clap(subcommand_required = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress log output.
    ///
    /// Set this flag once to silence normal logging output, and set twice to silence warnings.
    #[arg(
        short = 'q',
        long,
        action = ArgAction::Count,
        global = true,
        conflicts_with = "verbose"
    )]
    quiet: u8,

    /// Log output verbosity.
    ///
    /// Set this flag once to show debug information, and set twice to show trace information.
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        let level = if self.quiet > 0 {
            match self.quiet {
                1 => log::LevelFilter::Warn,
                _ => log::LevelFilter::Off,
            }
        } else {
            match self.verbose {
                0 => log::LevelFilter::Info,
                1 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[barr {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        self.command.run()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the header of a file as JSON.
    Info {
        path: PathBuf,
    },
    /// Print one stored array as JSON.
    Get {
        path: PathBuf,
        index: usize,
    },
    /// Decode every stored array and report the count.
    Verify {
        path: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct Info<'a> {
    path: &'a Path,
    #[serde(flatten)]
    header: &'a barr::FileHeader,
    header_size: usize,
    record_size: u64,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn open(path: &Path) -> Result<BinaryArrayFile, Error> {
    BinaryArrayFile::open(path, OpenMode::Read)
        .with_context(|| format!("cannot read {}", path.display()))
}

impl Command {
    fn run(self) -> Result<(), Error> {
        match self {
            Command::Info { path } => {
                let file = open(&path)?;
                let header = file.header()?;
                print_json(&Info {
                    path: &path,
                    header,
                    header_size: header.size(),
                    record_size: header.record_size()?,
                })
            }
            Command::Get { path, index } => {
                let file = open(&path)?;
                print_json(&file.get(index)?)
            }
            Command::Verify { path } => {
                let file = open(&path)?;
                let mut count = 0;
                for array in file.iter()? {
                    array.with_context(|| format!("array {count} is corrupt"))?;
                    count += 1;
                }
                log::info!(
                    "{}: {count} arrays of {} {}",
                    path.display(),
                    file.element_kind()?,
                    file.shape()?
                );
                println!("ok {count}");
                Ok(())
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}
