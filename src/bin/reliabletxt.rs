//! reliabletxt CLI
//!
//! Inspect, convert and Base64-wrap ReliableTXT files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reliabletxt::{base64_string, file, fixtures, Decoder, Document, Encoding};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "reliabletxt")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "ReliableTXT file tool")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show encoding, line count and code point count of files
    Info {
        /// Files and directories to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Walk directories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Print the decoded text of a file
    Cat {
        input: PathBuf,
    },

    /// Re-encode a file
    Convert {
        input: PathBuf,

        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Target encoding (utf8, utf16, utf16r, utf32)
        #[arg(short = 'e', long)]
        encoding: Encoding,
    },

    /// Print the Base64 token of a file's bytes
    ToBase64 {
        input: PathBuf,

        /// Print the payload without the Base64| delimiters
        #[arg(long)]
        raw: bool,
    },

    /// Decode a delimited Base64 token into a file
    FromBase64 {
        token: String,

        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Write the reference fixture files
    Fixtures {
        directory: PathBuf,
    },
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { paths, recursive } => {
            let invalid = show_info(&paths, recursive)?;
            if invalid > 0 {
                anyhow::bail!("{} file(s) are not valid ReliableTXT", invalid);
            }
        }
        Commands::Cat { input } => {
            let text = file::read_all_text(&input)?;
            io::stdout().write_all(text.as_bytes())?;
        }
        Commands::Convert { input, output, encoding } => {
            let mut document = file::load(&input)?;
            log::info!("Converting {} from {} to {}", input.display(), document.encoding, encoding);
            document.encoding = encoding;
            file::save(&document, &output)?;
        }
        Commands::ToBase64 { input, raw } => {
            let bytes = fs::read(&input).with_context(|| format!("Failed to read: {}", input.display()))?;
            let token = if raw {
                base64_string::raw_from_bytes(&bytes)
            } else {
                base64_string::from_bytes(&bytes)
            };
            println!("{}", token);
        }
        Commands::FromBase64 { token, output } => {
            let bytes = base64_string::to_bytes(token.trim()).context("Failed to decode Base64 token")?;
            fs::write(&output, &bytes).with_context(|| format!("Failed to write: {}", output.display()))?;
            log::info!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
        Commands::Fixtures { directory } => {
            let written = fixtures::generate(&directory)?;
            println!("Generated {} files in {}", written.len(), directory.display());
        }
    }

    Ok(())
}

/// Print one line per file; returns the number of invalid files
fn show_info(paths: &[PathBuf], recursive: bool) -> Result<usize> {
    let mut invalid = 0;
    for path in paths {
        if path.is_dir() {
            if !recursive {
                log::warn!("Skipping directory (use --recursive): {}", path.display());
                continue;
            }
            for entry in walk_files(path)? {
                if !show_file_info(&entry) {
                    invalid += 1;
                }
            }
        } else if !show_file_info(path) {
            invalid += 1;
        }
    }
    Ok(invalid)
}

fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    #[cfg(feature = "walkdir")]
    {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        files.sort();
        Ok(files)
    }

    #[cfg(not(feature = "walkdir"))]
    {
        anyhow::bail!("Directory traversal requires the 'cli' feature: {}", dir.display());
    }
}

fn show_file_info(path: &Path) -> bool {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("{}  error  {}", path.display(), err);
            return false;
        }
    };

    let Some(encoding) = Decoder::new().encoding_or_none(&bytes) else {
        println!("{}  none", path.display());
        return false;
    };

    match Document::from_bytes(&bytes) {
        Ok(document) => {
            println!(
                "{}  {}  {} lines  {} code points",
                path.display(),
                encoding,
                document.lines().len(),
                document.text.chars().count()
            );
            true
        }
        Err(err) => {
            println!("{}  {}  invalid: {}", path.display(), encoding, err);
            false
        }
    }
}
