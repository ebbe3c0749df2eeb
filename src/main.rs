#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use nwftool::nwf::{self, NwfResult, UnpackOptions, MAX_ENTRY_SIZE};

/// Exit code for a file that is not an NWF archive.
const EXIT_NOT_NWF: u8 = 115;

#[derive(Debug, Parser)]
#[command(name = "nwftool", version, about = "Unpack, inspect and repack NWF archives")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Unpack a .nwf file.
    Unpack {
        /// Path to the sbtf_pub.nwf file.
        archive: PathBuf,
        /// Directory to unpack files into.
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
        /// Refuse entries larger than this many bytes.
        #[arg(long, default_value_t = MAX_ENTRY_SIZE)]
        max_entry_size: u64,
        /// Only extract entries that contain this substring (repeatable).
        #[arg(long)]
        filter: Vec<String>,
    },

    /// Save the structure of a .nwf file as an XML schema (for repacking).
    Schema {
        /// Archive to read the structure from.
        archive: PathBuf,
        /// Output schema file.
        #[arg(default_value = "schema.xml")]
        schema: PathBuf,
    },

    /// Pack files back into a .nwf.
    Repack {
        /// Schema describing the entries and their order.
        #[arg(default_value = "schema.xml")]
        schema: PathBuf,
        /// Folder containing every file the schema names.
        #[arg(default_value = "output")]
        source: PathBuf,
        /// Output archive.
        #[arg(default_value = "sbtf_pub.nwf")]
        archive: PathBuf,
    },

    /// Check that a file is an NWF archive that can be unpacked.
    Verify {
        /// File to verify.
        file: PathBuf,
    },

    /// List entries in an archive.
    List {
        archive: PathBuf,
        /// Print flags, offsets and sizes too.
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Decode an archive and check every entry lies inside the file.
    Check { archive: PathBuf },
}

fn run(cmd: Command) -> NwfResult<ExitCode> {
    match cmd {
        Command::Unpack {
            archive,
            output,
            max_entry_size,
            filter,
        } => {
            std::fs::create_dir_all(&output)?;
            let manifest = nwf::decode_file(&archive)?;
            let opts = UnpackOptions {
                max_entry_size,
                filter,
            };
            let n = nwf::unpack_file(&archive, &manifest, &output, &opts)?;
            println!("unpacked {n} files to {}", output.display());
        }
        Command::Schema { archive, schema } => {
            let manifest = nwf::decode_file(&archive)?;
            nwf::write_schema(&manifest, &schema)?;
            println!("wrote schema for {} entries to {}", manifest.len(), schema.display());
        }
        Command::Repack {
            schema,
            source,
            archive,
        } => {
            let manifest = nwf::repack(&schema, &source, &archive)?;
            println!("packed {} entries into {}", manifest.len(), archive.display());
        }
        Command::Verify { file } => {
            if !nwf::verify_file(&file)? {
                eprintln!("verification failed: {} is not an NWF archive", file.display());
                return Ok(ExitCode::from(EXIT_NOT_NWF));
            }
            println!("file successfully verified");
        }
        Command::List { archive, verbose } => nwf::list(&archive, verbose)?,
        Command::Check { archive } => {
            let n = nwf::check(&archive)?;
            println!("ok: {n} entries");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli.cmd) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
