#![forbid(unsafe_code)]

mod table;
mod ui;

use clap::{Parser, Subcommand};
use paktool::pak;
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "paktool", version, about = "Pack and unpack flat PAK archives")]
struct Cli {
    /// Log every entry as it is processed.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive wizard (terminal).
    Ui,

    /// Pack an input directory into a .PAK file.
    Pack {
        /// Input directory.
        #[arg(short, long)]
        input: PathBuf,
        /// Output archive. `.PAK` is appended when missing.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Unpack a .PAK file into an output directory. Existing files are kept.
    Unpack {
        /// Input archive.
        #[arg(short, long)]
        input: PathBuf,
        /// Output directory.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the entries of a .PAK file.
    List {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let res = match cli.cmd {
        Command::Ui => ui::run(),
        Command::Pack { input, output } => ui::run_pack(&input, &output),
        Command::Unpack { input, output } => ui::run_unpack(&input, &output),
        Command::List { input } => pak::entries(&input)
            .and_then(|e| table::print_entries(&e).map_err(pak::PakError::from)),
    };

    if let Err(e) = res {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
