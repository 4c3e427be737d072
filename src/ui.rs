#![forbid(unsafe_code)]

use inquire::{Confirm, Select, Text};
use paktool::pak;
use std::path::{Path, PathBuf};

use crate::table::Table;

const PACK: &str = "Pack a directory into a .PAK";
const UNPACK: &str = "Unpack a .PAK into a directory";

fn prompt_err(e: inquire::InquireError) -> pak::PakError {
    pak::PakError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Appends `.PAK` unless the name already ends in `.pak` (any case).
pub fn ensure_pak_ext(p: &Path) -> PathBuf {
    let has_ext = p
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pak"));
    if has_ext {
        return p.to_path_buf();
    }
    let mut s = p.as_os_str().to_owned();
    s.push(".PAK");
    PathBuf::from(s)
}

fn print_row(t: &mut Table<std::io::StdoutLock<'static>>, r: &pak::EntryReport, output: &Path) {
    if let Err(e) = t.report(r, output) {
        tracing::warn!("could not print progress: {e}");
    }
}

pub fn run_pack(input: &Path, output: &Path) -> pak::PakResult<()> {
    let output = ensure_pak_ext(output);
    let mut t = Table::new(std::io::stdout().lock());
    pak::pack_with_progress(input, &output, &mut |r| print_row(&mut t, r, &output))
}

pub fn run_unpack(input: &Path, output: &Path) -> pak::PakResult<()> {
    let mut t = Table::new(std::io::stdout().lock());
    pak::unpack_with_progress(input, output, &mut |r| print_row(&mut t, r, output))?;
    Ok(())
}

pub fn run() -> pak::PakResult<()> {
    println!("PAK Wizard\n");

    let mode = Select::new("What do you want to do?", vec![PACK, UNPACK])
        .prompt()
        .map_err(prompt_err)?;

    let (input_label, input_default, output_label, output_default) = if mode == PACK {
        ("Input directory", "./data", "Output .PAK file", "./DATA.PAK")
    } else {
        ("Input .PAK file", "./DATA.PAK", "Output directory", "./data")
    };

    let input = Text::new(input_label)
        .with_default(input_default)
        .prompt()
        .map(PathBuf::from)
        .map_err(prompt_err)?;

    let output = Text::new(output_label)
        .with_default(output_default)
        .prompt()
        .map(PathBuf::from)
        .map_err(prompt_err)?;

    println!("\nSummary:");
    println!("  mode  : {}", if mode == PACK { "pack" } else { "unpack" });
    println!("  input : {}", input.display());
    println!("  output: {}", output.display());

    let proceed = Confirm::new("Proceed?")
        .with_default(true)
        .prompt()
        .map_err(prompt_err)?;
    if !proceed {
        return Ok(());
    }

    if mode == PACK {
        run_pack(&input, &output)
    } else {
        run_unpack(&input, &output)
    }
}
