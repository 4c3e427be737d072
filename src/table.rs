#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::Path;

use paktool::pak::{EntryInfo, EntryReport};

fn row(path: &str, offset: impl std::fmt::Display, size: impl std::fmt::Display) -> String {
    format!("| {path:<64} | {offset:>10} | {size:>10} |")
}

/// `| path | offset | size |` table. The header is written together with the
/// first row, so a run that fails before reporting anything prints nothing.
pub struct Table<W: Write> {
    out: W,
    started: bool,
}

impl<W: Write> Table<W> {
    pub fn new(out: W) -> Self {
        Self { out, started: false }
    }

    fn start(&mut self) -> io::Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        let header = row("Path", "Offset", "Size");
        let rule = "-".repeat(header.len());
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{header}")?;
        writeln!(self.out, "{rule}")
    }

    pub fn line(&mut self, path: &str, offset: u32, size: u32) -> io::Result<()> {
        self.start()?;
        writeln!(self.out, "{}", row(path, offset, size))
    }

    /// One line per processed entry; skipped entries name their destination.
    pub fn report(&mut self, r: &EntryReport, output: &Path) -> io::Result<()> {
        if r.skipped {
            let msg = format!("File {} already exists, skipping", output.join(&r.path).display());
            self.line(&msg, r.offset, r.size)
        } else {
            self.line(&r.path, r.offset, r.size)
        }
    }
}

pub fn print_entries(entries: &[EntryInfo]) -> io::Result<()> {
    let mut table = Table::new(io::stdout().lock());
    table.start()?;
    for e in entries {
        table.line(&e.path, e.offset, e.size)?;
    }
    Ok(())
}
