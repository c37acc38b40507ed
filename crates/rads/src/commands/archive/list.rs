use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use rads_formats::RafArchive;

#[derive(Args)]
pub struct ListArgs {
    /// An input RAF archive index
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let archive = RafArchive::open(&self.file).context(format!("reading {}", self.file.display()))?;

        if self.json {
            let entries = archive.entries().collect_vec();
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
            return Ok(());
        }

        println!(
            "RafArchive(version={}, manager_index={}, entries={})",
            archive.version(),
            archive.manager_index(),
            archive.len()
        );
        println!(
            "{}",
            archive
                .entries()
                .map(|e| format!(
                    "{:>10} {:>10} {:#010x} {}",
                    e.data_offset, e.data_size, e.path_hash, e.path
                ))
                .join("\n")
        );

        Ok(())
    }
}
