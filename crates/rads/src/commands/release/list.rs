use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream};
use rads_formats::{manifest::Directory, ReleaseManifest};

#[derive(Args)]
pub struct ListArgs {
    /// An input release manifest
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,

    /// Show the directory tree instead of flat paths
    #[arg(long, default_value_t = false)]
    tree: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let manifest = ReleaseManifest::open(&self.manifest)
            .context(format!("reading {}", self.manifest.display()))?;

        match (self.json, self.tree) {
            (true, true) => {
                println!("{}", serde_json::to_string_pretty(manifest.root()).into_diagnostic()?)
            }
            (true, false) => {
                let files = manifest.files().collect_vec();
                println!("{}", serde_json::to_string_pretty(&files).into_diagnostic()?)
            }
            (false, true) => {
                println!("{manifest}");
                print_tree(manifest.root(), 0);
            }
            (false, false) => {
                println!("{}", manifest.list_files().iter().join("\n"));
            }
        }

        Ok(())
    }
}

fn print_tree(dir: &Directory, depth: usize) {
    let indent = "  ".repeat(depth);
    for file in &dir.files {
        println!(
            "{indent}{} {}",
            file.name,
            format!("({} bytes, {})", file.size, file.version).if_supports_color(Stream::Stdout, |t| t.dimmed())
        );
    }
    for subdir in &dir.subdirs {
        println!(
            "{indent}{}/",
            subdir.name.if_supports_color(Stream::Stdout, |t| t.blue().bold().to_string())
        );
        print_tree(subdir, depth + 1);
    }
}
