use std::path::PathBuf;

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use rads_project::{ExtractOptions, Project};
use tracing::info;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input release manifest
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Paths of the files to extract, every file when omitted
    #[arg(short, long = "path", value_name = "PATH")]
    paths: Vec<String>,

    /// Keep compressed payloads as they are stored
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let mut project = Project::open(&self.manifest)
            .context(format!("opening {}", self.manifest.display()))?;
        let options = ExtractOptions::builder()
            .decompress(!self.raw)
            .overwrite(self.overwrite)
            .build();

        if self.paths.is_empty() {
            let count = project
                .extract_all(&self.directory, options)
                .context(format!("extracting into {}", self.directory.display()))?;
            info!("extracted {count} files from {}", project.name());
            return Ok(());
        }

        for path in &self.paths {
            let p = self.directory.join(path);
            info!("writing {}", p.display());

            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)
                    .into_diagnostic()
                    .context(format!("creating {}", parent.display()))?;
            }
            project
                .extract_with(path, &p, options)
                .context(format!("extracting {path}"))?;
        }

        Ok(())
    }
}
