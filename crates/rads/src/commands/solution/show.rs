use std::path::PathBuf;

use clap::Args;
use miette::{miette, Context, Result};
use owo_colors::{OwoColorize, Stream};
use rads_project::RadsLayout;

#[derive(Args)]
pub struct ShowArgs {
    /// The deploy directory of a solution release
    #[arg(long, value_name = "DIR")]
    deploy: PathBuf,

    /// The solution name, taken from the deploy directory when omitted
    #[arg(short, long, value_name = "NAME")]
    solution: Option<String>,
}

impl ShowArgs {
    fn solution_name(&self) -> Result<String> {
        if let Some(name) = &self.solution {
            return Ok(name.clone());
        }

        self.deploy
            .ancestors()
            .nth(3)
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str())
            .map(String::from)
            .ok_or(miette!("unable to find the solution name in {}", self.deploy.display()))
    }

    pub fn handle(&self) -> Result<()> {
        let (layout, version) = RadsLayout::from_deploy_dir(&self.deploy)
            .context(format!("locating installation from {}", self.deploy.display()))?;
        let name = self.solution_name()?;

        let configuration = layout.open_configuration(&name, version)?;
        let solution = layout.open_solution(&name, version)?;
        let projects = layout.select_projects(&solution, &configuration)?;

        println!("root: {}", layout.root().display());
        println!("locale: {}", configuration.locale());
        println!("{solution}");
        for project in projects {
            let manifest = layout.release_manifest_path(&project.name, project.version.parse()?);
            let state = if manifest.is_file() { "installed" } else { "missing" };
            println!(
                "  {project} {}",
                state.if_supports_color(Stream::Stdout, |t| t.bold().to_string())
            );
        }

        Ok(())
    }
}
