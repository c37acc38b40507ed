pub mod show;

#[derive(clap::Subcommand)]
pub enum SolutionCommands {
    /// Show the projects a deployed solution is made of
    Show(show::ShowArgs),
}

impl SolutionCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            SolutionCommands::Show(show) => show.handle(),
        }
    }
}
