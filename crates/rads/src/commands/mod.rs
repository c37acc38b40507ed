pub mod archive;
pub mod release;
pub mod solution;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle project release manifests
    Release {
        #[command(subcommand)]
        command: release::ReleaseCommands,
    },
    /// Handle RAF archive indexes
    Archive {
        #[command(subcommand)]
        command: archive::ArchiveCommands,
    },
    /// Handle solution releases
    Solution {
        #[command(subcommand)]
        command: solution::SolutionCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Release { command } => command.handle(),
            Commands::Archive { command } => command.handle(),
            Commands::Solution { command } => command.handle(),
        }
    }
}
