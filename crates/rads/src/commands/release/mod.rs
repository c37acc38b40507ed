pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum ReleaseCommands {
    /// List the files of a release
    List(list::ListArgs),
    /// Extract files of a release into a directory
    Extract(extract::ExtractArgs),
}

impl ReleaseCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ReleaseCommands::List(list) => list.handle(),
            ReleaseCommands::Extract(extract) => extract.handle(),
        }
    }
}
