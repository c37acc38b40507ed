pub mod list;

#[derive(clap::Subcommand)]
pub enum ArchiveCommands {
    /// List the entries of a RAF archive index
    List(list::ListArgs),
}

impl ArchiveCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ArchiveCommands::List(list) => list.handle(),
        }
    }
}
