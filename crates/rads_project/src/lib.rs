//! Locates RADS releases on disk and extracts their files.
//!
//! A RADS installation is laid out as follows:
//!
//! ```text
//! RADS/
//! ├── projects/<project>/
//! │   ├── releases/<version>/releasemanifest
//! │   └── filearchives/<version>/Archive_1.raf
//! │                              Archive_1.raf.dat
//! └── solutions/<solution>/releases/<version>/
//!     ├── configurationmanifest
//!     ├── solutionmanifest
//!     └── deploy/
//! ```
//!
//! A [`Project`] pairs a project release manifest with the archives holding its files. Every file of a release
//! names the version that last changed it, and that version picks the archive to read the payload from.
//!
//! ```no_run
//! # fn doit() -> rads_project::error::Result<()>
//! # {
//! use rads_project::{ExtractOptions, RadsLayout};
//!
//! let (layout, version) = RadsLayout::from_deploy_dir("RADS/solutions/lol_game_client_sln/releases/0.0.1.155/deploy")?;
//! let solution = layout.open_solution("lol_game_client_sln", version)?;
//! let configuration = layout.open_configuration("lol_game_client_sln", version)?;
//!
//! for entry in layout.select_projects(&solution, &configuration)? {
//!     let mut project = layout.open_project(&entry.name, entry.version.parse()?)?;
//!     project.extract_all("out", ExtractOptions::default())?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod layout;
pub mod project;

pub use cache::{ArchiveCache, ArchiveKey};
pub use layout::RadsLayout;
pub use project::{ExtractOptions, Project};
