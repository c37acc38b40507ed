//! # RADS Text Manifest Documentation
//!
//! This crate reads the line based manifests that select which project releases make up a RADS solution.
//! Every value sits on its own line; surrounding whitespace is ignored except for the two header lines, which
//! have to match exactly.
//!
//! ## Configuration Manifest
//!
//! Stored as `solutions/<solution>/releases/<version>/configurationmanifest`.
//!
//! | Line           | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 1              | Header                 | `RADS Configuration Manifest`                              |
//! | 2              | File Version           | `1.0.0.0`                                                  |
//! | 3              | Locale                 | Locale of the installation, such as `en_gb`                |
//! | 4              | Project Count          | Number of project lines that follow                        |
//! | 5..            | Projects               | One project name per line                                  |
//!
//! ## Solution Manifest
//!
//! Stored as `solutions/<solution>/releases/<version>/solutionmanifest`.
//!
//! | Line           | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 1              | Header                 | `RADS Solution Manifest`                                   |
//! | 2              | File Version           | `1.0.0.0`                                                  |
//! | 3              | Name                   | Solution name                                              |
//! | 4              | Version                | Solution version                                           |
//! | 5              | Project Count          | Number of project blocks that follow                       |
//!
//! Each project block holds four lines: name, version, priority and flags. The project blocks are followed by a
//! configuration count and that many configuration blocks: name, flags, a project count and the project names.
//!

pub mod configuration;
pub mod error;
mod lines;
pub mod solution;

pub use configuration::ConfigurationManifest;
pub use solution::SolutionManifest;
