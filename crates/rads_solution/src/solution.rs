//! The solution manifest, listing every project release of a solution and the configurations combining them.

use std::{fmt, fs, path::Path, str::FromStr};

use tracing::{debug, instrument, warn};

use crate::configuration::FILE_VERSION;
use crate::error::{Error, Result};
use crate::lines::Lines;

/// Header line of every solution manifest
pub const SOLUTION_HEADER: &str = "RADS Solution Manifest";

/// A project release taking part in a solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    /// Project name, also its directory under `projects/`
    pub name: String,
    /// Release of the project, in dotted form
    pub version: String,
    /// Install priority
    pub priority: u32,
    /// Project flags
    pub flags: u32,
}

/// A named selection of projects, usually one per locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Configuration name
    pub name: String,
    /// Configuration flags
    pub flags: u32,
    /// Names of the selected projects
    pub projects: Vec<String>,
}

/// A parsed `solutionmanifest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionManifest {
    name: String,
    version: String,
    projects: Vec<ProjectEntry>,
    configurations: Vec<Configuration>,
}

impl SolutionManifest {
    /// Parse a solution manifest from its text
    #[instrument(skip_all, err)]
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = Lines::new(text);

        lines.header(SOLUTION_HEADER)?;
        lines.header(FILE_VERSION)?;
        let name = lines.field("solution name")?.to_owned();
        let version = lines.field("solution version")?.to_owned();

        let project_count = lines.number("project count")?;
        let mut projects = Vec::new();
        for _ in 0..project_count {
            projects.push(ProjectEntry {
                name: lines.field("project name")?.to_owned(),
                version: lines.field("project version")?.to_owned(),
                priority: lines.number("project priority")?,
                flags: lines.number("project flags")?,
            });
        }

        let configuration_count = lines.number("configuration count")?;
        let mut configurations = Vec::new();
        for _ in 0..configuration_count {
            let name = lines.field("configuration name")?.to_owned();
            let flags = lines.number("configuration flags")?;
            let count = lines.number("configuration project count")?;
            let projects = (0..count)
                .map(|_| lines.field("configuration project").map(str::to_owned))
                .collect::<Result<Vec<_>>>()?;
            configurations.push(Configuration { name, flags, projects });
        }

        debug!(
            %name,
            %version,
            projects = projects.len(),
            configurations = configurations.len(),
            "read solution manifest"
        );
        Ok(Self {
            name,
            version,
            projects,
            configurations,
        })
    }

    /// Read and parse the solution manifest at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// The solution name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The solution version, in dotted form
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Every project release of the solution
    pub fn projects(&self) -> &[ProjectEntry] {
        &self.projects
    }

    /// Every configuration of the solution
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Find a project release by name
    pub fn project(&self, name: &str) -> Option<&ProjectEntry> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Find a configuration by name
    pub fn configuration(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// The project releases selected by a configuration, in solution order
    ///
    /// Projects named by the configuration but missing from the solution are skipped.
    pub fn projects_for(&self, configuration: &str) -> Option<Vec<&ProjectEntry>> {
        let configuration = self.configuration(configuration)?;

        for name in &configuration.projects {
            if self.project(name).is_none() {
                warn!(
                    configuration = %configuration.name,
                    project = %name,
                    "project is not part of the solution"
                );
            }
        }

        Some(
            self.projects
                .iter()
                .filter(|project| configuration.projects.contains(&project.name))
                .collect(),
        )
    }
}

impl FromStr for SolutionManifest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SolutionManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solution(name={}, version={}, projects_nb={}, configurations_nb={})",
            self.name,
            self.version,
            self.projects.len(),
            self.configurations.len()
        )
    }
}

impl fmt::Display for ProjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Project(name={}, version={}, priority={}, flags={})",
            self.name, self.version, self.priority, self.flags
        )
    }
}
