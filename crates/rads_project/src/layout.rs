//! Paths of the manifests and archives of a RADS installation.

use std::path::{Path, PathBuf};

use rads_formats::Version;
use rads_solution::solution::ProjectEntry;
use rads_solution::{ConfigurationManifest, SolutionManifest};
use tracing::{debug, instrument};

use crate::error::{Error, NotFoundError, Result};
use crate::project::Project;

/// File name of the archive index inside a `filearchives/<version>` directory
pub const ARCHIVE_NAME: &str = "Archive_1.raf";

/// File name of the release manifest of a project release
pub const RELEASE_MANIFEST: &str = "releasemanifest";

/// File name of the configuration manifest of a solution release
pub const CONFIGURATION_MANIFEST: &str = "configurationmanifest";

/// File name of the solution manifest of a solution release
pub const SOLUTION_MANIFEST: &str = "solutionmanifest";

/// Path of the archive index of `version` inside a project directory
pub(crate) fn project_archive_path(project_dir: &Path, version: Version) -> PathBuf {
    project_dir
        .join("filearchives")
        .join(version.to_string())
        .join(ARCHIVE_NAME)
}

/// The root directory of a RADS installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadsLayout {
    root: PathBuf,
}

impl RadsLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the installation a solution is deployed from
    ///
    /// `dir` is the `solutions/<solution>/releases/<version>/deploy` directory of a solution release. Returns the
    /// layout and the release version of the solution.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()), err)]
    pub fn from_deploy_dir(dir: impl AsRef<Path>) -> Result<(Self, Version)> {
        let dir = dir.as_ref();
        let dir = dir.canonicalize().map_err(|source| Error::Open {
            path: dir.to_path_buf(),
            source,
        })?;

        let layout_error = |reason| Error::Layout {
            path: dir.clone(),
            reason,
        };

        let component = |n: usize| dir.ancestors().nth(n).and_then(Path::file_name);
        if component(2).map_or(true, |name| name != "releases") {
            return Err(layout_error("missing releases directory"));
        }
        if component(4).map_or(true, |name| name != "solutions") {
            return Err(layout_error("missing solutions directory"));
        }

        let version = component(1)
            .and_then(|name| name.to_str())
            .ok_or_else(|| layout_error("missing release version directory"))?
            .parse::<Version>()?;

        let root = dir
            .ancestors()
            .nth(5)
            .ok_or_else(|| layout_error("missing root directory"))?;

        debug!(root = %root.display(), %version, "found RADS installation");
        Ok((Self::new(root), version))
    }

    /// The installation's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/solutions/<name>/releases/<version>`
    pub fn solution_path(&self, name: &str, version: Version) -> PathBuf {
        self.root
            .join("solutions")
            .join(name)
            .join("releases")
            .join(version.to_string())
    }

    /// `<root>/projects/<name>/releases/<version>`
    pub fn project_path(&self, name: &str, version: Version) -> PathBuf {
        self.root
            .join("projects")
            .join(name)
            .join("releases")
            .join(version.to_string())
    }

    /// `<root>/projects/<project>/filearchives/<version>/Archive_1.raf`
    pub fn archive_path(&self, project: &str, version: Version) -> PathBuf {
        project_archive_path(&self.root.join("projects").join(project), version)
    }

    pub fn release_manifest_path(&self, project: &str, version: Version) -> PathBuf {
        self.project_path(project, version).join(RELEASE_MANIFEST)
    }

    pub fn configuration_manifest_path(&self, solution: &str, version: Version) -> PathBuf {
        self.solution_path(solution, version).join(CONFIGURATION_MANIFEST)
    }

    pub fn solution_manifest_path(&self, solution: &str, version: Version) -> PathBuf {
        self.solution_path(solution, version).join(SOLUTION_MANIFEST)
    }

    /// Read the configuration manifest of a solution release
    pub fn open_configuration(&self, solution: &str, version: Version) -> Result<ConfigurationManifest> {
        let path = self.configuration_manifest_path(solution, version);
        Ok(ConfigurationManifest::open(path)?)
    }

    /// Read the solution manifest of a solution release
    pub fn open_solution(&self, solution: &str, version: Version) -> Result<SolutionManifest> {
        let path = self.solution_manifest_path(solution, version);
        Ok(SolutionManifest::open(path)?)
    }

    /// Open a project release for extraction
    pub fn open_project(&self, project: &str, version: Version) -> Result<Project> {
        Project::open(self.release_manifest_path(project, version))
    }

    /// The project releases installed for the configuration's locale
    pub fn select_projects<'a>(
        &self,
        solution: &'a SolutionManifest,
        configuration: &ConfigurationManifest,
    ) -> Result<Vec<&'a ProjectEntry>> {
        solution
            .projects_for(configuration.locale())
            .ok_or_else(|| NotFoundError::Configuration(configuration.locale().to_owned()).into())
    }
}
