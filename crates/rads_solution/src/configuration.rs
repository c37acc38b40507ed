//! The configuration manifest, naming the projects installed for a locale.

use std::{fmt, fs, path::Path, str::FromStr};

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::lines::Lines;

/// Header line of every configuration manifest
pub const CONFIGURATION_HEADER: &str = "RADS Configuration Manifest";

/// The only supported file version
pub const FILE_VERSION: &str = "1.0.0.0";

/// A parsed `configurationmanifest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationManifest {
    locale: String,
    projects: Vec<String>,
}

impl ConfigurationManifest {
    /// Parse a configuration manifest from its text
    #[instrument(skip_all, err)]
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = Lines::new(text);

        lines.header(CONFIGURATION_HEADER)?;
        lines.header(FILE_VERSION)?;
        let locale = lines.field("locale")?.to_owned();

        let count = lines.number("project count")?;
        let projects = (0..count)
            .map(|_| lines.field("project name").map(str::to_owned))
            .collect::<Result<Vec<_>>>()?;

        debug!(%locale, projects = projects.len(), "read configuration manifest");
        Ok(Self { locale, projects })
    }

    /// Read and parse the configuration manifest at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// The locale of the installation
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The names of the installed projects, in manifest order
    pub fn projects(&self) -> &[String] {
        &self.projects
    }
}

impl FromStr for ConfigurationManifest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ConfigurationManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration(locale={}, projects_nb={})", self.locale, self.projects.len())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::configuration::ConfigurationManifest;
    use crate::error::{Error, Result};

    #[test]
    fn parse_configuration() -> Result<()> {
        let text = "RADS Configuration Manifest\n1.0.0.0\n  fr_fr \n2\nlol_game_client\r\nlol_game_client_fr_fr\n";

        let manifest: ConfigurationManifest = text.parse()?;
        assert_eq!(manifest.locale(), "fr_fr");
        assert_eq!(manifest.projects(), ["lol_game_client", "lol_game_client_fr_fr"]);
        assert_eq!(manifest.to_string(), "Configuration(locale=fr_fr, projects_nb=2)");

        Ok(())
    }

    #[test]
    fn parse_without_projects() -> Result<()> {
        let manifest = ConfigurationManifest::parse("RADS Configuration Manifest\n1.0.0.0\nen_gb\n0")?;
        assert!(manifest.projects().is_empty());

        Ok(())
    }

    #[test]
    fn reject_wrong_header() {
        let result = ConfigurationManifest::parse("RADS Solution Manifest\n1.0.0.0\nen_gb\n0\n");
        assert!(matches!(result, Err(Error::HeaderMismatch { line: 1, .. })));
    }

    #[test]
    fn reject_unknown_file_version() {
        let result = ConfigurationManifest::parse("RADS Configuration Manifest\n2.0.0.0\nen_gb\n0\n");
        assert!(matches!(
            result,
            Err(Error::HeaderMismatch { line: 2, expected: "1.0.0.0", .. })
        ));
    }

    #[test]
    fn reject_empty_locale() {
        let result = ConfigurationManifest::parse("RADS Configuration Manifest\n1.0.0.0\n   \n0\n");
        assert!(matches!(
            result,
            Err(Error::EmptyField { line: 3, field: "locale" })
        ));
    }

    #[test]
    fn reject_bad_project_count() {
        let result = ConfigurationManifest::parse("RADS Configuration Manifest\n1.0.0.0\nen_gb\ntwo\n");
        assert!(matches!(
            result,
            Err(Error::MalformedField { line: 4, field: "project count", found }) if found == "two"
        ));
    }

    #[test]
    fn reject_missing_projects() {
        let result = ConfigurationManifest::parse("RADS Configuration Manifest\n1.0.0.0\nen_gb\n3\nlol_game_client\n");
        assert!(matches!(
            result,
            Err(Error::EmptyField { line: 6, field: "project name" })
        ));
    }
}
