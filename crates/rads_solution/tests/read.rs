use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rads_solution::error::{Error, Result};
use rads_solution::{ConfigurationManifest, SolutionManifest};
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("resources")
        .join(name)
}

#[test]
#[traced_test]
fn read_configuration_manifest() -> Result<()> {
    let manifest = ConfigurationManifest::open(resource("configurationmanifest"))?;

    assert_eq!(manifest.locale(), "en_gb");
    assert_eq!(manifest.projects(), ["lol_game_client", "lol_game_client_en_gb"]);

    Ok(())
}

#[test]
#[traced_test]
fn read_solution_manifest() -> Result<()> {
    let manifest = SolutionManifest::open(resource("solutionmanifest"))?;

    assert_eq!(manifest.name(), "lol_game_client_sln");
    assert_eq!(manifest.version(), "0.0.1.155");

    let projects: Vec<_> = manifest
        .projects()
        .iter()
        .map(|p| (p.name.as_str(), p.version.as_str(), p.priority))
        .collect();
    assert_eq!(
        projects,
        [
            ("lol_game_client", "0.0.0.25", 10),
            ("lol_game_client_en_gb", "0.0.0.12", 20),
            ("lol_game_client_fr_fr", "0.0.0.11", 20),
        ]
    );

    let configurations: Vec<_> = manifest.configurations().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(configurations, ["en_gb", "fr_fr"]);

    Ok(())
}

#[test]
fn configuration_selects_solution_projects() -> Result<()> {
    let configuration = ConfigurationManifest::open(resource("configurationmanifest"))?;
    let solution = SolutionManifest::open(resource("solutionmanifest"))?;

    let selected: Vec<_> = solution
        .projects_for(configuration.locale())
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(selected, configuration.projects());

    Ok(())
}

#[test]
fn manifests_are_not_interchangeable() {
    assert!(matches!(
        SolutionManifest::open(resource("configurationmanifest")),
        Err(Error::HeaderMismatch { line: 1, .. })
    ));
    assert!(matches!(
        ConfigurationManifest::open(resource("solutionmanifest")),
        Err(Error::HeaderMismatch { line: 1, .. })
    ));
}

#[test]
fn missing_manifest_is_an_io_error() {
    assert!(matches!(
        SolutionManifest::open(resource("missing")),
        Err(Error::IOError(_))
    ));
}
