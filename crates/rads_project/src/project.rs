//! Extraction of files from the archives of a project release.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use bon::Builder;
use rads_formats::archive::data_path;
use rads_formats::{Compression, ReleaseManifest, Version};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::cache::{ArchiveCache, ArchiveKey};
use crate::error::{Error, NotFoundError, Result};
use crate::layout::project_archive_path;

/// Options for how files are extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct ExtractOptions {
    /// Inflate payloads the release manifest marks as compressed
    #[builder(default = true)]
    pub decompress: bool,

    /// Replace files that already exist at the destination
    #[builder(default = true)]
    pub overwrite: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A project release and the archives holding its files
///
/// Archive indexes are decoded on first use and kept until the project is dropped.
#[derive(Debug)]
pub struct Project {
    name: String,
    directory: PathBuf,
    manifest: ReleaseManifest,
    archives: ArchiveCache,
}

impl Project {
    /// Open the project release whose manifest is at `manifest_path`
    ///
    /// The manifest must sit in `<project>/releases/<version>/`, the archives are looked up in
    /// `<project>/filearchives/`.
    #[instrument(skip_all, fields(path = %manifest_path.as_ref().display()), err)]
    pub fn open(manifest_path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = manifest_path.as_ref();
        let file = File::open(manifest_path).map_err(|source| Error::Open {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let manifest = ReleaseManifest::new(BufReader::new(file))?.with_path(manifest_path);

        Self::from_manifest(manifest)
    }

    /// Build a project from a manifest that knows where it was read from
    ///
    /// The project directory and name are taken from [`ReleaseManifest::path`].
    pub fn from_manifest(manifest: ReleaseManifest) -> Result<Self> {
        let manifest_path = manifest.path().ok_or_else(|| Error::Layout {
            path: PathBuf::new(),
            reason: "release manifest was not read from a file",
        })?;
        let layout_error = |reason| Error::Layout {
            path: manifest_path.to_path_buf(),
            reason,
        };

        let directory = manifest_path
            .ancestors()
            .nth(3)
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| layout_error("release manifest is not inside a project directory"))?
            .to_path_buf();
        let name = directory
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| layout_error("project directory has no name"))?
            .to_owned();

        debug!(project = %name, version = %manifest.version(), files = manifest.file_count(), "opened project");
        Ok(Self {
            name,
            directory,
            manifest,
            archives: ArchiveCache::new(),
        })
    }

    /// The project name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project directory, holding `releases/` and `filearchives/`
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The release version of the manifest
    pub fn version(&self) -> Version {
        self.manifest.version()
    }

    /// The release manifest
    pub fn manifest(&self) -> &ReleaseManifest {
        &self.manifest
    }

    /// The archives decoded so far
    pub fn archives(&self) -> &ArchiveCache {
        &self.archives
    }

    /// Path of the archive index holding the files changed by `version`
    pub fn archive_path(&self, version: Version) -> PathBuf {
        project_archive_path(&self.directory, version)
    }

    /// Paths of every file in the release, in listing order
    pub fn list_files(&self) -> Vec<&str> {
        self.manifest.list_files()
    }

    /// Write the contents of the file at `path` to `writer`, returning the number of bytes written
    #[instrument(skip(self, writer), fields(project = %self.name), err)]
    pub fn copy_to<W: Write>(&mut self, path: &str, writer: &mut W, options: ExtractOptions) -> Result<u64> {
        let file = self
            .manifest
            .by_path(path)
            .ok_or_else(|| NotFoundError::Path(path.to_owned()))?;

        let index_path = project_archive_path(&self.directory, file.version);
        let archive = self
            .archives
            .get_or_load(ArchiveKey::new(&self.name, file.version), &index_path)?;
        let entry = archive
            .by_name(path)
            .map_err(|_| NotFoundError::ArchiveEntry {
                path: path.to_owned(),
                archive: index_path.clone(),
            })?;

        let compression = if options.decompress {
            file.flags.compression()
        } else {
            Compression::None
        };

        let payload_path = data_path(&index_path);
        let mut payload = BufReader::new(File::open(&payload_path).map_err(|source| Error::Open {
            path: payload_path.clone(),
            source,
        })?);
        let data = entry.open_payload(&mut payload, compression)?.read_all()?;

        if compression == Compression::Zlib && data.len() as u64 != file.size as u64 {
            warn!(
                path,
                expected = file.size,
                found = data.len(),
                "inflated size differs from the release manifest"
            );
        }

        writer.write_all(&data)?;
        Ok(data.len() as u64)
    }

    /// Read the contents of the file at `path`
    pub fn read(&mut self, path: &str, options: ExtractOptions) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.copy_to(path, &mut data, options)?;
        Ok(data)
    }

    /// Extract the file at `path` to `destination`, inflating compressed payloads
    pub fn extract(&mut self, path: &str, destination: impl AsRef<Path>) -> Result<u64> {
        self.extract_with(path, destination, ExtractOptions::default())
    }

    /// Extract the file at `path` to `destination`
    ///
    /// The contents are written to a temporary file next to `destination` which then replaces it, so
    /// `destination` never holds a partially written file.
    pub fn extract_with(
        &mut self,
        path: &str,
        destination: impl AsRef<Path>,
        options: ExtractOptions,
    ) -> Result<u64> {
        let destination = destination.as_ref();
        let data = self.read(path, options)?;
        write_atomic(destination, &data, options.overwrite)?;
        Ok(data.len() as u64)
    }

    /// Extract every file of the release below `directory`, returning the number of files extracted
    ///
    /// Stops at the first failure.
    #[instrument(skip_all, fields(project = %self.name, directory = %directory.as_ref().display()), err)]
    pub fn extract_all(&mut self, directory: impl AsRef<Path>, options: ExtractOptions) -> Result<usize> {
        let directory = directory.as_ref();
        let paths: Vec<String> = self.list_files().into_iter().map(String::from).collect();

        for path in &paths {
            let destination = directory.join(path);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|source| Error::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            let size = self.extract_with(path, &destination, options)?;
            info!("extracted {path} ({size} bytes)");
        }

        Ok(paths.len())
    }
}

/// Replace `destination` with `data` through a temporary file in the same directory
fn write_atomic(destination: &Path, data: &[u8], overwrite: bool) -> Result<()> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error = |source| Error::Write {
        path: destination.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(directory).map_err(write_error)?;
    temp.write_all(data).map_err(write_error)?;

    let persisted = if overwrite {
        temp.persist(destination)
    } else {
        temp.persist_noclobber(destination)
    };
    persisted.map_err(|e| write_error(e.error))?;

    Ok(())
}
