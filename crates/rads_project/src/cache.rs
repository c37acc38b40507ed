//! Decoded archive indexes, kept for the lifetime of a [`crate::Project`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rads_formats::{RafArchive, Version};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Identifies the archive holding the files a project release changed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveKey {
    /// Project name
    pub project: String,
    /// Release version of the archive
    pub version: Version,
}

impl ArchiveKey {
    pub fn new(project: impl Into<String>, version: Version) -> Self {
        Self {
            project: project.into(),
            version,
        }
    }
}

impl fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.project, self.version)
    }
}

/// Archive indexes decoded so far, by key
///
/// An index is decoded the first time it is asked for and never evicted. A failed decode stores nothing, so the
/// next request retries it.
#[derive(Debug, Default)]
pub struct ArchiveCache {
    archives: HashMap<ArchiveKey, RafArchive>,
}

impl ArchiveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the archive for `key`, decoding the index at `index_path` if it is not cached yet
    #[instrument(skip_all, fields(key = %key), err)]
    pub fn get_or_load(&mut self, key: ArchiveKey, index_path: &Path) -> Result<&RafArchive> {
        match self.archives.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let file = File::open(index_path).map_err(|source| Error::Open {
                    path: index_path.to_path_buf(),
                    source,
                })?;
                let archive = RafArchive::new(BufReader::new(file))?;
                debug!(entries = archive.len(), path = %index_path.display(), "decoded archive index");
                Ok(entry.insert(archive))
            }
        }
    }

    /// Get the archive for `key` if it has been decoded
    pub fn get(&self, key: &ArchiveKey) -> Option<&RafArchive> {
        self.archives.get(key)
    }

    /// Whether the archive for `key` has been decoded
    pub fn contains(&self, key: &ArchiveKey) -> bool {
        self.archives.contains_key(key)
    }

    /// Number of decoded archives
    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rads_formats::Version;

    use crate::cache::{ArchiveCache, ArchiveKey};
    use crate::error::{Error, Result};

    fn archives() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("resources/RADS/projects/lol_game_client/filearchives")
    }

    #[test]
    fn load_once_per_key() -> Result<()> {
        let mut cache = ArchiveCache::new();
        let key = ArchiveKey::new("lol_game_client", Version::new(0, 0, 0, 25));
        let path = archives().join("0.0.0.25/Archive_1.raf");

        let first: Vec<String> = cache.get_or_load(key.clone(), &path)?.file_names().map(String::from).collect();
        assert!(cache.contains(&key));

        // a cached key never touches the path again
        let second: Vec<String> = cache
            .get_or_load(key.clone(), &archives().join("missing"))?
            .file_names()
            .map(String::from)
            .collect();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        Ok(())
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache = ArchiveCache::new();
        let key = ArchiveKey::new("lol_game_client", Version::new(0, 0, 0, 1));

        let result = cache.get_or_load(key.clone(), &archives().join("0.0.0.1/Archive_1.raf"));
        assert!(matches!(result, Err(Error::Open { .. })));
        assert!(!cache.contains(&key));
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_are_per_project_and_version() -> Result<()> {
        let mut cache = ArchiveCache::new();
        let old = ArchiveKey::new("lol_game_client", Version::new(0, 0, 0, 24));
        let new = ArchiveKey::new("lol_game_client", Version::new(0, 0, 0, 25));

        cache.get_or_load(old.clone(), &archives().join("0.0.0.24/Archive_1.raf"))?;
        cache.get_or_load(new.clone(), &archives().join("0.0.0.25/Archive_1.raf"))?;

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&old).map(|a| a.len()), Some(2));
        assert_eq!(cache.get(&new).map(|a| a.len()), Some(4));
        assert_eq!(old.to_string(), "lol_game_client@0.0.0.24");

        Ok(())
    }
}
