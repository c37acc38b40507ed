//! Types for reading RAF archives
//!

use binrw::BinRead;
use indexmap::{map::Entry, IndexMap};
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    compression::{Compression, PayloadReader},
    error::{Error, FileNotFoundError, Result},
    hash::hash_path,
    types::{ArchiveHeader, ArchiveTables, PathSpan, ARCHIVE_MAGIC},
    version::Version,
};

/// Size of the path table header, the byte size and the path count
const PATH_TABLE_HEADER: u64 = 2 * 4;

/// Size of one `(offset, length)` pair of the path table
const PATH_SPAN_SIZE: u64 = 2 * 4;

/// Structure representing a RAF archive entry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RafEntry {
    /// Path of the file, matching the paths of the release manifest
    pub path: Box<str>,
    /// [`hash_path`] of `path`
    pub path_hash: u32,
    /// Offset of the payload in the `.dat` file
    pub data_offset: u32,
    /// Size of the payload in the `.dat` file
    pub data_size: u32,
    /// Index of the path in the path table
    pub path_index: u32,
}

impl RafEntry {
    /// Get a reader over this entry's payload in the `.dat` file read by `reader`
    pub fn open_payload<'a, R: Read + Seek>(
        &self,
        reader: &'a mut R,
        compression: Compression,
    ) -> Result<PayloadReader<'a, R>> {
        PayloadReader::new(
            reader,
            self.data_offset as u64,
            self.data_size as u64,
            compression,
        )
    }
}

/// Resolve the path described by `span` in the path strings of an archive
///
/// Span offsets count from the start of the path table, so the table header and the `table_count` spans are
/// skipped to land in `strings`. One NUL terminator is dropped.
pub fn resolve_path(strings: &[u8], table_count: u32, span: PathSpan) -> Result<&str> {
    let skipped = PATH_TABLE_HEADER + PATH_SPAN_SIZE * table_count as u64;
    let start = (span.offset as u64).checked_sub(skipped).ok_or_else(|| {
        Error::malformed(
            "path_offset",
            format!("offset {} points inside the path table header", span.offset),
        )
    })?;

    let end = start + span.length as u64;
    if end > strings.len() as u64 {
        return Err(Error::malformed(
            "path_length",
            format!(
                "path {start}..{end} ends past the {} bytes of path strings",
                strings.len()
            ),
        ));
    }

    let raw = &strings[start as usize..end as usize];
    let raw = raw.strip_suffix(b"\0").unwrap_or(raw);
    if !raw.is_ascii() {
        return Err(Error::malformed(
            "path_offset",
            format!("path at {start} is not ascii: {:?}", String::from_utf8_lossy(raw)),
        ));
    }

    // ascii is always valid utf-8
    std::str::from_utf8(raw).map_err(|e| Error::malformed("path_offset", e.to_string()))
}

/// Location of the `.dat` payload file of the archive index at `index_path`
pub fn data_path(index_path: impl AsRef<Path>) -> PathBuf {
    let mut path = index_path.as_ref().as_os_str().to_owned();
    path.push(".dat");
    PathBuf::from(path)
}

/// RAF archive index reader
///
/// Every entry's path is checked against its stored hash while reading, so a successfully read archive is
/// consistent with its own path table.
///
/// ```no_run
/// use std::{fs::File, io::BufReader};
///
/// fn read_config(index: &std::path::Path) -> rads_formats::error::Result<Vec<u8>> {
///     let archive = rads_formats::RafArchive::open(index)?;
///     let entry = archive.by_name("DATA/CFG/defaults/Input.ini")?;
///
///     let mut dat = BufReader::new(File::open(rads_formats::archive::data_path(index))?);
///     entry
///         .open_payload(&mut dat, rads_formats::Compression::Zlib)?
///         .read_all()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RafArchive {
    header: ArchiveHeader,
    entries: IndexMap<Box<str>, RafEntry>,
}

impl RafArchive {
    /// Read a RAF archive index, resolving and verifying the path of every entry.
    #[instrument(skip(reader), err)]
    pub fn new<R: Read + Seek>(mut reader: R) -> Result<RafArchive> {
        let header = ArchiveHeader::read(&mut reader)
            .map_err(|e| Error::from_header(e, &mut reader, "raf archive", ARCHIVE_MAGIC))?;
        let tables =
            ArchiveTables::read(&mut reader).map_err(|e| Error::from_table(e, "archive_tables"))?;

        let mut strings = Vec::new();
        reader.read_to_end(&mut strings)?;

        debug!(
            version = %header.version,
            entries = tables.entries.len(),
            paths = tables.paths.len(),
            "read raf archive tables"
        );

        let mut entries = IndexMap::with_capacity(tables.entries.len());
        for record in &tables.entries {
            let span = tables
                .paths
                .get(record.path_index as usize)
                .copied()
                .ok_or_else(|| {
                    Error::malformed(
                        "path_index",
                        format!(
                            "{} is out of range, the path table holds {} paths",
                            record.path_index,
                            tables.paths.len()
                        ),
                    )
                })?;

            let path = resolve_path(&strings, tables.paths_count, span)?;
            let computed = hash_path(path);
            if computed != record.path_hash {
                return Err(Error::HashMismatch {
                    path: path.to_owned(),
                    computed,
                    stored: record.path_hash,
                });
            }

            match entries.entry(Box::<str>::from(path)) {
                Entry::Occupied(_) => warn!(path, "path is listed more than once"),
                Entry::Vacant(slot) => {
                    slot.insert(RafEntry {
                        path: path.into(),
                        path_hash: record.path_hash,
                        data_offset: record.data_offset,
                        data_size: record.data_size,
                        path_index: record.path_index,
                    });
                }
            }
        }

        Ok(RafArchive { header, entries })
    }

    /// Open and read the RAF archive index at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<RafArchive> {
        Self::new(BufReader::new(File::open(path)?))
    }

    /// The archive header
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// The archive version
    pub fn version(&self) -> Version {
        self.header.version
    }

    /// The index of the archive manager
    pub fn manager_index(&self) -> u32 {
        self.header.manager_index
    }

    /// Number of entries contained in this archive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the entries in table order
    pub fn entries(&self) -> impl Iterator<Item = &RafEntry> {
        self.entries.values()
    }

    /// Returns an iterator over all the paths in this archive.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_ref())
    }

    /// Get the index of an entry by path, if it's present.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Search for an entry by path
    pub fn by_name(&self, name: &str) -> Result<&RafEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::FileNotFound(FileNotFoundError::Name(name.to_owned())))
    }

    /// Get an entry by index
    pub fn by_index(&self, index: usize) -> Result<&RafEntry> {
        self.entries
            .get_index(index)
            .map(|(_, entry)| entry)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(index)))
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use crate::archive::{data_path, resolve_path, RafArchive};
    use crate::compression::Compression;
    use crate::error::{Error, FileNotFoundError, Result};
    use crate::hash::hash_path;
    use crate::types::PathSpan;
    use crate::version::Version;

    fn u32s(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Build an index holding `paths`, with one entry `(path index, data offset, data size)` per record.
    fn archive(paths: &[&str], records: &[(u32, u32, u32)]) -> Vec<u8> {
        #[rustfmt::skip]
        let mut data = vec![
            0xF0, 0x0E, 0xBE, 0x18,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        data.extend(u32s(&[records.len() as u32]));
        for &(path_index, data_offset, data_size) in records {
            let hash = hash_path(paths[path_index as usize]);
            data.extend(u32s(&[hash, data_offset, data_size, path_index]));
        }

        let mut offset = 8 + 8 * paths.len() as u32;
        let mut spans = Vec::new();
        let mut strings = Vec::new();
        for path in paths {
            let length = path.len() as u32 + 1;
            spans.extend(u32s(&[offset, length]));
            strings.extend_from_slice(path.as_bytes());
            strings.push(0);
            offset += length;
        }

        data.extend(u32s(&[offset, paths.len() as u32]));
        data.extend(spans);
        data.extend(strings);
        data
    }

    #[test]
    fn read_invalid_magic() {
        let mut input = archive(&["a.txt"], &[(0, 0, 1)]);
        input[0] = 0x00;

        assert!(matches!(
            RafArchive::new(Cursor::new(input)),
            Err(Error::HeaderMismatch {
                format: "raf archive",
                ref expected,
                ref found,
            }) if expected == "b\"\\xf0\\x0e\\xbe\\x18\"" && found == "b\"\\x00\\x0e\\xbe\\x18\""
        ));
    }

    #[test]
    fn read_truncated_entry_table() {
        let mut input = archive(&["a.txt"], &[(0, 0, 1)]);
        input.truncate(30);

        assert!(matches!(
            RafArchive::new(Cursor::new(input)),
            Err(Error::MalformedField {
                field: "archive_tables",
                ..
            })
        ));
    }

    #[test]
    fn read_empty_archive() -> Result<()> {
        let archive = RafArchive::new(Cursor::new(archive(&[], &[])))?;

        assert!(archive.is_empty());
        assert_eq!(archive.version(), Version::new(0, 0, 0, 1));

        Ok(())
    }

    #[test]
    fn read_archive_with_entries() -> Result<()> {
        let input = archive(
            &["DATA/cfg.ini", "a.txt"],
            &[(1, 0, 11), (0, 100, 20)],
        );

        let archive = RafArchive::new(Cursor::new(input))?;
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["a.txt", "DATA/cfg.ini"]);

        let entry = archive.by_name("DATA/cfg.ini")?;
        assert_eq!(entry.path_hash, 0x0F62_EC19);
        assert_eq!(entry.data_offset, 100);
        assert_eq!(entry.data_size, 20);
        assert_eq!(entry.path_index, 0);
        assert_eq!(archive.index_for_name("DATA/cfg.ini"), Some(1));
        assert_eq!(archive.by_index(0)?.path.as_ref(), "a.txt");

        Ok(())
    }

    #[test]
    fn read_flipped_hash_bit() {
        let mut input = archive(&["DATA/cfg.ini"], &[(0, 100, 20)]);
        // first byte of the only entry record's hash
        input[24] ^= 0x01;

        match RafArchive::new(Cursor::new(input)) {
            Err(Error::HashMismatch {
                path,
                computed,
                stored,
            }) => {
                assert_eq!(path, "DATA/cfg.ini");
                assert_eq!(computed, 0x0F62_EC19);
                assert_eq!(stored, 0x0F62_EC18);
            }
            other => panic!("expected a hash mismatch, got {other:?}"),
        }
    }

    #[test]
    fn read_path_index_out_of_range() {
        let mut input = archive(&["a.txt"], &[(0, 0, 1)]);
        // path index of the only entry record
        input[36] = 0x05;

        assert!(matches!(
            RafArchive::new(Cursor::new(input)),
            Err(Error::MalformedField {
                field: "path_index",
                ..
            })
        ));
    }

    #[test]
    fn read_duplicate_paths_keeps_first() -> Result<()> {
        let input = archive(&["a.txt"], &[(0, 0, 1), (0, 50, 2)]);

        let archive = RafArchive::new(Cursor::new(input))?;
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_name("a.txt")?.data_offset, 0);

        Ok(())
    }

    #[test]
    fn read_missing_entry() -> Result<()> {
        let archive = RafArchive::new(Cursor::new(archive(&["a.txt"], &[(0, 0, 1)])))?;

        assert!(matches!(
            archive.by_name("b.txt"),
            Err(Error::FileNotFound(FileNotFoundError::Name(name))) if name == "b.txt"
        ));
        assert!(matches!(
            archive.by_index(3),
            Err(Error::FileNotFound(FileNotFoundError::Index(3)))
        ));

        Ok(())
    }

    #[test]
    fn read_entry_payload_verbatim() -> Result<()> {
        let archive = RafArchive::new(Cursor::new(archive(&["DATA/cfg.ini"], &[(0, 100, 20)])))?;
        let entry = archive.by_name("DATA/cfg.ini")?;

        let mut dat = Cursor::new((0..=255u8).collect::<Vec<_>>());
        let payload = entry.open_payload(&mut dat, Compression::None)?.read_all()?;

        assert_eq!(payload, (100..120u8).collect::<Vec<_>>());

        Ok(())
    }

    #[test]
    fn resolve_path_skips_table_header() -> Result<()> {
        // two spans: header is 8 + 2 * 8 = 24 bytes
        let strings = b"a.txt\0DATA/cfg.ini\0";

        let first = PathSpan {
            offset: 24,
            length: 6,
        };
        let second = PathSpan {
            offset: 30,
            length: 13,
        };

        assert_eq!(resolve_path(strings, 2, first)?, "a.txt");
        assert_eq!(resolve_path(strings, 2, second)?, "DATA/cfg.ini");

        Ok(())
    }

    #[test]
    fn resolve_path_without_terminator() -> Result<()> {
        let span = PathSpan {
            offset: 16,
            length: 5,
        };

        assert_eq!(resolve_path(b"a.txt", 1, span)?, "a.txt");

        Ok(())
    }

    #[test]
    fn resolve_path_out_of_bounds() {
        let strings = b"a.txt\0";

        let before = PathSpan {
            offset: 4,
            length: 6,
        };
        let after = PathSpan {
            offset: 16,
            length: 7,
        };

        assert!(matches!(
            resolve_path(strings, 1, before),
            Err(Error::MalformedField {
                field: "path_offset",
                ..
            })
        ));
        assert!(matches!(
            resolve_path(strings, 1, after),
            Err(Error::MalformedField {
                field: "path_length",
                ..
            })
        ));
    }

    #[test]
    fn data_path_appends_suffix() {
        assert_eq!(
            data_path(Path::new("filearchives/0.0.0.25/Archive_1.raf")),
            Path::new("filearchives/0.0.0.25/Archive_1.raf.dat")
        );
    }
}
