//! Types for reading release manifests
//!

use binrw::BinRead;
use std::{
    collections::HashMap,
    fmt::{self, Write as _},
    fs::File as FsFile,
    io::{BufReader, Read, Seek},
    ops::Range,
    path::{Path, PathBuf},
    slice,
};
use tracing::{debug, instrument, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    error::{Error, Result},
    types::{DirectoryRecord, FileFlags, FileRecord, ManifestHeader, ManifestTables, MANIFEST_MAGIC},
    version::Version,
};

/// A file listed by a release manifest
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct File {
    /// Name of the file
    pub name: String,
    /// Path of the file from the root of the release, using `/` as separator
    pub path: String,
    /// Version of the release holding the file's payload
    pub version: Version,
    /// Content hash
    pub hash: [u8; 16],
    /// File flags
    pub flags: FileFlags,
    /// Size of the file when extracted
    pub size: u32,
    /// Size of the file in the archive
    pub compressed_size: u32,
    /// Unknown, usually zero
    pub unknown: u32,
    /// File type
    pub kind: u16,
    /// Reserved
    pub reserved: [u8; 2],
}

impl File {
    fn from_record(record: &FileRecord, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            path: String::new(),
            version: record.version,
            hash: record.hash,
            flags: record.flags,
            size: record.size,
            compressed_size: record.compressed_size,
            unknown: record.unknown,
            kind: record.kind,
            reserved: record.reserved,
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File(name={}, version={}, size={}, csize={}, flags={})",
            self.name, self.version, self.size, self.compressed_size, self.flags.0
        )
    }
}

/// A directory listed by a release manifest, owning its subdirectories and files
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Directory {
    /// Name of the directory, empty for the root
    pub name: String,
    /// Path of the directory from the root of the release, ending with `/` except for the root
    pub path: String,
    /// Subdirectories in manifest order
    pub subdirs: Vec<Directory>,
    /// Files in manifest order
    pub files: Vec<File>,
}

impl Directory {
    /// Iterate over the files of this directory and all its subdirectories
    ///
    /// The directory's own files come first, then each subdirectory recursively.
    pub fn iter_files(&self) -> Files<'_> {
        Files {
            current: self.files.iter(),
            pending: vec![self.subdirs.iter()],
        }
    }

    /// Iterate over this directory and all its subdirectories, parents before children
    pub fn iter_directories(&self) -> Directories<'_> {
        Directories {
            root: Some(self),
            pending: Vec::new(),
        }
    }

    /// Paths of every file below this directory
    pub fn list_files(&self) -> Vec<&str> {
        self.iter_files().map(|f| f.path.as_str()).collect()
    }

    /// Render the tree below this directory, one entry per line
    pub fn pretty(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, indent);
        out.truncate(out.trim_end().len());
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        let _ = writeln!(out, "{}{}", "  ".repeat(indent), self);
        for file in &self.files {
            let _ = writeln!(out, "{}{}", "  ".repeat(indent + 1), file);
        }
        for dir in &self.subdirs {
            dir.write_pretty(out, indent + 1);
        }
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dir(name={}, subdirs_nb={}, files_nb={})",
            self.name,
            self.subdirs.len(),
            self.files.len()
        )
    }
}

/// Iterator over the files of a [`Directory`] tree
pub struct Files<'a> {
    current: slice::Iter<'a, File>,
    pending: Vec<slice::Iter<'a, Directory>>,
}

impl<'a> Iterator for Files<'a> {
    type Item = &'a File;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.current.next() {
                return Some(file);
            }

            let dirs = self.pending.last_mut()?;
            match dirs.next() {
                Some(dir) => {
                    self.current = dir.files.iter();
                    self.pending.push(dir.subdirs.iter());
                }
                None => {
                    self.pending.pop();
                }
            }
        }
    }
}

/// Iterator over the directories of a [`Directory`] tree
pub struct Directories<'a> {
    root: Option<&'a Directory>,
    pending: Vec<slice::Iter<'a, Directory>>,
}

impl<'a> Iterator for Directories<'a> {
    type Item = &'a Directory;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.pending.push(root.subdirs.iter());
            return Some(root);
        }

        loop {
            let dirs = self.pending.last_mut()?;
            match dirs.next() {
                Some(dir) => {
                    self.pending.push(dir.subdirs.iter());
                    return Some(dir);
                }
                None => {
                    self.pending.pop();
                }
            }
        }
    }
}

/// The NUL separated names of a release manifest
///
/// Borrows the raw table, names are only decoded when looked up.
#[derive(Debug, Clone, Default)]
pub struct StringTable<'a> {
    strings: Vec<&'a [u8]>,
}

impl<'a> StringTable<'a> {
    /// Split a raw string table, ignoring the terminator of the last name
    pub fn new(data: &'a [u8]) -> Self {
        if data.is_empty() {
            return Self::default();
        }

        let data = data.strip_suffix(b"\0").unwrap_or(data);
        Self {
            strings: data.split(|b| *b == 0).collect(),
        }
    }

    /// Number of names in the table
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the table holds no names
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Look up the name at `index`
    pub fn get(&self, index: u32) -> Result<&'a str> {
        let raw = self.strings.get(index as usize).copied().ok_or_else(|| {
            Error::malformed(
                "name_index",
                format!("{index} is out of range, the table holds {} names", self.len()),
            )
        })?;

        if !raw.is_ascii() {
            return Err(Error::malformed(
                "name_index",
                format!("name {index} is not ascii: {:?}", String::from_utf8_lossy(raw)),
            ));
        }

        // ascii is always valid utf-8
        std::str::from_utf8(raw).map_err(|e| Error::malformed("name_index", e.to_string()))
    }
}

/// Position of a file in the tree, as subdirectory indexes from the root followed by the file index
#[derive(Debug, Clone)]
struct FileAddress {
    dirs: Box<[usize]>,
    file: usize,
}

/// Release manifest reader
///
/// ```no_run
/// fn list_release(path: &std::path::Path) -> rads_formats::error::Result<()> {
///     let manifest = rads_formats::ReleaseManifest::open(path)?;
///
///     for file in manifest.files() {
///         println!("{} ({} bytes, version {})", file.path, file.size, file.version);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ReleaseManifest {
    header: ManifestHeader,
    root: Directory,
    file_count: usize,
    directory_count: usize,
    index: HashMap<Box<str>, FileAddress>,
    path: Option<PathBuf>,
}

impl ReleaseManifest {
    /// Read a release manifest and rebuild its directory tree.
    #[instrument(skip(reader), err)]
    pub fn new<R: Read + Seek>(mut reader: R) -> Result<ReleaseManifest> {
        let header = ManifestHeader::read(&mut reader)
            .map_err(|e| Error::from_header(e, &mut reader, "release manifest", MANIFEST_MAGIC))?;
        let tables =
            ManifestTables::read(&mut reader).map_err(|e| Error::from_table(e, "manifest_tables"))?;

        debug!(
            version = %header.version,
            directories = tables.directories.len(),
            files = tables.files.len(),
            "read release manifest tables"
        );

        let strings = StringTable::new(&tables.strings);
        if strings.len() != tables.strings_count as usize {
            warn!(
                declared = tables.strings_count,
                found = strings.len(),
                "string table count does not match its contents"
            );
        }

        let root = build_tree(&tables.directories, &tables.files, &strings)?;
        let index = index_files(&root);

        Ok(ReleaseManifest {
            header,
            file_count: root.iter_files().count(),
            directory_count: root.iter_directories().count(),
            root,
            index,
            path: None,
        })
    }

    /// Open and read the release manifest at `path`.
    ///
    /// The path is remembered so the archives of the release can be located later on.
    pub fn open(path: impl AsRef<Path>) -> Result<ReleaseManifest> {
        let path = path.as_ref();
        let reader = BufReader::new(FsFile::open(path)?);
        Ok(Self::new(reader)?.with_path(path))
    }

    /// Record the location the manifest was read from
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The manifest type
    pub fn kind(&self) -> u32 {
        self.header.kind
    }

    /// The number of entries declared by the header
    pub fn entries(&self) -> u32 {
        self.header.entries
    }

    /// The release version
    pub fn version(&self) -> Version {
        self.header.version
    }

    /// The root of the directory tree
    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// Where the manifest was read from, when opened through [`ReleaseManifest::open`]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of files in the tree
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Number of directories in the tree, the root included
    pub fn directory_count(&self) -> usize {
        self.directory_count
    }

    /// Iterate over every file of the release in listing order
    pub fn files(&self) -> Files<'_> {
        self.root.iter_files()
    }

    /// Iterate over every directory of the release, parents before children
    pub fn directories(&self) -> Directories<'_> {
        self.root.iter_directories()
    }

    /// Paths of every file of the release in listing order
    pub fn list_files(&self) -> Vec<&str> {
        self.root.list_files()
    }

    /// Search for a file by its path
    ///
    /// When a path is listed twice, the first one in listing order is returned.
    pub fn by_path(&self, path: &str) -> Option<&File> {
        let address = self.index.get(path)?;

        let mut dir = &self.root;
        for &i in address.dirs.iter() {
            dir = dir.subdirs.get(i)?;
        }
        dir.files.get(address.file)
    }

    /// Render the header and the whole tree
    pub fn pretty(&self) -> String {
        format!("{}\n{}", self, self.root.pretty(1))
    }
}

impl fmt::Display for ReleaseManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReleaseManifest(type={}, version={}, entries={})",
            self.header.kind, self.header.version, self.header.entries
        )
    }
}

/// Range of `count` records starting at `start` in a table of `len` records
fn table_range(field: &'static str, start: u32, count: u32, len: usize) -> Result<Range<usize>> {
    let end = start as u64 + count as u64;
    if end > len as u64 {
        return Err(Error::malformed(
            field,
            format!("range {start}..{end} is outside of the {len} records of the table"),
        ));
    }
    Ok(start as usize..end as usize)
}

/// Rebuild the owned directory tree from the flat tables, starting from the root at index 0.
fn build_tree(
    directories: &[DirectoryRecord],
    files: &[FileRecord],
    strings: &StringTable<'_>,
) -> Result<Directory> {
    if directories.is_empty() {
        return Err(Error::malformed(
            "directory_count",
            "the manifest holds no root directory",
        ));
    }

    let dir_names = directories
        .iter()
        .map(|d| strings.get(d.name_index))
        .collect::<Result<Vec<_>>>()?;

    let mut pending_files = files
        .iter()
        .map(|f| strings.get(f.name_index).map(|name| Some(File::from_record(f, name))))
        .collect::<Result<Vec<_>>>()?;

    // First pass: walk the ranges from the root, claiming every record once and assigning paths.
    let mut dir_paths: Vec<Option<String>> = vec![None; directories.len()];
    let mut file_claimed = vec![false; files.len()];
    let mut order = Vec::with_capacity(directories.len());
    let mut todo = vec![0usize];
    dir_paths[0] = Some(String::new());

    while let Some(index) = todo.pop() {
        order.push(index);
        let record = &directories[index];
        let parent = dir_paths[index].clone().unwrap_or_default();

        for child in table_range(
            "subdirs_index",
            record.subdirs_index,
            record.subdirs_nb,
            directories.len(),
        )? {
            if dir_paths[child].is_some() {
                return Err(Error::malformed(
                    "subdirs_index",
                    format!("directory {child} is claimed by more than one parent"),
                ));
            }
            dir_paths[child] = Some(format!("{parent}{}/", dir_names[child]));
            todo.push(child);
        }

        for child in table_range("files_index", record.files_index, record.files_nb, files.len())? {
            if std::mem::replace(&mut file_claimed[child], true) {
                return Err(Error::malformed(
                    "files_index",
                    format!("file {child} is claimed by more than one directory"),
                ));
            }
            if let Some(file) = pending_files[child].as_mut() {
                file.path = format!("{parent}{}", file.name);
            }
        }
    }

    let orphan_dirs = directories.len() - order.len();
    let orphan_files = file_claimed.iter().filter(|claimed| !**claimed).count();
    if orphan_dirs > 0 || orphan_files > 0 {
        warn!(
            directories = orphan_dirs,
            files = orphan_files,
            "records are not reachable from the root"
        );
    }

    // Second pass: children were discovered after their parents, so building in reverse discovery
    // order always finds them complete.
    let mut built: Vec<Option<Directory>> = vec![None; directories.len()];
    for &index in order.iter().rev() {
        let record = &directories[index];

        let subdirs = table_range(
            "subdirs_index",
            record.subdirs_index,
            record.subdirs_nb,
            directories.len(),
        )?
        .map(|child| {
            built[child].take().ok_or_else(|| {
                Error::malformed("subdirs_index", format!("directory {child} was not built"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

        let files = table_range("files_index", record.files_index, record.files_nb, files.len())?
            .map(|child| {
                pending_files[child].take().ok_or_else(|| {
                    Error::malformed("files_index", format!("file {child} was not built"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        built[index] = Some(Directory {
            name: dir_names[index].to_owned(),
            path: dir_paths[index].take().unwrap_or_default(),
            subdirs,
            files,
        });
    }

    built[0]
        .take()
        .ok_or_else(|| Error::malformed("directory_count", "the root directory was not built"))
}

/// Map every file path to its position in the tree, keeping the first one in listing order.
fn index_files(root: &Directory) -> HashMap<Box<str>, FileAddress> {
    let mut index = HashMap::new();
    let mut todo: Vec<(&Directory, Vec<usize>)> = vec![(root, Vec::new())];

    while let Some((dir, address)) = todo.pop() {
        for (i, file) in dir.files.iter().enumerate() {
            if index.contains_key(file.path.as_str()) {
                warn!(path = %file.path, "path is listed more than once");
                continue;
            }
            index.insert(
                file.path.clone().into_boxed_str(),
                FileAddress {
                    dirs: address.clone().into_boxed_slice(),
                    file: i,
                },
            );
        }

        for (i, subdir) in dir.subdirs.iter().enumerate().rev() {
            let mut child = address.clone();
            child.push(i);
            todo.push((subdir, child));
        }
    }

    index
}
