//! This library handles reading the **release manifest** and **RAF archive** files used by RADS game clients.
//!
//! # RADS Binary Format Documentation
//!
//! A RADS project release is described by a `releasemanifest` file listing every file of the release as a
//! directory tree. The file contents live in RAF archives, one per file version, stored next to the release under
//! `filearchives/<version>/Archive_1.raf`. Each `.raf` index has a companion `.raf.dat` payload file holding the
//! (possibly zlib compressed) bytes.
//!
//! ## Release Manifest
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "RLSM"                                            |
//! | 0x0004         | Type                   | 4 bytes: Manifest type                                     |
//! | 0x0008         | Entries                | 4 bytes: Number of entries                                 |
//! | 0x000C         | Version                | 4 bytes: Release version, one byte per component           |
//! | 0x0010         | Directory Count        | 4 bytes: Number of directory records that follow           |
//!
//! The directory records are followed by a file count and the file records, then by the string table.
//!
//! ### Directory Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Name Index             | 4 bytes: Index of the name in the string table          |
//! | 0x0004         | Subdirectory Index     | 4 bytes: Index of the first subdirectory record         |
//! | 0x0008         | Subdirectory Count     | 4 bytes: Number of subdirectory records                 |
//! | 0x000C         | File Index             | 4 bytes: Index of the first file record                 |
//! | 0x0010         | File Count             | 4 bytes: Number of file records                         |
//!
//! The first directory record is the root of the tree. Children are given as contiguous ranges of the flat
//! directory and file tables.
//!
//! ### File Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Name Index             | 4 bytes: Index of the name in the string table          |
//! | 0x0004         | Version                | 4 bytes: Release that last changed this file            |
//! | 0x0008         | Hash                   | 16 bytes: Content hash                                  |
//! | 0x0018         | Flags                  | 4 bytes: `0x10` marks a compressed payload              |
//! | 0x001C         | Size                   | 4 bytes: Uncompressed size                              |
//! | 0x0020         | Compressed Size        | 4 bytes: Size stored in the archive                     |
//! | 0x0024         | Unknown                | 4 bytes                                                 |
//! | 0x0028         | Type                   | 2 bytes                                                 |
//! | 0x002A         | Reserved               | 2 bytes                                                 |
//!
//! ### String Table
//!
//! A string count and a byte size, followed by that many bytes of NUL terminated names.
//!
//! ## RAF Archive Index
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `F0 0E BE 18`                                     |
//! | 0x0004         | Version                | 4 bytes: Archive version                                   |
//! | 0x0008         | Manager Index          | 4 bytes                                                    |
//! | 0x000C         | Files Offset           | 4 bytes: Offset of the entry table (informational)         |
//! | 0x0010         | Paths Offset           | 4 bytes: Offset of the path table (informational)          |
//! | 0x0014         | Entry Count            | 4 bytes: Number of entry records that follow               |
//!
//! ### Entry Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Path Hash              | 4 bytes: [`hash::hash_path`] of the entry's path        |
//! | 0x0004         | Data Offset            | 4 bytes: Offset of the payload in the `.dat` file       |
//! | 0x0008         | Data Size              | 4 bytes: Size of the payload in the `.dat` file         |
//! | 0x000C         | Path Index             | 4 bytes: Index into the path table                      |
//!
//! ### Path Table
//!
//! A byte size and a path count, followed by `(offset, length)` pairs and the path strings. The offsets are
//! relative to the start of the path table, so the table header has to be skipped to find a string.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression Methods**: zlib, for file payloads flagged as compressed
//!

pub mod archive;
pub mod compression;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod types;
pub mod version;

pub use archive::RafArchive;
pub use compression::Compression;
pub use hash::hash_path;
pub use manifest::ReleaseManifest;
pub use version::Version;
