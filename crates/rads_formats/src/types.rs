//! Base types for the fixed-width records of release manifests and RAF archives.

use binrw::BinRead;

use crate::{compression::Compression, version::Version};

/// Magic value at the start of every release manifest
pub const MANIFEST_MAGIC: &[u8; 4] = b"RLSM";

/// Magic value at the start of every RAF archive index
pub const ARCHIVE_MAGIC: &[u8; 4] = b"\xF0\x0E\xBE\x18";

/// Release manifest header
///
/// Always starts with "RLSM". All data is stored in little endian format
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(magic = b"RLSM", little)]
pub struct ManifestHeader {
    /// The manifest type
    pub kind: u32,

    /// The number of entries described by the manifest
    pub entries: u32,

    /// The release version
    pub version: Version,
}

/// Release manifest directory record
///
/// Children are given as ranges of the flat directory and file tables
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct DirectoryRecord {
    /// Index of the directory name in the string table
    pub name_index: u32,

    /// Index of the first subdirectory in the directory table
    pub subdirs_index: u32,

    /// Number of subdirectories
    pub subdirs_nb: u32,

    /// Index of the first file in the file table
    pub files_index: u32,

    /// Number of files
    pub files_nb: u32,
}

/// Flags of a release manifest file record
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[br(little)]
pub struct FileFlags(pub u32);

impl FileFlags {
    /// Set when the payload of the file is stored zlib compressed
    pub const COMPRESSED: u32 = 0x10;

    /// Whether the payload of the file is compressed
    pub fn is_compressed(&self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }

    /// The compression used for the payload of the file
    pub fn compression(&self) -> Compression {
        if self.is_compressed() {
            Compression::Zlib
        } else {
            Compression::None
        }
    }
}

/// Release manifest file record
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct FileRecord {
    /// Index of the file name in the string table
    pub name_index: u32,

    /// Version of the release that last changed the file, which is also the archive holding it
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

/// The flat tables following the release manifest header
#[derive(BinRead, Debug, Default, Clone, PartialEq)]
#[br(little)]
pub struct ManifestTables {
    /// Number of directory records
    pub directory_count: u32,

    /// Directory records, the root first
    #[br(count = directory_count)]
    pub directories: Vec<DirectoryRecord>,

    /// Number of file records
    pub file_count: u32,

    /// File records
    #[br(count = file_count)]
    pub files: Vec<FileRecord>,

    /// Number of strings in the string table
    pub strings_count: u32,

    /// Size of the string table in bytes
    pub strings_size: u32,

    /// The NUL separated string table
    #[br(count = strings_size)]
    pub strings: Vec<u8>,
}

/// RAF archive index header
///
/// Always starts with the bytes `F0 0E BE 18`. All data is stored in little endian format
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(magic = b"\xF0\x0E\xBE\x18", little)]
pub struct ArchiveHeader {
    /// The archive version
    pub version: Version,

    /// Index of the archive manager
    pub manager_index: u32,

    /// Offset of the entry table
    pub files_offset: u32,

    /// Offset of the path table
    pub paths_offset: u32,
}

/// RAF archive entry record
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct ArchiveRecord {
    /// [`crate::hash::hash_path`] of the entry's path
    pub path_hash: u32,

    /// Offset of the payload in the `.dat` file
    pub data_offset: u32,

    /// Size of the payload in the `.dat` file
    pub data_size: u32,

    /// Index of the entry's path in the path table
    pub path_index: u32,
}

/// Location of a path in the RAF path table
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct PathSpan {
    /// Offset from the start of the path table
    pub offset: u32,

    /// Length in bytes, including the NUL terminator
    pub length: u32,
}

/// The tables following the RAF archive header
#[derive(BinRead, Debug, Default, Clone, PartialEq)]
#[br(little)]
pub struct ArchiveTables {
    /// Number of entry records
    pub entry_count: u32,

    /// Entry records
    #[br(count = entry_count)]
    pub entries: Vec<ArchiveRecord>,

    /// Size of the path table in bytes
    pub paths_size: u32,

    /// Number of path spans
    pub paths_count: u32,

    /// Path spans
    #[br(count = paths_count)]
    pub paths: Vec<PathSpan>,
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{
        ArchiveHeader, ArchiveRecord, DirectoryRecord, FileFlags, FileRecord, ManifestHeader,
    };
    use crate::version::Version;
    use crate::Compression;

    #[test]
    fn read_manifest_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'R', b'L', b'S', b'M',
            0x01, 0x00, 0x00, 0x00,
            0x07, 0x00, 0x00, 0x00,
            0x19, 0x00, 0x00, 0x00,
        ]);

        let expected = ManifestHeader {
            kind: 1,
            entries: 7,
            version: Version::new(0, 0, 0, 25),
        };

        assert_eq!(ManifestHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_directory_record() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x02, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
        ]);

        let expected = DirectoryRecord {
            name_index: 2,
            subdirs_index: 1,
            subdirs_nb: 3,
            files_index: 4,
            files_nb: 5,
        };

        assert_eq!(DirectoryRecord::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_file_record() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            // name index
            0x03, 0x00, 0x00, 0x00,
            // version
            0x18, 0x00, 0x00, 0x00,
            // hash
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
            0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
            // flags
            0x10, 0x00, 0x00, 0x00,
            // size, compressed size
            0x00, 0x01, 0x00, 0x00,
            0x40, 0x00, 0x00, 0x00,
            // unknown, type, reserved
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00,
            0x00, 0x00,
        ]);

        let expected = FileRecord {
            name_index: 3,
            version: Version::new(0, 0, 0, 24),
            hash: [
                0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
                0x0E, 0x0F,
            ],
            flags: FileFlags(0x10),
            size: 256,
            compressed_size: 64,
            kind: 2,
            ..Default::default()
        };

        let record = FileRecord::read(&mut input)?;
        assert_eq!(record, expected);
        assert!(record.flags.is_compressed());
        assert_eq!(input.position(), 44);

        Ok(())
    }

    #[test]
    fn compression_follows_flag_bit() {
        assert_eq!(FileFlags(0x10).compression(), Compression::Zlib);
        assert_eq!(FileFlags(0x11).compression(), Compression::Zlib);
        assert_eq!(FileFlags(0x01).compression(), Compression::None);
        assert_eq!(FileFlags(0).compression(), Compression::None);
    }

    #[test]
    fn read_archive_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0xF0, 0x0E, 0xBE, 0x18,
            0x01, 0x00, 0x00, 0x00,
            0x2A, 0x00, 0x00, 0x00,
            0x14, 0x00, 0x00, 0x00,
            0x28, 0x00, 0x00, 0x00,
        ]);

        let expected = ArchiveHeader {
            version: Version::new(0, 0, 0, 1),
            manager_index: 42,
            files_offset: 20,
            paths_offset: 40,
        };

        assert_eq!(ArchiveHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_archive_record() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x19, 0xEC, 0x62, 0x0F,
            0x64, 0x00, 0x00, 0x00,
            0x14, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);

        let expected = ArchiveRecord {
            path_hash: 0x0F62_EC19,
            data_offset: 100,
            data_size: 20,
            path_index: 0,
        };

        assert_eq!(ArchiveRecord::read(&mut input)?, expected);

        Ok(())
    }
}
