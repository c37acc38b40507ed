//! Payload decompression handling.

use std::io::{self, Read, Seek};

use flate2::read::ZlibDecoder;
use tracing::instrument;

use crate::error::{Error, Result};

/// Identifies how a payload is stored inside a RAF `.dat` file
///
/// The release manifest decides it per file, see [`crate::types::FileFlags::compression`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Compression {
    /// Stores the data as it is
    None,

    /// Data compressed using Zlib
    #[default]
    Zlib,
}

/// A reader over one payload of a `.dat` file
pub enum PayloadReader<'a, R: Read + Seek> {
    /// Raw bytes, limited to the payload size
    Raw(io::Take<&'a mut R>),

    /// Inflated bytes of a zlib stream limited to the payload size
    Compressed(Box<ZlibDecoder<io::Take<&'a mut R>>>),
}

impl<'a, R: Read + Seek> PayloadReader<'a, R> {
    /// Seek `reader` to `start` and read at most `limit` bytes from there
    #[instrument(skip(reader))]
    pub fn new(reader: &'a mut R, start: u64, limit: u64, compression: Compression) -> Result<Self> {
        reader.seek(io::SeekFrom::Start(start))?;

        let limit_reader = reader.by_ref().take(limit);
        Ok(match compression {
            Compression::None => PayloadReader::Raw(limit_reader),
            Compression::Zlib => PayloadReader::Compressed(Box::new(ZlibDecoder::new(limit_reader))),
        })
    }

    /// Whether the payload is inflated while reading
    pub fn compression(&self) -> Compression {
        match self {
            PayloadReader::Raw(_) => Compression::None,
            PayloadReader::Compressed(_) => Compression::Zlib,
        }
    }

    /// Read the whole payload
    ///
    /// A raw payload must hold exactly the bytes it was limited to, anything shorter is an unexpected end of file.
    /// Failing to inflate a compressed payload is reported as [`Error::CorruptData`].
    #[instrument(skip(self), err)]
    pub fn read_all(mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match &mut self {
            PayloadReader::Raw(r) => {
                r.read_to_end(&mut buffer)?;
                if r.limit() != 0 {
                    return Err(Error::IOError(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("payload ended {} bytes early", r.limit()),
                    )));
                }
            }
            PayloadReader::Compressed(r) => {
                r.read_to_end(&mut buffer).map_err(Error::CorruptData)?;
            }
        }
        Ok(buffer)
    }

    /// Unwrap and return the limited reader
    pub fn into_inner(self) -> io::Take<&'a mut R> {
        match self {
            PayloadReader::Raw(r) => r,
            PayloadReader::Compressed(r) => r.into_inner(),
        }
    }
}

impl<R: Read + Seek> Read for PayloadReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            PayloadReader::Raw(r) => r.read(buf),
            PayloadReader::Compressed(r) => r.read(buf),
        }
    }
}
