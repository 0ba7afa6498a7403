use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;

/// Signature of an OLE compound file, the container of encrypted Office packages.
const COMPOUND_FILE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// A unified reader over either a local file or an in-memory package
pub(crate) enum UnifiedReader {
    /// Local file reader
    Local(BufReader<File>),
    /// In-memory buffer
    Memory(Cursor<Vec<u8>>),
}

impl UnifiedReader {
    /// Opens a package from a local path
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> std::io::Result<UnifiedReader> {
        let file = File::open(path)?;
        Ok(UnifiedReader::Local(BufReader::new(file)))
    }

    /// Wraps an in-memory package
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> UnifiedReader {
        UnifiedReader::Memory(Cursor::new(bytes))
    }

    /// Checks whether the content starts with the compound file signature,
    /// leaving the reader positioned at the start either way
    pub(crate) fn is_compound_file(&mut self) -> std::io::Result<bool> {
        let mut signature = [0u8; 8];
        self.seek(SeekFrom::Start(0))?;
        let is_compound = match self.read_exact(&mut signature) {
            Ok(()) => signature == COMPOUND_FILE_SIGNATURE,
            Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(error) => return Err(error),
        };
        self.seek(SeekFrom::Start(0))?;
        Ok(is_compound)
    }
}

impl Read for UnifiedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            UnifiedReader::Local(reader) => reader.read(buf),
            UnifiedReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for UnifiedReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            UnifiedReader::Local(reader) => reader.seek(pos),
            UnifiedReader::Memory(reader) => reader.seek(pos),
        }
    }
}
