use std::fmt;
use std::io;

/// Error enum with all errors that can be returned by functions from this crate.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The underlying block device returned an error, or a read came back short.
    DeviceReadFault(io::Error),
    /// A parameter was incorrect (unknown seek origin, non-positive sector count, ...).
    InvalidInput,
    /// A requested file or directory has not been found.
    NotFound,
    /// `File::open` was attempted against a directory or a volume label entry.
    IsADirectory,
    /// A sector read reached beyond the end of the device.
    Range,
    /// A seek target fell outside `[0, size]`.
    NoSuchAddress,
    /// An allocation failed.
    OutOfMemory,
    /// Boot sector validation failed, or the two FAT copies disagree.
    CorruptedFileSystem,
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::DeviceReadFault(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DeviceReadFault(err) => write!(f, "device read fault: {}", err),
            Error::InvalidInput => write!(f, "invalid input"),
            Error::NotFound => write!(f, "no such file or directory"),
            Error::IsADirectory => write!(f, "is a directory"),
            Error::Range => write!(f, "sector range exceeds device size"),
            Error::NoSuchAddress => write!(f, "seek target outside file bounds"),
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::CorruptedFileSystem => write!(f, "corrupted file system"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeviceReadFault(err) => Some(err),
            _ => None,
        }
    }
}

/// Converts this crate's `Error` into a `std::io::Error`, for callers that want to
/// plug a `File`/`Dir` into generic `std::io` consuming code.
impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::DeviceReadFault(err) => err,
            Error::InvalidInput => io::Error::new(io::ErrorKind::InvalidInput, error.to_string()),
            Error::NotFound => io::Error::new(io::ErrorKind::NotFound, error.to_string()),
            Error::IsADirectory => io::Error::new(io::ErrorKind::InvalidInput, error.to_string()),
            Error::Range => io::Error::new(io::ErrorKind::UnexpectedEof, error.to_string()),
            Error::NoSuchAddress => io::Error::new(io::ErrorKind::InvalidInput, error.to_string()),
            Error::OutOfMemory => io::Error::new(io::ErrorKind::OutOfMemory, error.to_string()),
            Error::CorruptedFileSystem => io::Error::new(io::ErrorKind::InvalidData, error.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
