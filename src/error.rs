#[derive(Debug, PartialEq)]
pub enum ParquetError {
    /// General Parquet error.
    General(String),
    /// When the parquet file is known to be out of spec.
    OutOfSpec(String),
    /// The byte source is not a columnar file recognized by this reader (bad magic, too
    /// short to hold a trailer).
    NotAColumnarFile(String),
    /// The trailer's footer length points outside the file.
    CorruptTrailer(String),
    /// A page's envelope violates its chunk's accounting (duplicate dictionary page,
    /// value-count/page-count mismatch, negative sizes).
    CorruptPage(String),
    /// A page's CRC-32 did not match its header when checksum verification was enabled.
    ChecksumFailure(String),
    /// The file's footer is encrypted but no decryption properties were supplied.
    CryptoKeyMissing(String),
    /// A decrypted buffer's length did not match the length recorded in its header.
    CryptoLengthMismatch(String),
    /// The FIFO between a page producer and its consumer was interrupted.
    Interrupted(String),
}

impl std::error::Error for ParquetError {}

impl std::fmt::Display for ParquetError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParquetError::General(message) => {
                write!(fmt, "{}", message)
            }
            ParquetError::OutOfSpec(message) => {
                write!(fmt, "{}", message)
            }
            ParquetError::NotAColumnarFile(message) => {
                write!(fmt, "not a columnar file: {}", message)
            }
            ParquetError::CorruptTrailer(message) => {
                write!(fmt, "corrupt trailer: {}", message)
            }
            ParquetError::CorruptPage(message) => {
                write!(fmt, "corrupt page: {}", message)
            }
            ParquetError::ChecksumFailure(message) => {
                write!(fmt, "checksum failure: {}", message)
            }
            ParquetError::CryptoKeyMissing(message) => {
                write!(fmt, "missing decryption key: {}", message)
            }
            ParquetError::CryptoLengthMismatch(message) => {
                write!(fmt, "decrypted length mismatch: {}", message)
            }
            ParquetError::Interrupted(message) => {
                write!(fmt, "interrupted: {}", message)
            }
        }
    }
}

#[cfg(feature = "snappy")]
impl From<snap::Error> for ParquetError {
    fn from(e: snap::Error) -> ParquetError {
        ParquetError::General(format!("underlying snap error: {}", e))
    }
}

impl From<std::io::Error> for ParquetError {
    fn from(e: std::io::Error) -> ParquetError {
        ParquetError::General(format!("underlying IO error: {}", e))
    }
}

impl From<std::num::TryFromIntError> for ParquetError {
    fn from(e: std::num::TryFromIntError) -> ParquetError {
        ParquetError::OutOfSpec(format!("Integer overflow: {}", e))
    }
}

impl From<std::array::TryFromSliceError> for ParquetError {
    fn from(e: std::array::TryFromSliceError) -> ParquetError {
        ParquetError::OutOfSpec(format!("Invalid byte slice length: {}", e))
    }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T> = std::result::Result<T, ParquetError>;

/// Alias kept for call sites that refer to the error type as `Error`.
pub type Error = ParquetError;

macro_rules! general_err {
    ($fmt:expr) => (ParquetError::General($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::General(format!($fmt, $($args),*)));
    ($e:expr, $fmt:expr) => (ParquetError::General($fmt.to_owned(), $e));
    ($e:ident, $fmt:expr, $($args:tt),*) => (
        ParquetError::General(&format!($fmt, $($args),*), $e));
}
