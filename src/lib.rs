#![forbid(unsafe_code)]
/// Unofficial implementation of parquet IO in Rust.

#[macro_use]
pub mod error;
pub mod bloom_filter;
pub mod compression;
pub mod encoding;
pub mod indexes;
pub mod metadata;
pub mod page;
mod parquet_bridge;
pub mod read;
pub mod reader;
pub mod schema;
pub mod statistics;
pub mod types;

pub use fallible_streaming_iterator;
pub use fallible_streaming_iterator::FallibleStreamingIterator;

const FOOTER_SIZE: u64 = 8;
const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];
/// Tail magic of a file whose footer is itself encrypted (GCM ciphertext). This crate
/// does not ship a decryptor (see `reader`'s Non-goals), so a file ending in this magic
/// is reported via [`error::ParquetError::CryptoKeyMissing`] rather than parsed further.
const PARQUET_EFMAGIC: [u8; 4] = [b'P', b'A', b'R', b'E'];

/// The number of bytes read at the end of the parquet file on first read
const DEFAULT_FOOTER_READ_SIZE: u64 = 64 * 1024;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    pub fn get_path() -> PathBuf {
        let dir = env!("CARGO_MANIFEST_DIR");

        PathBuf::from(dir).join("testing/parquet-testing/data")
    }
}
