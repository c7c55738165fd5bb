//! Split-block bloom filter support for pruning row groups without touching the data pages.
mod filter;
mod read;

pub use filter::BlockSplitBloomFilter;
pub use read::read;
