use std::io::{Read, Seek};
use std::sync::Arc;

use crate::bloom_filter::{self, BlockSplitBloomFilter};
use crate::error::Result;
use crate::metadata::ColumnChunkMetaData;
use crate::page::DictPage;
use crate::read::get_page_iterator;

/// Reads and decodes the dictionary page of `column`, if it has one. Returns `None`
/// without touching the reader when the chunk carries no dictionary page offset.
///
/// `reader` is seeked to the start of `column`'s chunk, as [`get_page_iterator`] requires.
pub fn read_dictionary<R: Read + Seek>(
    reader: &mut R,
    column: &ColumnChunkMetaData,
) -> Result<Option<Arc<dyn DictPage>>> {
    if column.dictionary_page_offset().is_none() {
        return Ok(None);
    }

    let mut pages = get_page_iterator(column, &mut *reader, None, vec![])?;
    // Pulling one page forces the dictionary page, if any, to be decoded first: the
    // iterator swallows it internally and returns the first data page (or `None` if the
    // chunk is empty).
    if let Some(page) = pages.next() {
        page?;
    }
    Ok(pages.current_dictionary().cloned())
}

/// Reads the bloom filter bitset of `column`, if it has one, wrapped as a
/// [`BlockSplitBloomFilter`]. Returns `None` when the column carries no bloom filter or
/// its algorithm/compression is unsupported (already logged by [`bloom_filter::read`]).
pub fn read_bloom_filter<R: Read + Seek>(
    reader: &mut R,
    column: &ColumnChunkMetaData,
) -> Result<Option<BlockSplitBloomFilter>> {
    let mut bitset = Vec::new();
    bloom_filter::read(column, reader, &mut bitset)?;
    if bitset.is_empty() {
        Ok(None)
    } else {
        Ok(Some(BlockSplitBloomFilter::new(bitset)))
    }
}
