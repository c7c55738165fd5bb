use std::io::{Read, Seek};

use crate::error::Result;
use crate::indexes::FilteredPage;
use crate::page::DataPage;
use crate::read::{BasicDecompressor, IndexedPageReader, PageFilter, PageReader};
use crate::FallibleStreamingIterator;

use super::range_planner::ChunkDescriptor;

/// A decoded, decompressed stream of [`DataPage`]s for one projected column chunk.
///
/// Wraps either a plain [`PageReader`] (unfiltered chunks) or an [`IndexedPageReader`]
/// (chunks with a page selection from column-index filtering) behind
/// [`BasicDecompressor`], so callers never need to care which. Neither page source needs
/// `Send`/`'static`: `BasicDecompressor` has no such bound, so this enum doesn't either,
/// letting a chunk decoder borrow a reader directly instead of owning one.
pub enum ChunkDecoder<R: Read> {
    Unfiltered(BasicDecompressor<PageReader<R>>),
    Filtered(BasicDecompressor<IndexedPageReader<R>>),
}

impl<R: Read> ChunkDecoder<R> {
    /// Builds a decoder reading every page of `chunk` back to back out of `reader`,
    /// which must already be positioned at the start of the chunk's bytes (whole-file
    /// offset for a live source, or index `0` for a buffered, zero-based view).
    pub fn unfiltered(reader: R, chunk: &ChunkDescriptor) -> Self {
        let filter: PageFilter = std::sync::Arc::new(|_, _| true);
        let pages = PageReader::new(reader, &chunk.metadata, filter, vec![]);
        Self::Unfiltered(BasicDecompressor::new(pages, vec![]))
    }

    /// Advances to and returns the next decompressed page, or `None` once the chunk is
    /// exhausted.
    pub fn next_page(&mut self) -> Result<Option<&DataPage>> {
        match self {
            Self::Unfiltered(inner) => {
                inner.advance()?;
                Ok(inner.get())
            }
            Self::Filtered(inner) => {
                inner.advance()?;
                Ok(inner.get())
            }
        }
    }
}

impl<R: Read + Seek> ChunkDecoder<R> {
    /// Builds a decoder that only materializes the pages listed in `pages`, skipping
    /// every other page's bytes entirely. `reader` need not be seeked: `IndexedPageReader`
    /// seeks to each selected page's absolute offset itself, so this variant works just
    /// as well over the live source as over a buffered part.
    pub fn filtered(reader: R, chunk: &ChunkDescriptor, pages: Vec<FilteredPage>) -> Self {
        let indexed = IndexedPageReader::new(reader, &chunk.metadata, pages, vec![], vec![]);
        Self::Filtered(BasicDecompressor::new(indexed, vec![]))
    }
}
