//! A predicate-aware, filtering reader façade built on top of this crate's lower-level
//! metadata, page and index primitives.
//!
//! [`Reader`] owns a file's footer and walks its row groups one at a time, optionally
//! pruning whole row groups (statistics, dictionary, bloom filter) and individual pages
//! (column index) before any page bytes are read.

mod chunk_decoder;
mod dictionary;
mod index_store;
mod io_engine;
mod metadata_filter;
pub mod pipeline;
mod range_planner;
mod row_ranges;
mod selector;

use chunk_decoder::ChunkDecoder;
pub use dictionary::{read_bloom_filter, read_dictionary};
pub use index_store::IndexStore;
pub use metadata_filter::MetadataFilter;
pub use pipeline::{ChunkPageStore, PageQueue};
use pipeline::PagePipeline;
pub use range_planner::{ChunkDescriptor, ConsecutivePart, ConsecutivePartList, FilteredChunk};
pub use row_ranges::RowRanges;
pub use selector::{select_row_groups, select_rows_for_column, Decision, FilterLevels, RowGroupPredicate};

use std::io::{Cursor, Read, Seek};
use std::sync::Arc;

use crate::error::Result;
use crate::metadata::{ColumnPath, FileMetaData};
use crate::read::read_metadata;

/// A no-op predicate: every level defaults to [`Decision::Keep`], so [`select_row_groups`]
/// returns every row group unfiltered. The default [`Reader`] configuration.
#[derive(Debug, Default)]
struct KeepAll;

impl RowGroupPredicate for KeepAll {}

/// Configuration for a [`Reader`], covering every filter level, the async pipeline
/// toggle, allocation bounds, metadata pre-filtering and the row-group predicate.
///
/// Built with [`ReaderPropertiesBuilder`]; `ReaderProperties::builder()` is the entry
/// point. Every option defaults to "off"/"keep everything", matching historical,
/// unfiltered behavior.
#[derive(Clone)]
pub struct ReaderProperties {
    levels: FilterLevels,
    verify_page_checksums: bool,
    async_reader_enabled: bool,
    max_allocation_size: usize,
    metadata_filter: MetadataFilter,
    predicate: Arc<dyn RowGroupPredicate>,
    parallelism: usize,
}

impl std::fmt::Debug for ReaderProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderProperties")
            .field("levels", &self.levels)
            .field("verify_page_checksums", &self.verify_page_checksums)
            .field("async_reader_enabled", &self.async_reader_enabled)
            .field("max_allocation_size", &self.max_allocation_size)
            .field("metadata_filter", &self.metadata_filter)
            .field("parallelism", &self.parallelism)
            .finish()
    }
}

impl Default for ReaderProperties {
    fn default() -> Self {
        Self {
            levels: FilterLevels::default(),
            verify_page_checksums: false,
            async_reader_enabled: false,
            max_allocation_size: usize::MAX,
            metadata_filter: MetadataFilter::default(),
            predicate: Arc::new(KeepAll),
            parallelism: 5,
        }
    }
}

impl ReaderProperties {
    pub fn builder() -> ReaderPropertiesBuilder {
        ReaderPropertiesBuilder::default()
    }
}

/// Builder for [`ReaderProperties`], following the constructor-plus-`with_*` pattern
/// used elsewhere in this crate (see `PageReader::with_checksum_verification`).
#[derive(Default)]
pub struct ReaderPropertiesBuilder {
    inner: ReaderProperties,
}

impl ReaderPropertiesBuilder {
    pub fn with_statistics_filter(mut self, enabled: bool) -> Self {
        self.inner.levels.use_statistics = enabled;
        self
    }

    pub fn with_dictionary_filter(mut self, enabled: bool) -> Self {
        self.inner.levels.use_dictionary = enabled;
        self
    }

    pub fn with_bloom_filter(mut self, enabled: bool) -> Self {
        self.inner.levels.use_bloom_filter = enabled;
        self
    }

    pub fn with_column_index_filter(mut self, enabled: bool) -> Self {
        self.inner.levels.use_column_index = enabled;
        self
    }

    pub fn with_page_checksum_verification(mut self, enabled: bool) -> Self {
        self.inner.verify_page_checksums = enabled;
        self
    }

    pub fn with_async_reader(mut self, enabled: bool) -> Self {
        self.inner.async_reader_enabled = enabled;
        self
    }

    pub fn with_max_allocation_size(mut self, bytes: usize) -> Self {
        self.inner.max_allocation_size = bytes;
        self
    }

    pub fn with_metadata_filter(mut self, filter: MetadataFilter) -> Self {
        self.inner.metadata_filter = filter;
        self
    }

    pub fn with_record_filter(mut self, predicate: Arc<dyn RowGroupPredicate>) -> Self {
        self.inner.predicate = predicate;
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.inner.parallelism = parallelism.max(1);
        self
    }

    pub fn build(self) -> ReaderProperties {
        self.inner
    }
}

/// Opens `source`, parses its footer and returns a [`Reader`] positioned before the
/// first row group. Equivalent to `open_with_properties(source, ReaderProperties::default())`.
pub fn open<R: Read + Seek>(source: R, properties: ReaderProperties) -> Result<Reader<R>> {
    Reader::new(source, properties)
}

/// A predicate-aware reader over one columnar file: parses the footer once, then walks
/// row groups (optionally skipping whole groups or individual pages per the configured
/// [`ReaderProperties`]).
pub struct Reader<R: Read + Seek> {
    source: R,
    metadata: FileMetaData,
    properties: ReaderProperties,
    index_store: IndexStore,
    next_row_group: usize,
    projection: Vec<Vec<String>>,
}

impl<R: Read + Seek> Reader<R> {
    fn new(mut source: R, properties: ReaderProperties) -> Result<Self> {
        let metadata = read_metadata(&mut source)?;
        let metadata = properties.metadata_filter.apply(metadata);
        Ok(Self {
            source,
            metadata,
            properties,
            index_store: IndexStore::new(),
            next_row_group: 0,
            projection: Vec::new(),
        })
    }

    /// The parsed file-level metadata (footer).
    pub fn file_metadata(&self) -> &FileMetaData {
        &self.metadata
    }

    /// Total row count across every row group this reader exposes (after any
    /// [`MetadataFilter`] has already dropped rows groups at open time).
    pub fn record_count(&self) -> i64 {
        self.metadata.num_rows()
    }

    /// Row count after applying the configured [`RowGroupPredicate`]'s statistics,
    /// dictionary, bloom and column-index levels. Re-evaluates the predicate against
    /// every row group; callers on a hot path should cache the result.
    pub fn filtered_record_count(&mut self) -> Result<i64> {
        let row_groups = self.metadata.row_groups().to_vec();
        let predicate = self.properties.predicate.clone();
        let kept = select_row_groups(
            &mut self.source,
            &row_groups,
            predicate.as_ref(),
            self.properties.levels,
            &mut self.index_store,
        )?;
        Ok(kept
            .iter()
            .map(|(row_group, ranges)| match ranges {
                Some(ranges) => ranges.row_count() as i64,
                None => row_group.num_rows(),
            })
            .sum())
    }

    /// The row groups this reader exposes, in file order.
    pub fn row_groups(&self) -> &[crate::metadata::RowGroupMetaData] {
        self.metadata.row_groups()
    }

    /// Restricts subsequent reads to the named columns (dot-free leaf paths). An empty
    /// projection (the default) reads every column.
    pub fn set_requested_schema(&mut self, projection: Vec<Vec<String>>) {
        self.projection = projection;
    }

    /// Plans the unfiltered, whole-chunk byte ranges for `row_group`'s projected
    /// columns: one part per maximal run of byte-adjacent chunks, or one part per
    /// chunk when the async reader is enabled (each column gets its own stream). Used
    /// internally by [`Self::read_row_group`]; exposed so callers can inspect the
    /// planned I/O without materializing it.
    pub fn plan_row_group(&self, row_group_index: usize) -> ConsecutivePartList {
        let row_group = &self.metadata.row_groups()[row_group_index];
        let chunks = range_planner::project_chunks(row_group, &self.projection);
        range_planner::plan_unfiltered(chunks, self.properties.async_reader_enabled)
    }

    /// Reads and decodes `row_group`'s projected columns, unfiltered: every page of
    /// every projected column is materialized. The I/O engine seeks once per planned
    /// part, reading it into buffers no larger than `max_allocation_size`, then slices
    /// out each column's exact byte range before decoding.
    pub fn read_row_group(&mut self, row_group_index: usize) -> Result<ChunkPageStore> {
        let plan = self.plan_row_group(row_group_index);
        if self.properties.async_reader_enabled {
            self.materialize_async(plan)
        } else {
            self.materialize_sync(plan)
        }
    }

    /// Reads and decodes the next unread row group, advancing the cursor. Returns
    /// `None` once every row group has been consumed.
    pub fn read_next_row_group(&mut self) -> Result<Option<ChunkPageStore>> {
        let index = match self.next_row_group_index() {
            Some(index) => index,
            None => return Ok(None),
        };
        let store = self.read_row_group(index)?;
        self.skip_next_row_group();
        Ok(Some(store))
    }

    /// Reads and decodes `row_group`'s projected columns after applying the configured
    /// predicate and column-index filter. Returns `None` if the whole row group is
    /// pruned (by the predicate) or every row is filtered out (by the column index).
    pub fn read_filtered_row_group(&mut self, row_group_index: usize) -> Result<Option<ChunkPageStore>> {
        let (row_group, ranges) = match self.filtered_row_group(row_group_index)? {
            Some(value) => value,
            None => return Ok(None),
        };
        let num_rows = row_group.num_rows() as u64;
        let row_ranges = ranges.unwrap_or_else(|| RowRanges::all(num_rows));
        if row_ranges.is_empty() {
            return Ok(None);
        }

        let chunks = range_planner::project_chunks(&row_group, &self.projection);
        let offset_indexes = self.index_store.offset_indexes(&mut self.source, &row_group)?;
        let locations_by_chunk = |chunk: &ChunkDescriptor| -> Option<Vec<parquet_format_async_temp::PageLocation>> {
            let path = ColumnPath::new(chunk.column.path_in_schema().to_vec());
            offset_indexes.get(&path).and_then(|locations| locations.clone())
        };
        let (plan, filtered_chunks) =
            range_planner::plan_filtered(chunks, &row_ranges, num_rows, &locations_by_chunk)?;
        let total_bytes = plan.total_bytes();

        Ok(Some(self.materialize_filtered(filtered_chunks, total_bytes)?))
    }

    /// Reads and decodes the next row group surviving the configured filters, skipping
    /// (and evicting the index cache of) every row group pruned along the way. Returns
    /// `None` once every remaining row group has been consumed.
    pub fn read_next_filtered_row_group(&mut self) -> Result<Option<ChunkPageStore>> {
        while let Some(index) = self.next_row_group_index() {
            let store = self.read_filtered_row_group(index)?;
            self.skip_next_row_group();
            if let Some(store) = store {
                return Ok(Some(store));
            }
        }
        Ok(None)
    }

    /// Reads every part of `plan` with one seek per part and slices out each chunk's
    /// exact bytes before decoding, draining each chunk's pages eagerly on the calling
    /// thread.
    fn materialize_sync(&mut self, plan: ConsecutivePartList) -> Result<ChunkPageStore> {
        let parts = io_engine::read_parts_sync(&mut self.source, &plan, self.properties.max_allocation_size)?;
        let total_chunks: usize = plan.parts.iter().map(|p| p.chunks.len()).sum();
        let mut seen = 0usize;
        let mut columns = Vec::with_capacity(total_chunks);
        for (part, buffered) in plan.parts.iter().zip(parts.iter()) {
            for chunk in &part.chunks {
                seen += 1;
                let bytes = if seen == total_chunks {
                    buffered.slice_to_end(chunk.offset)
                } else {
                    buffered.slice(chunk.offset, chunk.length)
                };
                let pipeline = pipeline::drain_chunk(Cursor::new(bytes), chunk);
                columns.push((chunk.clone(), PageQueue::Sync(pipeline)));
            }
        }
        Ok(ChunkPageStore::new(columns))
    }

    /// Like [`Self::materialize_sync`], but hands each column's already-buffered bytes
    /// to a background thread for decoding, so a consumer draining several columns'
    /// page queues concurrently overlaps their decode work. The file bytes themselves
    /// are still fetched synchronously on the calling thread: `R` is not required to be
    /// `Clone`, so a fresh stream per part (true concurrent I/O) isn't generally
    /// possible without a caller-supplied way to reopen the source.
    #[cfg(feature = "async")]
    fn materialize_async(&mut self, plan: ConsecutivePartList) -> Result<ChunkPageStore> {
        let parts = io_engine::read_parts_sync(&mut self.source, &plan, self.properties.max_allocation_size)?;
        let total_chunks: usize = plan.parts.iter().map(|p| p.chunks.len()).sum();
        let mut seen = 0usize;
        let mut columns = Vec::with_capacity(total_chunks);
        let executor = pipeline::AsyncPagePipeline::thread_executor();
        let capacity = self.properties.parallelism;
        for (part, buffered) in plan.parts.iter().zip(parts.iter()) {
            for chunk in &part.chunks {
                seen += 1;
                let bytes = if seen == total_chunks {
                    buffered.slice_to_end(chunk.offset)
                } else {
                    buffered.slice(chunk.offset, chunk.length)
                };
                let chunk_owned = chunk.clone();
                let queue = pipeline::AsyncPagePipeline::spawn(capacity, executor.clone(), move |tx| {
                    let mut decoder = ChunkDecoder::unfiltered(Cursor::new(bytes), &chunk_owned);
                    loop {
                        match decoder.next_page() {
                            Ok(Some(page)) => {
                                if tx.send(Ok(page.clone())).is_err() {
                                    break;
                                }
                            }
                            Ok(None) => break,
                            Err(e) => {
                                let _ = tx.send(Err(e));
                                break;
                            }
                        }
                    }
                });
                columns.push((chunk.clone(), PageQueue::Async(queue)));
            }
        }
        Ok(ChunkPageStore::new(columns))
    }

    #[cfg(not(feature = "async"))]
    fn materialize_async(&mut self, plan: ConsecutivePartList) -> Result<ChunkPageStore> {
        self.materialize_sync(plan)
    }

    /// Decodes each filtered chunk directly against the live source: column-index
    /// selected pages are inherently non-contiguous, so there is no whole-chunk buffer
    /// to coalesce into. `IndexedPageReader` seeks to each selected page's (and, lazily,
    /// the dictionary's) absolute offset itself.
    fn materialize_filtered(
        &mut self,
        filtered_chunks: Vec<FilteredChunk>,
        total_bytes: u64,
    ) -> Result<ChunkPageStore> {
        log::trace!(
            "filtered I/O engine selecting {} bytes across {} column(s)",
            total_bytes,
            filtered_chunks.len()
        );
        let mut columns = Vec::with_capacity(filtered_chunks.len());
        for filtered in filtered_chunks {
            let decoder = ChunkDecoder::filtered(&mut self.source, &filtered.chunk, filtered.pages);
            let pipeline = PagePipeline::sync(decoder, usize::MAX);
            columns.push((filtered.chunk, PageQueue::Sync(pipeline)));
        }
        Ok(ChunkPageStore::new(columns))
    }

    /// Advances the row-group cursor without reading it.
    pub fn skip_next_row_group(&mut self) {
        self.index_store.evict(self.next_row_group);
        self.next_row_group += 1;
    }

    /// The index of the row group [`Self::read_next_row_group`] would return next, or
    /// `None` once every row group has been consumed.
    pub fn next_row_group_index(&self) -> Option<usize> {
        if self.next_row_group < self.metadata.row_groups().len() {
            Some(self.next_row_group)
        } else {
            None
        }
    }

    /// Applies the configured predicate and column-index filter to `row_group_index`,
    /// returning the surviving row ranges (`None` meaning "every row survives").
    pub fn filtered_row_group(
        &mut self,
        row_group_index: usize,
    ) -> Result<Option<(crate::metadata::RowGroupMetaData, Option<RowRanges>)>> {
        let row_group = self.metadata.row_groups()[row_group_index].clone();
        let predicate = self.properties.predicate.clone();
        let mut kept = select_row_groups(
            &mut self.source,
            std::slice::from_ref(&row_group),
            predicate.as_ref(),
            self.properties.levels,
            &mut self.index_store,
        )?;
        Ok(kept.pop())
    }

    /// Reads and decodes the dictionary page of `column`, if any.
    pub fn dictionary_reader(
        &mut self,
        column: &crate::metadata::ColumnChunkMetaData,
    ) -> Result<Option<Arc<dyn crate::page::DictPage>>> {
        read_dictionary(&mut self.source, column)
    }

    /// Reads the bloom filter bitset of `column`, if any.
    pub fn bloom_filter(
        &mut self,
        column: &crate::metadata::ColumnChunkMetaData,
    ) -> Result<Option<crate::bloom_filter::BlockSplitBloomFilter>> {
        read_bloom_filter(&mut self.source, column)
    }

    /// Reads and parses `column`'s column index, if it has one. Unlike
    /// [`Self::filtered_row_group`], this does not consult or populate the row-group
    /// index cache: it is a standalone point read for a single column, mirroring
    /// [`Self::dictionary_reader`]/[`Self::bloom_filter`].
    pub fn column_index(
        &mut self,
        column: &crate::metadata::ColumnChunkMetaData,
    ) -> Result<Option<Box<dyn crate::indexes::Index>>> {
        crate::indexes::read_column(&mut self.source, column)
    }

    /// Reads and parses `column`'s offset index, if it has one.
    pub fn offset_index(
        &mut self,
        column: &crate::metadata::ColumnChunkMetaData,
    ) -> Result<Option<Vec<parquet_format_async_temp::PageLocation>>> {
        crate::indexes::read_page_locations(&mut self.source, column.column_chunk())
    }

    /// This reader is read-only: appending to a writer is out of scope. Mirrors the
    /// write-path `appendTo` operation as a documented, always-erroring stub.
    pub fn append_to(&self, _writer: &mut dyn std::io::Write) -> Result<()> {
        Err(crate::error::ParquetError::General(
            "appendTo is not supported: this reader is read-only".to_string(),
        ))
    }

    /// Releases the underlying source.
    pub fn close(self) -> R {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_properties_keep_everything() {
        let properties = ReaderProperties::default();
        assert!(!properties.levels.use_statistics);
        assert!(!properties.verify_page_checksums);
        assert_eq!(properties.parallelism, 5);
    }

    #[test]
    fn builder_sets_every_level() {
        let properties = ReaderProperties::builder()
            .with_statistics_filter(true)
            .with_dictionary_filter(true)
            .with_bloom_filter(true)
            .with_column_index_filter(true)
            .with_page_checksum_verification(true)
            .with_parallelism(0)
            .build();
        assert!(properties.levels.use_statistics);
        assert!(properties.levels.use_dictionary);
        assert!(properties.levels.use_bloom_filter);
        assert!(properties.levels.use_column_index);
        assert!(properties.verify_page_checksums);
        // parallelism is clamped to at least 1.
        assert_eq!(properties.parallelism, 1);
    }
}
