use crate::metadata::{ColumnChunkMetaData, ColumnDescriptor, RowGroupMetaData};

use super::row_ranges::RowRanges;

/// One projected column within a row group, plus the byte range its pages occupy.
#[derive(Debug, Clone)]
pub struct ChunkDescriptor {
    pub column: ColumnDescriptor,
    pub metadata: ColumnChunkMetaData,
    pub offset: u64,
    pub length: u64,
}

/// A single, contiguous byte span to read with one seek, covering one or more
/// [`ChunkDescriptor`]s in file order.
#[derive(Debug, Clone)]
pub struct ConsecutivePart {
    pub offset: u64,
    pub length: u64,
    pub chunks: Vec<ChunkDescriptor>,
}

/// An ordered list of [`ConsecutivePart`]s covering a projection's byte ranges within a
/// row group.
#[derive(Debug, Clone, Default)]
pub struct ConsecutivePartList {
    pub parts: Vec<ConsecutivePart>,
}

impl ConsecutivePartList {
    pub fn total_bytes(&self) -> u64 {
        self.parts.iter().map(|p| p.length).sum()
    }
}

/// Selects the [`ChunkDescriptor`]s of `row_group` whose column path is in `projection`,
/// in the row group's declared column order. An empty `projection` selects every column.
pub fn project_chunks(row_group: &RowGroupMetaData, projection: &[Vec<String>]) -> Vec<ChunkDescriptor> {
    row_group
        .columns()
        .iter()
        .filter(|c| {
            projection.is_empty()
                || projection
                    .iter()
                    .any(|p| p.as_slice() == c.descriptor().path_in_schema())
        })
        .map(|c| {
            let (offset, length) = c.byte_range();
            ChunkDescriptor {
                column: c.descriptor().clone(),
                metadata: c.clone(),
                offset,
                length,
            }
        })
        .collect()
}

/// Plans the unfiltered read: one part per maximal run of chunks whose byte ranges are
/// exactly contiguous. `one_part_per_chunk` forces every chunk into its own part, as
/// asynchronous mode requires (each column gets its own stream).
pub fn plan_unfiltered(chunks: Vec<ChunkDescriptor>, one_part_per_chunk: bool) -> ConsecutivePartList {
    let mut parts: Vec<ConsecutivePart> = Vec::new();
    for chunk in chunks {
        let can_extend = !one_part_per_chunk
            && parts
                .last()
                .map(|p| p.offset + p.length == chunk.offset)
                .unwrap_or(false);
        if can_extend {
            let part = parts.last_mut().unwrap();
            part.length += chunk.length;
            part.chunks.push(chunk);
        } else {
            parts.push(ConsecutivePart {
                offset: chunk.offset,
                length: chunk.length,
                chunks: vec![chunk],
            });
        }
    }
    ConsecutivePartList { parts }
}

/// One chunk's surviving pages after an offset-index filter, still attached to the
/// [`ChunkDescriptor`] it belongs to. `pages` carries the per-page `selected_rows` that
/// [`crate::read::IndexedPageReader`] needs to tag each decoded page with its row
/// intervals; pages with no selected rows have already been dropped.
#[derive(Debug, Clone)]
pub struct FilteredChunk {
    pub chunk: ChunkDescriptor,
    pub pages: Vec<crate::indexes::FilteredPage>,
}

/// Plans the column-index-filtered read: for each chunk, keep only the pages whose row
/// range intersects `row_ranges`, then coalesce the kept pages' byte ranges across
/// chunks the same way [`plan_unfiltered`] does across whole chunks.
pub fn plan_filtered(
    chunks: Vec<ChunkDescriptor>,
    row_ranges: &RowRanges,
    num_rows: u64,
    locations_by_chunk: &dyn Fn(&ChunkDescriptor) -> Option<Vec<parquet_format_async_temp::PageLocation>>,
) -> crate::error::Result<(ConsecutivePartList, Vec<FilteredChunk>)> {
    let intervals = row_ranges.to_intervals();

    let mut filtered_chunks = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let pages = match locations_by_chunk(chunk) {
            Some(locations) => crate::indexes::select_pages(&intervals, &locations, num_rows)?
                .into_iter()
                .filter(|p| !p.selected_rows.is_empty())
                .collect(),
            // No offset index for this column: fall back to reading the whole chunk as
            // a single "page" covering every row.
            None => vec![crate::indexes::FilteredPage {
                start: chunk.offset,
                length: chunk.length as usize,
                selected_rows: vec![crate::indexes::Interval::new(0, num_rows)],
            }],
        };
        filtered_chunks.push(FilteredChunk {
            chunk: chunk.clone(),
            pages,
        });
    }

    // Parts only track byte spans for the I/O engine; association back to a chunk for
    // decoding is carried by `filtered_chunks` (column-index filtering never merges
    // pages across columns, so each part's chunk is unambiguous from its offset).
    let mut parts: Vec<ConsecutivePart> = Vec::new();
    for filtered in &filtered_chunks {
        for page in &filtered.pages {
            let (offset, length) = (page.start, page.length as u64);
            let can_extend = parts
                .last()
                .map(|p: &ConsecutivePart| p.offset + p.length == offset)
                .unwrap_or(false);
            if can_extend {
                parts.last_mut().unwrap().length += length;
            } else {
                parts.push(ConsecutivePart {
                    offset,
                    length,
                    chunks: vec![filtered.chunk.clone()],
                });
            }
        }
    }

    Ok((ConsecutivePartList { parts }, filtered_chunks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Descriptor;
    use crate::schema::types::{ParquetType, PhysicalType};

    fn descriptor() -> ColumnDescriptor {
        let primitive = ParquetType::from_physical("a".to_string(), PhysicalType::Int32);
        ColumnDescriptor::new(primitive.clone(), 0, 0, vec!["a".to_string()], primitive)
    }

    fn chunk(offset: u64, length: u64) -> ChunkDescriptor {
        // metadata is irrelevant to `plan_unfiltered`; it only reads offset/length.
        let descr = descriptor();
        let column_chunk = parquet_format_async_temp::ColumnChunk {
            file_path: None,
            file_offset: offset as i64,
            meta_data: Some(parquet_format_async_temp::ColumnMetaData {
                type_: parquet_format_async_temp::Type::INT32,
                encodings: vec![],
                path_in_schema: vec!["a".to_string()],
                codec: parquet_format_async_temp::CompressionCodec::UNCOMPRESSED,
                num_values: 0,
                total_uncompressed_size: 0,
                total_compressed_size: length as i64,
                key_value_metadata: None,
                data_page_offset: offset as i64,
                index_page_offset: None,
                dictionary_page_offset: None,
                statistics: None,
                encoding_stats: None,
                bloom_filter_offset: None,
                bloom_filter_length: None,
            }),
            offset_index_offset: None,
            offset_index_length: None,
            column_index_offset: None,
            column_index_length: None,
            crypto_metadata: None,
            encrypted_column_metadata: None,
        };
        let metadata =
            ColumnChunkMetaData::try_from_thrift(descr.clone(), column_chunk, 0).unwrap();
        ChunkDescriptor {
            column: descr,
            metadata,
            offset,
            length,
        }
    }

    #[test]
    fn coalesces_contiguous_chunks() {
        let chunks = vec![chunk(0, 10), chunk(10, 20), chunk(40, 5)];
        let plan = plan_unfiltered(chunks, false);
        assert_eq!(plan.parts.len(), 2);
        assert_eq!(plan.parts[0].offset, 0);
        assert_eq!(plan.parts[0].length, 30);
        assert_eq!(plan.parts[1].offset, 40);
        assert_eq!(plan.parts[1].length, 5);
    }

    #[test]
    fn one_part_per_chunk_forces_independent_parts() {
        let chunks = vec![chunk(0, 10), chunk(10, 20)];
        let plan = plan_unfiltered(chunks, true);
        assert_eq!(plan.parts.len(), 2);
    }
}
