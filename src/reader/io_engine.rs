//! Synchronous and asynchronous I/O for materializing a [`ConsecutivePartList`]'s byte
//! ranges into buffers: one seek per part, reads bounded by a configurable allocation
//! size, and a small amount of slack appended past the last part's declared end to
//! absorb a historical under-counted dictionary-page length.

use std::io::{Read, Seek, SeekFrom};

use crate::error::{ParquetError, Result};

use super::range_planner::{ConsecutivePart, ConsecutivePartList};

/// Extra bytes read past the file region a `ConsecutivePartList` declares, attached only
/// to the last part. Some writers have historically under-counted a column chunk's
/// `total_compressed_size` by a handful of bytes when the chunk ends in a dictionary
/// page; reading a little past the declared end means decoding succeeds instead of
/// hitting an unexpected EOF on that chunk's last page.
const TRAILING_SLACK: usize = 19;

/// One part's bytes, read with a single seek.
pub struct BufferedPart {
    pub offset: u64,
    pub length: u64,
    buffer: Vec<u8>,
}

impl BufferedPart {
    /// The exact `[start, start + length)` byte range, translated into this part's
    /// zero-based buffer. `start` must fall within `[self.offset, self.offset +
    /// self.buffer.len())`.
    pub fn slice(&self, start: u64, length: u64) -> Vec<u8> {
        let begin = (start - self.offset) as usize;
        let end = (begin + length as usize).min(self.buffer.len());
        self.buffer[begin..end].to_vec()
    }

    /// Everything from `start` to the end of the buffered region, including any
    /// trailing slack. Used for the chunk that is physically last within a part, whose
    /// declared length can undershoot what's actually on disk.
    pub fn slice_to_end(&self, start: u64) -> Vec<u8> {
        let begin = (start - self.offset) as usize;
        self.buffer[begin..].to_vec()
    }
}

/// Reads every part of `plan`, in order: one `seek` per part, then `read_exact` in
/// segments no larger than `max_allocation_size` so a corrupt, oversized length doesn't
/// force a single enormous allocation. Logs the total bytes read across the plan.
pub fn read_parts_sync<R: Read + Seek>(
    source: &mut R,
    plan: &ConsecutivePartList,
    max_allocation_size: usize,
) -> Result<Vec<BufferedPart>> {
    let mut out = Vec::with_capacity(plan.parts.len());
    let mut total = 0u64;
    let last = plan.parts.len().saturating_sub(1);
    for (i, part) in plan.parts.iter().enumerate() {
        let (buffer, read) = read_part(source, part, max_allocation_size, i == last)?;
        total += read;
        out.push(BufferedPart {
            offset: part.offset,
            length: part.length,
            buffer,
        });
    }
    log::trace!(
        "I/O engine read {} bytes across {} part(s)",
        total,
        plan.parts.len()
    );
    Ok(out)
}

fn read_part<R: Read + Seek>(
    source: &mut R,
    part: &ConsecutivePart,
    max_allocation_size: usize,
    with_slack: bool,
) -> Result<(Vec<u8>, u64)> {
    source.seek(SeekFrom::Start(part.offset))?;
    let mut buffer = read_fully(source, part.length, max_allocation_size)?;
    let slack = if with_slack {
        top_up(source, &mut buffer, TRAILING_SLACK)
    } else {
        0
    };
    Ok((buffer, part.length + slack as u64))
}

/// Reads exactly `length` bytes from `source`, in segments no larger than
/// `max_allocation_size`.
fn read_fully<R: Read>(
    source: &mut R,
    length: u64,
    max_allocation_size: usize,
) -> Result<Vec<u8>> {
    let max_allocation_size = max_allocation_size.max(1) as u64;
    let mut buffer = Vec::with_capacity(length.min(max_allocation_size) as usize);
    let mut remaining = length;
    while remaining > 0 {
        let segment = remaining.min(max_allocation_size) as usize;
        let mut piece = vec![0u8; segment];
        source
            .read_exact(&mut piece)
            .map_err(|e| ParquetError::General(format!("I/O engine short read: {}", e)))?;
        buffer.append(&mut piece);
        remaining -= segment as u64;
    }
    Ok(buffer)
}

/// Best-effort: reads up to `slack` extra bytes directly off `source`, which at this
/// point sits exactly at the end of the region just read, and appends them to `buffer`.
/// A short read (including immediate EOF) is not an error, since the slack is only ever
/// needed by the truncated-header workaround.
fn top_up<R: Read>(source: &mut R, buffer: &mut Vec<u8>, slack: usize) -> usize {
    let mut extra = vec![0u8; slack];
    let mut read = 0;
    while read < slack {
        match source.read(&mut extra[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(_) => break,
        }
    }
    extra.truncate(read);
    buffer.append(&mut extra);
    read
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::reader::{ChunkDescriptor, ConsecutivePart};

    fn descriptor() -> crate::metadata::ColumnDescriptor {
        let primitive = crate::schema::types::ParquetType::from_physical(
            "a".to_string(),
            crate::schema::types::PhysicalType::Int32,
        );
        crate::metadata::ColumnDescriptor::new(primitive.clone(), 0, 0, vec!["a".to_string()], primitive)
    }

    fn chunk(offset: u64, length: u64) -> ChunkDescriptor {
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
            crate::metadata::ColumnChunkMetaData::try_from_thrift(descr.clone(), column_chunk, 0)
                .unwrap();
        ChunkDescriptor {
            column: descr,
            metadata,
            offset,
            length,
        }
    }

    #[test]
    fn reads_one_part_with_a_single_seek() {
        let data = (0u8..32).collect::<Vec<_>>();
        let mut source = Cursor::new(data.clone());
        let plan = ConsecutivePartList {
            parts: vec![ConsecutivePart {
                offset: 4,
                length: 10,
                chunks: vec![chunk(4, 10)],
            }],
        };
        let parts = read_parts_sync(&mut source, &plan, usize::MAX).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].slice(4, 10), &data[4..14]);
    }

    #[test]
    fn bounded_allocation_reassembles_the_full_part() {
        let data = (0u8..64).collect::<Vec<_>>();
        let mut source = Cursor::new(data.clone());
        let plan = ConsecutivePartList {
            parts: vec![ConsecutivePart {
                offset: 0,
                length: 64,
                chunks: vec![chunk(0, 64)],
            }],
        };
        let parts = read_parts_sync(&mut source, &plan, 7).unwrap();
        assert_eq!(parts[0].slice(0, 64), data);
    }

    #[test]
    fn last_part_grows_with_trailing_slack() {
        let mut data = (0u8..20).collect::<Vec<_>>();
        data.extend_from_slice(&[9, 9, 9]); // 3 extra bytes past the declared length
        let mut source = Cursor::new(data.clone());
        let plan = ConsecutivePartList {
            parts: vec![ConsecutivePart {
                offset: 0,
                length: 20,
                chunks: vec![chunk(0, 20)],
            }],
        };
        let parts = read_parts_sync(&mut source, &plan, usize::MAX).unwrap();
        assert_eq!(parts[0].slice_to_end(0), data);
    }
}
