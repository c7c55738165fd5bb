use parquet_format_async_temp::{ColumnChunk, ColumnMetaData, Encoding, Statistics};

use super::column_descriptor::ColumnDescriptor;
use crate::error::Result;
use crate::parquet_bridge::Compression;

/// Metadata for a column chunk.
// This contains the `ColumnDescriptor` associated with the chunk so that deserializers have
// access to the descriptor (e.g. physical, converted, logical).
#[derive(Debug, Clone)]
pub struct ColumnChunkMetaData {
    column_chunk: ColumnChunk,
    column_descr: ColumnDescriptor,
    // position of this chunk's column within the row group's column list, used to derive
    // the AAD of encrypted pages.
    column_ordinal: usize,
}

/// Represents common operations for a column chunk.
impl ColumnChunkMetaData {
    /// The raw, underlying thrift [`ColumnChunk`].
    pub fn column_chunk(&self) -> &ColumnChunk {
        &self.column_chunk
    }

    /// File where the column chunk is stored.
    ///
    /// If not set, assumed to belong to the same file as the metadata.
    /// This path is relative to the current file.
    pub fn file_path(&self) -> &Option<String> {
        &self.column_chunk.file_path
    }

    /// Byte offset in `file_path()`.
    pub fn file_offset(&self) -> i64 {
        self.column_chunk.file_offset
    }

    fn column_metadata(&self) -> &ColumnMetaData {
        self.column_chunk.meta_data.as_ref().unwrap()
    }

    /// Descriptor for this column.
    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.column_descr
    }

    /// The position of this column within its row group, used to derive the AAD of
    /// encrypted pages together with the row group ordinal.
    pub fn column_ordinal(&self) -> usize {
        self.column_ordinal
    }

    /// Total number of values in this column chunk.
    pub fn num_values(&self) -> i64 {
        self.column_metadata().num_values
    }

    /// [`Compression`] for this column.
    pub fn compression(&self) -> Compression {
        self.column_metadata()
            .codec
            .try_into()
            .unwrap_or(Compression::Uncompressed)
    }

    /// Returns the total compressed data size of this column chunk.
    pub fn compressed_size(&self) -> i64 {
        self.column_metadata().total_compressed_size
    }

    /// Returns the total uncompressed data size of this column chunk.
    pub fn uncompressed_size(&self) -> i64 {
        self.column_metadata().total_uncompressed_size
    }

    /// Returns the offset for the column data.
    pub fn data_page_offset(&self) -> i64 {
        self.column_metadata().data_page_offset
    }

    /// Returns `true` if this column chunk contains an index page, `false` otherwise.
    pub fn has_index_page(&self) -> bool {
        self.column_metadata().index_page_offset.is_some()
    }

    /// Returns the offset for the index page.
    pub fn index_page_offset(&self) -> Option<i64> {
        self.column_metadata().index_page_offset
    }

    /// Returns the offset for the dictionary page, if any.
    pub fn dictionary_page_offset(&self) -> Option<i64> {
        self.column_metadata().dictionary_page_offset
    }

    /// Returns the offset and length in bytes of this column chunk's `ColumnIndex`, if
    /// one was written.
    pub fn column_index_range(&self) -> Option<(u64, usize)> {
        let offset = self.column_chunk.column_index_offset?;
        let length = self.column_chunk.column_index_length?;
        Some((offset as u64, length as usize))
    }

    /// Returns the offset and length in bytes of this column chunk's `OffsetIndex`, if
    /// one was written.
    pub fn offset_index_range(&self) -> Option<(u64, usize)> {
        let offset = self.column_chunk.offset_index_offset?;
        let length = self.column_chunk.offset_index_length?;
        Some((offset as u64, length as usize))
    }

    /// Returns the offset and length in bytes of this column chunk's bloom filter, if
    /// one was written.
    pub fn bloom_filter_range(&self) -> Option<(u64, usize)> {
        let offset = self.column_metadata().bloom_filter_offset?;
        let length = self.column_metadata().bloom_filter_length?;
        Some((offset as u64, length as usize))
    }

    /// Returns `true` if this column chunk's pages are individually encrypted, i.e. the
    /// chunk carries its own `ColumnCryptoMetaData`.
    pub fn is_encrypted(&self) -> bool {
        self.column_chunk.crypto_metadata.is_some()
    }

    /// Returns the encodings used for this column.
    pub fn column_encoding(&self) -> &Vec<Encoding> {
        &self.column_metadata().encodings
    }

    /// Returns the thrift statistics of this column, if present.
    pub fn statistics(&self) -> &Option<Statistics> {
        &self.column_metadata().statistics
    }

    /// Returns the offset and length in bytes of the column chunk within the file.
    /// This is the range that must be read to cover every page (dictionary and data)
    /// of this chunk, and is the unit the range planner coalesces across columns.
    pub fn byte_range(&self) -> (u64, u64) {
        let col_start = if let Some(dict_page_offset) = self.dictionary_page_offset() {
            dict_page_offset
        } else {
            self.data_page_offset()
        };
        let col_len = self.compressed_size();
        assert!(
            col_start >= 0 && col_len >= 0,
            "column start and length should not be negative"
        );
        (col_start as u64, col_len as u64)
    }

    /// Method to convert from Thrift.
    pub fn try_from_thrift(
        column_descr: ColumnDescriptor,
        column_chunk: ColumnChunk,
        column_ordinal: usize,
    ) -> Result<Self> {
        Ok(Self {
            column_chunk,
            column_descr,
            column_ordinal,
        })
    }

    /// Method to convert to Thrift.
    pub fn into_thrift(self) -> ColumnChunk {
        self.column_chunk
    }
}
