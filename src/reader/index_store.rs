use std::collections::HashMap;
use std::io::{Read, Seek};

use parquet_format_async_temp::PageLocation;

use crate::error::Result;
use crate::indexes::Index;
use crate::metadata::{ColumnChunkMetaData, ColumnPath, RowGroupMetaData};
use crate::read::{read_columns_indexes, read_pages_locations};

/// Lazily-populated, per-row-group cache of column indexes and offset indexes, keyed by
/// column path. Each row group's entry is read at most once: the first caller to ask for
/// a row group's indexes pays for one coalesced read across every column that has one;
/// later callers for the same row group hit the cache.
#[derive(Debug, Default)]
pub struct IndexStore {
    column_indexes: HashMap<usize, HashMap<ColumnPath, Option<Box<dyn Index>>>>,
    offset_indexes: HashMap<usize, HashMap<ColumnPath, Option<Vec<PageLocation>>>>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the column indexes for `row_group`, reading and caching them on first
    /// access. The returned map has an entry for every column in the row group (`None`
    /// for columns that carry no column index).
    pub fn column_indexes<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        row_group: &RowGroupMetaData,
    ) -> Result<&HashMap<ColumnPath, Option<Box<dyn Index>>>> {
        if !self.column_indexes.contains_key(&row_group.ordinal()) {
            let entry = self.load_column_indexes(reader, row_group)?;
            self.column_indexes.insert(row_group.ordinal(), entry);
        }
        Ok(&self.column_indexes[&row_group.ordinal()])
    }

    /// Returns the offset indexes for `row_group`, reading and caching them on first
    /// access.
    pub fn offset_indexes<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        row_group: &RowGroupMetaData,
    ) -> Result<&HashMap<ColumnPath, Option<Vec<PageLocation>>>> {
        if !self.offset_indexes.contains_key(&row_group.ordinal()) {
            let entry = self.load_offset_indexes(reader, row_group)?;
            self.offset_indexes.insert(row_group.ordinal(), entry);
        }
        Ok(&self.offset_indexes[&row_group.ordinal()])
    }

    fn load_column_indexes<R: Read + Seek>(
        &self,
        reader: &mut R,
        row_group: &RowGroupMetaData,
    ) -> Result<HashMap<ColumnPath, Option<Box<dyn Index>>>> {
        let columns = row_group.columns();
        let with_index: Vec<ColumnChunkMetaData> = columns
            .iter()
            .filter(|c| c.column_index_range().is_some())
            .cloned()
            .collect();
        let indexes = read_columns_indexes(reader, &with_index)?;

        let mut map = HashMap::with_capacity(columns.len());
        for column in columns {
            map.insert(column_path(column), None);
        }
        for (column, index) in with_index.into_iter().zip(indexes.into_iter()) {
            map.insert(column_path(&column), Some(index));
        }
        Ok(map)
    }

    fn load_offset_indexes<R: Read + Seek>(
        &self,
        reader: &mut R,
        row_group: &RowGroupMetaData,
    ) -> Result<HashMap<ColumnPath, Option<Vec<PageLocation>>>> {
        let columns = row_group.columns();
        let with_index: Vec<ColumnChunkMetaData> = columns
            .iter()
            .filter(|c| c.offset_index_range().is_some())
            .cloned()
            .collect();
        let locations = read_pages_locations(reader, &with_index)?;

        let mut map = HashMap::with_capacity(columns.len());
        for column in columns {
            map.insert(column_path(column), None);
        }
        for (column, location) in with_index.into_iter().zip(locations.into_iter()) {
            map.insert(column_path(&column), Some(location));
        }
        Ok(map)
    }

    /// Drops every cached entry for `row_group`, e.g. when the reader advances past it.
    pub fn evict(&mut self, row_group_ordinal: usize) {
        self.column_indexes.remove(&row_group_ordinal);
        self.offset_indexes.remove(&row_group_ordinal);
    }
}

fn column_path(column: &ColumnChunkMetaData) -> ColumnPath {
    ColumnPath::new(column.descriptor().path_in_schema().to_vec())
}
