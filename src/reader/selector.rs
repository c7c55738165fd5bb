use std::io::{Read, Seek};

use crate::error::Result;
use crate::indexes::{compute_rows, Index};
use crate::metadata::{ColumnPath, RowGroupMetaData};
use crate::page::DictPage;

use super::dictionary::{read_bloom_filter, read_dictionary};
use super::index_store::IndexStore;
use super::row_ranges::RowRanges;

/// The outcome of evaluating a predicate against one filter level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The predicate cannot possibly match anything covered by this level: prune.
    Prune,
    /// The predicate might match; carry on to the next level (or keep, if this was the
    /// last enabled level).
    Keep,
}

/// A compiled, opaque predicate evaluated by the row-group selector. Every method has a
/// default of "keep" so a predicate only needs to implement the levels it can usefully
/// answer; the selector never calls a level the caller didn't enable (see
/// [`super::ReaderProperties`]).
pub trait RowGroupPredicate: Send + Sync {
    /// Cheapest level: inspect the row group's already-loaded column statistics.
    fn evaluate_statistics(&self, _row_group: &RowGroupMetaData) -> Decision {
        Decision::Keep
    }

    /// Inspect a column's dictionary page. Only called for columns the predicate names
    /// via [`Self::dictionary_columns`].
    fn evaluate_dictionary(
        &self,
        _row_group: &RowGroupMetaData,
        _column: &ColumnPath,
        _dictionary: &dyn DictPage,
    ) -> Decision {
        Decision::Keep
    }

    /// Columns whose dictionary this predicate wants to inspect, if dictionary
    /// filtering is enabled. Columns without a dictionary page are skipped.
    fn dictionary_columns(&self) -> &[ColumnPath] {
        &[]
    }

    /// A probe hash to test against a column's bloom filter, if bloom filtering is
    /// enabled and the column has one. Returning `None` skips the bloom check for that
    /// column.
    fn bloom_probe(&self, _column: &ColumnPath) -> Option<u64> {
        None
    }

    /// Columns this predicate wants a bloom-filter probe on.
    fn bloom_columns(&self) -> &[ColumnPath] {
        &[]
    }

    /// Computes the surviving row ranges of `row_group` using its column index, if
    /// column-index filtering is enabled. The default keeps every row (no pruning at
    /// page granularity).
    fn select_rows(
        &self,
        _row_group: &RowGroupMetaData,
        _indexes: &std::collections::HashMap<ColumnPath, Option<Box<dyn Index>>>,
    ) -> Option<RowRanges> {
        None
    }
}

/// Which filter levels the selector is allowed to evaluate, cheapest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterLevels {
    pub use_statistics: bool,
    pub use_dictionary: bool,
    pub use_bloom_filter: bool,
    pub use_column_index: bool,
}

/// Applies `predicate` to every row group in `row_groups`, in file order, returning the
/// surviving ones together with the row ranges selected within each (`None` meaning "all
/// rows"). Levels not enabled in `levels` are never evaluated.
pub fn select_row_groups<R: Read + Seek>(
    reader: &mut R,
    row_groups: &[RowGroupMetaData],
    predicate: &dyn RowGroupPredicate,
    levels: FilterLevels,
    index_store: &mut IndexStore,
) -> Result<Vec<(RowGroupMetaData, Option<RowRanges>)>> {
    let mut kept = Vec::with_capacity(row_groups.len());

    'row_groups: for row_group in row_groups {
        if levels.use_statistics
            && predicate.evaluate_statistics(row_group) == Decision::Prune
        {
            continue;
        }

        if levels.use_dictionary {
            for path in predicate.dictionary_columns() {
                if let Some(column) = row_group
                    .columns()
                    .iter()
                    .find(|c| c.descriptor().path_in_schema() == path.parts())
                {
                    if let Some(dictionary) = read_dictionary(reader, column)? {
                        if predicate.evaluate_dictionary(row_group, path, dictionary.as_ref())
                            == Decision::Prune
                        {
                            continue 'row_groups;
                        }
                    }
                }
            }
        }

        if levels.use_bloom_filter {
            for path in predicate.bloom_columns() {
                let hash = match predicate.bloom_probe(path) {
                    Some(hash) => hash,
                    None => continue,
                };
                if let Some(column) = row_group
                    .columns()
                    .iter()
                    .find(|c| c.descriptor().path_in_schema() == path.parts())
                {
                    if let Some(filter) = read_bloom_filter(reader, column)? {
                        if !filter.check_hash(hash) {
                            continue 'row_groups;
                        }
                    }
                }
            }
        }

        let row_ranges = if levels.use_column_index {
            let indexes = index_store.column_indexes(reader, row_group)?;
            match predicate.select_rows(row_group, indexes) {
                Some(ranges) => {
                    if ranges.is_empty() {
                        continue 'row_groups;
                    }
                    Some(ranges)
                }
                None => None,
            }
        } else {
            None
        };

        kept.push((row_group.clone(), row_ranges));
    }

    Ok(kept)
}

/// A convenience [`RowGroupPredicate::select_rows`] implementation for a single, typed
/// leaf column: runs `selector` over that column's per-page statistics via
/// [`compute_rows`] and converts the result into [`RowRanges`].
pub fn select_rows_for_column<T>(
    row_group: &RowGroupMetaData,
    column: &ColumnPath,
    index: &dyn Index,
    locations: &[parquet_format_async_temp::PageLocation],
    selector: &dyn Fn(&crate::indexes::PageIndex<T>) -> bool,
) -> Result<RowRanges>
where
    T: crate::types::NativeType + 'static,
{
    let _ = column;
    let native = index
        .as_any()
        .downcast_ref::<crate::indexes::NativeIndex<T>>()
        .ok_or_else(|| general_err!("column index type mismatch"))?;
    let pairs = compute_rows(
        &native.indexes,
        locations,
        row_group.num_rows() as u64,
        selector,
    )?;
    Ok(RowRanges::from_pairs(pairs))
}
