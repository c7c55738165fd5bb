use std::collections::HashSet;

use crate::metadata::FileMetaData;
use crate::read::filter_row_groups;

/// Drops row-group metadata the caller has no interest in, before it is handed back
/// from [`super::open`]. Applied once, right after the trailer is parsed.
#[derive(Debug, Clone)]
pub enum MetadataFilter {
    /// Keep every row group.
    None,
    /// Keep row groups whose file offset falls in `[start, end)`.
    RowGroupRange { start: i64, end: i64 },
    /// Keep only the row groups at these ordinals.
    RowGroupOrdinals(HashSet<usize>),
    /// Drop every row group; only file-level metadata survives.
    SkipRowGroups,
}

impl Default for MetadataFilter {
    fn default() -> Self {
        MetadataFilter::None
    }
}

impl MetadataFilter {
    pub(crate) fn apply(&self, metadata: FileMetaData) -> FileMetaData {
        match self {
            MetadataFilter::None => metadata,
            MetadataFilter::SkipRowGroups => {
                filter_row_groups(&metadata, &|_, _| false)
            }
            MetadataFilter::RowGroupOrdinals(ordinals) => {
                filter_row_groups(&metadata, &|_, i| ordinals.contains(&i))
            }
            MetadataFilter::RowGroupRange { start, end } => {
                filter_row_groups(&metadata, &|row_group, _| {
                    let offset = row_group
                        .columns()
                        .first()
                        .map(|c| c.byte_range().0 as i64)
                        .unwrap_or(0);
                    offset >= *start && offset < *end
                })
            }
        }
    }
}
