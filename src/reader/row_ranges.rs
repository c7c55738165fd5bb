use crate::indexes::Interval;

/// A sorted, disjoint set of closed row-index intervals surviving predicate push-down
/// within a single row group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowRanges {
    // Kept as (start, length) pairs, matching `crate::indexes::compute_rows`'s shape,
    // sorted by `start` and with no two entries touching or overlapping.
    ranges: Vec<(u64, u64)>,
}

impl RowRanges {
    /// An empty set: every row group with this filter is entirely skippable.
    pub fn empty() -> Self {
        Self { ranges: vec![] }
    }

    /// A set covering `[0, num_rows)`, i.e. "no filtering occurred".
    pub fn all(num_rows: u64) -> Self {
        if num_rows == 0 {
            Self::empty()
        } else {
            Self {
                ranges: vec![(0, num_rows)],
            }
        }
    }

    /// Builds a [`RowRanges`] from the `(start, length)` pairs [`crate::indexes::compute_rows`]
    /// returns, merging adjacent/overlapping entries.
    pub fn from_pairs(mut pairs: Vec<(u64, u64)>) -> Self {
        pairs.sort_unstable_by_key(|(start, _)| *start);
        let mut merged: Vec<(u64, u64)> = Vec::with_capacity(pairs.len());
        for (start, length) in pairs {
            if length == 0 {
                continue;
            }
            if let Some(last) = merged.last_mut() {
                let last_end = last.0 + last.1;
                if start <= last_end {
                    let end = (start + length).max(last_end);
                    last.1 = end - last.0;
                    continue;
                }
            }
            merged.push((start, length));
        }
        Self { ranges: merged }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of rows selected across all ranges.
    pub fn row_count(&self) -> u64 {
        self.ranges.iter().map(|(_, len)| len).sum()
    }

    /// The ranges as `(start, length)` pairs, in ascending order.
    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.ranges
    }

    /// Converts to the `Interval` shape used by [`crate::indexes::select_pages`].
    pub fn to_intervals(&self) -> Vec<Interval> {
        self.ranges
            .iter()
            .map(|(start, length)| Interval::new(*start, *length))
            .collect()
    }

    /// Whether this set covers the full `[0, num_rows)` span, i.e. no row was pruned.
    pub fn is_unfiltered(&self, num_rows: u64) -> bool {
        self.ranges == [(0, num_rows)] || (num_rows == 0 && self.ranges.is_empty())
    }
}
