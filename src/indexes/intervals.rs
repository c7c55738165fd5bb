use parquet_format_async_temp::PageLocation;

use crate::error::Error;

/// An interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    /// Its start
    pub start: u64,
    /// Its length
    pub length: u64,
}

impl Interval {
    /// Create a new interal
    pub fn new(start: u64, length: u64) -> Self {
        Self { start, length }
    }
}

/// Returns the set of (row) intervals of the pages.
fn compute_page_row_intervals(
    locations: &[PageLocation],
    num_rows: u64,
) -> Result<Vec<Interval>, Error> {
    if locations.is_empty() {
        return Ok(vec![]);
    };

    let last = (|| {
        let first = locations.last().unwrap().first_row_index;
        let start = u64::try_from(first)?;
        let length = num_rows - start;
        Result::<_, Error>::Ok(Interval::new(start, length))
    })();

    let pages_lengths = locations
        .windows(2)
        .map(|x| {
            let start = u64::try_from(x[0].first_row_index)?;
            let length = u64::try_from(x[1].first_row_index - x[0].first_row_index)?;
            Ok(Interval::new(start, length))
        })
        .chain(std::iter::once(last));
    pages_lengths.collect()
}

/// Returns the set of `(start, length)` row ranges selected by `selector` out of the
/// pages described by `indexes`, according to their page locations.
pub fn compute_rows<T>(
    indexes: &[super::PageIndex<T>],
    locations: &[PageLocation],
    num_rows: u64,
    selector: &dyn Fn(&super::PageIndex<T>) -> bool,
) -> Result<Vec<(u64, u64)>, Error> {
    let page_intervals = compute_page_row_intervals(locations, num_rows)?;

    Ok(indexes
        .iter()
        .zip(page_intervals.iter().copied())
        .filter_map(|(index, page)| {
            if selector(index) {
                Some((page.start, page.length))
            } else {
                None
            }
        })
        .collect())
}

/// A page location together with the (page-relative) row intervals selected out of it. An
/// empty `selected_rows` means the page can be skipped entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilteredPage {
    /// Location of the page in the file
    pub start: u64,
    pub length: usize,
    /// Row intervals to select in the page, relative to the page's first row
    pub selected_rows: Vec<Interval>,
}

fn overlaps(probe: Interval, intervals: &[Interval]) -> Vec<Interval> {
    intervals
        .iter()
        .filter_map(|interval| {
            let interval_end = interval.start + interval.length;
            let probe_end = probe.start + probe.length;
            let overlaps = (probe.start < interval_end) && (probe_end > interval.start);
            if overlaps {
                let start = interval.start.max(probe.start);
                let end = interval_end.min(probe_end);
                Some(Interval::new(start - probe.start, end - start))
            } else {
                None
            }
        })
        .collect()
}

/// Given a set of selected [`Interval`]s of rows and the set of page locations, returns,
/// for every page, the (possibly empty) row intervals selected out of it.
pub fn select_pages(
    intervals: &[Interval],
    locations: &[PageLocation],
    num_rows: u64,
) -> Result<Vec<FilteredPage>, Error> {
    let page_intervals = compute_page_row_intervals(locations, num_rows)?;

    page_intervals
        .into_iter()
        .zip(locations.iter())
        .map(|(interval, location)| {
            let selected_rows = overlaps(interval, intervals);
            Ok(FilteredPage {
                start: location.offset.try_into()?,
                length: location.compressed_page_size.try_into()?,
                selected_rows,
            })
        })
        .collect()
}
