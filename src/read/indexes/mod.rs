mod read;

pub use read::{read_columns_indexes, read_pages_locations};
