//! Parquet schema, in its in-memory ([`types`]) and Thrift/text on-disk representations.
pub mod io_message;
pub mod io_thrift;
pub mod types;
