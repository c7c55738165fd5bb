pub use parquet_format_async_temp::{
    DecimalType, IntType, LogicalType, TimeType, TimeUnit, TimestampType, Type,
};

pub use crate::parquet_bridge::Repetition;

mod spec;

mod physical_type;
pub use physical_type::*;

mod basic_type;
pub use basic_type::*;

mod converted_type;
pub use converted_type::*;

//mod logical_to_converted;

mod parquet_type;
pub use parquet_type::*;

mod primitive_type;
pub use primitive_type::*;
