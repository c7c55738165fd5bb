use std::any::Any;
use std::sync::Arc;

use parquet_format_async_temp::Statistics as ParquetStatistics;

use crate::error::Result;
use crate::metadata::Descriptor;
use crate::schema::types::PhysicalType;

mod binary;
mod boolean;
mod fixed_len_binary;
mod primitive;

pub use binary::BinaryStatistics;
pub use boolean::BooleanStatistics;
pub use fixed_len_binary::FixedLenStatistics;
pub use primitive::PrimitiveStatistics;

/// A typed, deserialized representation of a column chunk's statistics.
pub trait Statistics: std::fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// The physical type of the column this belongs to.
    fn physical_type(&self) -> &PhysicalType;

    /// The number of null values, if known.
    fn null_count(&self) -> Option<i64> {
        None
    }
}

/// Deserializes the Thrift [`ParquetStatistics`] of a column chunk into a typed [`Statistics`],
/// dispatching on the column's physical type.
pub fn deserialize_statistics(
    statistics: &ParquetStatistics,
    descriptor: Descriptor,
) -> Result<Arc<dyn Statistics>> {
    match descriptor.primitive_type.physical_type {
        PhysicalType::Boolean => boolean::read(statistics),
        PhysicalType::Int32 => primitive::read::<i32>(statistics),
        PhysicalType::Int64 => primitive::read::<i64>(statistics),
        PhysicalType::Int96 => primitive::read::<crate::types::Int96>(statistics),
        PhysicalType::Float => primitive::read::<f32>(statistics),
        PhysicalType::Double => primitive::read::<f64>(statistics),
        PhysicalType::ByteArray => binary::read(statistics, descriptor),
        PhysicalType::FixedLenByteArray(size) => fixed_len_binary::read(statistics, size),
    }
}
