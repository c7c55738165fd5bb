use parquet_format_async_temp::ConvertedType;

use crate::error::{ParquetError, Result};

/// Converted type for primitive (leaf) nodes, used to supply logical semantics that
/// predate [`crate::schema::types::LogicalType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveConvertedType {
    Utf8,
    Json,
    Bson,
    Enum,
    /// (precision, scale)
    Decimal(i32, i32),
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Interval,
}

/// Converted type for group (nested) nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupConvertedType {
    Map,
    MapKeyValue,
    List,
}

/// Converts a Thrift [`ConvertedType`] plus optional `(precision, scale)` into a
/// [`PrimitiveConvertedType`]. `maybe_decimal` must be `Some` iff `ty` is `DECIMAL`.
pub fn converted_to_primitive_converted(
    ty: &ConvertedType,
    maybe_decimal: Option<(i32, i32)>,
) -> Result<PrimitiveConvertedType> {
    Ok(match ty {
        ConvertedType::UTF8 => PrimitiveConvertedType::Utf8,
        ConvertedType::JSON => PrimitiveConvertedType::Json,
        ConvertedType::BSON => PrimitiveConvertedType::Bson,
        ConvertedType::ENUM => PrimitiveConvertedType::Enum,
        ConvertedType::DECIMAL => {
            let (precision, scale) = maybe_decimal.ok_or_else(|| {
                general_err!("Decimal converted type requires precision and scale")
            })?;
            PrimitiveConvertedType::Decimal(precision, scale)
        }
        ConvertedType::DATE => PrimitiveConvertedType::Date,
        ConvertedType::TIME_MILLIS => PrimitiveConvertedType::TimeMillis,
        ConvertedType::TIME_MICROS => PrimitiveConvertedType::TimeMicros,
        ConvertedType::TIMESTAMP_MILLIS => PrimitiveConvertedType::TimestampMillis,
        ConvertedType::TIMESTAMP_MICROS => PrimitiveConvertedType::TimestampMicros,
        ConvertedType::UINT_8 => PrimitiveConvertedType::Uint8,
        ConvertedType::UINT_16 => PrimitiveConvertedType::Uint16,
        ConvertedType::UINT_32 => PrimitiveConvertedType::Uint32,
        ConvertedType::UINT_64 => PrimitiveConvertedType::Uint64,
        ConvertedType::INT_8 => PrimitiveConvertedType::Int8,
        ConvertedType::INT_16 => PrimitiveConvertedType::Int16,
        ConvertedType::INT_32 => PrimitiveConvertedType::Int32,
        ConvertedType::INT_64 => PrimitiveConvertedType::Int64,
        ConvertedType::INTERVAL => PrimitiveConvertedType::Interval,
        ConvertedType::MAP | ConvertedType::MAP_KEY_VALUE | ConvertedType::LIST => {
            return Err(general_err!(
                "Converted type {:?} is not valid for a primitive type",
                ty
            ))
        }
    })
}

/// Converts a [`PrimitiveConvertedType`] back into its Thrift representation, returning
/// the `(precision, scale)` pair when the variant is `Decimal`.
pub fn primitive_converted_to_converted(
    ty: &PrimitiveConvertedType,
) -> (ConvertedType, Option<(i32, i32)>) {
    let converted = match ty {
        PrimitiveConvertedType::Utf8 => ConvertedType::UTF8,
        PrimitiveConvertedType::Json => ConvertedType::JSON,
        PrimitiveConvertedType::Bson => ConvertedType::BSON,
        PrimitiveConvertedType::Enum => ConvertedType::ENUM,
        PrimitiveConvertedType::Decimal(_, _) => ConvertedType::DECIMAL,
        PrimitiveConvertedType::Date => ConvertedType::DATE,
        PrimitiveConvertedType::TimeMillis => ConvertedType::TIME_MILLIS,
        PrimitiveConvertedType::TimeMicros => ConvertedType::TIME_MICROS,
        PrimitiveConvertedType::TimestampMillis => ConvertedType::TIMESTAMP_MILLIS,
        PrimitiveConvertedType::TimestampMicros => ConvertedType::TIMESTAMP_MICROS,
        PrimitiveConvertedType::Uint8 => ConvertedType::UINT_8,
        PrimitiveConvertedType::Uint16 => ConvertedType::UINT_16,
        PrimitiveConvertedType::Uint32 => ConvertedType::UINT_32,
        PrimitiveConvertedType::Uint64 => ConvertedType::UINT_64,
        PrimitiveConvertedType::Int8 => ConvertedType::INT_8,
        PrimitiveConvertedType::Int16 => ConvertedType::INT_16,
        PrimitiveConvertedType::Int32 => ConvertedType::INT_32,
        PrimitiveConvertedType::Int64 => ConvertedType::INT_64,
        PrimitiveConvertedType::Interval => ConvertedType::INTERVAL,
    };
    let maybe_decimal = match ty {
        PrimitiveConvertedType::Decimal(precision, scale) => Some((*precision, *scale)),
        _ => None,
    };
    (converted, maybe_decimal)
}

/// Converts a Thrift [`ConvertedType`] into a [`GroupConvertedType`].
pub fn converted_to_group_converted(ty: &ConvertedType) -> Result<GroupConvertedType> {
    Ok(match ty {
        ConvertedType::MAP => GroupConvertedType::Map,
        ConvertedType::MAP_KEY_VALUE => GroupConvertedType::MapKeyValue,
        ConvertedType::LIST => GroupConvertedType::List,
        _ => {
            return Err(general_err!(
                "Converted type {:?} is not valid for a group type",
                ty
            ))
        }
    })
}

/// Converts a [`GroupConvertedType`] back into its Thrift representation.
pub fn group_converted_converted_to(ty: &GroupConvertedType) -> ConvertedType {
    match ty {
        GroupConvertedType::Map => ConvertedType::MAP,
        GroupConvertedType::MapKeyValue => ConvertedType::MAP_KEY_VALUE,
        GroupConvertedType::List => ConvertedType::LIST,
    }
}
