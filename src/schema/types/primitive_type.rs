use super::{BasicTypeInfo, LogicalType, ParquetType, PhysicalType, PrimitiveConvertedType};

/// A thin, by-value view of a primitive (leaf) [`ParquetType`].
///
/// This carries just enough information to make per-page decisions (statistics
/// deserialization, physical-type dispatch) without having to walk the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveType {
    pub field_info: BasicTypeInfo,
    pub logical_type: Option<LogicalType>,
    pub converted_type: Option<PrimitiveConvertedType>,
    pub physical_type: PhysicalType,
}

impl PrimitiveType {
    pub fn from_physical(name: String, physical_type: PhysicalType) -> Self {
        Self {
            field_info: BasicTypeInfo::new(name, super::Repetition::Optional, None, false),
            logical_type: None,
            converted_type: None,
            physical_type,
        }
    }
}

impl From<&ParquetType> for PrimitiveType {
    fn from(type_: &ParquetType) -> Self {
        match type_ {
            ParquetType::PrimitiveType {
                basic_info,
                logical_type,
                converted_type,
                physical_type,
            } => Self {
                field_info: basic_info.clone(),
                logical_type: logical_type.clone(),
                converted_type: *converted_type,
                physical_type: *physical_type,
            },
            ParquetType::GroupType { .. } => {
                panic!("a PrimitiveType can only be built from a leaf ParquetType")
            }
        }
    }
}
