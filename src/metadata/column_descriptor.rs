use crate::schema::types::{ParquetType, PrimitiveType};

/// A lightweight, self-contained description of a leaf column, used wherever only the
/// primitive type and its levels are needed (page decoding, statistics deserialization)
/// without pulling in the full schema path.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// The physical, leaf-level type of the column
    pub primitive_type: PrimitiveType,
    /// The maximum definition level for this column
    pub max_def_level: i16,
    /// The maximum repetition level for this column
    pub max_rep_level: i16,
}

/// A descriptor for leaf-level primitive columns.
/// This encapsulates information such as definition and repetition levels and is used to
/// re-assemble nested data.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// The lightweight descriptor used by the page-reading path
    pub descriptor: Descriptor,

    // The path of this column. For instance, "a.b.c.d".
    path_in_schema: Vec<String>,

    // The "leaf" type of this column, as it appears in the schema tree
    primitive_type: ParquetType,

    // The root column type that this leaf descends from
    base_type: ParquetType,
}

impl ColumnDescriptor {
    /// Creates new descriptor for leaf-level column.
    pub fn new(
        primitive_type: ParquetType,
        max_def_level: i16,
        max_rep_level: i16,
        path_in_schema: Vec<String>,
        base_type: ParquetType,
    ) -> Self {
        let lightweight = PrimitiveType::from(&primitive_type);
        Self {
            descriptor: Descriptor {
                primitive_type: lightweight,
                max_def_level,
                max_rep_level,
            },
            path_in_schema,
            primitive_type,
            base_type,
        }
    }

    /// Returns maximum definition level for this column.
    pub fn max_def_level(&self) -> i16 {
        self.descriptor.max_def_level
    }

    /// Returns maximum repetition level for this column.
    pub fn max_rep_level(&self) -> i16 {
        self.descriptor.max_rep_level
    }

    /// Returns the path of this column, e.g. `["a", "b", "c"]`.
    pub fn path_in_schema(&self) -> &[String] {
        &self.path_in_schema
    }

    /// Deprecated alias of [`Self::path_in_schema`].
    pub fn path(&self) -> &[String] {
        &self.path_in_schema
    }

    /// Returns self type [`ParquetType`] for this leaf column.
    pub fn type_(&self) -> &ParquetType {
        &self.primitive_type
    }

    /// Returns the root column [`ParquetType`] that this leaf descends from.
    pub fn base_type(&self) -> &ParquetType {
        &self.base_type
    }

    /// Returns column name.
    pub fn name(&self) -> &str {
        self.primitive_type.name()
    }
}
