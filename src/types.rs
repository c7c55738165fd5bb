use crate::schema::types::PhysicalType;

/// A physical native representation of a Parquet fixed-sized type.
pub trait NativeType: Sized + Copy + std::fmt::Debug + Send + Sync {
    type Bytes: AsRef<[u8]> + for<'a> std::convert::TryFrom<&'a [u8]>;

    /// The physical type this native type corresponds to on disk.
    const TYPE: PhysicalType;

    fn to_le_bytes(&self) -> Self::Bytes;

    fn to_be_bytes(&self) -> Self::Bytes;

    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

/// Decodes a `T` from the leading `size_of::<T>()` bytes of `bytes`, assuming little-endian
/// byte order (Parquet's plain encoding is always little-endian).
pub fn decode<T: NativeType>(bytes: &[u8]) -> T {
    let size = std::mem::size_of::<T::Bytes>();
    let bytes: T::Bytes = match bytes[..size].try_into() {
        Ok(b) => b,
        Err(_) => unreachable!(),
    };
    T::from_le_bytes(bytes)
}

macro_rules! native {
    ($type:ty, $physical_type:expr) => {
        impl NativeType for $type {
            type Bytes = [u8; std::mem::size_of::<Self>()];

            const TYPE: PhysicalType = $physical_type;

            #[inline]
            fn to_le_bytes(&self) -> Self::Bytes {
                Self::to_le_bytes(*self)
            }

            #[inline]
            fn to_be_bytes(&self) -> Self::Bytes {
                Self::to_be_bytes(*self)
            }

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }

            #[inline]
            fn from_be_bytes(bytes: Self::Bytes) -> Self {
                Self::from_be_bytes(bytes)
            }
        }
    };
}

native!(i32, PhysicalType::Int32);
native!(i64, PhysicalType::Int64);
native!(f32, PhysicalType::Float);
native!(f64, PhysicalType::Double);

/// Physical representation of `INT96`, Parquet's legacy 96-bit timestamp encoding.
pub type Int96 = [u32; 3];

impl NativeType for Int96 {
    type Bytes = [u8; 12];

    const TYPE: PhysicalType = PhysicalType::Int96;

    #[inline]
    fn to_le_bytes(&self) -> Self::Bytes {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&self[0].to_le_bytes());
        bytes[4..8].copy_from_slice(&self[1].to_le_bytes());
        bytes[8..12].copy_from_slice(&self[2].to_le_bytes());
        bytes
    }

    #[inline]
    fn to_be_bytes(&self) -> Self::Bytes {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&self[2].to_be_bytes());
        bytes[4..8].copy_from_slice(&self[1].to_be_bytes());
        bytes[8..12].copy_from_slice(&self[0].to_be_bytes());
        bytes
    }

    #[inline]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        [
            u32::from_le_bytes(bytes[0..4].try_into().unwrap()),
            u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            u32::from_le_bytes(bytes[8..12].try_into().unwrap()),
        ]
    }

    #[inline]
    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        [
            u32::from_be_bytes(bytes[8..12].try_into().unwrap()),
            u32::from_be_bytes(bytes[4..8].try_into().unwrap()),
            u32::from_be_bytes(bytes[0..4].try_into().unwrap()),
        ]
    }
}
