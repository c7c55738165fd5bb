// See https://github.com/apache/parquet-format/blob/master/Encodings.md#run-length-encoding--bit-packing-hybrid-rle--3

use super::ceil8;
use super::uleb128;

#[derive(Debug, PartialEq, Eq)]
pub enum HybridEncoded<'a> {
    /// A bitpacked slice. The consumer must know its bit-width to unpack it.
    Bitpacked(&'a [u8]),
    /// A RLE-encoded slice.
    Rle(&'a [u8], usize),
}

/// An iterator that, given a slice of bytes, returns `HybridEncoded`
pub struct Decoder<'a> {
    values: &'a [u8],
    rle_items: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(values: &'a [u8], num_bits: u32) -> Self {
        Self {
            values,
            rle_items: ceil8(num_bits as usize),
        }
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = HybridEncoded<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.values.is_empty() {
            return None;
        }
        let (indicator, consumed) = uleb128::decode(self.values);
        self.values = &self.values[consumed..];
        if indicator & 1 == 1 {
            // is bitpacking
            let items = indicator as usize >> 1;
            let result = Some(HybridEncoded::Bitpacked(&self.values[..items]));
            self.values = &self.values[items..];
            result
        } else {
            // is rle
            let decompressed_items = indicator as usize >> 1;
            let result = Some(HybridEncoded::Rle(
                &self.values[..self.rle_items],
                decompressed_items,
            ));
            self.values = &self.values[self.rle_items..];
            result
        }
    }
}
