/// Usual bitpacking
use bitpacking::BitPacker;
use bitpacking::BitPacker1x;

pub fn required_capacity(length: u32) -> usize {
    let chunks_n = (length as usize + BitPacker1x::BLOCK_LEN - 1) / BitPacker1x::BLOCK_LEN;
    chunks_n * BitPacker1x::BLOCK_LEN
}

/// Decodes bitpacked bytes into `u32` values in `num_bits`.
pub fn decode(compressed: &[u8], num_bits: u8, decompressed: &mut [u32]) {
    let bitpacker = BitPacker1x::new();

    let chunks = compressed.chunks_exact(BitPacker1x::BLOCK_LEN);

    let remainder = chunks.remainder();

    let mut last_chunk = remainder.to_vec();
    last_chunk.extend(std::iter::repeat(0).take(BitPacker1x::BLOCK_LEN - remainder.len()));

    chunks
        .chain(std::iter::once(last_chunk.as_ref()))
        .enumerate()
        .for_each(|(i, chunk)| {
            bitpacker.decompress(
                &chunk,
                &mut decompressed[i * BitPacker1x::BLOCK_LEN..(i + 1) * BitPacker1x::BLOCK_LEN],
                num_bits,
            );
        });
}

fn encode(decompressed: &[u32], num_bits: u8, compressed: &mut [u8]) -> usize {
    let bitpacker = BitPacker1x::new();

    let chunks = decompressed.chunks_exact(BitPacker1x::BLOCK_LEN);

    let remainder = chunks.remainder();

    let mut last_chunk = remainder.to_vec();
    last_chunk.extend(std::iter::repeat(0).take(BitPacker1x::BLOCK_LEN - remainder.len()));

    let mut compressed_len = 0;
    chunks
        .chain(std::iter::once(last_chunk.as_ref()))
        .enumerate()
        .for_each(|(i, chunk)| {
            compressed_len += bitpacker.compress(
                &chunk,
                &mut compressed[i * BitPacker1x::BLOCK_LEN..(i + 1) * BitPacker1x::BLOCK_LEN],
                num_bits,
            );
        });
    compressed_len
}
