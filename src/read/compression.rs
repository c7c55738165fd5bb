use crate::compression::{create_codec, Compression};
use crate::error::Result;
use crate::page::{CompressedDataPage, DataPage, DataPageHeader};
use crate::FallibleStreamingIterator;

use super::PageIterator;

fn decompress_v1(
    compressed_buffer: &[u8],
    compression: Compression,
    uncompressed_page_size: usize,
    buffer: &mut Vec<u8>,
) -> Result<()> {
    buffer.clear();
    buffer.resize(uncompressed_page_size, 0);

    let mut codec = create_codec(&compression)?.ok_or_else(|| {
        general_err!("The page is said to be compressed but no compression codec was found")
    })?;
    codec.decompress(compressed_buffer, buffer)
}

fn decompress_v2(
    compressed_buffer: &[u8],
    compression: Compression,
    uncompressed_page_size: usize,
    levels_byte_length: usize,
    buffer: &mut Vec<u8>,
) -> Result<()> {
    // When processing data page v2, depending on whether the page is compressed we
    // must account for the uncompressed repetition/definition levels that precede the
    // (possibly compressed) values.
    buffer.clear();
    buffer.extend_from_slice(&compressed_buffer[..levels_byte_length]);
    buffer.resize(uncompressed_page_size, 0);

    let mut codec = create_codec(&compression)?.ok_or_else(|| {
        general_err!("The page is said to be compressed but no compression codec was found")
    })?;
    codec.decompress(
        &compressed_buffer[levels_byte_length..],
        &mut buffer[levels_byte_length..],
    )
}

/// Decompresses a [`CompressedDataPage`] into a [`DataPage`], using `buffer` as the
/// (reused) scratch space for the decompressed bytes.
pub fn decompress(compressed_page: CompressedDataPage, buffer: &mut Vec<u8>) -> Result<DataPage> {
    let (header, mut compressed_buffer, compression, uncompressed_page_size, dictionary_page, descriptor, selected_rows) =
        compressed_page.into_parts();

    let can_decompress = match &header {
        DataPageHeader::V1(_) => compression != Compression::Uncompressed,
        DataPageHeader::V2(d) => {
            compression != Compression::Uncompressed && d.is_compressed.unwrap_or(true)
        }
    };

    if !can_decompress {
        // nothing to do: swap the buffers so the caller keeps its scratch space and we
        // re-use the page's own (already uncompressed) buffer.
        std::mem::swap(&mut compressed_buffer, buffer);
        return Ok(DataPage::new_read(
            header,
            compressed_buffer,
            dictionary_page,
            descriptor,
            selected_rows,
        ));
    }

    match &header {
        DataPageHeader::V1(_) => {
            decompress_v1(&compressed_buffer, compression, uncompressed_page_size, buffer)?;
        }
        DataPageHeader::V2(d) => {
            let levels_byte_length =
                (d.definition_levels_byte_length + d.repetition_levels_byte_length) as usize;
            decompress_v2(
                &compressed_buffer,
                compression,
                uncompressed_page_size,
                levels_byte_length,
                buffer,
            )?;
        }
    };

    let out = std::mem::take(buffer);
    // keep the compressed buffer around for the next page to reuse.
    *buffer = compressed_buffer;
    buffer.clear();
    Ok(DataPage::new_read(
        header,
        out,
        dictionary_page,
        descriptor,
        selected_rows,
    ))
}

/// A [`FallibleStreamingIterator`] that decompresses [`CompressedDataPage`]s read off an
/// inner iterator of already-read, in-memory pages.
pub struct BasicDecompressor<I: Iterator<Item = Result<CompressedDataPage>>> {
    iter: I,
    buffer: Vec<u8>,
    current: Option<DataPage>,
}

impl<I: Iterator<Item = Result<CompressedDataPage>>> BasicDecompressor<I> {
    /// Creates a new [`BasicDecompressor`].
    pub fn new(iter: I, buffer: Vec<u8>) -> Self {
        Self {
            iter,
            buffer,
            current: None,
        }
    }

    /// Consumes self into its iterator and scratch buffer.
    pub fn into_inner(self) -> (I, Vec<u8>) {
        (self.iter, self.buffer)
    }
}

impl<I: Iterator<Item = Result<CompressedDataPage>>> FallibleStreamingIterator
    for BasicDecompressor<I>
{
    type Item = DataPage;
    type Error = crate::error::Error;

    fn advance(&mut self) -> Result<()> {
        let mut buffer = match self.current.take() {
            Some(page) => page.buffer,
            None => std::mem::take(&mut self.buffer),
        };

        self.current = match self.iter.next().transpose()? {
            Some(page) => Some(decompress(page, &mut buffer)?),
            None => {
                self.buffer = buffer;
                None
            }
        };
        Ok(())
    }

    fn get(&self) -> Option<&Self::Item> {
        self.current.as_ref()
    }
}

/// A [`FallibleStreamingIterator`] that decompresses [`CompressedDataPage`]s read directly
/// off a [`PageIterator`], reusing both the compressed and decompressed buffers across pages.
pub struct Decompressor<I: PageIterator> {
    iter: I,
    buffer: Vec<u8>,
    current: Option<DataPage>,
}

impl<I: PageIterator> Decompressor<I> {
    /// Creates a new [`Decompressor`].
    pub fn new(iter: I, buffer: Vec<u8>) -> Self {
        Self {
            iter,
            buffer,
            current: None,
        }
    }

    /// Consumes self into its iterator and the two internal buffers.
    pub fn into_buffers(self) -> (Vec<u8>, Vec<u8>) {
        let mut iter = self.iter;
        let mut compressed_buffer = vec![];
        iter.swap_buffer(&mut compressed_buffer);
        (compressed_buffer, self.buffer)
    }
}

impl<I: PageIterator> FallibleStreamingIterator for Decompressor<I> {
    type Item = DataPage;
    type Error = crate::error::Error;

    fn advance(&mut self) -> Result<()> {
        let mut buffer = if let Some(page) = self.current.take() {
            page.buffer
        } else {
            std::mem::take(&mut self.buffer)
        };

        self.current = match self.iter.next().transpose()? {
            Some(page) => {
                // give the now-unused decompression buffer back to the page reader so it
                // can reuse it for the next page's raw read.
                self.iter.swap_buffer(&mut buffer);
                Some(decompress(page, &mut buffer)?)
            }
            None => {
                self.buffer = buffer;
                None
            }
        };
        Ok(())
    }

    fn get(&self) -> Option<&Self::Item> {
        self.current.as_ref()
    }
}
