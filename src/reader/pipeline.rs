use std::io::Read;

use crate::error::Result;
use crate::page::DataPage;

use super::chunk_decoder::ChunkDecoder;
use super::range_planner::ChunkDescriptor;

/// A bounded FIFO of decoded pages for one chunk: `capacity` pages are decoded ahead of
/// the consumer, so decoding of page `n + capacity` overlaps with the consumer's work on
/// page `n`. The queue ends with exactly one `None`, matching a [`FallibleStreamingIterator`]
/// drained to completion.
pub struct PagePipeline {
    pages: std::collections::VecDeque<Result<DataPage>>,
    exhausted: bool,
}

impl PagePipeline {
    /// Fills the pipeline synchronously, on the calling thread, decoding at most
    /// `capacity` pages per call. This is the default mode: decoding happens inline with
    /// consumption, one `take` at a time.
    pub fn sync<R: Read>(mut decoder: ChunkDecoder<R>, capacity: usize) -> Self {
        let mut pages = std::collections::VecDeque::with_capacity(capacity.min(1024));
        let mut exhausted = false;
        while pages.len() < capacity && !exhausted {
            match decoder.next_page() {
                Ok(Some(page)) => pages.push_back(Ok(page.clone())),
                Ok(None) => exhausted = true,
                Err(e) => {
                    pages.push_back(Err(e));
                    exhausted = true;
                }
            }
        }
        // decoder is dropped once the requested window has been materialized; callers
        // that need more than `capacity` pages should size the window to the chunk.
        Self { pages, exhausted }
    }

    /// Takes the next page out of the pipeline, if any remain.
    pub fn take(&mut self) -> Option<Result<DataPage>> {
        self.pages.pop_front()
    }

    /// Whether every page has been pulled out of the underlying chunk (not necessarily
    /// out of this pipeline's queue, if it was built with a bounded window).
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.pages.is_empty()
    }
}

/// Decodes every page of `chunk` eagerly into a [`PagePipeline`] with no window limit,
/// the simplest mode, appropriate for whole-chunk reads.
pub fn drain_chunk<R: Read>(reader: R, chunk: &ChunkDescriptor) -> PagePipeline {
    let decoder = ChunkDecoder::unfiltered(reader, chunk);
    PagePipeline::sync(decoder, usize::MAX)
}

#[cfg(feature = "async")]
pub use self::r#async::AsyncPagePipeline;

#[cfg(feature = "async")]
mod r#async {
    use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

    use crate::error::Result;
    use crate::page::DataPage;

    /// An executor callback used to run the background fill task. Defaults to spawning a
    /// plain OS thread; callers embedding their own thread pool can inject their own.
    pub type Executor = std::sync::Arc<dyn Fn(Box<dyn FnOnce() + Send>) + Send + Sync>;

    /// Fills a bounded channel of decoded pages from a background task, so a consumer
    /// reading from `rx` overlaps decoding with whatever it does with each page.
    pub struct AsyncPagePipeline {
        rx: Receiver<Result<DataPage>>,
    }

    impl AsyncPagePipeline {
        pub fn spawn<F>(capacity: usize, executor: Executor, produce: F) -> Self
        where
            F: FnOnce(SyncSender<Result<DataPage>>) + Send + 'static,
        {
            let (tx, rx) = sync_channel(capacity);
            executor(Box::new(move || produce(tx)));
            Self { rx }
        }

        pub fn take(&mut self) -> Option<Result<DataPage>> {
            self.rx.recv().ok()
        }

        /// The default executor: one OS thread per chunk.
        pub fn thread_executor() -> Executor {
            std::sync::Arc::new(|task| {
                std::thread::spawn(task);
            })
        }
    }
}

/// A decoded page queue for one projected column, fed either synchronously (decoding
/// inline with [`Self::take`]) or, with the `async` feature, from a background thread
/// that overlaps decoding with whatever the consumer does with each page.
pub enum PageQueue {
    Sync(PagePipeline),
    #[cfg(feature = "async")]
    Async(AsyncPagePipeline),
}

impl PageQueue {
    pub fn take(&mut self) -> Option<Result<DataPage>> {
        match self {
            Self::Sync(pipeline) => pipeline.take(),
            #[cfg(feature = "async")]
            Self::Async(pipeline) => pipeline.take(),
        }
    }
}

/// The per-row-group result of a read operation: one page queue per projected column,
/// in the row group's declared column order. Draining every queue to exhaustion yields
/// every selected page of every projected column exactly once.
pub struct ChunkPageStore {
    pub columns: Vec<(ChunkDescriptor, PageQueue)>,
}

impl ChunkPageStore {
    pub fn new(columns: Vec<(ChunkDescriptor, PageQueue)>) -> Self {
        Self { columns }
    }

    /// The page queue for the column at `path`, if it was part of the projection this
    /// store was built from.
    pub fn column(&mut self, path: &[String]) -> Option<&mut PageQueue> {
        self.columns
            .iter_mut()
            .find(|(chunk, _)| chunk.column.path_in_schema() == path)
            .map(|(_, queue)| queue)
    }

    /// The chunk descriptors of every projected column, in file order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ChunkDescriptor> {
        self.columns.iter().map(|(chunk, _)| chunk)
    }
}
