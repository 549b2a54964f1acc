use crate::error::BatchError;

/// Result of a single read attempt.
///
/// `Ok(None)` signals the end of the source. Once a reader has returned
/// `Ok(None)` it must keep returning it on every subsequent call.
pub type ItemReaderResult<R> = Result<Option<R>, BatchError>;

/// Result of processing a single item.
///
/// `Ok(None)` filters the item: it is dropped from the current chunk and does
/// not count towards the write count.
pub type ItemProcessorResult<W> = Result<Option<W>, BatchError>;

pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;
}

pub trait ItemProcessor<R, W> {
    fn process(&self, item: &R) -> ItemProcessorResult<W>;
}

pub trait ItemWriter<W> {
    /// Writes a chunk of items. The chunk is persisted as a whole: on error
    /// the items count as unwritten.
    fn write(&self, items: &[W]) -> Result<(), BatchError>;

    fn flush(&self) -> Result<(), BatchError> {
        Ok(())
    }

    /// Invoked once per step, before the first chunk. Header hook.
    fn open(&self) -> Result<(), BatchError> {
        Ok(())
    }

    /// Invoked once per step, after the last chunk, only when every chunk was
    /// written. Footer hook.
    fn close(&self) -> Result<(), BatchError> {
        Ok(())
    }
}

/// Identity processor used when a step is built without an explicit one.
pub struct PassThroughProcessor;

impl<R: Clone> ItemProcessor<R, R> for PassThroughProcessor {
    fn process(&self, item: &R) -> ItemProcessorResult<R> {
        Ok(Some(item.clone()))
    }
}

/// Observer of the read side of a step.
///
/// All hooks default to no-ops. A failing hook aborts the step: the engine
/// reports it as `BatchError::ItemListener`.
pub trait ItemReadListener<R> {
    fn before_read(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn after_read(&self, _item: &R) -> Result<(), BatchError> {
        Ok(())
    }

    fn on_read_error(&self, _error: &BatchError) {}
}

/// Observer of the write side of a step.
pub trait ItemWriteListener<W> {
    fn before_write(&self, _items: &[W]) -> Result<(), BatchError> {
        Ok(())
    }

    fn after_write(&self, _items: &[W]) -> Result<(), BatchError> {
        Ok(())
    }

    fn on_write_error(&self, _error: &BatchError, _items: &[W]) {}
}
