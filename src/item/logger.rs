use std::fmt::Debug;

use log::info;

use crate::{
    core::item::{ItemReadListener, ItemWriteListener, ItemWriter},
    BatchError,
};

/// Writer that logs each item instead of persisting it.
#[derive(Default)]
pub struct LoggerWriter {}

impl<T> ItemWriter<T> for LoggerWriter
where
    T: Debug,
{
    fn write(&self, items: &[T]) -> Result<(), BatchError> {
        items.iter().for_each(|item| info!("Record:{:?}", item));
        Ok(())
    }
}

/// Read listener that logs every item pulled from the reader.
#[derive(Default)]
pub struct LoggerReadListener {}

impl<T> ItemReadListener<T> for LoggerReadListener
where
    T: Debug,
{
    fn after_read(&self, item: &T) -> Result<(), BatchError> {
        info!("read {:?}", item);
        Ok(())
    }

    fn on_read_error(&self, error: &BatchError) {
        info!("read error: {}", error);
    }
}

/// Write listener that logs every chunk handed to the writer.
#[derive(Default)]
pub struct LoggerWriteListener {}

impl<T> ItemWriteListener<T> for LoggerWriteListener
where
    T: Debug,
{
    fn after_write(&self, items: &[T]) -> Result<(), BatchError> {
        info!("wrote {:?}", items);
        Ok(())
    }

    fn on_write_error(&self, error: &BatchError, items: &[T]) {
        info!("write error on {:?}: {}", items, error);
    }
}
