use std::{
    cell::RefCell,
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{core::item::ItemWriter, BatchError};

/// Produces the content of a header or footer line at write time.
///
/// Deferred on purpose: a callback may capture a
/// [`JobExecution`](crate::core::job::JobExecution) handle and read an earlier
/// step's final counts, which only exist once that step has completed.
pub type LineCallback = Box<dyn Fn() -> Result<String, BatchError>>;

/// A line-delimited flat-file item writer.
///
/// Each item of a chunk becomes one line, in order; `Display` is the
/// pass-through line aggregator. An optional header line is written by
/// `open()` before any chunk, and an optional footer line by `close()` after
/// the last chunk — `close()` only runs when every chunk was written, so a
/// failed step produces no footer. A step over an empty source still produces
/// the header and footer.
///
/// Output is buffered; each chunk is flushed as a whole once written.
pub struct FlatFileItemWriter<T: Write> {
    stream: RefCell<BufWriter<T>>,
    header_callback: Option<LineCallback>,
    footer_callback: Option<LineCallback>,
}

impl<T: Write, O: Display> ItemWriter<O> for FlatFileItemWriter<T> {
    fn write(&self, items: &[O]) -> Result<(), BatchError> {
        let mut stream = self.stream.borrow_mut();

        for item in items {
            if let Err(error) = writeln!(stream, "{}", item) {
                return Err(BatchError::ItemWriter(error.to_string()));
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), BatchError> {
        match self.stream.borrow_mut().flush() {
            Ok(()) => Ok(()),
            Err(error) => Err(BatchError::ItemWriter(error.to_string())),
        }
    }

    /// Writes the header line, if one is configured.
    fn open(&self) -> Result<(), BatchError> {
        if let Some(callback) = &self.header_callback {
            let header = callback()?;
            if let Err(error) = writeln!(self.stream.borrow_mut(), "{}", header) {
                return Err(BatchError::ItemWriter(error.to_string()));
            }
        }
        Ok(())
    }

    /// Writes the footer line, if one is configured, and flushes the stream.
    fn close(&self) -> Result<(), BatchError> {
        if let Some(callback) = &self.footer_callback {
            let footer = callback()?;
            if let Err(error) = writeln!(self.stream.borrow_mut(), "{}", footer) {
                return Err(BatchError::ItemWriter(error.to_string()));
            }
        }
        ItemWriter::<O>::flush(self)
    }
}

impl<T: Write> FlatFileItemWriter<T> {
    /// Flushes the buffer and returns the underlying sink.
    pub fn into_inner(self) -> Result<T, BatchError> {
        match self.stream.into_inner().into_inner() {
            Ok(stream) => Ok(stream),
            Err(error) => Err(BatchError::ItemWriter(error.to_string())),
        }
    }
}

/// A builder for [`FlatFileItemWriter`].
///
/// # Examples
///
/// ```
/// use chunk_batch_rs::item::flat_file::flat_file_writer::FlatFileItemWriterBuilder;
/// use chunk_batch_rs::core::item::ItemWriter;
///
/// let writer = FlatFileItemWriterBuilder::new()
///     .header_callback(|| Ok("inventory".to_string()))
///     .from_writer(vec![]);
///
/// ItemWriter::<&str>::open(&writer).unwrap();
/// writer.write(&["apples", "pears"]).unwrap();
/// ItemWriter::<&str>::close(&writer).unwrap();
///
/// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "inventory\napples\npears\n");
/// ```
#[derive(Default)]
pub struct FlatFileItemWriterBuilder {
    header_callback: Option<LineCallback>,
    footer_callback: Option<LineCallback>,
}

impl FlatFileItemWriterBuilder {
    pub fn new() -> Self {
        Self {
            header_callback: None,
            footer_callback: None,
        }
    }

    /// Configures the single header line written before all data lines.
    pub fn header_callback(
        mut self,
        callback: impl Fn() -> Result<String, BatchError> + 'static,
    ) -> Self {
        self.header_callback = Some(Box::new(callback));
        self
    }

    /// Configures the single footer line written after all data lines.
    pub fn footer_callback(
        mut self,
        callback: impl Fn() -> Result<String, BatchError> + 'static,
    ) -> Self {
        self.footer_callback = Some(Box::new(callback));
        self
    }

    /// Creates a `FlatFileItemWriter` over any sink implementing `Write`.
    pub fn from_writer<W: Write>(self, wtr: W) -> FlatFileItemWriter<W> {
        FlatFileItemWriter {
            stream: RefCell::new(BufWriter::new(wtr)),
            header_callback: self.header_callback,
            footer_callback: self.footer_callback,
        }
    }

    /// Creates a `FlatFileItemWriter` writing to a fresh file.
    ///
    /// The file is created eagerly, truncating any previous content: re-running
    /// a job writes a fresh output resource, it never merges with a prior run.
    ///
    /// # Returns
    /// - `Ok(writer)` when the file was created
    /// - `Err(BatchError::Configuration)` when it could not be
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<FlatFileItemWriter<File>, BatchError> {
        let path = path.as_ref();

        match File::create(path) {
            Ok(file) => Ok(self.from_writer(file)),
            Err(error) => Err(BatchError::Configuration(format!(
                "cannot create '{}': {}",
                path.display(),
                error
            ))),
        }
    }
}
