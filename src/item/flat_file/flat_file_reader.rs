use std::{
    cell::RefCell,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// A line-oriented flat-file item reader.
///
/// Each line of the underlying resource is one record, yielded verbatim as a
/// `String` with the trailing line terminator (`\n` or `\r\n`) stripped. No
/// parsing or validation happens here: the line mapping is pass-through, and
/// records are opaque to the engine.
///
/// # Implementation Details
///
/// - Uses a `RefCell` around a `BufReader` for interior mutability, so `read`
///   keeps the `&self` signature of the `ItemReader` trait
/// - I/O failures while reading surface as `BatchError::ItemReader` and abort
///   the running step
///
/// # Examples
///
/// ```
/// use chunk_batch_rs::item::flat_file::flat_file_reader::FlatFileItemReaderBuilder;
/// use chunk_batch_rs::core::item::ItemReader;
///
/// let data = "first record\nsecond record\n";
///
/// let reader = FlatFileItemReaderBuilder::new().from_reader(data.as_bytes());
///
/// assert_eq!(reader.read().unwrap(), Some("first record".to_string()));
/// assert_eq!(reader.read().unwrap(), Some("second record".to_string()));
/// assert_eq!(reader.read().unwrap(), None);
/// ```
pub struct FlatFileItemReader<R> {
    reader: RefCell<BufReader<R>>,
}

impl<R: Read> ItemReader<String> for FlatFileItemReader<R> {
    /// Reads the next line from the resource.
    ///
    /// # Returns
    /// - `Ok(Some(line))` for the next record, terminator stripped
    /// - `Ok(None)` at end of source, and on every call thereafter
    /// - `Err(BatchError::ItemReader)` when the backing resource fails
    fn read(&self) -> ItemReaderResult<String> {
        let mut line = String::new();

        match self.reader.borrow_mut().read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Ok(Some(line))
            }
            Err(error) => Err(BatchError::ItemReader(error.to_string())),
        }
    }
}

/// A builder for [`FlatFileItemReader`].
///
/// The line mapping is fixed (pass-through), so the builder only chooses the
/// data source.
#[derive(Default)]
pub struct FlatFileItemReaderBuilder {}

impl FlatFileItemReaderBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// Creates a `FlatFileItemReader` from any source implementing `Read`.
    pub fn from_reader<R: Read>(self, rdr: R) -> FlatFileItemReader<R> {
        FlatFileItemReader {
            reader: RefCell::new(BufReader::new(rdr)),
        }
    }

    /// Creates a `FlatFileItemReader` from a file path.
    ///
    /// The file is opened eagerly: a missing or unopenable resource is a
    /// configuration problem, reported before any step runs.
    ///
    /// # Returns
    /// - `Ok(reader)` when the file was opened
    /// - `Err(BatchError::Configuration)` when it could not be
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<FlatFileItemReader<File>, BatchError> {
        let path = path.as_ref();

        match File::open(path) {
            Ok(file) => Ok(self.from_reader(file)),
            Err(error) => Err(BatchError::Configuration(format!(
                "cannot open '{}': {}",
                path.display(),
                error
            ))),
        }
    }
}
