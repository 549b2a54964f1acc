use std::cell::RefCell;

use crate::core::item::{ItemReader, ItemReaderResult};

/// An item reader over a fixed in-memory sequence.
///
/// Items are handed out in order; after the last one the reader keeps
/// signalling end of source. Reading never fails.
///
/// # Examples
///
/// ```
/// use chunk_batch_rs::item::vec::vec_reader::VecItemReader;
/// use chunk_batch_rs::core::item::ItemReader;
///
/// let reader = VecItemReader::new(vec![1, 2, 3]);
///
/// assert_eq!(reader.read().unwrap(), Some(1));
/// assert_eq!(reader.read().unwrap(), Some(2));
/// assert_eq!(reader.read().unwrap(), Some(3));
/// assert_eq!(reader.read().unwrap(), None);
/// ```
pub struct VecItemReader<T> {
    /// Iterator over the remaining items
    ///
    /// Uses `RefCell` to provide interior mutability so the `read` method
    /// signature stays compatible with the `ItemReader` trait.
    items: RefCell<std::vec::IntoIter<T>>,
}

impl<T> VecItemReader<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items.into_iter()),
        }
    }
}

impl<T> ItemReader<T> for VecItemReader<T> {
    fn read(&self) -> ItemReaderResult<T> {
        Ok(self.items.borrow_mut().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_source_should_be_sticky() {
        let reader = VecItemReader::new(vec![1]);

        assert_eq!(reader.read().unwrap(), Some(1));
        assert_eq!(reader.read().unwrap(), None);
        assert_eq!(reader.read().unwrap(), None);
    }

    #[test]
    fn empty_source_signals_end_immediately() {
        let reader = VecItemReader::new(Vec::<String>::new());
        assert_eq!(reader.read().unwrap(), None);
    }
}
