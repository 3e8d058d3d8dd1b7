use std::{cell::RefCell, collections::VecDeque};

use crate::core::item::{ItemReader, ItemReaderResult, ItemWriter, ItemWriterResult};

/// Reads items from an in-memory collection, in order.
pub struct IterItemReader<T> {
    items: RefCell<VecDeque<T>>,
}

impl<T> IterItemReader<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: RefCell::new(items.into_iter().collect()),
        }
    }
}

impl<T> ItemReader<T> for IterItemReader<T> {
    fn read(&self) -> ItemReaderResult<T> {
        Ok(self.items.borrow_mut().pop_front())
    }
}

/// Keeps every written item, in write order.
pub struct CollectingWriter<T> {
    items: RefCell<Vec<T>>,
}

impl<T> Default for CollectingWriter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectingWriter<T> {
    pub fn new() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items.into_inner()
    }
}

impl<T: Clone> ItemWriter<T> for CollectingWriter<T> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        self.items.borrow_mut().extend_from_slice(items);
        Ok(())
    }
}
