#![forbid(unsafe_code)]

//! Where list items come from.
//!
//! A list only ever asks for `len()` and the items inside its render window,
//! so a source can be a plain `Vec`, a filtered view, or a paged store.

/// Indexed, read-only item storage.
pub trait ItemSource {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&Self::Item>;

    /// Changes whenever existing items may have changed content. Lists drop
    /// their cached rows when it moves. Replacing the source with another
    /// one is detected without it; sources edited in place must bump it.
    fn revision(&self) -> u64 {
        0
    }
}

impl<T> ItemSource for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T> ItemSource for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}
