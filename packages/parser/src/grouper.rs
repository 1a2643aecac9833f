//! Fixed-size grouping of flat sequences.
//!
//! Other papers tables put a title row and a presenter row after each other,
//! so rows are consumed in pairs.

use std::slice::ChunksExact;

/// Iterator over complete groups of a slice.
///
/// Items that do not fill a last group are not yielded; see [`Groups::remainder`].
#[derive(Debug, Clone)]
pub struct Groups<'a, T> {
    chunks: ChunksExact<'a, T>,
}

impl<'a, T> Groups<'a, T> {
    /// Trailing items that did not fill a complete group.
    #[must_use]
    pub fn remainder(&self) -> &'a [T] {
        self.chunks.remainder()
    }
}

impl<'a, T> Iterator for Groups<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T> ExactSizeIterator for Groups<'_, T> {}

/// Split a slice into consecutive groups of `size` items.
///
/// A `size` of zero is treated as one.
///
/// # Examples
/// ```
/// use legcowatch_parser::grouper::grouper;
///
/// let rows = ["title 1", "presenter 1", "title 2", "presenter 2", "stray"];
/// let groups = grouper(&rows, 2);
/// assert_eq!(groups.remainder(), &["stray"]);
/// assert_eq!(groups.count(), 2);
/// ```
pub fn grouper<T>(items: &[T], size: usize) -> Groups<'_, T> {
    Groups {
        chunks: items.chunks_exact(size.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs() {
        let items = [1, 2, 3, 4];
        let groups: Vec<_> = grouper(&items, 2).collect();
        assert_eq!(groups, vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_odd_trailing_item_is_remainder() {
        let items = [1, 2, 3];
        let groups = grouper(&items, 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.remainder(), &[3]);
    }

    #[test]
    fn test_empty() {
        let items: [u8; 0] = [];
        assert_eq!(grouper(&items, 2).count(), 0);
    }

    #[test]
    fn test_zero_size() {
        let items = ['a', 'b'];
        assert_eq!(grouper(&items, 0).count(), 2);
    }
}
