//! A set of selected rows within a batch.

use std::ops::Range;

/// A fixed-size set of selected row positions, stored as a bit array.
///
/// The bits are stored in little-endian order within `u64` words: bit 0 is the
/// least significant bit of the first word. Bits beyond `len` in the last word
/// are always zero.
///
/// A decode pass only resolves the rows that are selected; index and null
/// information for unselected rows is unspecified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectivityVector {
    len: usize,
    bits: Vec<u64>,
}

impl SelectivityVector {
    /// Creates a selectivity vector of `len` rows with every row selected.
    pub fn all(len: usize) -> SelectivityVector {
        let mut bits = vec![u64::MAX; len.div_ceil(64)];
        Self::mask_tail(&mut bits, len);
        SelectivityVector { len, bits }
    }

    /// Creates a selectivity vector of `len` rows with no row selected.
    pub fn none(len: usize) -> SelectivityVector {
        SelectivityVector {
            len,
            bits: vec![0; len.div_ceil(64)],
        }
    }

    /// Creates a selectivity vector with the rows at `positions` selected.
    ///
    /// # Panics
    ///
    /// Panics if any position is `>= len`.
    pub fn from_positions(positions: impl IntoIterator<Item = usize>, len: usize) -> Self {
        let mut rows = Self::none(len);
        for position in positions {
            rows.select(position);
        }
        rows
    }

    /// Total number of row slots (selected or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_selected(&self, row: usize) -> bool {
        debug_assert!(row < self.len);
        (self.bits[row / 64] >> (row % 64)) & 1 != 0
    }

    #[inline]
    pub fn select(&mut self, row: usize) {
        assert!(row < self.len, "row {row} out of bounds ({})", self.len);
        self.bits[row / 64] |= 1u64 << (row % 64);
    }

    #[inline]
    pub fn deselect(&mut self, row: usize) {
        assert!(row < self.len, "row {row} out of bounds ({})", self.len);
        self.bits[row / 64] &= !(1u64 << (row % 64));
    }

    /// Selects every row in `range`.
    pub fn select_range(&mut self, range: Range<usize>) {
        assert!(range.end <= self.len);
        for row in range {
            self.select(row);
        }
    }

    /// Deselects every row in `range`.
    pub fn deselect_range(&mut self, range: Range<usize>) {
        assert!(range.end <= self.len);
        for row in range {
            self.deselect(row);
        }
    }

    /// Number of selected rows.
    pub fn count_selected(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if every row slot is selected.
    pub fn is_all_selected(&self) -> bool {
        self.count_selected() == self.len
    }

    /// One past the last selected row, or `0` if nothing is selected.
    pub fn end(&self) -> usize {
        self.bits
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + (64 - w.leading_zeros() as usize))
            .unwrap_or(0)
    }

    /// Returns an iterator over the selected rows in ascending order.
    pub fn iter(&self) -> SelectedRows<'_> {
        SelectedRows {
            words: &self.bits,
            word_index: 0,
            current: self.bits.first().copied().unwrap_or(0),
        }
    }

    fn mask_tail(words: &mut [u64], len: usize) {
        let rem = len % 64;
        if rem != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }
}

/// Iterator over the selected row positions of a [`SelectivityVector`].
pub struct SelectedRows<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for SelectedRows<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_index * 64 + bit);
            }
            self.word_index += 1;
            if self.word_index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.word_index];
        }
    }
}

impl<'a> IntoIterator for &'a SelectivityVector {
    type Item = usize;
    type IntoIter = SelectedRows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
