//! Fixed-width bit vector.

use std::fmt;

const WORD_BITS: usize = 64;

/// A fixed-length binary string packed into 64-bit words.
///
/// Bit `0` is the most significant bit of the first gene, matching the
/// left-to-right reading of the textual form (`"0110..."`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    words: Vec<u64>,
    len: usize,
}

impl Chromosome {
    /// All-zero chromosome of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// # Panics
    /// Panics if `i >= len`.
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bit {i} out of range (len {})", self.len);
        (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    /// # Panics
    /// Panics if `i >= len`.
    pub fn set(&mut self, i: usize, bit: bool) {
        assert!(i < self.len, "bit {i} out of range (len {})", self.len);
        let mask = 1u64 << (i % WORD_BITS);
        if bit {
            self.words[i / WORD_BITS] |= mask;
        } else {
            self.words[i / WORD_BITS] &= !mask;
        }
    }

    /// # Panics
    /// Panics if `i >= len`.
    pub fn flip(&mut self, i: usize) {
        assert!(i < self.len, "bit {i} out of range (len {})", self.len);
        self.words[i / WORD_BITS] ^= 1u64 << (i % WORD_BITS);
    }

    /// Reads `width` bits starting at `start` as a big-endian unsigned integer.
    pub fn read_uint(&self, start: usize, width: usize) -> u64 {
        debug_assert!(width <= 64);
        (start..start + width).fold(0u64, |acc, i| (acc << 1) | self.get(i) as u64)
    }

    /// Writes the low `width` bits of `value` big-endian at `start`.
    pub fn write_uint(&mut self, start: usize, width: usize, value: u64) {
        debug_assert!(width <= 64);
        for j in 0..width {
            let bit = (value >> (width - 1 - j)) & 1 == 1;
            self.set(start + j, bit);
        }
    }

    /// Exchanges bits `[cut, len)` with `other` (single-point crossover).
    ///
    /// # Panics
    /// Panics if the lengths differ or `cut > len`.
    pub fn swap_tail(&mut self, other: &mut Chromosome, cut: usize) {
        assert_eq!(self.len, other.len, "chromosomes must have equal length");
        assert!(cut <= self.len, "cut {cut} beyond length {}", self.len);
        for i in cut..self.len {
            let a = self.get(i);
            let b = other.get(i);
            if a != b {
                self.flip(i);
                other.flip(i);
            }
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.get(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint_layout() {
        let mut c = Chromosome::zeros(12);
        c.write_uint(0, 3, 0b101);
        c.write_uint(3, 3, 0b001);
        c.write_uint(9, 3, 0b110);
        assert_eq!(c.to_string(), "101001000110");
        assert_eq!(c.read_uint(0, 3), 5);
        assert_eq!(c.read_uint(3, 3), 1);
        assert_eq!(c.read_uint(6, 3), 0);
        assert_eq!(c.read_uint(9, 3), 6);
    }

    #[test]
    fn test_spans_word_boundary() {
        let mut c = Chromosome::zeros(130);
        c.write_uint(60, 10, 0b10_1100_0111);
        assert_eq!(c.read_uint(60, 10), 0b10_1100_0111);
        c.flip(129);
        assert!(c.get(129));
        assert_eq!(c.count_ones(), 7);
    }

    #[test]
    fn test_swap_tail() {
        let mut a = Chromosome::zeros(8);
        let mut b = Chromosome::zeros(8);
        b.write_uint(0, 8, 0xFF);
        a.swap_tail(&mut b, 5);
        assert_eq!(a.to_string(), "00000111");
        assert_eq!(b.to_string(), "11111000");

        // Cut at the ends: nothing or everything swaps.
        let (a0, b0) = (a.clone(), b.clone());
        a.swap_tail(&mut b, 8);
        assert_eq!((a.clone(), b.clone()), (a0.clone(), b0.clone()));
        a.swap_tail(&mut b, 0);
        assert_eq!((a, b), (b0, a0));
    }

    #[test]
    fn test_empty() {
        let c = Chromosome::zeros(0);
        assert!(c.is_empty());
        assert_eq!(c.to_string(), "");
        assert_eq!(c.read_uint(0, 0), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        Chromosome::zeros(4).get(4);
    }
}
