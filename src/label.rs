//! Two-character cell labels.
//!
//! Every cell on every monitor is addressed by a [`Label`] made of two
//! characters from an [`Alphabet`].  The [`LabelAllocator`] hands out the
//! whole `k × k` label space without replacement, in a shuffled order, so
//! allocation never loops and a fixed seed reproduces the same layout.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

/// Home row first, then the top row, then the bottom row.
pub const DEFAULT_ALPHABET: &str = "ASDFGHJKLQWERTYUIOPZXCVBNM";

/// Errors from building an alphabet or allocating labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("alphabet is empty")]
    EmptyAlphabet,
    #[error("alphabet character {0:?} is not an ASCII letter")]
    NotALetter(char),
    #[error("alphabet character {0:?} appears more than once")]
    DuplicateCharacter(char),
    #[error("all {capacity} labels are already in use")]
    Exhausted { capacity: usize },
}

/// An ordered set of unique uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from `letters`, uppercasing each one.
    pub fn new(letters: &str) -> Result<Self, LabelError> {
        let mut chars: Vec<char> = Vec::with_capacity(letters.len());
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(LabelError::NotALetter(c));
            }
            let upper = c.to_ascii_uppercase();
            if chars.contains(&upper) {
                return Err(LabelError::DuplicateCharacter(upper));
            }
            chars.push(upper);
        }
        if chars.is_empty() {
            return Err(LabelError::EmptyAlphabet);
        }
        Ok(Self { chars })
    }

    /// Number of characters (`k`).
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always `false`; an alphabet cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of distinct two-character labels (`k²`).
    pub fn capacity(&self) -> usize {
        self.chars.len() * self.chars.len()
    }

    /// Case-normalise `c` and return it if it belongs to the alphabet.
    pub fn normalize(&self, c: char) -> Option<char> {
        let upper = c.to_ascii_uppercase();
        self.chars.contains(&upper).then_some(upper)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            chars: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

/// A two-character cell label, always uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label([char; 2]);

impl Label {
    pub fn new(first: char, second: char) -> Self {
        Self([first.to_ascii_uppercase(), second.to_ascii_uppercase()])
    }

    pub fn first(&self) -> char {
        self.0[0]
    }

    pub fn second(&self) -> char {
        self.0[1]
    }

    /// Build a label from exactly two typed characters.
    pub fn from_chars(chars: &[char]) -> Option<Self> {
        match chars {
            [a, b] => Some(Self::new(*a, *b)),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

/// Hands out every label of an alphabet exactly once.
#[derive(Debug, Clone)]
pub struct LabelAllocator {
    /// Labels not yet handed out; allocation pops from the back.
    pool: Vec<Label>,
    capacity: usize,
}

impl LabelAllocator {
    /// Allocator over the full label space in first-character-major order.
    ///
    /// With the default alphabet the first labels are `AA`, `AS`, `AD`, …
    pub fn ordered(alphabet: &Alphabet) -> Self {
        let mut pool = Self::label_space(alphabet);
        pool.reverse();
        Self {
            capacity: pool.len(),
            pool,
        }
    }

    /// Allocator over the full label space in a shuffled order.
    ///
    /// With `Some(seed)` the order is reproducible; with `None` it is drawn
    /// from the thread RNG.
    pub fn shuffled(alphabet: &Alphabet, seed: Option<u64>) -> Self {
        let mut pool = Self::label_space(alphabet);
        match seed {
            Some(seed) => pool.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => pool.shuffle(&mut rand::rng()),
        }
        Self {
            capacity: pool.len(),
            pool,
        }
    }

    /// Total number of labels this allocator can ever hand out.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Labels still available.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Take the next unused label.
    pub fn next_label(&mut self) -> Result<Label, LabelError> {
        self.pool.pop().ok_or(LabelError::Exhausted {
            capacity: self.capacity,
        })
    }

    fn label_space(alphabet: &Alphabet) -> Vec<Label> {
        let chars = alphabet.chars();
        chars
            .iter()
            .flat_map(|&a| chars.iter().map(move |&b| Label::new(a, b)))
            .collect()
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_alphabet_has_26_letters() {
        let a = Alphabet::default();
        assert_eq!(a.len(), 26);
        assert_eq!(a.capacity(), 676);
    }

    #[test]
    fn alphabet_uppercases_input() {
        let a = Alphabet::new("abc").unwrap();
        assert_eq!(a.chars(), &['A', 'B', 'C']);
    }

    #[test]
    fn alphabet_rejects_bad_input() {
        assert_eq!(Alphabet::new(""), Err(LabelError::EmptyAlphabet));
        assert_eq!(Alphabet::new("ab1"), Err(LabelError::NotALetter('1')));
        assert_eq!(Alphabet::new("aBA"), Err(LabelError::DuplicateCharacter('A')));
    }

    #[test]
    fn normalize_is_case_insensitive() {
        let a = Alphabet::new("QZ").unwrap();
        assert_eq!(a.normalize('q'), Some('Q'));
        assert_eq!(a.normalize('Z'), Some('Z'));
        assert_eq!(a.normalize('x'), None);
    }

    #[test]
    fn label_display_and_parts() {
        let l = Label::new('q', 'z');
        assert_eq!(l.to_string(), "QZ");
        assert_eq!(l.first(), 'Q');
        assert_eq!(l.second(), 'Z');
    }

    #[test]
    fn label_from_chars_needs_exactly_two() {
        assert_eq!(Label::from_chars(&['A']), None);
        assert_eq!(Label::from_chars(&['A', 'S']), Some(Label::new('A', 'S')));
        assert_eq!(Label::from_chars(&['A', 'S', 'D']), None);
    }

    #[test]
    fn ordered_allocator_starts_with_home_row() {
        let mut alloc = LabelAllocator::ordered(&Alphabet::default());
        assert_eq!(alloc.next_label().unwrap().to_string(), "AA");
        assert_eq!(alloc.next_label().unwrap().to_string(), "AS");
        assert_eq!(alloc.next_label().unwrap().to_string(), "AD");
    }

    #[test]
    fn full_space_is_unique_and_well_formed() {
        let alphabet = Alphabet::default();
        let mut alloc = LabelAllocator::shuffled(&alphabet, Some(7));
        let mut seen = HashSet::new();
        for _ in 0..alloc.capacity() {
            let l = alloc.next_label().unwrap();
            assert!(alphabet.chars().contains(&l.first()));
            assert!(alphabet.chars().contains(&l.second()));
            assert_eq!(l.to_string().len(), 2);
            assert!(seen.insert(l), "duplicate label {l}");
        }
        assert_eq!(seen.len(), 676);
        assert_eq!(alloc.remaining(), 0);
    }

    #[test]
    fn exhausted_allocator_fails_instead_of_looping() {
        let mut alloc = LabelAllocator::shuffled(&Alphabet::new("AB").unwrap(), None);
        for _ in 0..4 {
            alloc.next_label().unwrap();
        }
        assert_eq!(
            alloc.next_label(),
            Err(LabelError::Exhausted { capacity: 4 })
        );
    }

    #[test]
    fn same_seed_same_order() {
        let alphabet = Alphabet::default();
        let mut a = LabelAllocator::shuffled(&alphabet, Some(42));
        let mut b = LabelAllocator::shuffled(&alphabet, Some(42));
        for _ in 0..50 {
            assert_eq!(a.next_label(), b.next_label());
        }
    }
}
