use crate::feedback::GuessResult;
use crate::results::FormatError;
use crate::results::LetterResult;
use log::debug;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default number of letters in a word.
pub const WORD_LENGTH: usize = 5;

const ALPHABET_SIZE: u32 = 26;

/// A set of lowercase ASCII letters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LetterSet(u32);

impl LetterSet {
    /// Every letter from `a` to `z`.
    pub const ALPHABET: LetterSet = LetterSet((1 << ALPHABET_SIZE) - 1);

    pub fn empty() -> LetterSet {
        LetterSet(0)
    }

    /// A set holding just the given letter. Letters outside `a..=z` give an empty set.
    pub fn only(letter: char) -> LetterSet {
        LetterSet(LetterSet::bit(letter).unwrap_or(0))
    }

    pub fn contains(&self, letter: char) -> bool {
        LetterSet::bit(letter).map_or(false, |bit| self.0 & bit != 0)
    }

    /// Adds the letter, returning `true` if it was not already present.
    pub fn insert(&mut self, letter: char) -> bool {
        match LetterSet::bit(letter) {
            Some(bit) if self.0 & bit == 0 => {
                self.0 |= bit;
                true
            }
            _ => false,
        }
    }

    /// Removes the letter, returning `true` if it was present.
    pub fn remove(&mut self, letter: char) -> bool {
        match LetterSet::bit(letter) {
            Some(bit) if self.0 & bit != 0 => {
                self.0 &= !bit;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the letter if exactly one remains.
    pub fn solved_letter(&self) -> Option<char> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    /// Iterates over the letters in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = char> {
        let bits = self.0;
        (b'a'..=b'z')
            .filter(move |letter| bits & (1 << (letter - b'a')) != 0)
            .map(char::from)
    }

    fn bit(letter: char) -> Option<u32> {
        if letter.is_ascii_lowercase() {
            Some(1 << (letter as u32 - 'a' as u32))
        } else {
            None
        }
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<I: IntoIterator<Item = char>>(letters: I) -> LetterSet {
        let mut set = LetterSet::empty();
        for letter in letters {
            set.insert(letter);
        }
        set
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|letter| write!(f, "{}", letter))
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LetterSet({:?})", self.to_string())
    }
}

/// The letters still allowed at each location of the objective word, plus the letters known to be
/// somewhere in the word.
///
/// Rules start out allowing every letter everywhere, and are narrowed by applying the feedback from
/// each guess in turn.
///
/// ```
/// use rs_wordle_trie::WordleRules;
///
/// let mut rules = WordleRules::new();
/// rules.apply(&"Sl.a.t.e".parse().unwrap()).unwrap();
///
/// assert_eq!(rules.position(0).unwrap().solved_letter(), Some('s'));
/// assert!(!rules.position(1).unwrap().contains('l'));
/// assert_eq!(rules.required_count('l'), 1);
/// assert!(rules.is_satisfied_by("skill"));
/// assert!(!rules.is_satisfied_by("spell"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordleRules {
    positions: Vec<LetterSet>,
    required_letters: BTreeMap<char, u8>,
}

impl WordleRules {
    /// Creates rules for five-letter words with no restrictions.
    pub fn new() -> WordleRules {
        WordleRules::with_word_length(WORD_LENGTH)
    }

    /// Creates rules for words of the given length with no restrictions.
    pub fn with_word_length(word_length: usize) -> WordleRules {
        WordleRules {
            positions: vec![LetterSet::ALPHABET; word_length],
            required_letters: BTreeMap::new(),
        }
    }

    pub fn word_length(&self) -> usize {
        self.positions.len()
    }

    /// The letters allowed at the given location.
    pub fn position(&self, index: usize) -> Option<LetterSet> {
        self.positions.get(index).copied()
    }

    pub fn positions(&self) -> &[LetterSet] {
        &self.positions
    }

    /// Letters known to be in the word, with the minimum number of times each must appear.
    pub fn required_letters(&self) -> &BTreeMap<char, u8> {
        &self.required_letters
    }

    pub fn required_count(&self, letter: char) -> u8 {
        self.required_letters.get(&letter).copied().unwrap_or(0)
    }

    /// Returns `true` iff the letter may appear at the given location.
    pub fn allows(&self, index: usize, letter: char) -> bool {
        self.positions
            .get(index)
            .map_or(false, |set| set.contains(letter))
    }

    pub fn num_unsolved(&self) -> usize {
        self.positions.iter().filter(|set| set.len() > 1).count()
    }

    /// Returns `true` iff every location has been narrowed to a single letter.
    pub fn is_solved(&self) -> bool {
        self.num_unsolved() == 0
    }

    /// Clears all restrictions.
    pub fn reset(&mut self) {
        *self = WordleRules::with_word_length(self.word_length());
    }

    /// Returns `true` iff the word contains every required letter, at least as many times as
    /// required.
    pub fn contains_required(&self, word: &str) -> bool {
        self.required_letters
            .iter()
            .all(|(letter, count)| word.chars().filter(|c| c == letter).count() >= *count as usize)
    }

    /// Returns `true` iff the word has the right length, only uses allowed letters at each
    /// location, and contains every required letter.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        word.chars().count() == self.word_length()
            && word
                .chars()
                .enumerate()
                .all(|(index, letter)| self.allows(index, letter))
            && self.contains_required(word)
    }

    /// Narrows these rules using the feedback from a guess.
    ///
    /// The feedback must have one result per location; otherwise it is rejected and the rules are
    /// left unchanged.
    pub fn apply(&mut self, guess_result: &GuessResult) -> Result<(), FormatError> {
        if guess_result.letters.len() != self.word_length() {
            return Err(FormatError::TokenCount {
                expected: self.word_length(),
                found: guess_result.letters.len(),
            });
        }
        for (index, result) in guess_result.letters.iter().enumerate() {
            match *result {
                LetterResult::Correct(letter) => {
                    self.positions[index] = LetterSet::only(letter);
                }
                LetterResult::NotPresent(letter) => self.set_letter_not_present(letter),
                LetterResult::PresentNotHere(letter) => {
                    self.set_letter_present_not_here(letter, index)
                }
            }
        }
        debug!(
            "Applied feedback {}: {} unsolved positions, required letters {:?}.",
            guess_result,
            self.num_unsolved(),
            self.required_letters
        );
        Ok(())
    }

    fn set_letter_not_present(&mut self, letter: char) {
        // Solved locations keep their letter, since the letter may be a repeat of one pinned there.
        for set in self.positions.iter_mut().filter(|set| set.len() > 1) {
            set.remove(letter);
        }
    }

    fn set_letter_present_not_here(&mut self, letter: char, index: usize) {
        self.positions[index].remove(letter);
        if let Entry::Vacant(entry) = self.required_letters.entry(letter) {
            // A copy pinned elsewhere means this hint refers to a second copy.
            let is_pinned = self
                .positions
                .iter()
                .any(|set| set.solved_letter() == Some(letter));
            entry.insert(if is_pinned { 2 } else { 1 });
        }
        let unsolved: Vec<usize> = (0..self.positions.len())
            .filter(|index| self.positions[*index].len() > 1)
            .collect();
        if unsolved.len() == 2 {
            for index in unsolved {
                if self.positions[index].contains(letter) {
                    self.positions[index] = LetterSet::only(letter);
                }
            }
        }
    }
}

impl Default for WordleRules {
    fn default() -> WordleRules {
        WordleRules::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(text: &str) -> GuessResult {
        text.parse().unwrap()
    }

    #[test]
    fn letter_set_insert_remove() {
        let mut set = LetterSet::empty();

        assert!(set.insert('q'));
        assert!(!set.insert('q'));
        assert!(set.insert('a'));
        assert!(!set.insert('A'));

        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "aq");
        assert!(set.remove('a'));
        assert!(!set.remove('a'));
        assert_eq!(set.solved_letter(), Some('q'));
    }

    #[test]
    fn letter_set_alphabet() {
        assert_eq!(LetterSet::ALPHABET.len(), 26);
        assert_eq!(LetterSet::ALPHABET.iter().next(), Some('a'));
        assert_eq!(LetterSet::ALPHABET.iter().last(), Some('z'));
        assert!(!LetterSet::ALPHABET.contains('!'));
        assert_eq!("zebra".chars().collect::<LetterSet>().to_string(), "aberz");
    }

    #[test]
    fn new_rules_allow_everything() {
        let rules = WordleRules::new();

        assert_eq!(rules.word_length(), 5);
        assert_eq!(rules.num_unsolved(), 5);
        assert!(rules.positions().iter().all(|set| *set == LetterSet::ALPHABET));
        assert!(rules.required_letters().is_empty());
        assert!(rules.is_satisfied_by("xylyl"));
        assert!(!rules.is_satisfied_by("xyly"));
    }

    #[test]
    fn correct_solves_position() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();

        rules.apply(&result("A.b.c.dE"))?;

        assert_eq!(rules.position(0), Some(LetterSet::only('a')));
        assert_eq!(rules.position(4), Some(LetterSet::only('e')));
        assert_eq!(rules.num_unsolved(), 3);
        Ok(())
    }

    #[test]
    fn not_present_skips_solved_positions() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();

        rules.apply(&result("E.a.b.c.d"))?;
        rules.apply(&result(".e.f.g.h.i"))?;

        assert_eq!(rules.position(0), Some(LetterSet::only('e')));
        for index in 1..5 {
            let set = rules.position(index).unwrap();
            assert_eq!(set.len(), 26 - 9);
            assert!(!set.contains('e'));
        }
        Ok(())
    }

    #[test]
    fn present_not_here_requires_letter() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();

        rules.apply(&result("r.a.i.s.e"))?;

        assert!(!rules.allows(0, 'r'));
        assert!(rules.allows(1, 'r'));
        assert_eq!(rules.required_count('r'), 1);
        assert!(rules.is_satisfied_by("court"));
        assert!(!rules.is_satisfied_by("cloud"));
        Ok(())
    }

    #[test]
    fn present_not_here_counts_letter_once() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();

        rules.apply(&result("l.x.xl.x"))?;
        rules.apply(&result(".xl.x.x.x"))?;

        assert_eq!(rules.required_count('l'), 1);
        Ok(())
    }

    #[test]
    fn present_not_here_with_pinned_copy_requires_two() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();

        rules.apply(&result("S.x.x.xs"))?;

        assert_eq!(rules.required_count('s'), 2);
        assert!(rules.is_satisfied_by("sushi"));
        assert!(!rules.is_satisfied_by("steal"));
        Ok(())
    }

    #[test]
    fn present_not_here_forces_last_open_position() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();

        rules.apply(&result("AB.c.dC"))?;
        assert_eq!(rules.num_unsolved(), 2);

        rules.apply(&result("ABe.fC"))?;

        assert_eq!(rules.position(3), Some(LetterSet::only('e')));
        assert!(!rules.allows(2, 'e'));
        assert_eq!(rules.num_unsolved(), 1);
        Ok(())
    }

    #[test]
    fn present_not_here_collapses_both_open_positions() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();
        rules.apply(&result("AB.c.dC"))?;

        // The hint lands on a solved location, so both open locations still allow the letter.
        rules.apply(&result("aB.x.yC"))?;

        assert_eq!(rules.position(2), Some(LetterSet::only('a')));
        assert_eq!(rules.position(3), Some(LetterSet::only('a')));
        assert_eq!(rules.position(0), Some(LetterSet::empty()));
        assert_eq!(rules.required_count('a'), 1);
        Ok(())
    }

    #[test]
    fn present_not_here_with_three_open_positions_does_not_collapse() -> Result<(), FormatError> {
        let mut rules = WordleRules::new();

        rules.apply(&result("ABe.dC"))?;

        assert_eq!(rules.num_unsolved(), 2);
        assert!(!rules.allows(2, 'e'));
        assert!(rules.allows(3, 'e'));
        assert!(rules.allows(3, 'f'));
        Ok(())
    }

    #[test]
    fn apply_wrong_length_leaves_rules_unchanged() {
        let mut rules = WordleRules::new();
        let four_letters = GuessResult::parse("ABCD", 4).unwrap();

        assert_eq!(
            rules.apply(&four_letters),
            Err(FormatError::TokenCount {
                expected: 5,
                found: 4
            })
        );
        assert_eq!(rules, WordleRules::new());
    }

    #[test]
    fn reset_keeps_word_length() -> Result<(), FormatError> {
        let mut rules = WordleRules::with_word_length(3);
        rules.apply(&GuessResult::parse("Ab.c", 3)?)?;

        rules.reset();

        assert_eq!(rules, WordleRules::with_word_length(3));
        Ok(())
    }
}
