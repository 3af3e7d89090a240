#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The result of a given letter at a specific location.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LetterResult {
    /// The letter is in the word at this location. Written as the uppercase letter.
    Correct(char),
    /// The letter is in the word, but somewhere else. Written as the lowercase letter.
    PresentNotHere(char),
    /// The letter is not in the word at all. Written as `.` or a space followed by the lowercase
    /// letter.
    NotPresent(char),
}

impl LetterResult {
    pub fn letter(&self) -> char {
        match self {
            LetterResult::Correct(letter)
            | LetterResult::PresentNotHere(letter)
            | LetterResult::NotPresent(letter) => *letter,
        }
    }
}

/// Indicates that a line of feedback could not be read.
///
/// Feedback is rejected as a whole: when parsing fails, no restrictions are updated.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormatError {
    /// A character that is neither a letter nor an absent-letter delimiter.
    #[error("feedback token {index} starts with unsupported character {character:?}")]
    UnknownCharacter { index: usize, character: char },
    /// A delimiter that is not followed by exactly one lowercase letter.
    #[error("feedback token {index} ({token:?}) must be '.' or ' ' followed by a lowercase letter")]
    MalformedAbsent { index: usize, token: String },
    /// The feedback was readable, but has the wrong number of tokens for the word length.
    #[error("expected {expected} feedback tokens, found {found}")]
    TokenCount { expected: usize, found: usize },
}

impl FormatError {
    /// The index of the offending token.
    ///
    /// For [`FormatError::TokenCount`], this is the index of the first missing or surplus token.
    pub fn index(&self) -> usize {
        match self {
            FormatError::UnknownCharacter { index, .. }
            | FormatError::MalformedAbsent { index, .. } => *index,
            FormatError::TokenCount { expected, found } => *expected.min(found),
        }
    }
}

/// Indicates that a saved trie does not describe a consistent tree.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SnapshotError {
    /// Slot 0 is empty, or holds a node that is not a root.
    #[error("the snapshot has no root node")]
    MissingRoot,
    /// A child map points at a slot that is out of range or empty.
    #[error("node {parent} links to child {child}, which is not a live node")]
    DanglingChild { parent: usize, child: usize },
    /// A child's character, parent link or length disagrees with the edge leading to it, or the
    /// child is reachable more than once.
    #[error("node {child} does not match the edge from its parent {parent}")]
    BrokenLink { parent: usize, child: usize },
    /// A node's frequency is not the number of words ending at it plus its children's
    /// frequencies, or a non-root node has no words passing through it.
    #[error("node {node} has frequency {frequency}, which does not match the words below it")]
    Frequency { node: usize, frequency: u32 },
    /// A live node that cannot be reached from the root.
    #[error("node {node} cannot be reached from the root")]
    Unreachable { node: usize },
    /// The list of vacant slots does not match the empty slots.
    #[error("the vacant slot list does not match the removed nodes")]
    VacantSlots,
}

/// A candidate word along with its commonness score.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoredWord {
    pub word: String,
    /// The sum of the trie frequencies along the word's path. Higher is more common.
    pub score: u64,
}

/// Whether the game was won or lost by the guesser.
#[derive(Debug, Eq, PartialEq)]
pub enum GameResult {
    /// Indicates that the guesser won the game, and provides the guesses that were given.
    Success(Vec<String>),
    /// Indicates that the guesser failed to guess the word, and provides the guesses that were given.
    Failure(Vec<String>),
    /// Indicates that the given word was not in the word list.
    UnknownWord,
}
