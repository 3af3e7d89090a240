use crate::results::FormatError;
use crate::results::LetterResult;
use crate::rules::WORD_LENGTH;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The feedback for a single guess, one [`LetterResult`] per letter of the guess.
///
/// Feedback is written as one token per letter:
///
/// * an uppercase letter: the letter is in the word at this location,
/// * a lowercase letter: the letter is in the word, but not at this location,
/// * `.` or a space followed by a lowercase letter: the letter is not in the word.
///
/// ```
/// use rs_wordle_trie::GuessResult;
/// use rs_wordle_trie::LetterResult;
///
/// let result: GuessResult = "Ap.p.le".parse().unwrap();
/// assert_eq!(
///     result.letters,
///     vec![
///         LetterResult::Correct('a'),
///         LetterResult::PresentNotHere('p'),
///         LetterResult::NotPresent('p'),
///         LetterResult::NotPresent('l'),
///         LetterResult::PresentNotHere('e'),
///     ]
/// );
/// assert_eq!(result.to_string(), "Ap.p.le");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuessResult {
    /// The result of each letter, provided in the same letter order as in the guess.
    pub letters: Vec<LetterResult>,
}

impl GuessResult {
    /// Parses feedback for a word of the given length.
    pub fn parse(text: &str, word_length: usize) -> Result<GuessResult, FormatError> {
        let mut letters = Vec::with_capacity(word_length);
        let mut chars = text.chars();
        while let Some(first) = chars.next() {
            let index = letters.len();
            let result = match first {
                '.' | ' ' => match chars.next() {
                    Some(letter) if letter.is_ascii_lowercase() => LetterResult::NotPresent(letter),
                    Some(other) => {
                        return Err(FormatError::MalformedAbsent {
                            index,
                            token: [first, other].iter().collect(),
                        })
                    }
                    None => {
                        return Err(FormatError::MalformedAbsent {
                            index,
                            token: first.to_string(),
                        })
                    }
                },
                letter if letter.is_ascii_uppercase() => {
                    LetterResult::Correct(letter.to_ascii_lowercase())
                }
                letter if letter.is_ascii_lowercase() => LetterResult::PresentNotHere(letter),
                character => return Err(FormatError::UnknownCharacter { index, character }),
            };
            letters.push(result);
        }
        if letters.len() != word_length {
            return Err(FormatError::TokenCount {
                expected: word_length,
                found: letters.len(),
            });
        }
        Ok(GuessResult { letters })
    }

    /// Returns `true` iff every letter is in the right location.
    pub fn is_solved(&self) -> bool {
        self.letters
            .iter()
            .all(|result| matches!(result, LetterResult::Correct(_)))
    }
}

impl FromStr for GuessResult {
    type Err = FormatError;

    /// Parses feedback for a five-letter word.
    fn from_str(text: &str) -> Result<GuessResult, FormatError> {
        GuessResult::parse(text, WORD_LENGTH)
    }
}

impl fmt::Display for GuessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.letters {
            match result {
                LetterResult::Correct(letter) => write!(f, "{}", letter.to_ascii_uppercase())?,
                LetterResult::PresentNotHere(letter) => write!(f, "{}", letter)?,
                LetterResult::NotPresent(letter) => write!(f, ".{}", letter)?,
            }
        }
        Ok(())
    }
}

/// Determines the feedback for the given `guess` when applied to the given `objective`.
///
/// Any letter that occurs somewhere in the objective is reported as present, even when the guess
/// repeats it more often than the objective does.
pub fn feedback_for_guess(objective: &str, guess: &str) -> Result<GuessResult, FormatError> {
    let objective: Vec<char> = objective.chars().collect();
    let guess_length = guess.chars().count();
    if guess_length != objective.len() {
        return Err(FormatError::TokenCount {
            expected: objective.len(),
            found: guess_length,
        });
    }
    Ok(GuessResult {
        letters: guess
            .chars()
            .zip(objective.iter())
            .map(|(letter, objective_letter)| {
                if letter == *objective_letter {
                    return LetterResult::Correct(letter);
                }
                if objective.contains(&letter) {
                    return LetterResult::PresentNotHere(letter);
                }
                LetterResult::NotPresent(letter)
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_token_kinds() -> Result<(), FormatError> {
        let result = GuessResult::parse("S t.aRe", 5)?;

        assert_eq!(
            result.letters,
            vec![
                LetterResult::Correct('s'),
                LetterResult::NotPresent('t'),
                LetterResult::NotPresent('a'),
                LetterResult::Correct('r'),
                LetterResult::PresentNotHere('e'),
            ]
        );
        Ok(())
    }

    #[test]
    fn parse_space_before_dot_fails() {
        assert_eq!(
            GuessResult::parse("S .t.aRe", 5),
            Err(FormatError::MalformedAbsent {
                index: 1,
                token: " .".to_string()
            })
        );
    }

    #[test]
    fn parse_other_word_lengths() -> Result<(), FormatError> {
        assert_eq!(GuessResult::parse("aB", 2)?.letters.len(), 2);
        assert_eq!(GuessResult::parse("", 0)?.letters.len(), 0);
        Ok(())
    }

    #[test]
    fn parse_trailing_delimiter_fails() {
        assert_eq!(
            GuessResult::parse("ABCD.", 5),
            Err(FormatError::MalformedAbsent {
                index: 4,
                token: ".".to_string()
            })
        );
    }

    #[test]
    fn parse_delimiter_with_uppercase_fails() {
        let error = GuessResult::parse("a.Bcde", 5).unwrap_err();

        assert_eq!(
            error,
            FormatError::MalformedAbsent {
                index: 1,
                token: ".B".to_string()
            }
        );
        assert_eq!(error.index(), 1);
    }

    #[test]
    fn parse_double_delimiter_fails() {
        assert_eq!(
            GuessResult::parse(". abcd", 5),
            Err(FormatError::MalformedAbsent {
                index: 0,
                token: ". ".to_string()
            })
        );
    }

    #[test]
    fn parse_unknown_character_fails() {
        assert_eq!(
            GuessResult::parse("ab3de", 5),
            Err(FormatError::UnknownCharacter {
                index: 2,
                character: '3'
            })
        );
        assert_eq!(
            GuessResult::parse("abcdé", 5),
            Err(FormatError::UnknownCharacter {
                index: 4,
                character: 'é'
            })
        );
    }

    #[test]
    fn parse_wrong_token_count_fails() {
        let too_short = GuessResult::parse(".a.b.c.d", 5).unwrap_err();
        let too_long = GuessResult::parse("abcdef", 5).unwrap_err();

        assert_eq!(
            too_short,
            FormatError::TokenCount {
                expected: 5,
                found: 4
            }
        );
        assert_eq!(too_short.index(), 4);
        assert_eq!(too_long.index(), 5);
    }

    #[test]
    fn display_round_trips_through_parse() -> Result<(), FormatError> {
        let result: GuessResult = " aB.cDe".parse()?;

        assert_eq!(result.to_string(), ".aB.cDe");
        assert_eq!(result.to_string().parse::<GuessResult>()?, result);
        Ok(())
    }

    #[test]
    fn is_solved() -> Result<(), FormatError> {
        assert!("ABCDE".parse::<GuessResult>()?.is_solved());
        assert!(!"ABCDe".parse::<GuessResult>()?.is_solved());
        Ok(())
    }

    #[test]
    fn feedback_for_guess_marks_each_letter() -> Result<(), FormatError> {
        let result = feedback_for_guess("piano", "amino")?;

        assert_eq!(
            result.letters,
            vec![
                LetterResult::PresentNotHere('a'),
                LetterResult::NotPresent('m'),
                LetterResult::PresentNotHere('i'),
                LetterResult::Correct('n'),
                LetterResult::Correct('o'),
            ]
        );
        assert_eq!(result.to_string(), "a.miNO");
        Ok(())
    }

    #[test]
    fn feedback_for_guess_repeated_letters_are_present() -> Result<(), FormatError> {
        let result = feedback_for_guess("mesas", "sassy")?;

        assert_eq!(result.to_string(), "saSs.y");
        Ok(())
    }

    #[test]
    fn feedback_for_guess_length_mismatch() {
        assert_eq!(
            feedback_for_guess("apple", "app"),
            Err(FormatError::TokenCount {
                expected: 5,
                found: 3
            })
        );
    }
}
