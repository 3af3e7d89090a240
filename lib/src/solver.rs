use crate::feedback::feedback_for_guess;
use crate::feedback::GuessResult;
use crate::results::FormatError;
use crate::results::GameResult;
use crate::results::ScoredWord;
use crate::rules::WordleRules;
use crate::rules::WORD_LENGTH;
use crate::trie::NodeId;
use crate::trie::Trie;
use log::debug;
use log::trace;

/// Gets the words in the trie that satisfy the given rules, ranked by score from highest to lowest.
///
/// Only words of the rules' word length are considered. Words with equal scores keep the trie's
/// alphabetical order, so repeated queries give identical results.
pub fn query(trie: &Trie, rules: &WordleRules) -> Vec<ScoredWord> {
    let mut found = Vec::new();
    collect_candidates(trie, trie.root(), rules, &mut found);
    let mut ranked: Vec<ScoredWord> = found
        .into_iter()
        .map(|id| ScoredWord {
            word: trie.path_string(id),
            score: trie.score(id),
        })
        .filter(|candidate| rules.contains_required(&candidate.word))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    trace!("{} candidates satisfy the current rules.", ranked.len());
    ranked
}

fn collect_candidates(trie: &Trie, id: NodeId, rules: &WordleRules, found: &mut Vec<NodeId>) {
    let node = &trie[id];
    let word_len = node.word_len();
    if word_len == rules.word_length() {
        if node.is_terminal() {
            found.push(id);
        }
        return;
    }
    for (letter, child) in node.children() {
        if rules.allows(word_len, letter) {
            collect_candidates(trie, child, rules, found);
        }
    }
}

/// Solves a Wordle-style puzzle by narrowing a word list with the feedback from each guess.
///
/// ```
/// use rs_wordle_trie::Trie;
/// use rs_wordle_trie::WordleSolver;
///
/// let mut solver = WordleSolver::new(Trie::from_words(["apple", "apply", "angle", "ample"]));
///
/// solver.update("APPL.e").unwrap();
///
/// let words: Vec<String> = solver.candidates().into_iter().map(|c| c.word).collect();
/// assert_eq!(words, vec!["apply"]);
/// ```
#[derive(Debug, Clone)]
pub struct WordleSolver {
    trie: Trie,
    rules: WordleRules,
}

impl WordleSolver {
    /// Constructs a solver for five-letter words. Any other words are pruned from the trie.
    pub fn new(trie: Trie) -> WordleSolver {
        WordleSolver::with_word_length(trie, WORD_LENGTH)
    }

    /// Constructs a solver for words of the given length. Any other words are pruned from the trie.
    pub fn with_word_length(mut trie: Trie, word_length: usize) -> WordleSolver {
        trie.retain_word_length(word_length);
        WordleSolver {
            trie,
            rules: WordleRules::with_word_length(word_length),
        }
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn rules(&self) -> &WordleRules {
        &self.rules
    }

    /// Parses one line of feedback and narrows the rules with it.
    ///
    /// If the feedback cannot be parsed, the rules are left unchanged.
    pub fn update(&mut self, feedback: &str) -> Result<(), FormatError> {
        let guess_result = GuessResult::parse(feedback, self.rules.word_length())?;
        self.update_with_result(&guess_result)
    }

    /// Narrows the rules with already parsed feedback.
    pub fn update_with_result(&mut self, guess_result: &GuessResult) -> Result<(), FormatError> {
        self.rules.apply(guess_result)
    }

    /// All words that satisfy the current rules, best first.
    pub fn candidates(&self) -> Vec<ScoredWord> {
        query(&self.trie, &self.rules)
    }

    /// The best `n` words that satisfy the current rules.
    pub fn top_candidates(&self, n: usize) -> Vec<ScoredWord> {
        let mut candidates = self.candidates();
        candidates.truncate(n);
        candidates
    }

    /// Forgets all feedback, starting a new game with the same words.
    pub fn reset(&mut self) {
        self.rules.reset();
    }
}

/// Attempts to guess the given word within the maximum number of guesses, always guessing the
/// highest scoring candidate that has not been guessed yet.
///
/// The solver is reset before the game starts.
pub fn play_game(objective: &str, max_num_guesses: usize, solver: &mut WordleSolver) -> GameResult {
    if !solver.trie().contains(objective) {
        return GameResult::UnknownWord;
    }
    solver.reset();
    let mut guesses: Vec<String> = Vec::new();
    for _ in 0..max_num_guesses {
        let maybe_guess = solver
            .candidates()
            .into_iter()
            .find(|candidate| !guesses.contains(&candidate.word));
        let guess = match maybe_guess {
            Some(candidate) => candidate.word,
            None => break,
        };
        guesses.push(guess.clone());
        if guess == objective {
            debug!("Guessed {} in {} guesses.", objective, guesses.len());
            return GameResult::Success(guesses);
        }
        let applied =
            feedback_for_guess(objective, &guess).and_then(|result| solver.update_with_result(&result));
        if applied.is_err() {
            return GameResult::UnknownWord;
        }
    }
    debug!("Failed to guess {} after {:?}.", objective, guesses);
    GameResult::Failure(guesses)
}
