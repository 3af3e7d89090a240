use crate::trie::NodeId;
use crate::trie::Trie;
use log::trace;
use std::cmp::Reverse;

/// Finds the words in a [`Trie`] that can be spelled from a pool of letters.
///
/// ```
/// use rs_wordle_trie::SubsetSearch;
/// use rs_wordle_trie::Trie;
///
/// let trie = Trie::from_words(["cat", "act", "at", "tack"]);
/// let search = SubsetSearch::new(&trie);
///
/// let words = search.query("cat", false);
/// assert_eq!(words, vec!["act", "cat", "at"]);
/// ```
pub struct SubsetSearch<'a> {
    trie: &'a Trie,
}

impl<'a> SubsetSearch<'a> {
    pub fn new(trie: &'a Trie) -> SubsetSearch<'a> {
        SubsetSearch { trie }
    }

    /// Returns every word that can be formed from the letters in `pool`, longest first.
    ///
    /// If `allow_repeats` is false, each letter in the pool can be used at most as many times as it
    /// appears in the pool. Otherwise any letter in the pool can be used any number of times. The
    /// pool is not case sensitive. Single-letter words are included. The root is never reported,
    /// so an empty word inserted into the trie never shows up here.
    pub fn query(&self, pool: &str, allow_repeats: bool) -> Vec<String> {
        let pool: Vec<char> = pool.to_lowercase().chars().collect();
        if pool.is_empty() {
            return Vec::new();
        }
        let mut found = Vec::new();
        self.collect(self.trie.root(), &pool, allow_repeats, &mut found);
        found.sort_by_key(|id| Reverse(self.trie[*id].word_len()));
        trace!(
            "Found {} words using letters {:?}.",
            found.len(),
            pool.iter().collect::<String>()
        );
        found
            .into_iter()
            .map(|id| self.trie.path_string(id))
            .collect()
    }

    fn collect(&self, id: NodeId, pool: &[char], allow_repeats: bool, found: &mut Vec<NodeId>) {
        let node = &self.trie[id];
        if node.is_terminal() && id != self.trie.root() {
            found.push(id);
        }
        for (letter, child) in node.children() {
            let position = match pool.iter().position(|available| *available == letter) {
                Some(position) => position,
                None => continue,
            };
            if allow_repeats {
                self.collect(child, pool, allow_repeats, found);
            } else {
                let mut remaining = pool.to_vec();
                remaining.swap_remove(position);
                self.collect(child, &remaining, allow_repeats, found);
            }
        }
    }
}
