use log::debug;
use log::warn;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::successors;
use std::ops::Index;
use std::ops::IndexMut;

#[cfg(feature = "serde")]
use crate::results::SnapshotError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const ROOT: NodeId = NodeId(0);

/// Identifies a node within a [`Trie`].
///
/// An id is only meaningful for the trie that produced it. Once the node has been removed, the id
/// may be handed out again for a newly created node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

/// A single vertex of a [`Trie`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrieNode {
    character: Option<char>,
    /// The number of characters on the path from the root to this node.
    word_len: usize,
    frequency: u32,
    /// How many inserted copies of this node's word end here.
    num_ends: u32,
    parent: Option<NodeId>,
    children: BTreeMap<char, NodeId>,
}

impl TrieNode {
    fn new(character: Option<char>, word_len: usize, parent: Option<NodeId>) -> TrieNode {
        TrieNode {
            character,
            word_len,
            frequency: 0,
            num_ends: 0,
            parent,
            children: BTreeMap::new(),
        }
    }

    /// The character on the edge leading into this node, or `None` for the root.
    pub fn character(&self) -> Option<char> {
        self.character
    }

    /// The zero-based position of this node's character within a word, or `None` for the root.
    pub fn depth(&self) -> Option<usize> {
        self.word_len.checked_sub(1)
    }

    /// The length of the word spelled by the path from the root to this node.
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// The number of live words whose path passes through this node.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Whether at least one live word ends exactly at this node.
    pub fn is_terminal(&self) -> bool {
        self.num_ends > 0
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self, character: char) -> Option<NodeId> {
        self.children.get(&character).copied()
    }

    /// Iterates over this node's children in character order.
    pub fn children(&self) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.children.iter().map(|(letter, id)| (*letter, *id))
    }
}

/// A prefix tree over a list of words.
///
/// Each node counts how many words pass through it, which makes it possible to score a word by how
/// common its prefixes are across the whole word list. Nodes live in an arena owned by the trie;
/// children are owned through their parent's child map, and the parent link is a plain [`NodeId`]
/// used only for walking back towards the root.
///
/// ```
/// use rs_wordle_trie::Trie;
///
/// let mut trie = Trie::from_words(["cat", "car", "cart"]);
/// assert_eq!(trie.len(), 3);
///
/// let cart = trie.find("cart").unwrap();
/// assert_eq!(trie.path_string(cart), "cart");
/// // root (3) + c (3) + a (3) + r (2) + t (1)
/// assert_eq!(trie.score(cart), 12);
///
/// trie.prune(|word| word.len() == 3);
/// assert!(!trie.contains("cart"));
/// assert!(trie.contains("car"));
/// ```
///
/// With the `serde` feature, a deserialized trie is checked for consistency and rejected with a
/// [`SnapshotError`](crate::SnapshotError) if any link or frequency is off.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "TrieSnapshot")
)]
pub struct Trie {
    nodes: Vec<Option<TrieNode>>,
    vacant: Vec<NodeId>,
}

impl Trie {
    /// Creates an empty Trie.
    pub fn new() -> Trie {
        Trie {
            nodes: vec![Some(TrieNode::new(None, 0, None))],
            vacant: Vec::new(),
        }
    }

    /// Creates a trie containing each of the given words.
    ///
    /// Words must already be normalized to lowercase letters.
    pub fn from_words<I, S>(words: I) -> Trie
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Trie::new();
        for word in words {
            trie.insert(word.as_ref());
        }
        debug!(
            "Built a trie of {} words using {} nodes.",
            trie.len(),
            trie.node_count()
        );
        trie
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Returns the node with the given id, or `None` if it has been removed.
    pub fn get(&self, id: NodeId) -> Option<&TrieNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// The number of live words in the trie, counting duplicates.
    pub fn len(&self) -> usize {
        self[ROOT].frequency as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.vacant.len()
    }

    /// Inserts the given word, returning the node at which it ends.
    ///
    /// Every node on the word's path, from the root to the final character, has its frequency
    /// incremented once. Inserting an empty word marks the root itself as terminal.
    pub fn insert(&mut self, word: &str) -> NodeId {
        if word.is_empty() {
            warn!("Inserting an empty word; the root will be marked as terminal.");
        }
        let mut id = ROOT;
        self[ROOT].frequency += 1;
        for (index, letter) in word.chars().enumerate() {
            id = match self[id].child(letter) {
                Some(child) => child,
                None => self.add_child(id, letter, index + 1),
            };
            self[id].frequency += 1;
        }
        self[id].num_ends += 1;
        id
    }

    /// Finds the node at the end of the given path, whether or not a word ends there.
    pub fn find(&self, prefix: &str) -> Option<NodeId> {
        prefix
            .chars()
            .try_fold(ROOT, |id, letter| self[id].child(letter))
    }

    /// Returns `true` iff the given word has been inserted and not removed.
    pub fn contains(&self, word: &str) -> bool {
        self.find(word)
            .map_or(false, |id| self[id].is_terminal())
    }

    /// Reconstructs the word spelled by the path from the root to the given node.
    ///
    /// Panics if the node has been removed.
    pub fn path_string(&self, id: NodeId) -> String {
        let mut letters: Vec<char> = self
            .ancestors(id)
            .filter_map(TrieNode::character)
            .collect();
        letters.reverse();
        letters.into_iter().collect()
    }

    /// Sums the frequency of the given node and all of its ancestors, including the root.
    ///
    /// A higher score means the word's prefixes are shared by more words in the trie.
    ///
    /// Panics if the node has been removed.
    pub fn score(&self, id: NodeId) -> u64 {
        self.ancestors(id)
            .map(|node| u64::from(node.frequency))
            .sum()
    }

    /// Removes the word ending at the given node.
    ///
    /// Walking from the node up to the root, each node's frequency drops by the number of copies
    /// removed, and any node left with no words passing through it is detached from its parent.
    /// Returns the number of word copies removed, which is zero if the node is not terminal or no
    /// longer exists.
    pub fn remove(&mut self, id: NodeId) -> u32 {
        let num_copies = match self.get(id) {
            Some(node) if node.is_terminal() => node.num_ends,
            _ => return 0,
        };
        self[id].num_ends = 0;
        let mut maybe_id = Some(id);
        while let Some(current) = maybe_id {
            let node = &mut self[current];
            node.frequency = node.frequency.saturating_sub(num_copies);
            let is_dead = node.frequency < 1;
            maybe_id = node.parent;
            match maybe_id {
                Some(parent) if is_dead => self.detach(parent, current),
                _ => {}
            }
        }
        num_copies
    }

    /// Removes the given word, if present.
    pub fn remove_word(&mut self, word: &str) -> bool {
        match self.find(word) {
            Some(id) => self.remove(id) > 0,
            None => false,
        }
    }

    /// Removes every word that does not satisfy `keep`, returning the number of words removed.
    pub fn prune<F>(&mut self, keep: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let mut num_removed = 0;
        self.prune_from(ROOT, &keep, &mut num_removed);
        debug!(
            "Pruned {} words from the trie, {} remain.",
            num_removed,
            self.len()
        );
        num_removed
    }

    /// Removes every word that is not exactly `word_len` characters long.
    pub fn retain_word_length(&mut self, word_len: usize) -> usize {
        self.prune(|word| word.chars().count() == word_len)
    }

    /// Returns the terminal nodes in depth-first, character order.
    pub fn terminals(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &self[id];
            if node.is_terminal() {
                found.push(id);
            }
            stack.extend(node.children.values().rev());
        }
        found
    }

    /// Returns every live word in depth-first, character order.
    pub fn words(&self) -> Vec<String> {
        self.terminals()
            .into_iter()
            .map(|id| self.path_string(id))
            .collect()
    }

    /// Writes an indented dump of the tree, one node per line, as
    /// `<character>,l:<depth>,f:<frequency>,<terminal>`.
    ///
    /// Nodes whose word is longer than `max_len` are skipped.
    pub fn write_tree<W: fmt::Write>(&self, out: &mut W, max_len: Option<usize>) -> fmt::Result {
        self.write_node(out, ROOT, max_len)
    }

    fn write_node<W: fmt::Write>(
        &self,
        out: &mut W,
        id: NodeId,
        max_len: Option<usize>,
    ) -> fmt::Result {
        let node = &self[id];
        if max_len.map_or(false, |max| node.word_len > max) {
            return Ok(());
        }
        let depth = node.depth().map_or(-1, |depth| depth as i64);
        writeln!(
            out,
            "{}{},l:{},f:{},{}",
            "  ".repeat(node.word_len),
            node.character.map(String::from).unwrap_or_default(),
            depth,
            node.frequency,
            node.is_terminal()
        )?;
        for child in node.children.values() {
            self.write_node(out, *child, max_len)?;
        }
        Ok(())
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &TrieNode> + '_ {
        successors(Some(&self[id]), move |node| node.parent.map(|parent| &self[parent]))
    }

    fn add_child(&mut self, parent: NodeId, letter: char, word_len: usize) -> NodeId {
        let node = TrieNode::new(Some(letter), word_len, Some(parent));
        let id = match self.vacant.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        };
        self[parent].children.insert(letter, id);
        id
    }

    fn detach(&mut self, parent: NodeId, id: NodeId) {
        if let Some(letter) = self[id].character {
            self[parent].children.remove(&letter);
        }
        self.nodes[id.0] = None;
        self.vacant.push(id);
    }

    fn prune_from<F>(&mut self, id: NodeId, keep: &F, num_removed: &mut usize)
    where
        F: Fn(&str) -> bool,
    {
        let should_remove = match self.get(id) {
            Some(node) => node.is_terminal() && !keep(&self.path_string(id)),
            None => return,
        };
        if should_remove {
            *num_removed += self.remove(id) as usize;
        }
        // Removal may detach this node, and always mutates the child maps below it.
        let children: Vec<NodeId> = match self.get(id) {
            Some(node) => node.children.values().copied().collect(),
            None => return,
        };
        for child in children {
            self.prune_from(child, keep, num_removed);
        }
    }
}

/// A trie as read from a snapshot, before it has been checked.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TrieSnapshot {
    nodes: Vec<Option<TrieNode>>,
    vacant: Vec<NodeId>,
}

#[cfg(feature = "serde")]
impl TryFrom<TrieSnapshot> for Trie {
    type Error = SnapshotError;

    fn try_from(snapshot: TrieSnapshot) -> Result<Trie, SnapshotError> {
        let trie = Trie {
            nodes: snapshot.nodes,
            vacant: snapshot.vacant,
        };
        trie.check_links()?;
        Ok(trie)
    }
}

#[cfg(feature = "serde")]
impl Trie {
    /// Verifies that every live node hangs off the root exactly once, with parent links, lengths
    /// and frequencies that agree with the edges, and that `vacant` lists exactly the empty slots.
    fn check_links(&self) -> Result<(), SnapshotError> {
        match self.get(ROOT) {
            Some(root)
                if root.character.is_none() && root.parent.is_none() && root.word_len == 0 => {}
            _ => return Err(SnapshotError::MissingRoot),
        }
        let mut visited = vec![false; self.nodes.len()];
        visited[ROOT.0] = true;
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &self[id];
            let mut below = u64::from(node.num_ends);
            for (letter, child_id) in node.children() {
                let child = self.get(child_id).ok_or(SnapshotError::DanglingChild {
                    parent: id.0,
                    child: child_id.0,
                })?;
                if visited[child_id.0]
                    || child.character != Some(letter)
                    || child.parent != Some(id)
                    || child.word_len != node.word_len + 1
                {
                    return Err(SnapshotError::BrokenLink {
                        parent: id.0,
                        child: child_id.0,
                    });
                }
                visited[child_id.0] = true;
                below += u64::from(child.frequency);
                stack.push(child_id);
            }
            if u64::from(node.frequency) != below || (id != ROOT && node.frequency < 1) {
                return Err(SnapshotError::Frequency {
                    node: id.0,
                    frequency: node.frequency,
                });
            }
        }

        let mut empty = Vec::new();
        for (index, slot) in self.nodes.iter().enumerate() {
            match slot {
                Some(_) if !visited[index] => {
                    return Err(SnapshotError::Unreachable { node: index })
                }
                Some(_) => {}
                None => empty.push(NodeId(index)),
            }
        }
        let mut vacant = self.vacant.clone();
        vacant.sort_unstable();
        if vacant != empty {
            return Err(SnapshotError::VacantSlots);
        }
        Ok(())
    }
}

impl Default for Trie {
    fn default() -> Trie {
        Trie::new()
    }
}

impl Index<NodeId> for Trie {
    type Output = TrieNode;

    fn index(&self, id: NodeId) -> &TrieNode {
        match self.get(id) {
            Some(node) => node,
            None => panic!("{:?} has been removed from the trie", id),
        }
    }
}

impl IndexMut<NodeId> for Trie {
    fn index_mut(&mut self, id: NodeId) -> &mut TrieNode {
        match self.nodes.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("{:?} has been removed from the trie", id),
        }
    }
}

impl fmt::Display for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, None)
    }
}
