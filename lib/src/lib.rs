#![cfg_attr(feature = "unstable", feature(test))]

mod feedback;
mod results;
mod rules;
mod solver;
mod subset;
mod trie;

pub use feedback::*;
pub use results::*;
pub use rules::*;
pub use solver::*;
pub use subset::SubsetSearch;
pub use trie::NodeId;
pub use trie::Trie;
pub use trie::TrieNode;
