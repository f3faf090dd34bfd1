//! Field-name trie of one entity type

use std::collections::BTreeMap;

use crate::metadata::FieldDescriptor;

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Index of the field whose capitalized name ends here
    field: Option<usize>,
}

/// Trie over the capitalized field names of a type (`zipCode` is stored
/// as `ZipCode`, the way it appears inside a method name)
#[derive(Debug, Default)]
pub struct FieldTrie {
    root: TrieNode,
}

impl FieldTrie {
    pub fn build(fields: &[FieldDescriptor]) -> Self {
        let mut trie = Self::default();
        for (idx, field) in fields.iter().enumerate() {
            trie.insert(&capitalize(&field.name), idx);
        }
        trie
    }

    fn insert(&mut self, name: &str, idx: usize) {
        let mut node = &mut self.root;
        for c in name.chars() {
            node = node.children.entry(c).or_default();
        }
        // first declaration wins for duplicate names
        node.field.get_or_insert(idx);
    }

    /// Every field whose name is a prefix of `input`, as
    /// `(byte length, field index)`, shortest first
    pub fn prefixes(&self, input: &str) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut node = &self.root;
        for (offset, c) in input.char_indices() {
            match node.children.get(&c) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(idx) = node.field {
                out.push((offset + c.len_utf8(), idx));
            }
        }
        out
    }
}

/// Upper-cases the first character
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
