//! The public `Map<S, V>` façade, a [`Trie<S, V>`] with value mutation
//! layered on top.

use crate::error::Result;
use crate::searcher::Searcher;
use crate::symbol::Symbol;
use crate::trie::{Trie, DEFAULT_MIN_BINARY_SEARCH};
use crate::value::Value;
use crate::variant::{LutMode, Variant};
use crate::virtual_node::{NodeId, VirtualNode};

use std::ops::{Index, IndexMut};

/// An ordered mapping from strings over alphabet `S` to fixed-size values
/// `V`. Keys are immutable once built; values may be updated in place.
#[derive(Clone)]
pub struct Map<S: Symbol, V: Value>(Trie<S, V>);

impl<S: Symbol, V: Value> Map<S, V> {
    /// Builds a `Compact` map from `entries` — the default variant.
    /// `entries` must already be sorted by key and free of duplicates; see
    /// [`sort_entries`](crate::sort_entries) if they aren't.
    pub fn new(entries: Vec<(Vec<S>, V)>) -> Self {
        Self::with_variant(entries, Variant::Compact)
    }

    /// As [`Map::new`], but with no tail compression.
    pub fn new_original(entries: Vec<(Vec<S>, V)>) -> Self {
        Self::with_variant(entries, Variant::Original)
    }

    /// As [`Map::new`], but with lookup-table fan-out at nodes whose fan-out
    /// clears `min_lookup_table_children`.
    pub fn new_fast(entries: Vec<(Vec<S>, V)>, min_lookup_table_children: u32, lut_mode: LutMode) -> Self {
        Self::with_min_binary_search(
            entries,
            Variant::Fast {
                lut_mode,
                min_lookup_table_children,
            },
            DEFAULT_MIN_BINARY_SEARCH,
        )
    }

    /// Builds a map from `entries` under an explicit [`Variant`], using the
    /// default hybrid search threshold.
    pub fn with_variant(entries: Vec<(Vec<S>, V)>, variant: Variant) -> Self {
        Self::with_min_binary_search(entries, variant, DEFAULT_MIN_BINARY_SEARCH)
    }

    /// As [`Map::with_variant`], with an explicit hybrid search threshold.
    pub fn with_min_binary_search(entries: Vec<(Vec<S>, V)>, variant: Variant, min_binary_search: u32) -> Self {
        Map(Trie::build(entries, variant, min_binary_search, true))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn variant(&self) -> Variant {
        self.0.variant()
    }

    /// Whether `key` is in the map.
    pub fn contains_key(&self, key: &[S]) -> bool {
        self.0.exists(key)
    }

    /// The value stored at `key`, if any.
    pub fn get(&self, key: &[S]) -> Option<V> {
        self.0.find(key)
    }

    /// A mutable reference to the value stored at `key`, if any.
    pub fn get_mut(&mut self, key: &[S]) -> Option<&mut V> {
        let id = self.0.locate(key)?;
        let node = &mut self.0.data[id as usize];
        node.is_match().then_some(&mut node.value)
    }

    /// Overwrites the value at `key`, returning `false` (and changing
    /// nothing) if `key` does not name a stored entry.
    pub fn update(&mut self, key: &[S], value: V) -> bool {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// As [`Map::update`], but starting from a [`NodeId`] already located by
    /// the caller (e.g. via [`VirtualNode::id`]), saving a second descent.
    /// `NodeId` carries no borrow of `self`, unlike `VirtualNode` itself, so
    /// it can be held across the `&mut self` this takes.
    pub fn update_at(&mut self, node: NodeId, value: V) -> bool {
        let slot = &mut self.0.data[node.0 as usize];
        if !slot.is_match() {
            return false;
        }
        slot.value = value;
        true
    }

    /// The root, for manual traversal.
    pub fn root(&self) -> VirtualNode<'_, S, V> {
        self.0.root()
    }

    /// A fresh [`Searcher`] borrowing this map, for `exists`/`find` and for
    /// the stateful `prefix`/`predict` traversals.
    pub fn searcher(&self) -> Searcher<'_, S, V> {
        self.0.searcher()
    }

    /// Underlying trie, for introspection or persistence beyond
    /// [`Map::save`]/[`Map::load`].
    pub fn as_trie(&self) -> &Trie<S, V> {
        &self.0
    }

    /// Writes this map in `flattrie`'s on-disk format.
    pub fn save<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.0.save(w)
    }

    /// As [`Map::save`], writing to the file at `path`.
    pub fn save_to_path<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        self.0.save_to_path(path)
    }

    /// Reads a map previously written with [`Map::save`].
    pub fn load<R: std::io::Read>(r: &mut R) -> Result<Self> {
        Ok(Map(Trie::load(r)?))
    }

    /// As [`Map::load`], reading from the file at `path`.
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Map(Trie::load_from_path(path)?))
    }
}

impl<S: Symbol, V: Value> Index<&[S]> for Map<S, V> {
    type Output = V;

    /// Panics if `key` is not present, matching `HashMap`/`BTreeMap`.
    fn index(&self, key: &[S]) -> &V {
        let id = self.0.locate(key).expect("flattrie: key not found in Map");
        let node = &self.0.data[id as usize];
        assert!(node.is_match(), "flattrie: key not found in Map");
        &self.0.data[id as usize].value
    }
}

impl<S: Symbol, V: Value> IndexMut<&[S]> for Map<S, V> {
    /// Panics if `key` is not present.
    fn index_mut(&mut self, key: &[S]) -> &mut V {
        let id = self.0.locate(key).expect("flattrie: key not found in Map");
        let node = &mut self.0.data[id as usize];
        assert!(node.is_match(), "flattrie: key not found in Map");
        &mut node.value
    }
}
