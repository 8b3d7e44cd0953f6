//! The public `Set<S>` façade, a [`Trie<S, ()>`] with the value slot elided
//! from every signature.

use crate::error::Result;
use crate::searcher::Searcher;
use crate::symbol::Symbol;
use crate::trie::{Trie, DEFAULT_MIN_BINARY_SEARCH};
use crate::variant::{LutMode, Variant};
use crate::virtual_node::VirtualNode;

/// An ordered set of strings over alphabet `S`.
#[derive(Clone)]
pub struct Set<S: Symbol>(Trie<S, ()>);

impl<S: Symbol> Set<S> {
    /// Builds a `Compact` set from `keys` — the default variant. `keys` must
    /// already be sorted and deduplicated; see [`sort_keys`] if they aren't.
    pub fn new(keys: Vec<Vec<S>>) -> Self {
        Self::with_variant(keys, Variant::Compact)
    }

    /// As [`Set::new`], but with no tail compression.
    pub fn new_original(keys: Vec<Vec<S>>) -> Self {
        Self::with_variant(keys, Variant::Original)
    }

    /// As [`Set::new`], but with lookup-table fan-out at nodes whose fan-out
    /// clears `min_lookup_table_children`.
    pub fn new_fast(keys: Vec<Vec<S>>, min_lookup_table_children: u32, lut_mode: LutMode) -> Self {
        Self::with_min_binary_search(
            keys,
            Variant::Fast {
                lut_mode,
                min_lookup_table_children,
            },
            DEFAULT_MIN_BINARY_SEARCH,
        )
    }

    /// Builds a set from `keys` under an explicit [`Variant`], using the
    /// default hybrid search threshold.
    pub fn with_variant(keys: Vec<Vec<S>>, variant: Variant) -> Self {
        Self::with_min_binary_search(keys, variant, DEFAULT_MIN_BINARY_SEARCH)
    }

    /// As [`Set::with_variant`], with an explicit hybrid search threshold.
    pub fn with_min_binary_search(keys: Vec<Vec<S>>, variant: Variant, min_binary_search: u32) -> Self {
        let entries = keys.into_iter().map(|k| (k, ())).collect();
        Set(Trie::build(entries, variant, min_binary_search, true))
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

    /// Whether `key` is in the set.
    pub fn contains(&self, key: &[S]) -> bool {
        self.0.exists(key)
    }

    /// The root, for manual traversal.
    pub fn root(&self) -> VirtualNode<'_, S, ()> {
        self.0.root()
    }

    /// A fresh [`Searcher`] borrowing this set, for `exists`/`find` and for
    /// the stateful `prefix`/`predict` traversals.
    pub fn searcher(&self) -> Searcher<'_, S, ()> {
        self.0.searcher()
    }

    /// Underlying trie, for introspection or persistence beyond
    /// [`Set::save`]/[`Set::load`].
    pub fn as_trie(&self) -> &Trie<S, ()> {
        &self.0
    }

    /// Writes this set in `flattrie`'s on-disk format.
    pub fn save<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.0.save(w)
    }

    /// As [`Set::save`], writing to the file at `path`.
    pub fn save_to_path<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        self.0.save_to_path(path)
    }

    /// Reads a set previously written with [`Set::save`].
    pub fn load<R: std::io::Read>(r: &mut R) -> Result<Self> {
        Ok(Set(Trie::load(r)?))
    }

    /// As [`Set::load`], reading from the file at `path`.
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Set(Trie::load_from_path(path)?))
    }
}
