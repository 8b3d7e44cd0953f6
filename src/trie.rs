//! The core generic trie.
//!
//! `Trie<S, V>` is the one structure behind all three variants and behind
//! both [`crate::Set`] and [`crate::Map`] (which are thin façades with
//! `V = ()` and `V` respectively). Once built it is immutable: there is no
//! insert/remove after construction — a trie is always built from a
//! complete sorted key set and treated as read-only afterward.

use std::cmp::Ordering;

use crate::builder::{self, BuiltTrie};
use crate::node::Node;
use crate::symbol::Symbol;
use crate::value::Value;
use crate::variant::Variant;
use crate::virtual_node::{self, VirtualNode};

/// Default `min_binary_search`: below this many siblings, linear search
/// beats binary search on cache-resident blocks.
pub const DEFAULT_MIN_BINARY_SEARCH: u32 = 42;

/// The flat node array plus tail array that back a [`crate::Set`] or
/// [`crate::Map`].
#[derive(Clone)]
pub struct Trie<S: Symbol, V: Value> {
    pub(crate) variant: Variant,
    pub(crate) min_binary_search: u32,
    pub(crate) alphabet_lo: S,
    pub(crate) alphabet_hi: S,
    pub(crate) alphabet_size: u32,
    pub(crate) num_keys: usize,
    pub(crate) data: Vec<Node<S, V>>,
    pub(crate) tail: Vec<S>,
}

impl<S: Symbol, V: Value> Trie<S, V> {
    /// Builds a trie over `entries`, which must be sorted by the
    /// lexicographic-then-length key order with no duplicate keys.
    /// `two_pass` selects the two-phase construction policy; pass `true`
    /// unless the caller already knows the input is small.
    pub(crate) fn build(
        entries: Vec<(Vec<S>, V)>,
        variant: Variant,
        min_binary_search: u32,
        two_pass: bool,
    ) -> Self {
        let BuiltTrie {
            data,
            tail,
            alphabet_lo,
            alphabet_hi,
            alphabet_size,
            num_keys,
        } = builder::build(&entries, variant, two_pass);
        Trie {
            variant,
            min_binary_search,
            alphabet_lo,
            alphabet_hi,
            alphabet_size,
            num_keys,
            data,
            tail,
        }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.num_keys
    }

    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn min_binary_search(&self) -> u32 {
        self.min_binary_search
    }

    /// The node array as a flat read-only slice, for introspection or
    /// hand-rolled persistence beyond the built-in `save`/`load`.
    pub fn raw_data(&self) -> &[Node<S, V>] {
        &self.data
    }

    /// The tail array as a flat read-only slice.
    pub fn raw_labels(&self) -> &[S] {
        &self.tail
    }

    pub(crate) fn root_id(&self) -> u32 {
        0
    }

    pub(crate) fn tail_range(&self, node_id: u32) -> (u32, u32) {
        (
            self.data[node_id as usize].tail_start(),
            self.data[node_id as usize + 1].tail_start(),
        )
    }

    pub(crate) fn tail_slice(&self, node_id: u32) -> &[S] {
        let (start, end) = self.tail_range(node_id);
        &self.tail[start as usize..end as usize]
    }

    /// `[begin, end)` of `node_id`'s direct children in [`Trie::raw_data`].
    /// Relies on construction laying out each block of siblings
    /// contiguously right before recursing into the first of them: the
    /// first child's own `next` field therefore also marks where its
    /// parent's sibling block ends.
    pub(crate) fn children_range(&self, node_id: u32) -> (u32, u32) {
        let begin = self.data[node_id as usize].next();
        let end = self.data[begin as usize].next();
        (begin, end)
    }

    /// Locates the direct child of `node_id` (a node at trie depth `depth`)
    /// labeled `target`, dispatching to O(1) lookup-table indexing or hybrid
    /// binary/linear search over the sorted sibling block exactly as
    /// construction decided for this block.
    pub(crate) fn find_child(&self, node_id: u32, depth: usize, target: S) -> Option<u32> {
        let (begin, end) = self.children_range(node_id);
        let block_size = end - begin;

        if self.variant.lut_fires_at_depth(depth, block_size) {
            if target < self.alphabet_lo || target > self.alphabet_hi {
                return None;
            }
            let idx = begin + target.offset_from(self.alphabet_lo);
            if self.data[idx as usize].label() == target {
                Some(idx)
            } else {
                None
            }
        } else if block_size >= self.min_binary_search {
            self.binary_search_children(begin, end, target)
        } else {
            self.linear_search_children(begin, end, target)
        }
    }

    fn binary_search_children(&self, begin: u32, end: u32, target: S) -> Option<u32> {
        let mut lo = begin;
        let mut hi = end;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.data[mid as usize].label().cmp(&target) {
                Ordering::Equal => return Some(mid),
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
            }
        }
        None
    }

    fn linear_search_children(&self, begin: u32, end: u32, target: S) -> Option<u32> {
        for i in begin..end {
            let label = self.data[i as usize].label();
            match label.cmp(&target) {
                Ordering::Equal => return Some(i),
                Ordering::Greater => return None,
                Ordering::Less => continue,
            }
        }
        None
    }

    /// Descends `query` from the root, stopping at a node boundary exactly
    /// at `query`'s end. Landing mid-tail (a prefix of a compressed run)
    /// does not count: use [`Trie::locate_node`] when that distinction
    /// matters, as it does for the subtree walk.
    pub(crate) fn locate(&self, query: &[S]) -> Option<u32> {
        let vn = virtual_node::locate_virtual(self, query)?;
        (vn.tail_pos == self.tail_len_at(vn.node_id)).then_some(vn.node_id)
    }

    fn tail_len_at(&self, node_id: u32) -> u32 {
        let (start, end) = self.tail_range(node_id);
        end - start
    }

    /// `query` names a stored key.
    pub fn exists(&self, query: &[S]) -> bool {
        self.locate(query)
            .is_some_and(|id| self.data[id as usize].is_match())
    }

    /// The value stored at `query`, if `query` names a stored key. `Set<S>`
    /// uses this with `V = ()`, surfacing it as `contains`.
    pub fn find(&self, query: &[S]) -> Option<V> {
        self.locate(query).and_then(|id| {
            let node = &self.data[id as usize];
            node.is_match().then(|| node.value())
        })
    }

    /// The root, for manual traversal via [`VirtualNode::children`].
    pub fn root(&self) -> VirtualNode<'_, S, V> {
        VirtualNode::root(self)
    }

    /// Descends `query` to the exact position it names, even mid-tail, for
    /// richer introspection than [`Trie::find`] gives.
    pub fn locate_node(&self, query: &[S]) -> Option<VirtualNode<'_, S, V>> {
        virtual_node::locate_virtual(self, query)
    }

    /// A fresh [`crate::Searcher`] borrowing this trie, for `exists`/`find`
    /// and for the stateful `prefix`/`predict` traversals. Cheap; keep one
    /// per thread and reuse it across queries rather than building a new
    /// one each time.
    pub fn searcher(&self) -> crate::searcher::Searcher<'_, S, V> {
        crate::searcher::Searcher::new(self)
    }

    /// Writes this trie in `flattrie`'s on-disk format. Only an I/O failure
    /// from `w` can fail this call; the format itself is always well-formed
    /// for a `Trie` that exists at all.
    pub fn save<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        crate::persistence::save(self, w)
    }

    /// As [`Trie::save`], writing to the file at `path` (creating or
    /// truncating it).
    pub fn save_to_path<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let mut f = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.save(&mut f)
    }

    /// Reads a trie previously written with [`Trie::save`]. Fails if the
    /// file's tags (container kind, symbol encoding, value type/size, index
    /// integer width) don't match `S`/`V`.
    pub fn load<R: std::io::Read>(r: &mut R) -> crate::error::Result<Self> {
        crate::persistence::load(r)
    }

    /// As [`Trie::load`], reading from the file at `path`.
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> crate::error::Result<Self> {
        let mut f = std::io::BufReader::new(std::fs::File::open(path)?);
        Self::load(&mut f)
    }
}
