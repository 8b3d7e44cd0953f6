//! Virtual nodes.
//!
//! Tail compression means a key boundary does not always land on a physical
//! record in [`Trie::raw_data`] — it can land partway through a node's
//! compressed tail. A [`VirtualNode`] addresses both cases uniformly as
//! `(physical node id, offset into that node's tail)`, so descent, the
//! common-prefix search and the subtree walk all share one traversal step
//! instead of special-casing "mid-tail" everywhere.

use crate::symbol::Symbol;
use crate::trie::Trie;
use crate::value::Value;

/// A lifetime-free handle naming one physical node, usable after the
/// [`VirtualNode`] it was read from has gone out of scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub(crate) u32);

/// A position in the trie: either exactly at physical node `node_id`
/// (`tail_pos == tail_len`), or `tail_pos` symbols into its compressed tail.
#[derive(Clone, Copy)]
pub struct VirtualNode<'t, S: Symbol, V: Value> {
    trie: &'t Trie<S, V>,
    pub(crate) node_id: u32,
    pub(crate) tail_pos: u32,
    depth: usize,
}

impl<'t, S: Symbol, V: Value> VirtualNode<'t, S, V> {
    pub(crate) fn root(trie: &'t Trie<S, V>) -> Self {
        VirtualNode {
            trie,
            node_id: trie.root_id(),
            tail_pos: 0,
            depth: 0,
        }
    }

    pub(crate) fn tail_len(&self) -> u32 {
        let (start, end) = self.trie.tail_range(self.node_id);
        end - start
    }

    /// Number of symbols consumed from the root to reach this position.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The symbol on the edge leading into this position.
    pub fn label(&self) -> S {
        if self.tail_pos == 0 {
            self.trie.raw_data()[self.node_id as usize].label()
        } else {
            let (start, _) = self.trie.tail_range(self.node_id);
            self.trie.raw_labels()[(start + self.tail_pos - 1) as usize]
        }
    }

    /// A key terminates exactly here. Always `false` strictly inside a
    /// compressed tail: a tail run only exists where every key in the group
    /// agrees, so no key can terminate mid-run.
    pub fn is_match(&self) -> bool {
        self.tail_pos == self.tail_len() && self.trie.raw_data()[self.node_id as usize].is_match()
    }

    /// No key extends past this position.
    pub fn is_leaf(&self) -> bool {
        self.tail_pos == self.tail_len() && self.trie.raw_data()[self.node_id as usize].is_leaf()
    }

    /// The value at this position; meaningful only when [`Self::is_match`].
    pub fn value(&self) -> V {
        self.trie.raw_data()[self.node_id as usize].value()
    }

    /// A lifetime-free handle to this position, for mutating a [`crate::Map`]
    /// through [`crate::Map::update_at`] without holding a borrow of the map
    /// alive across the mutating call (`VirtualNode` itself borrows the
    /// trie it was read from, so passing one directly to a `&mut self`
    /// method would conflict with that borrow). `None` unless this position
    /// is a physical match (no key terminates mid-tail, so every match
    /// already sits at a tail boundary).
    pub fn id(&self) -> Option<NodeId> {
        (self.tail_pos == self.tail_len()).then_some(NodeId(self.node_id))
    }

    /// Direct children of this position: the single next tail symbol while
    /// still inside a compressed run, or the real sibling block once the
    /// tail is exhausted.
    pub(crate) fn children(&self) -> ChildIterator<'t, S, V> {
        let tail_len = self.tail_len();
        if self.tail_pos < tail_len {
            return ChildIterator::Tail(Some(VirtualNode {
                trie: self.trie,
                node_id: self.node_id,
                tail_pos: self.tail_pos + 1,
                depth: self.depth + 1,
            }));
        }
        if self.trie.raw_data()[self.node_id as usize].is_leaf() {
            return ChildIterator::Branch {
                trie: self.trie,
                next: 0,
                end: 0,
                child_depth: self.depth + 1,
                is_lut: false,
                alphabet_lo: self.trie.alphabet_lo,
                block_begin: 0,
            };
        }
        let (begin, end) = self.trie.children_range(self.node_id);
        let is_lut = self.trie.variant.lut_fires_at_depth(self.depth, end - begin);
        ChildIterator::Branch {
            trie: self.trie,
            next: begin,
            end,
            child_depth: self.depth + 1,
            is_lut,
            alphabet_lo: self.trie.alphabet_lo,
            block_begin: begin,
        }
    }
}

/// Iterates the direct children of a [`VirtualNode`], transparently skipping
/// filler slots in a lookup-table block: a filler's stored label never
/// matches the slot's natural alphabet position, which is exactly the
/// condition construction guarantees for every slot it didn't assign a real
/// child to.
pub(crate) enum ChildIterator<'t, S: Symbol, V: Value> {
    Tail(Option<VirtualNode<'t, S, V>>),
    Branch {
        trie: &'t Trie<S, V>,
        next: u32,
        end: u32,
        child_depth: usize,
        is_lut: bool,
        alphabet_lo: S,
        block_begin: u32,
    },
}

impl<'t, S: Symbol, V: Value> Iterator for ChildIterator<'t, S, V> {
    type Item = VirtualNode<'t, S, V>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ChildIterator::Tail(slot) => slot.take(),
            ChildIterator::Branch {
                trie,
                next,
                end,
                child_depth,
                is_lut,
                alphabet_lo,
                block_begin,
            } => {
                while *next < *end {
                    let i = *next;
                    *next += 1;
                    if *is_lut {
                        let natural = S::add_offset(*alphabet_lo, i - *block_begin);
                        if trie.raw_data()[i as usize].label() != natural {
                            continue;
                        }
                    }
                    return Some(VirtualNode {
                        trie,
                        node_id: i,
                        tail_pos: 0,
                        depth: *child_depth,
                    });
                }
                None
            }
        }
    }
}

/// Descends `query` from the root, allowing the landing position to stop
/// partway through a tail: unlike [`Trie::locate`], which only recognizes an
/// exact node boundary, this is what the subtree walk needs to start from an
/// arbitrary prefix.
pub(crate) fn locate_virtual<'t, S: Symbol, V: Value>(
    trie: &'t Trie<S, V>,
    query: &[S],
) -> Option<VirtualNode<'t, S, V>> {
    let mut node_id = trie.root_id();
    let mut tail_pos = 0u32;
    let mut depth = 0usize;

    loop {
        let (tail_start, tail_end) = trie.tail_range(node_id);
        let tail_len = tail_end - tail_start;

        while tail_pos < tail_len {
            if depth == query.len() {
                return Some(VirtualNode {
                    trie,
                    node_id,
                    tail_pos,
                    depth,
                });
            }
            let sym = trie.raw_labels()[(tail_start + tail_pos) as usize];
            if sym != query[depth] {
                return None;
            }
            tail_pos += 1;
            depth += 1;
        }

        if depth == query.len() {
            return Some(VirtualNode {
                trie,
                node_id,
                tail_pos,
                depth,
            });
        }
        if trie.raw_data()[node_id as usize].is_leaf() {
            return None;
        }
        match trie.find_child(node_id, depth, query[depth]) {
            Some(child_id) => {
                node_id = child_id;
                tail_pos = 0;
                depth += 1;
            }
            None => return None,
        }
    }
}
