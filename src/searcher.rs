//! Common-prefix search and subtree enumeration, plus the `Searcher` that
//! owns their scratch state.
//!
//! A [`Searcher`] borrows the [`Trie`] it was built from and owns the two
//! pieces of reusable scratch a traversal needs: the path stack a subtree
//! walk pushes/pops as it descends/ascends, and the key buffer both
//! iterators append into and read matches back out of. [`PrefixIter`] and
//! [`SubtreeIter`] borrow a `Searcher` mutably, so only one can be alive
//! against a given `Searcher` at a time — the borrow checker enforces the
//! "one traversal in flight" rule a caller would otherwise have to track by
//! hand.

use smallvec::SmallVec;

use crate::symbol::Symbol;
use crate::trie::Trie;
use crate::value::Value;
use crate::virtual_node::{locate_virtual, ChildIterator, VirtualNode};

/// Owns the scratch state (path stack, key buffer) reused across repeated
/// traversals of one [`Trie`]. Cheap to construct; keep one per thread and
/// reuse it rather than allocating a fresh one per query.
/// Built with [`Trie::searcher`]/[`crate::Set::searcher`]/[`crate::Map::searcher`].
pub struct Searcher<'t, S: Symbol, V: Value> {
    trie: &'t Trie<S, V>,
    stack: Vec<ChildIterator<'t, S, V>>,
    buf: SmallVec<[S; 23]>,
}

impl<'t, S: Symbol, V: Value> Searcher<'t, S, V> {
    pub(crate) fn new(trie: &'t Trie<S, V>) -> Self {
        Searcher {
            trie,
            stack: Vec::new(),
            buf: SmallVec::new(),
        }
    }

    /// `query` names a stored key.
    pub fn exists(&self, query: &[S]) -> bool {
        self.trie.exists(query)
    }

    /// The exact position `query` names, even mid-tail.
    pub fn find(&self, query: &[S]) -> Option<VirtualNode<'t, S, V>> {
        self.trie.locate_node(query)
    }

    /// Every stored key that is a prefix of `query`, paired with its value,
    /// shortest first.
    pub fn prefix<'q, 's>(&'s mut self, query: &'q [S]) -> PrefixIter<'t, 'q, 's, S, V> {
        let trie = self.trie;
        PrefixIter::new(trie, query, self)
    }

    /// Every stored key under `prefix`, paired with its value, in trie order.
    pub fn predict<'s>(&'s mut self, prefix: &[S]) -> SubtreeIter<'t, 's, S, V> {
        let trie = self.trie;
        SubtreeIter::new(trie, prefix, self)
    }
}

/// Yields every stored key that is a prefix of a query, shortest first,
/// together with its value. Built with [`Searcher::prefix`].
pub struct PrefixIter<'t, 'q, 's, S: Symbol, V: Value> {
    trie: &'t Trie<S, V>,
    searcher: &'s mut Searcher<'t, S, V>,
    query: &'q [S],
    node_id: u32,
    tail_pos: u32,
    depth: usize,
    exhausted: bool,
    last_value: Option<V>,
}

impl<'t, 'q, 's, S: Symbol, V: Value> PrefixIter<'t, 'q, 's, S, V> {
    pub(crate) fn new(trie: &'t Trie<S, V>, query: &'q [S], searcher: &'s mut Searcher<'t, S, V>) -> Self {
        PrefixIter {
            trie,
            searcher,
            query,
            node_id: trie.root_id(),
            tail_pos: 0,
            depth: 0,
            exhausted: false,
            last_value: None,
        }
    }

    /// The key last yielded by [`PrefixIter::next`]. Empty before the first
    /// call to `next`.
    pub fn key(&self) -> &[S] {
        &self.searcher.buf
    }

    /// The value paired with [`PrefixIter::key`]; only meaningful once
    /// `next` has yielded `Some`.
    pub fn value(&self) -> Option<V> {
        self.last_value
    }

    /// Advances to the next matching prefix, if any.
    pub fn next(&mut self) -> Option<(&[S], V)> {
        if self.exhausted {
            return None;
        }
        loop {
            let (tail_start, tail_end) = self.trie.tail_range(self.node_id);
            let tail_len = tail_end - tail_start;

            if self.tail_pos < tail_len {
                if self.depth >= self.query.len() {
                    self.exhausted = true;
                    return None;
                }
                let sym = self.trie.raw_labels()[(tail_start + self.tail_pos) as usize];
                if sym != self.query[self.depth] {
                    self.exhausted = true;
                    return None;
                }
                self.tail_pos += 1;
                self.depth += 1;
                continue;
            }

            let node = self.trie.raw_data()[self.node_id as usize];
            let matched_here = node.is_match();
            let matched_depth = self.depth;
            let matched_value = node.value();

            if node.is_leaf() || self.depth >= self.query.len() {
                self.exhausted = true;
            } else {
                match self.trie.find_child(self.node_id, self.depth, self.query[self.depth]) {
                    Some(child_id) => {
                        self.node_id = child_id;
                        self.tail_pos = 0;
                        self.depth += 1;
                    }
                    None => self.exhausted = true,
                }
            }

            if matched_here {
                self.searcher.buf.clear();
                self.searcher.buf.extend_from_slice(&self.query[..matched_depth]);
                self.last_value = Some(matched_value);
                return Some((&self.searcher.buf, matched_value));
            }
            if self.exhausted {
                return None;
            }
        }
    }
}

/// Yields every key stored under a subtree, in trie order, together with
/// its value. Built with [`Searcher::predict`].
pub struct SubtreeIter<'t, 's, S: Symbol, V: Value> {
    searcher: &'s mut Searcher<'t, S, V>,
    current: Option<VirtualNode<'t, S, V>>,
    last_value: Option<V>,
    pending_advance: bool,
}

impl<'t, 's, S: Symbol, V: Value> SubtreeIter<'t, 's, S, V> {
    pub(crate) fn new(trie: &'t Trie<S, V>, prefix: &[S], searcher: &'s mut Searcher<'t, S, V>) -> Self {
        searcher.buf.clear();
        searcher.buf.extend_from_slice(prefix);
        searcher.stack.clear();
        let root = locate_virtual(trie, prefix);
        SubtreeIter {
            searcher,
            current: root,
            last_value: None,
            pending_advance: false,
        }
    }

    /// The key last yielded by `next`. Empty before the first call to
    /// `next`.
    pub fn key(&self) -> &[S] {
        &self.searcher.buf
    }

    /// The value paired with `key`; only meaningful once `next` has
    /// yielded `Some`.
    pub fn value(&self) -> Option<V> {
        self.last_value
    }

    /// Advances to the next key in the subtree, if any.
    ///
    /// A matched node is returned with `buf` holding exactly its key,
    /// before the walk moves on: the move past a yielded node is deferred
    /// to the start of the *following* call, since moving on mutates `buf`
    /// to describe the next position and would otherwise corrupt the key
    /// just about to be handed back to the caller.
    pub fn next(&mut self) -> Option<(&[S], V)> {
        if self.pending_advance {
            self.pending_advance = false;
            if !self.advance_to_next_child() {
                return None;
            }
        }
        loop {
            let node = self.current.take()?;
            let matched = node.is_match();
            let value = node.value();

            self.searcher.stack.push(node.children());

            if matched {
                self.last_value = Some(value);
                self.pending_advance = true;
                return Some((&self.searcher.buf, value));
            }
            if !self.advance_to_next_child() {
                return None;
            }
        }
    }

    fn advance_to_next_child(&mut self) -> bool {
        while let Some(top) = self.searcher.stack.last_mut() {
            match top.next() {
                Some(child) => {
                    self.searcher.buf.push(child.label());
                    self.current = Some(child);
                    return true;
                }
                None => {
                    self.searcher.stack.pop();
                    self.searcher.buf.pop();
                }
            }
        }
        false
    }
}
