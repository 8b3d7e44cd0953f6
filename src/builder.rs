//! Trie construction.
//!
//! One recursive procedure builds all three variants; the only per-variant
//! branches are `Variant::has_tail` (skip tail compression) and
//! `Variant::lut_fires_at_depth` (expand a sibling block into a full
//! alphabet-sized lookup table instead of a plain sorted block).

use crate::node::{Node, MAX_NEXT};
use crate::symbol::{compare_keys, Symbol};
use crate::value::Value;
use crate::variant::Variant;

pub(crate) struct BuiltTrie<S: Symbol, V: Value> {
    pub(crate) data: Vec<Node<S, V>>,
    pub(crate) tail: Vec<S>,
    pub(crate) alphabet_lo: S,
    pub(crate) alphabet_hi: S,
    pub(crate) alphabet_size: u32,
    pub(crate) num_keys: usize,
}

/// Groups `entries[begin..end]` into maximal runs sharing the same symbol at
/// `depth`, returning each run's `[start, end)` index range. `entries` must
/// already be sorted, so a run is always contiguous.
fn group_ranges<S: Symbol, V: Value>(
    entries: &[(Vec<S>, V)],
    begin: usize,
    end: usize,
    depth: usize,
) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    let mut i = begin;
    while i < end {
        let c = entries[i].0[depth];
        let start = i;
        i += 1;
        while i < end && entries[i].0[depth] == c {
            i += 1;
        }
        groups.push((start, i));
    }
    groups
}

fn alphabet_range<S: Symbol, V: Value>(entries: &[(Vec<S>, V)]) -> (S, S, u32) {
    let mut lo: Option<S> = None;
    let mut hi: Option<S> = None;
    for (key, _) in entries {
        for &c in key {
            lo = Some(match lo {
                Some(l) if l <= c => l,
                _ => c,
            });
            hi = Some(match hi {
                Some(h) if h >= c => h,
                _ => c,
            });
        }
    }
    match (lo, hi) {
        (Some(l), Some(h)) => (l, h, h.offset_from(l) + 1),
        _ => (S::MIN, S::MIN, 1),
    }
}

/// A dry run over the same grouping logic as [`BuildCtx::recurse`] that
/// counts nodes and tail labels without writing anything, so the real pass
/// can reserve exact capacity up front.
fn estimate_node<S: Symbol, V: Value>(
    entries: &[(Vec<S>, V)],
    variant: Variant,
    alphabet_size: u32,
    begin: usize,
    end: usize,
    depth: usize,
) -> (u64, u64) {
    let mut begin = begin;
    let node_count_self: u64 = 1;
    let mut label_count: u64 = 0;

    if begin < end && depth == entries[begin].0.len() {
        begin += 1;
    }
    if begin >= end {
        return (node_count_self, label_count);
    }

    let groups = group_ranges(entries, begin, end, depth);
    let fan_out = groups.len() as u32;
    let mut node_count = node_count_self;
    if variant.lut_fires_at_depth(depth, fan_out) {
        node_count += (alphabet_size - fan_out) as u64;
    }

    for (gbegin, gend) in groups {
        let mut d = depth + 1;
        if variant.has_tail() {
            let first = &entries[gbegin].0;
            let last = &entries[gend - 1].0;
            while d < first.len() && first[d] == last[d] {
                label_count += 1;
                d += 1;
            }
        }
        let (n, l) = estimate_node(entries, variant, alphabet_size, gbegin, gend, d);
        node_count += n;
        label_count += l;
    }

    (node_count, label_count)
}

fn estimate<S: Symbol, V: Value>(
    entries: &[(Vec<S>, V)],
    variant: Variant,
    alphabet_size: u32,
) -> (u64, u64) {
    let (n, l) = estimate_node(entries, variant, alphabet_size, 0, entries.len(), 0);
    (n + 1, l)
}

struct BuildCtx<'a, S: Symbol, V: Value> {
    entries: &'a [(Vec<S>, V)],
    variant: Variant,
    alphabet_lo: S,
    alphabet_hi: S,
    data: Vec<Node<S, V>>,
    tail: Vec<S>,
}

impl<'a, S: Symbol, V: Value> BuildCtx<'a, S, V> {
    fn recurse(&mut self, begin: usize, end: usize, depth: usize, current: usize) {
        let mut begin = begin;

        if depth == self.entries[begin].0.len() {
            self.data[current].set_match(true);
            self.data[current].value = self.entries[begin].1;
            begin += 1;
            if begin == end {
                self.data[current].set_leaf(true);
                return;
            }
        }

        let groups = group_ranges(self.entries, begin, end, depth);
        let fan_out = groups.len() as u32;
        if self.variant.lut_fires_at_depth(depth, fan_out) {
            self.build_lut_block(&groups, depth, current);
        } else {
            self.build_plain_block(&groups, depth, current);
        }
    }

    fn build_plain_block(&mut self, groups: &[(usize, usize)], depth: usize, current: usize) {
        let child_base = self.data.len() as u32;
        self.data[current].set_next(child_base);

        for &(gbegin, _) in groups {
            let label = self.entries[gbegin].0[depth];
            self.data.push(Node::new(0, label, V::default()));
        }

        let mut depths = Vec::with_capacity(groups.len());
        for (i, &(gbegin, gend)) in groups.iter().enumerate() {
            let node_idx = child_base as usize + i;
            self.data[node_idx].tail = self.tail.len() as u32;
            let mut d = depth + 1;
            if self.variant.has_tail() {
                let first = &self.entries[gbegin].0;
                let last = &self.entries[gend - 1].0;
                while d < first.len() && first[d] == last[d] {
                    self.tail.push(first[d]);
                    d += 1;
                }
            }
            depths.push(d);
        }

        for (i, &(gbegin, gend)) in groups.iter().enumerate() {
            let node_idx = child_base as usize + i;
            self.data[node_idx].set_next(self.data.len() as u32);
            self.recurse(gbegin, gend, depths[i], node_idx);
        }
    }

    fn build_lut_block(&mut self, groups: &[(usize, usize)], depth: usize, current: usize) {
        let child_base = self.data.len() as u32;
        self.data[current].set_next(child_base);

        let lo = self.alphabet_lo.to_usize();
        let hi = self.alphabet_hi.to_usize();

        let mut gi = 0usize;
        for idx in lo..=hi {
            let c = S::from_usize(idx);
            if gi < groups.len() && self.entries[groups[gi].0].0[depth] == c {
                self.data.push(Node::new(0, c, V::default()));
                gi += 1;
            } else {
                self.data.push(Node::new(0, c.pred(), V::default()));
            }
        }

        let mut gi = 0usize;
        let mut depths = vec![0usize; groups.len()];
        for (offset, idx) in (lo..=hi).enumerate() {
            let c = S::from_usize(idx);
            let node_idx = child_base as usize + offset;
            self.data[node_idx].tail = self.tail.len() as u32;
            if self.data[node_idx].label == c {
                let (gbegin, gend) = groups[gi];
                let mut d = depth + 1;
                if self.variant.has_tail() {
                    let first = &self.entries[gbegin].0;
                    let last = &self.entries[gend - 1].0;
                    while d < first.len() && first[d] == last[d] {
                        self.tail.push(first[d]);
                        d += 1;
                    }
                }
                depths[gi] = d;
                gi += 1;
            }
        }

        let mut gi = 0usize;
        for (offset, idx) in (lo..=hi).enumerate() {
            let c = S::from_usize(idx);
            let node_idx = child_base as usize + offset;
            self.data[node_idx].set_next(self.data.len() as u32);
            if self.data[node_idx].label == c {
                let (gbegin, gend) = groups[gi];
                self.recurse(gbegin, gend, depths[gi], node_idx);
                gi += 1;
            }
        }
    }
}

/// Builds the node and tail arrays for `entries`, which must already be
/// sorted and deduplicated by key (checked with `debug_assert` only,
/// matching the infallible query surface's rule of not paying for checks the
/// caller is responsible for).
///
/// `two_pass` runs [`estimate`] first to reserve exact capacity; otherwise
/// the arrays grow by push, which costs amortized reallocation but skips the
/// dry run.
pub(crate) fn build<S: Symbol, V: Value>(
    entries: &[(Vec<S>, V)],
    variant: Variant,
    two_pass: bool,
) -> BuiltTrie<S, V> {
    debug_assert!(
        entries
            .windows(2)
            .all(|w| compare_keys(&w[0].0, &w[1].0) == std::cmp::Ordering::Less),
        "flattrie: builder input must be strictly sorted by key with no duplicates"
    );

    let (alphabet_lo, alphabet_hi, alphabet_size) = alphabet_range(entries);

    let (data, tail) = if two_pass {
        let (node_count, label_count) = estimate(entries, variant, alphabet_size);
        (
            Vec::with_capacity(node_count as usize),
            Vec::with_capacity(label_count as usize),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let mut ctx = BuildCtx {
        entries,
        variant,
        alphabet_lo,
        alphabet_hi,
        data,
        tail,
    };
    ctx.data.push(Node::root_placeholder());

    if entries.is_empty() {
        ctx.data[0].set_leaf(true);
    } else {
        ctx.recurse(0, entries.len(), 0, 0);
    }

    debug_assert!(
        ctx.data.len() as u64 <= MAX_NEXT as u64,
        "flattrie: trie exceeds the 30-bit node index range"
    );

    let sentinel_next = ctx.data.len() as u32;
    let sentinel_tail = ctx.tail.len() as u32;
    ctx.data.push(Node::sentinel(sentinel_next, sentinel_tail));
    ctx.data.shrink_to_fit();
    ctx.tail.shrink_to_fit();

    BuiltTrie {
        data: ctx.data,
        tail: ctx.tail,
        alphabet_lo,
        alphabet_hi,
        alphabet_size,
        num_keys: entries.len(),
    }
}
