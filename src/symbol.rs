//! The alphabet a trie is built over.
//!
//! A [`Symbol`] is one code unit of a key: a totally ordered, fixed-width
//! integer. The three widths below correspond to the three text encodings the
//! file format understands: `u8` keys are treated as UTF-8 bytes, `u16` keys
//! as UTF-16 code units, `u32` keys as UTF-32 code units (or any other
//! 32-bit alphabet a caller wants to index).

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::fmt::Debug;
use std::io::{self, Read, Write};

/// Text encoding tag written to the file header.
pub(crate) mod encoding_tag {
    pub const UTF8: u8 = 1;
    pub const UTF16: u8 = 2;
    pub const UTF32: u8 = 3;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// One code unit of a trie's key alphabet.
///
/// Sealed: only `u8`, `u16`, and `u32` implement it, matching the three
/// integer widths the file format's `text_encoding` tag distinguishes.
pub trait Symbol: sealed::Sealed + Copy + Ord + Eq + Debug + Send + Sync + 'static {
    /// Smallest representable symbol, used as the low end of an empty
    /// alphabet range.
    const MIN: Self;
    /// Largest representable symbol.
    const MAX: Self;
    /// Encoding tag written to the persisted header.
    const ENCODING_TAG: u8;

    fn to_usize(self) -> usize;
    fn from_usize(v: usize) -> Self;

    /// Distance `self - lo` as a `u32`, for LUT slot indexing. Callers must
    /// ensure `self >= lo`.
    fn offset_from(self, lo: Self) -> u32;
    /// `lo + offset`, the inverse of [`Symbol::offset_from`].
    fn add_offset(lo: Self, offset: u32) -> Self;
    /// `self - 1`, used to build LUT filler labels. Wraps at `Self::MIN`
    /// rather than saturating: a filler's job is only to differ from the
    /// natural label of its own slot, and saturating would make the filler
    /// at alphabet position 0 collide with a real label of 0 whenever the
    /// observed alphabet's lower bound is `Self::MIN`.
    fn pred(self) -> Self;

    fn write_le(self, w: &mut impl Write) -> io::Result<()>;
    fn read_le(r: &mut impl Read) -> io::Result<Self>;
}

impl Symbol for u8 {
    const MIN: Self = u8::MIN;
    const MAX: Self = u8::MAX;
    const ENCODING_TAG: u8 = encoding_tag::UTF8;

    fn to_usize(self) -> usize {
        self as usize
    }
    fn from_usize(v: usize) -> Self {
        v as u8
    }
    fn offset_from(self, lo: Self) -> u32 {
        (self - lo) as u32
    }
    fn add_offset(lo: Self, offset: u32) -> Self {
        lo.wrapping_add(offset as u8)
    }
    fn pred(self) -> Self {
        self.wrapping_sub(1)
    }
    fn write_le(self, w: &mut impl Write) -> io::Result<()> {
        w.write_u8(self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_u8()
    }
}

impl Symbol for u16 {
    const MIN: Self = u16::MIN;
    const MAX: Self = u16::MAX;
    const ENCODING_TAG: u8 = encoding_tag::UTF16;

    fn to_usize(self) -> usize {
        self as usize
    }
    fn from_usize(v: usize) -> Self {
        v as u16
    }
    fn offset_from(self, lo: Self) -> u32 {
        (self - lo) as u32
    }
    fn add_offset(lo: Self, offset: u32) -> Self {
        lo.wrapping_add(offset as u16)
    }
    fn pred(self) -> Self {
        self.wrapping_sub(1)
    }
    fn write_le(self, w: &mut impl Write) -> io::Result<()> {
        w.write_u16::<LE>(self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_u16::<LE>()
    }
}

impl Symbol for u32 {
    const MIN: Self = u32::MIN;
    const MAX: Self = u32::MAX;
    const ENCODING_TAG: u8 = encoding_tag::UTF32;

    fn to_usize(self) -> usize {
        self as usize
    }
    fn from_usize(v: usize) -> Self {
        v as u32
    }
    fn offset_from(self, lo: Self) -> u32 {
        self - lo
    }
    fn add_offset(lo: Self, offset: u32) -> Self {
        lo.wrapping_add(offset)
    }
    fn pred(self) -> Self {
        self.wrapping_sub(1)
    }
    fn write_le(self, w: &mut impl Write) -> io::Result<()> {
        w.write_u32::<LE>(self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_u32::<LE>()
    }
}

/// Lexicographic-then-length comparator for key slices: shorter is strictly
/// less than longer whenever the shorter is a prefix of the longer.
pub fn compare_keys<S: Symbol>(a: &[S], b: &[S]) -> std::cmp::Ordering {
    let len = a.len().min(b.len());
    for i in 0..len {
        match a[i].cmp(&b[i]) {
            std::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}
