//! The on-disk format.
//!
//! A fixed header, then the node array, then the tail array, every field
//! written little-endian one at a time with `byteorder` rather than by
//! transmuting `Node<S, V>` in place: the in-memory struct's padding and
//! field order are implementation details, not a wire contract, and this
//! way the format does not depend on host endianness either.
//!
//! The header carries a signature, version, container/variant/charset/
//! encoding/integer-width/value tags, node and tail counts, plus one
//! extension block: `min_binary_search`, the alphabet range, and the
//! lookup-table parameters. `Variant` is a runtime value rather than a
//! compile-time one, so these round-trip through the file instead of living
//! as constants (see DESIGN.md).

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::symbol::Symbol;
use crate::trie::Trie;
use crate::value::{value_tag, Value};
use crate::variant::{variant_tag, LutMode, Variant};

mod signature {
    pub const MAGIC: [u8; 4] = *b"SFTI";
    pub const MAJOR: u8 = 0;
    pub const MINOR: u8 = 0;
}

mod container_tag {
    pub const SET: u8 = 0;
    pub const MAP: u8 = 1;
}

mod charset_tag {
    pub const UNICODE: u8 = 1;
}

mod integer_tag {
    pub const UINT32: u8 = 2;
}

fn lut_mode_to_tag(mode: LutMode) -> u8 {
    match mode {
        LutMode::None => 0,
        LutMode::RootOnly => 1,
        LutMode::Adaptive => 2,
    }
}

fn tag_to_lut_mode(tag: u8) -> Result<LutMode> {
    match tag {
        0 => Ok(LutMode::None),
        1 => Ok(LutMode::RootOnly),
        2 => Ok(LutMode::Adaptive),
        other => Err(Error::InvalidFormat(format!("unknown lookup-table mode tag {other}"))),
    }
}

fn decode_variant(tag: u8, lut_mode_tag: u8, min_lookup_table_children: u32) -> Result<Variant> {
    match tag {
        variant_tag::ORIGINAL => Ok(Variant::Original),
        variant_tag::COMPACT => Ok(Variant::Compact),
        variant_tag::FAST => Ok(Variant::Fast {
            lut_mode: tag_to_lut_mode(lut_mode_tag)?,
            min_lookup_table_children,
        }),
        other => Err(Error::InvalidFormat(format!("unknown variant tag {other}"))),
    }
}

fn node_wire_size<S: Symbol, V: Value>() -> usize {
    4 + 4 + node_label_wire_size::<S>() + V::SIZE
}

fn node_label_wire_size<S: Symbol>() -> usize {
    match S::ENCODING_TAG {
        crate::symbol::encoding_tag::UTF8 => 1,
        crate::symbol::encoding_tag::UTF16 => 2,
        _ => 4,
    }
}

pub(crate) fn save<S: Symbol, V: Value, W: Write>(trie: &Trie<S, V>, w: &mut W) -> std::io::Result<()> {
    let is_set = V::TAG == value_tag::UNIT;

    w.write_all(&signature::MAGIC)?;
    w.write_u8(signature::MAJOR)?;
    w.write_u8(signature::MINOR)?;
    w.write_u8(if is_set { container_tag::SET } else { container_tag::MAP })?;
    w.write_u8(trie.variant.tag())?;
    w.write_u8(charset_tag::UNICODE)?;
    w.write_u8(S::ENCODING_TAG)?;
    w.write_u8(integer_tag::UINT32)?;
    w.write_u8(node_wire_size::<S, V>() as u8)?;
    w.write_u8(V::SIZE as u8)?;
    w.write_u8(V::TAG)?;
    w.write_u64::<LE>(trie.data.len() as u64)?;
    w.write_u64::<LE>(trie.tail.len() as u64)?;

    w.write_u32::<LE>(trie.min_binary_search)?;
    trie.alphabet_lo.write_le(w)?;
    trie.alphabet_hi.write_le(w)?;
    w.write_u32::<LE>(trie.alphabet_size)?;
    let (lut_mode, min_lookup_table_children) = match trie.variant {
        Variant::Fast {
            lut_mode,
            min_lookup_table_children,
        } => (lut_mode, min_lookup_table_children),
        _ => (LutMode::None, 0),
    };
    w.write_u8(lut_mode_to_tag(lut_mode))?;
    w.write_u32::<LE>(min_lookup_table_children)?;

    for node in &trie.data {
        w.write_u32::<LE>(node.raw_packed())?;
        w.write_u32::<LE>(node.tail_start())?;
        node.label().write_le(w)?;
        node.value().write_le(w)?;
    }
    for &sym in &trie.tail {
        sym.write_le(w)?;
    }
    Ok(())
}

pub(crate) fn load<S: Symbol, V: Value, R: Read>(r: &mut R) -> Result<Trie<S, V>> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != signature::MAGIC {
        return Err(Error::InvalidFormat("bad magic bytes".into()));
    }
    let major = r.read_u8()?;
    let _minor = r.read_u8()?;
    if major != signature::MAJOR {
        return Err(Error::InvalidFormat(format!("unsupported major version {major}")));
    }

    let container = r.read_u8()?;
    let is_set = V::TAG == value_tag::UNIT;
    let expected_container = if is_set { container_tag::SET } else { container_tag::MAP };
    if container != expected_container {
        return Err(Error::InvalidFormat(
            "file's container kind does not match Set<S>/Map<S, V>".into(),
        ));
    }

    let variant_byte = r.read_u8()?;
    let _charset = r.read_u8()?;

    let encoding = r.read_u8()?;
    if encoding != S::ENCODING_TAG {
        return Err(Error::InvalidFormat("file's symbol encoding does not match S".into()));
    }

    let integer_type = r.read_u8()?;
    if integer_type != integer_tag::UINT32 {
        return Err(Error::InvalidFormat("unsupported index integer width".into()));
    }

    let _node_size = r.read_u8()?;
    let value_size = r.read_u8()?;
    if value_size as usize != V::SIZE {
        return Err(Error::InvalidFormat("file's value size does not match V".into()));
    }
    let value_type = r.read_u8()?;
    if value_type != V::TAG {
        return Err(Error::InvalidFormat("file's value type does not match V".into()));
    }

    let node_count = r.read_u64::<LE>()?;
    let tail_length = r.read_u64::<LE>()?;

    let min_binary_search = r.read_u32::<LE>()?;
    let alphabet_lo = S::read_le(r)?;
    let alphabet_hi = S::read_le(r)?;
    let alphabet_size = r.read_u32::<LE>()?;
    let lut_mode_byte = r.read_u8()?;
    let min_lookup_table_children = r.read_u32::<LE>()?;
    let variant = decode_variant(variant_byte, lut_mode_byte, min_lookup_table_children)?;

    let mut data = Vec::with_capacity(node_count as usize);
    for _ in 0..node_count {
        let packed = r.read_u32::<LE>()?;
        let tail = r.read_u32::<LE>()?;
        let label = S::read_le(r)?;
        let value = V::read_le(r)?;
        data.push(Node::from_raw(packed, tail, label, value));
    }

    let mut tail = Vec::with_capacity(tail_length as usize);
    for _ in 0..tail_length {
        tail.push(S::read_le(r)?);
    }

    let num_keys = data.iter().filter(|n| n.is_match()).count();

    Ok(Trie {
        variant,
        min_binary_search,
        alphabet_lo,
        alphabet_hi,
        alphabet_size,
        num_keys,
        data,
        tail,
    })
}
