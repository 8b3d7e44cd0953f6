//! Map values: fixed-size, default-constructible records.
//!
//! This trait is sealed over the eight primitive integer widths, plus `()`
//! for the set case (zero bytes per node).

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{self, Read, Write};

pub(crate) mod value_tag {
    pub const UNIT: u8 = 0xff;
    pub const U8: u8 = 0;
    pub const I8: u8 = 1;
    pub const U16: u8 = 2;
    pub const I16: u8 = 3;
    pub const U32: u8 = 4;
    pub const I32: u8 = 5;
    pub const U64: u8 = 6;
    pub const I64: u8 = 7;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for () {}
    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for u16 {}
    impl Sealed for i16 {}
    impl Sealed for u32 {}
    impl Sealed for i32 {}
    impl Sealed for u64 {}
    impl Sealed for i64 {}
}

/// A value a [`crate::Map`] can associate with a key, or `()` for
/// [`crate::Set`] (the value slot is reserved at every node but costs zero
/// bytes for `()`).
pub trait Value: sealed::Sealed + Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    const TAG: u8;
    const SIZE: usize;

    fn write_le(&self, w: &mut impl Write) -> io::Result<()>;
    fn read_le(r: &mut impl Read) -> io::Result<Self>;
}

impl Value for () {
    const TAG: u8 = value_tag::UNIT;
    const SIZE: usize = 0;
    fn write_le(&self, _w: &mut impl Write) -> io::Result<()> {
        Ok(())
    }
    fn read_le(_r: &mut impl Read) -> io::Result<Self> {
        Ok(())
    }
}

impl Value for u8 {
    const TAG: u8 = value_tag::U8;
    const SIZE: usize = 1;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_u8(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_u8()
    }
}

impl Value for i8 {
    const TAG: u8 = value_tag::I8;
    const SIZE: usize = 1;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_i8(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_i8()
    }
}

impl Value for u16 {
    const TAG: u8 = value_tag::U16;
    const SIZE: usize = 2;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_u16::<LE>(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_u16::<LE>()
    }
}

impl Value for i16 {
    const TAG: u8 = value_tag::I16;
    const SIZE: usize = 2;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_i16::<LE>(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_i16::<LE>()
    }
}

impl Value for u32 {
    const TAG: u8 = value_tag::U32;
    const SIZE: usize = 4;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_u32::<LE>(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_u32::<LE>()
    }
}

impl Value for i32 {
    const TAG: u8 = value_tag::I32;
    const SIZE: usize = 4;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_i32::<LE>(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_i32::<LE>()
    }
}

impl Value for u64 {
    const TAG: u8 = value_tag::U64;
    const SIZE: usize = 8;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_u64::<LE>(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_u64::<LE>()
    }
}

impl Value for i64 {
    const TAG: u8 = value_tag::I64;
    const SIZE: usize = 8;
    fn write_le(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_i64::<LE>(*self)
    }
    fn read_le(r: &mut impl Read) -> io::Result<Self> {
        r.read_i64::<LE>()
    }
}
