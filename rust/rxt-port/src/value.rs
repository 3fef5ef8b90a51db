//! Tagged 64-bit values.
//!
//! A [`Value`] is a single machine word that carries its own type. The low
//! three bits hold the tag and the remaining 61 bits hold a tag-dependent
//! payload. The layout is shared bit-for-bit with every producer of values
//! (the host runtime hands words across the C ABI unchanged):
//!
//! ```text
//!  63                                                 3 2   0
//! +----------------------------------------------------+-----+
//! |                      payload                       | tag |
//! +----------------------------------------------------+-----+
//! ```
//!
//! | tag     | bits  | payload                                         |
//! |---------|-------|-------------------------------------------------|
//! | pointer | `000` | address; the word itself is the aligned address |
//! | integer | `001` | i61, sign-extended by an arithmetic shift       |
//! | nil     | `010` | ignored                                         |
//! | boolean | `011` | bit 3 only: 0 = false, 1 = true                 |
//!
//! Tag values `100`..`111` are not produced by any encoder. They can still
//! show up in corrupted input and decode to [`ValueError::UnrecognizedTag`].

use std::fmt;

use crate::error::ValueError;

/// Revision of the bit layout documented above.
pub const WIRE_FORMAT_VERSION: u32 = 1;

/// Width of the tag field.
pub const TAG_BITS: u32 = 3;

/// Mask for the 3-bit tag.
pub const TAG_MASK: u64 = 0b111;

/// Largest integer that survives an encode/decode round trip: 2^60 - 1.
pub const INT_MAX: i64 = (1i64 << 60) - 1;
/// Smallest integer that survives an encode/decode round trip: -(2^60).
pub const INT_MIN: i64 = -(1i64 << 60);

/// The four value tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Pointer = 0,
    Integer = 1,
    Nil = 2,
    Boolean = 3,
}

impl Tag {
    pub const ALL: [Tag; 4] = [Tag::Pointer, Tag::Integer, Tag::Nil, Tag::Boolean];

    /// The tag as it appears in the low bits of a word.
    pub fn bits(self) -> u64 {
        self as u64
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Pointer => "pointer",
            Tag::Integer => "integer",
            Tag::Nil => "nil",
            Tag::Boolean => "boolean",
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = ValueError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            0 => Ok(Tag::Pointer),
            1 => Ok(Tag::Integer),
            2 => Ok(Tag::Nil),
            3 => Ok(Tag::Boolean),
            other => Err(ValueError::UnrecognizedTag(other)),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value after tag dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Pointer(u64),
    Integer(i64),
    Nil,
    Boolean(bool),
}

impl Decoded {
    pub fn tag(&self) -> Tag {
        match self {
            Decoded::Pointer(_) => Tag::Pointer,
            Decoded::Integer(_) => Tag::Integer,
            Decoded::Nil => Tag::Nil,
            Decoded::Boolean(_) => Tag::Boolean,
        }
    }
}

/// A 64-bit tagged word.
///
/// `#[repr(C)]` so the type has the same layout and calling convention as
/// `struct { uint64_t bits; }` on the C side.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Value(u64);

impl Value {
    /// Wrap a raw word without looking at it.
    pub const fn from_raw(bits: u64) -> Self {
        Self(bits)
    }

    /// Pack a tag and payload.
    ///
    /// For [`Tag::Pointer`] the payload is the address and is OR-ed with a
    /// zero tag; the caller must hand in an address whose low three bits are
    /// clear, otherwise the tag field is corrupted. Every other tag shifts
    /// the payload left by [`TAG_BITS`] first, dropping its top three bits.
    pub const fn encode(tag: Tag, payload: u64) -> Self {
        match tag {
            Tag::Pointer => Self(payload),
            _ => Self((payload << TAG_BITS) | tag as u64),
        }
    }

    /// Pack a small integer. Returns `None` if the value does not fit
    /// in 61 bits (signed).
    pub fn from_int(i: i64) -> Option<Self> {
        if !(INT_MIN..=INT_MAX).contains(&i) {
            return None;
        }
        Some(Self::encode(Tag::Integer, i as u64))
    }

    pub const fn from_bool(b: bool) -> Self {
        Self::encode(Tag::Boolean, b as u64)
    }

    pub const fn nil() -> Self {
        Self::encode(Tag::Nil, 0)
    }

    /// Tag an address. Alignment is not checked, see [`Value::encode`].
    pub const fn from_addr(addr: u64) -> Self {
        Self::encode(Tag::Pointer, addr)
    }

    // --- Raw access ---

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Contents of the tag field, including the unassigned values 4..=7.
    pub const fn tag_bits(self) -> u8 {
        (self.0 & TAG_MASK) as u8
    }

    /// The 61 payload bits, zero-extended.
    pub const fn payload(self) -> u64 {
        self.0 >> TAG_BITS
    }

    pub fn tag(self) -> Result<Tag, ValueError> {
        Tag::try_from(self.tag_bits())
    }

    // --- Per-tag decoding ---
    //
    // These read the word as if it carried the matching tag and never fail.

    /// Arithmetic right-shift of the whole signed word, so negative
    /// integers stay negative.
    pub const fn decode_integer(self) -> i64 {
        (self.0 as i64) >> TAG_BITS
    }

    /// Only the lowest payload bit counts; garbage above it is ignored.
    pub const fn decode_boolean(self) -> bool {
        (self.0 >> TAG_BITS) & 1 != 0
    }

    /// The address with the tag bits cleared.
    pub const fn decode_pointer(self) -> u64 {
        self.0 & !TAG_MASK
    }

    pub fn decode(self) -> Result<Decoded, ValueError> {
        Ok(match self.tag()? {
            Tag::Pointer => Decoded::Pointer(self.decode_pointer()),
            Tag::Integer => Decoded::Integer(self.decode_integer()),
            Tag::Nil => Decoded::Nil,
            Tag::Boolean => Decoded::Boolean(self.decode_boolean()),
        })
    }

    // --- Checked accessors ---

    pub fn as_int(self) -> Option<i64> {
        (self.tag_bits() == Tag::Integer as u8).then(|| self.decode_integer())
    }

    pub fn as_bool(self) -> Option<bool> {
        (self.tag_bits() == Tag::Boolean as u8).then(|| self.decode_boolean())
    }

    pub fn as_ptr(self) -> Option<u64> {
        (self.tag_bits() == Tag::Pointer as u8).then(|| self.decode_pointer())
    }

    pub fn is_nil(self) -> bool {
        self.tag_bits() == Tag::Nil as u8
    }
}

impl From<u64> for Value {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<Value> for u64 {
    fn from(v: Value) -> Self {
        v.0
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::from_bool(b)
    }
}

/// The console rendering of a value: `nil`, `true`/`false`, a decimal
/// integer, `<pointer 0x..>`, or a diagnostic naming an unknown tag.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decode() {
            Ok(Decoded::Nil) => f.write_str("nil"),
            Ok(Decoded::Boolean(b)) => write!(f, "{b}"),
            Ok(Decoded::Integer(i)) => write!(f, "{i}"),
            Ok(Decoded::Pointer(addr)) => write!(f, "<pointer {addr:#x}>"),
            Err(_) => write!(f, "Unknown value tag: {}", self.tag_bits()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decode() {
            Ok(Decoded::Nil) => write!(f, "Value(nil)"),
            Ok(Decoded::Boolean(b)) => write!(f, "Value(bool: {b})"),
            Ok(Decoded::Integer(i)) => write!(f, "Value(int: {i})"),
            Ok(Decoded::Pointer(addr)) => write!(f, "Value(ptr: {addr:#x})"),
            Err(_) => write!(f, "Value(raw: {:#018x})", self.0),
        }
    }
}

/// Parse a word written as `0x..`, `0b..`, an unsigned decimal, or a
/// negative decimal (taken as the two's complement bit pattern).
/// Underscores are allowed as digit separators.
pub fn parse_word(text: &str) -> Result<Value, ValueError> {
    let invalid = || ValueError::InvalidWord(text.to_string());
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    let bits = if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).map_err(|_| invalid())?
    } else if let Some(bin) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        u64::from_str_radix(bin, 2).map_err(|_| invalid())?
    } else if cleaned.starts_with('-') {
        cleaned.parse::<i64>().map_err(|_| invalid())? as u64
    } else {
        cleaned.parse::<u64>().map_err(|_| invalid())?
    };
    Ok(Value(bits))
}
