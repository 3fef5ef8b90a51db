//! Shared conformance vectors for the value wire format.
//!
//! Every entry is a raw word and the exact line a console port prints for
//! it. Producers of values can check their encoder against the same table.

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    pub word: u64,
    pub expected: &'static str,
    pub note: &'static str,
}

const fn v(word: u64, expected: &'static str, note: &'static str) -> Vector {
    Vector {
        word,
        expected,
        note,
    }
}

pub const VECTORS: &[Vector] = &[
    v(0x02, "nil", "nil"),
    v(0xDEAD_BEEF_0000_00FA, "nil", "nil with payload garbage"),
    v(0x29, "5", "integer 5"),
    v(0x01, "0", "integer 0"),
    v(0xFFFF_FFFF_FFFF_FFF9, "-1", "all-ones integer"),
    v(0xFFFF_FFFF_FFFF_FFD1, "-6", "negative integer"),
    v(0x7FFF_FFFF_FFFF_FFF9, "1152921504606846975", "largest integer"),
    v(0x8000_0000_0000_0001, "-1152921504606846976", "smallest integer"),
    v(0x0B, "true", "true"),
    v(0x03, "false", "false"),
    v(0x13, "false", "boolean with high payload bit only"),
    v(0x1B, "true", "boolean with extra high payload bit"),
    v(0x00, "<pointer 0x0>", "null pointer"),
    v(0x7FFE_0000_1000, "<pointer 0x7ffe00001000>", "aligned pointer"),
    v(0x04, "Unknown value tag: 4", "unassigned tag 4"),
    v(0x0D, "Unknown value tag: 5", "unassigned tag 5"),
    v(0x0E, "Unknown value tag: 6", "unassigned tag 6"),
    v(0xFFFF_FFFF_FFFF_FFFF, "Unknown value tag: 7", "all-ones word"),
];

/// A vector whose rendering differs from the expected line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub vector: Vector,
    pub actual: String,
}

impl Vector {
    pub fn value(&self) -> Value {
        Value::from_raw(self.word)
    }

    pub fn check(&self) -> Result<(), Mismatch> {
        let actual = self.value().to_string();
        if actual == self.expected {
            Ok(())
        } else {
            Err(Mismatch {
                vector: *self,
                actual,
            })
        }
    }
}

/// Check every vector, returning the ones that fail.
pub fn verify() -> Vec<Mismatch> {
    VECTORS.iter().filter_map(|v| v.check().err()).collect()
}
