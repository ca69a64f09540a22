//! Single-byte bitwise primitives and the transformation descriptor.
//!
//! Every obfuscation round applied exactly one of five byte-wise operations
//! uniformly across the image: XOR against a noise image, circular rotation,
//! or logical shift. The primitives here are pure and closed over `u8`;
//! rotation and shift counts are reduced modulo 8, so an amount of 8 is the
//! identity.

use std::fmt;

/// Number of bits in a byte; rotation/shift amounts wrap at this.
pub const BITS_PER_BYTE: u32 = 8;

/// Largest meaningful rotation/shift amount tried by the search (inclusive).
pub const MAX_AMOUNT: u8 = 8;

/// Bitwise exclusive-or of two bytes.
#[must_use]
pub const fn xor(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Circular left rotation by `n mod 8` positions.
#[must_use]
pub const fn rotate_left(byte: u8, n: u8) -> u8 {
    byte.rotate_left(n as u32 % BITS_PER_BYTE)
}

/// Circular right rotation by `n mod 8` positions.
#[must_use]
pub const fn rotate_right(byte: u8, n: u8) -> u8 {
    byte.rotate_right(n as u32 % BITS_PER_BYTE)
}

/// Logical left shift by `n mod 8`; shifted-out bits are discarded.
#[must_use]
pub const fn shift_left(byte: u8, n: u8) -> u8 {
    byte << (n as u32 % BITS_PER_BYTE)
}

/// Logical right shift by `n mod 8`; zeros fill in from the left.
#[must_use]
pub const fn shift_right(byte: u8, n: u8) -> u8 {
    byte >> (n as u32 % BITS_PER_BYTE)
}

/// Number of differing bits between two bytes, in `0..=8`.
#[must_use]
pub const fn hamming_distance(a: u8, b: u8) -> u32 {
    (a ^ b).count_ones()
}

/// The closed set of byte-wise operation families.
///
/// The original obfuscator selected these through raw function pointers keyed
/// by integer codes; here the set is a closed enum and every dispatch is an
/// exhaustive `match`, so an unknown operation is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// XOR against the noise image (self-inverse).
    Xor,
    /// Rotate right by an amount.
    Ror,
    /// Rotate left by an amount.
    Rol,
    /// Logical shift left by an amount (lossy).
    Shl,
    /// Logical shift right by an amount (lossy).
    Shr,
}

impl OpKind {
    /// Apply this operation to a single byte with the given amount.
    ///
    /// For [`OpKind::Xor`] the amount is treated as the other operand, which
    /// the buffer-level code supplies per byte from the noise image.
    #[must_use]
    pub const fn apply(self, byte: u8, n: u8) -> u8 {
        match self {
            Self::Xor => xor(byte, n),
            Self::Ror => rotate_right(byte, n),
            Self::Rol => rotate_left(byte, n),
            Self::Shl => shift_left(byte, n),
            Self::Shr => shift_right(byte, n),
        }
    }
}

/// One identified transformation: a family plus its bit amount.
///
/// XOR carries a dummy amount of 0, which is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Operation family.
    pub kind: OpKind,
    /// Rotation/shift amount in `0..=8`; ignored for XOR.
    pub amount: u8,
}

impl Operation {
    /// The XOR descriptor (amount unused).
    #[must_use]
    pub const fn xor() -> Self {
        Self {
            kind: OpKind::Xor,
            amount: 0,
        }
    }

    /// Construct a rotate/shift descriptor.
    #[must_use]
    pub const fn new(kind: OpKind, amount: u8) -> Self {
        Self { kind, amount }
    }

    /// The operation that undoes this one.
    ///
    /// XOR is self-inverse and rotations invert exactly. Shifts are inverted
    /// by the opposite shift direction, which is only a best-effort inverse:
    /// bits shifted out of the byte are gone and come back as zeros.
    #[must_use]
    pub const fn inverse(self) -> Self {
        let kind = match self.kind {
            OpKind::Xor => OpKind::Xor,
            OpKind::Ror => OpKind::Rol,
            OpKind::Rol => OpKind::Ror,
            OpKind::Shl => OpKind::Shr,
            OpKind::Shr => OpKind::Shl,
        };
        Self {
            kind,
            amount: self.amount,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OpKind::Xor => write!(f, "XOR"),
            OpKind::Ror => write!(f, "ROR({})", self.amount),
            OpKind::Rol => write!(f, "ROL({})", self.amount),
            OpKind::Shl => write!(f, "SHL({})", self.amount),
            OpKind::Shr => write!(f, "SHR({})", self.amount),
        }
    }
}
