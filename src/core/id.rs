//! Protocol identifier types.

use std::{fmt, ops::BitXor};

use sha1::{Digest, Sha1};

/// A 160-bit identifier that implements a non-euclidian XOR-based distance metric.
///
/// Identifiers are only ever derived from input bytes with [`Id::derive`], which hashes them with
/// SHA-1. The bytes are interpreted as big-endian: byte `0` is the most significant.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id {
    bytes: [u8; Self::BYTES],
}

impl Id {
    /// The size of the identifier in bytes.
    pub const BYTES: usize = 20;

    /// The size of the identifier in bits.
    pub const BITS: usize = 20 * 8;

    /// Derives an identifier from arbitrary input data.
    ///
    /// The derivation is deterministic, the same input always yields the same identifier. It is up
    /// to the caller to pick input that is actually unique to the entity being identified, e.g. an
    /// address and port with a salt.
    pub fn derive(data: impl AsRef<[u8]>) -> Self {
        Id {
            bytes: Sha1::digest(data.as_ref()).into(),
        }
    }

    /// Returns the bytes backing the identifier.
    pub fn bytes(&self) -> [u8; Self::BYTES] {
        self.bytes
    }

    /// Returns the identifier as 40 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Computes the XOR-based distance between two identifiers.
    pub fn xor(&self, other: &Id) -> Distance {
        let mut bytes = [0u8; Self::BYTES];
        for (byte, (a, b)) in bytes.iter_mut().zip(self.bytes.iter().zip(other.bytes.iter())) {
            *byte = a ^ b;
        }

        Distance(bytes)
    }

    /// Computes the log2 of the XOR-based distance between two identifiers. This is equal to the
    /// correct bucket index for the other identifier; `None` if both are the same.
    pub fn log2_distance(&self, other: &Id) -> Option<u32> {
        self.xor(other).log2()
    }

    #[cfg(test)]
    /// Convenience function for working with small identifiers during testing.
    pub fn from_u16(raw: u16) -> Self {
        let mut bytes = [0u8; Self::BYTES];
        bytes[Self::BYTES - 2..].copy_from_slice(&raw.to_be_bytes());

        Self { bytes }
    }

    #[doc(hidden)]
    /// Convenience function for generating random identifiers during testing.
    pub fn rand() -> Self {
        use rand::{thread_rng, Fill};

        let mut rng = thread_rng();
        let mut seed = [0u8; 32];
        let _res = seed.try_fill(&mut rng);
        debug_assert!(_res.is_ok());

        Self::derive(seed)
    }
}

impl BitXor for Id {
    type Output = Distance;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.xor(&rhs)
    }
}

/// Moves an identifier by a distance, `(a ^ b) ^ b == a`.
impl BitXor<Distance> for Id {
    type Output = Id;

    fn bitxor(self, rhs: Distance) -> Self::Output {
        let mut bytes = self.bytes;
        for (byte, d) in bytes.iter_mut().zip(rhs.0.iter()) {
            *byte ^= d;
        }

        Id { bytes }
    }
}

impl BitXor<Id> for Distance {
    type Output = Id;

    fn bitxor(self, rhs: Id) -> Self::Output {
        rhs ^ self
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.to_hex())
    }
}

/// The XOR of two identifiers.
///
/// Distances are ordered as unsigned big-endian integers, the most significant byte is compared
/// first. A smaller distance means closer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Distance([u8; Id::BYTES]);

impl Distance {
    /// The distance between an identifier and itself.
    pub const ZERO: Distance = Distance([0u8; Id::BYTES]);

    /// Returns the bytes backing the distance.
    pub fn bytes(&self) -> [u8; Id::BYTES] {
        self.0
    }

    /// Returns `true` if the two identifiers were equal.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// Returns the number of leading zero bits, i.e. the length of the prefix shared by the two
    /// identifiers this distance was computed from.
    pub fn leading_zeros(&self) -> u32 {
        match self.0.iter().position(|byte| byte != &0b0) {
            Some(i) => ((i as u32) << 3) + self.0[i].leading_zeros(),
            None => Id::BITS as u32,
        }
    }

    /// Returns the position of the most-significant bit set in the distance (0-indexed from the
    /// least-significant bit), `None` if the distance is zero.
    pub fn log2(&self) -> Option<u32> {
        // Search process:
        //
        // [0, 0, 1, 2] <- array bytes in BE
        //  0  1  2  3  <- i
        //
        // The first non-zero byte from the left holds the most-significant bit, here at index 2.
        // Its position in bits counted from the right is the number of bytes after it times 8,
        // plus the position of the most-significant bit within the byte.

        self.0
            .iter()
            .enumerate()
            .find(|(_, byte)| byte != &&0b0)
            // The left shift multiplies the index by 8 to get its value in bits.
            .map(|(i, &byte)| Self::msb(byte) + (((Id::BYTES - 1 - i) as u32) << 3))
    }

    // Returns the position of the most-significant bit set in a byte (0-indexed).
    fn msb(n: u8) -> u32 {
        debug_assert_ne!(n, 0);
        // Safety: can't be 0 - 1.
        u8::BITS - n.leading_zeros() - 1
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", hex::encode(self.0))
    }
}
