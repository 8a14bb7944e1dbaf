//! VIS codes
//!
//! [List of VIS codes][1]
//!
//! [1]: https://web.archive.org/web/20050306193820/http://www.tima.com/~djones/vis.txt

use std::fmt::{
    Debug,
    Display,
};

/// 7-bit mode identifier sent in the calibration header.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisCode(u8);

impl VisCode {
    pub const NUM_BITS: u8 = 7;

    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value & 0x80 == 0 {
            Some(Self(value))
        }
        else {
            None
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn get_bit(&self, bit: u8) -> bool {
        assert!(bit < Self::NUM_BITS);
        (self.0 >> bit) & 1 != 0
    }

    /// Even parity over the 7 data bits.
    #[inline]
    pub const fn parity(&self) -> bool {
        self.0.count_ones() & 1 != 0
    }

    /// Data bits, least-significant first.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..Self::NUM_BITS).map(|bit| self.get_bit(bit))
    }
}

impl TryFrom<u8> for VisCode {
    type Error = u8;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

impl From<VisCode> for u8 {
    #[inline]
    fn from(value: VisCode) -> Self {
        value.0
    }
}

impl Debug for VisCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VisCode(0x{:02x})", self.0)
    }
}

impl Display for VisCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}
