/// Pulls bit fields out of a byte.
pub trait BitFieldExt {
    /// Returns `count` bits starting at bit `offset` (0 is the least significant bit).
    fn bits(self, offset: u8, count: u8) -> u8;

    /// The `count` most significant bits.
    fn top_bits(self, count: u8) -> u8;
}

impl BitFieldExt for u8 {
    #[inline]
    fn bits(self, offset: u8, count: u8) -> u8 {
        debug_assert!(count >= 1 && offset + count <= 8);

        let mask = ((1_u16 << count) - 1) as u8;
        (self >> offset) & mask
    }

    #[inline]
    fn top_bits(self, count: u8) -> u8 {
        self.bits(8 - count, count)
    }
}

/// Widens a signed byte to 16 bits by replicating its sign bit.
#[inline]
pub fn sign_extend(value: u8) -> i16 {
    value as i8 as i16
}
