/// Predictor coefficient pairs in 11-bit fixed point, indexed by the low
/// nibble of each frame's header byte. Index 0 predicts silence.
pub const COEFFICIENTS: [(i32, i32); 16] = [
    (0x0000, 0x0000),
    (0x0800, 0x0000),
    (0x0000, 0x0800),
    (0x0400, 0x0400),
    (0x1000, -0x0800),
    (0x0E00, -0x0600),
    (0x0C00, -0x0400),
    (0x1200, -0x0A00),
    (0x1068, -0x08C8),
    (0x12C0, -0x0B40),
    (0x1400, -0x0C00),
    (0x0800, -0x0800),
    (0x0400, -0x0400),
    (-0x0400, 0x0400),
    (-0x0400, 0x0000),
    (-0x0800, 0x0000),
];

/// Looks up a coefficient pair; only the low four bits of `index` are used.
#[inline]
pub fn coefficient_pair(index: u8) -> (i32, i32) {
    COEFFICIENTS[(index & 0x0F) as usize]
}
