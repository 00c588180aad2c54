//! The 8-bit CRC used across the 1-Wire device family.

/// Reflected form of the `x^8 + x^5 + x^4 + 1` polynomial.
const POLYNOMIAL: u8 = 0x8C;

/// Compute the Dallas/Maxim CRC-8 over `data`, processing each byte LSB first.
pub fn crc8(data: &[u8]) -> u8 {
    compute_partial_crc8(0, data)
}

/// Continue a CRC-8 computation from a previous `crc` value.
pub fn compute_partial_crc8(crc: u8, data: &[u8]) -> u8 {
    let mut crc = crc;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= POLYNOMIAL;
            }
            byte >>= 1;
        }
    }
    crc
}
