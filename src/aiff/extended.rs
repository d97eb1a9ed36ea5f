//! IEEE 754 80-bit extended precision, used for the COMM sample rate.

const BIAS: i32 = 16383;

/// Decode a 10-byte big-endian extended float.
pub fn read_extended(raw: [u8; 10]) -> f64 {
    let sign_exp = u16::from_be_bytes([raw[0], raw[1]]);
    let mut mantissa_bytes = [0u8; 8];
    mantissa_bytes.copy_from_slice(&raw[2..10]);
    let mantissa = u64::from_be_bytes(mantissa_bytes);

    let exponent = (sign_exp & 0x7FFF) as i32;
    if exponent == 0 && mantissa == 0 {
        return 0.0;
    }
    if exponent == 0x7FFF {
        return f64::NAN;
    }

    let magnitude = mantissa as f64 * 2f64.powi(exponent - BIAS - 63);
    if sign_exp & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Encode a finite f64 as a 10-byte big-endian extended float.
///
/// Zero, subnormal, and non-finite inputs encode as zero.
pub fn write_extended(value: f64) -> [u8; 10] {
    let mut out = [0u8; 10];
    if !value.is_normal() {
        return out;
    }

    let bits = value.abs().to_bits();
    let exponent = ((bits >> 52) & 0x7FF) as i32 - 1023 + BIAS;
    let fraction = bits & ((1u64 << 52) - 1);
    let mantissa = (1u64 << 63) | (fraction << 11);

    let sign = if value.is_sign_negative() { 0x8000 } else { 0 };
    out[0..2].copy_from_slice(&(sign | exponent as u16).to_be_bytes());
    out[2..10].copy_from_slice(&mantissa.to_be_bytes());
    out
}
