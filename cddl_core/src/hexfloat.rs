/***************************************************************************************************
 * Copyright (c) 2020-2021 Jeremy O'Donoghue. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
//! Assembly of IEEE754 double-precision floats from the CDDL `hexfloat` production
//! (`["-"] "0x" 1*HEXDIG ["." 1*HEXDIG] "p" exponent`).
//!
//! Layout, most to least significant bit: 1 sign bit, 11-bit biased exponent (bias 1023),
//! 52-bit fraction. The parser above has already split the literal into sign/integer
//! part/fractional part/exponent text; this module does the bit assembly.

/// Assemble a hex-float literal into its `f64` bit pattern.
pub fn assemble(is_negative: bool, int_part: &str, frac_part: &str, exp_part: &str) -> Result<f64, &'static str> {
    let sign = sign_bit(is_negative);
    let exp = biased_exponent(exp_part)?;
    let (significand, exp_shift) = normalize_significand(int_part, frac_part)?;
    if exp == -1023 || exp == 1024 || exp_shift == 0 {
        // Signed zero, subnormal, infinity or NaN: pass the raw exponent through.
        let exp_bits = (exp as u64) << 52;
        Ok(f64::from_bits(sign | exp_bits | significand))
    } else if exp + exp_shift > -1023 && exp + exp_shift < 1024 {
        let exp_bits = ((exp + exp_shift) as u64) << 52;
        Ok(f64::from_bits(sign | exp_bits | significand))
    } else {
        Err("hexfloat: exponent out of range after normalization")
    }
}

fn sign_bit(is_negative: bool) -> u64 {
    if is_negative {
        0x8000_0000_0000_0000u64
    } else {
        0
    }
}

/// Returns the biased exponent (adds 1023), or passes through the two sentinel values used
/// for signed zero / subnormal / NaN representations.
fn biased_exponent(s: &str) -> Result<i64, &'static str> {
    let exp: i64 = s.parse().map_err(|_| "hexfloat: malformed exponent")?;
    if exp > -1023 && exp < 1024 {
        Ok((exp + 1023) & 0x0000_07FF)
    } else if exp == -1023 || exp == 1024 {
        Ok(exp)
    } else {
        Err("hexfloat: exponent out of range")
    }
}

/// Normalizes `int_part.frac_part` (both hex digit strings) to `1.xxxx` form and returns
/// (52-bit significand, exponent adjustment needed to keep the value correct).
fn normalize_significand(int_part: &str, frac_part: &str) -> Result<(u64, i64), &'static str> {
    let int_val = parse_hex(int_part)?;
    let frac_val = parse_hex(frac_part)?;
    let int_is_zero = int_val == 0;

    let exp_adjust: i64 = if !int_is_zero {
        (64 - int_val.leading_zeros()).into()
    } else {
        (0 - frac_val.leading_zeros()).into()
    };

    let leading_frac_zero_nibbles = if int_is_zero {
        match frac_part.chars().position(|c| c != '0') {
            None => 0u64,
            Some(pos) => pos as u64 * 4,
        }
    } else {
        0
    };

    let mut frac_shifted = frac_val;
    while frac_shifted & 0xF000_0000_0000_0000u64 == 0 && frac_shifted != 0 {
        frac_shifted <<= 4;
    }
    frac_shifted >>= leading_frac_zero_nibbles;

    let mut significand = int_val;
    while significand & 0x0010_0000_0000_0000u64 == 0 {
        let carry_bit = if frac_shifted & 0x8000_0000_0000_0000u64 != 0 { 1u64 } else { 0u64 };
        significand = (significand << 1) | carry_bit;
        frac_shifted <<= 1;
        if significand == 0 && frac_shifted == 0 {
            break;
        }
    }

    significand &= 0x000F_FFFF_FFFF_FFFFu64;
    Ok((significand, exp_adjust))
}

fn parse_hex(s: &str) -> Result<u64, &'static str> {
    if s.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(s, 16).map_err(|_| "hexfloat: expected hex digits")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_hex() {
        assert_eq!(parse_hex("1234"), Ok(0x1234u64));
        assert_eq!(parse_hex("abcdef"), Ok(0xab_cdefu64));
        assert!(parse_hex("g123").is_err());
    }

    #[test]
    fn assembles_one_point_zero() {
        // 0x1p0 == 1.0
        let v = assemble(false, "1", "", "0").unwrap();
        assert_eq!(v, 1.0f64);
    }

    #[test]
    fn assembles_two_point_zero() {
        // 0x1p1 == 2.0
        let v = assemble(false, "1", "", "1").unwrap();
        assert_eq!(v, 2.0f64);
    }

    #[test]
    fn assembles_negative() {
        let v = assemble(true, "1", "", "0").unwrap();
        assert_eq!(v, -1.0f64);
    }
}
