use crate::base62::Base62Error;

/// Radix-62 alphabet in ascending ASCII order.
///
/// Digits sort before upper-case letters, which sort before lower-case
/// letters, so fixed-width encodings compare byte-wise exactly like the
/// integers they represent.
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const NO_VALUE: u8 = 255;
const RADIX: u64 = 62;

/// Canonical encoded length: the smallest digit count covering 160 bits.
pub(crate) const ENCODED_LEN: usize = 27;

/// Number of 64-bit limbs backing a 160-bit value, little-endian.
pub(crate) const LIMBS: usize = 3;

/// Lookup table for radix-62 decoding.
///
/// Unlike Crockford base32 there are no aliases: upper- and lower-case
/// letters are distinct digits, so decoding is case-sensitive.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 62 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Encodes a 160-bit value (three little-endian 64-bit limbs, of which the
/// top limb holds only 32 significant bits) into fixed-width radix-62,
/// writing output to `buf`.
///
/// Radix 62 is not bit-aligned, so encoding is 27 rounds of long division:
/// each round divides the full limb vector by 62 and emits the remainder as
/// the next least significant digit. After 27 rounds the quotient is zero
/// because 62^27 > 2^160.
pub(crate) fn encode_base62(limbs: [u64; LIMBS], buf: &mut [u8; ENCODED_LEN]) {
    let mut limbs = limbs;
    for out in buf.iter_mut().rev() {
        let mut rem: u64 = 0;
        for limb in limbs.iter_mut().rev() {
            let cur = (u128::from(rem) << 64) | u128::from(*limb);
            *limb = (cur / u128::from(RADIX)) as u64;
            rem = (cur % u128::from(RADIX)) as u64;
        }
        *out = ALPHABET[rem as usize];
    }
    debug_assert!(limbs == [0; LIMBS], "value wider than 160 bits");
}

/// Decodes a fixed-length radix-62 string into three little-endian 64-bit
/// limbs.
///
/// Returns an error if the input has the wrong length, contains a byte
/// outside the alphabet, or decodes to a value of 2^160 or more.
pub(crate) fn decode_base62(encoded: &str) -> Result<[u64; LIMBS], Base62Error> {
    if encoded.len() != ENCODED_LEN {
        return Err(Base62Error::DecodeInvalidLen { len: encoded.len() });
    }

    let mut limbs = [0_u64; LIMBS];
    for (index, byte) in encoded.bytes().enumerate() {
        let val = LOOKUP[byte as usize];
        if val == NO_VALUE {
            return Err(Base62Error::DecodeInvalidAscii { byte, index });
        }

        // limbs = limbs * 62 + val
        let mut carry = u128::from(val);
        for limb in limbs.iter_mut() {
            let cur = u128::from(*limb) * u128::from(RADIX) + carry;
            *limb = cur as u64;
            carry = cur >> 64;
        }
        // Only the final digit can push past 160 bits: the top limb holds 32
        // significant bits, so its own multiply never carries out.
        if limbs[LIMBS - 1] > u64::from(u32::MAX) {
            return Err(Base62Error::DecodeOverflow);
        }
    }

    Ok(limbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_str(limbs: [u64; LIMBS]) -> String {
        let mut buf = [0_u8; ENCODED_LEN];
        encode_base62(limbs, &mut buf);
        core::str::from_utf8(&buf).unwrap().to_owned()
    }

    #[test]
    fn encode_zero_is_all_zero_digits() {
        assert_eq!(encode_str([0, 0, 0]), "0".repeat(ENCODED_LEN));
    }

    #[test]
    fn encode_small_values() {
        let zeros = "0".repeat(ENCODED_LEN - 1);
        assert_eq!(encode_str([1, 0, 0]), format!("{zeros}1"));
        assert_eq!(encode_str([9, 0, 0]), format!("{zeros}9"));
        assert_eq!(encode_str([10, 0, 0]), format!("{zeros}A"));
        assert_eq!(encode_str([35, 0, 0]), format!("{zeros}Z"));
        assert_eq!(encode_str([36, 0, 0]), format!("{zeros}a"));
        assert_eq!(encode_str([61, 0, 0]), format!("{zeros}z"));

        let zeros = "0".repeat(ENCODED_LEN - 2);
        assert_eq!(encode_str([62, 0, 0]), format!("{zeros}10"));

        let zeros = "0".repeat(ENCODED_LEN - 3);
        assert_eq!(encode_str([62 * 62, 0, 0]), format!("{zeros}100"));
    }

    #[test]
    fn roundtrip_preserves_limb_values() {
        let samples: &[[u64; LIMBS]] = &[
            [0, 0, 0],
            [1, 0, 0],
            [u64::MAX, 0, 0],
            [0, u64::MAX, 0],
            [u64::MAX, u64::MAX, 0],
            [u64::MAX, u64::MAX, u64::from(u32::MAX)],
            [0xDEAD_BEEF, 0xFEED_FACE, 12345],
            [42, 42, 42],
        ];
        for &limbs in samples {
            let encoded = encode_str(limbs);
            let decoded = decode_base62(&encoded).unwrap();
            assert_eq!(limbs, decoded, "roundtrip for {encoded}");
        }
    }

    #[test]
    fn encoded_order_matches_numeric_order() {
        // Numerically ascending values, hand-picked to straddle limb
        // boundaries.
        let ascending: &[[u64; LIMBS]] = &[
            [0, 0, 0],
            [61, 0, 0],
            [62, 0, 0],
            [u64::MAX, 0, 0],
            [0, 1, 0],
            [u64::MAX, u64::MAX, 0],
            [0, 0, 1],
            [7, 9, 1],
            [0, 0, u64::from(u32::MAX)],
            [u64::MAX, u64::MAX, u64::from(u32::MAX)],
        ];
        let encoded: Vec<String> = ascending.iter().map(|&l| encode_str(l)).collect();
        let mut sorted = encoded.clone();
        sorted.sort();
        assert_eq!(encoded, sorted);
    }

    #[test]
    fn decode_is_case_sensitive() {
        let upper = format!("{}A", "0".repeat(ENCODED_LEN - 1));
        let lower = format!("{}a", "0".repeat(ENCODED_LEN - 1));
        assert_ne!(
            decode_base62(&upper).unwrap(),
            decode_base62(&lower).unwrap()
        );
    }

    #[test]
    fn decode_returns_error_for_invalid_character() {
        let invalid = format!("{}!", "0".repeat(ENCODED_LEN - 1));
        assert_eq!(
            decode_base62(&invalid).unwrap_err(),
            Base62Error::DecodeInvalidAscii {
                byte: b'!',
                index: ENCODED_LEN - 1,
            }
        );

        // '@' sits between digits and upper-case letters in ASCII
        let invalid = format!("@{}", "0".repeat(ENCODED_LEN - 1));
        assert_eq!(
            decode_base62(&invalid).unwrap_err(),
            Base62Error::DecodeInvalidAscii { byte: b'@', index: 0 }
        );
    }

    #[test]
    fn decode_returns_error_for_invalid_length() {
        for len in [0, 1, ENCODED_LEN - 1, ENCODED_LEN + 1] {
            let s = "0".repeat(len);
            assert_eq!(
                decode_base62(&s).unwrap_err(),
                Base62Error::DecodeInvalidLen { len }
            );
        }
    }

    #[test]
    fn decode_returns_error_on_overflow() {
        // 62^27 - 1 is the largest well-formed input and exceeds 2^160 - 1.
        let max_digits = "z".repeat(ENCODED_LEN);
        assert_eq!(
            decode_base62(&max_digits).unwrap_err(),
            Base62Error::DecodeOverflow
        );
    }

    #[test]
    fn decode_accepts_max_value() {
        let max = [u64::MAX, u64::MAX, u64::from(u32::MAX)];
        let encoded = encode_str(max);
        assert_eq!(decode_base62(&encoded).unwrap(), max);
    }
}
