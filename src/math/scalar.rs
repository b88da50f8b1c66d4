//! Arbitrary-precision scalar arithmetic
//!
//! Thin wrapper over `num_bigint::BigUint` providing the operations the walk
//! needs: plain and modular arithmetic with an explicit modulus, hex codec,
//! bit queries. Values are nonnegative; modular subtraction wraps into
//! `[0, m)`.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::error::{Result, SolverError};

/// Nonnegative arbitrary-precision integer.
///
/// Canonical hex form is uppercase with no leading zeros and no prefix
/// (`"0"` for zero), matching the form used in DP keys and checkpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar(BigUint);

impl Scalar {
    pub fn zero() -> Self {
        Scalar(BigUint::zero())
    }

    pub fn one() -> Self {
        Scalar(BigUint::one())
    }

    pub fn from_u64(value: u64) -> Self {
        Scalar(BigUint::from(value))
    }

    /// Parse from hex, accepting an optional `0x`/`0X` prefix and mixed case.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        if digits.is_empty() {
            return Err(SolverError::InvalidHex(hex.to_string()));
        }
        BigUint::parse_bytes(digits.as_bytes(), 16)
            .map(Scalar)
            .ok_or_else(|| SolverError::InvalidHex(hex.to_string()))
    }

    /// Interpret big-endian bytes as an integer.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Scalar(BigUint::from_bytes_be(bytes))
    }

    /// Canonical hex: uppercase, minimal length, no prefix.
    pub fn to_hex(&self) -> String {
        format!("{:X}", self.0)
    }

    /// Hex zero-padded on the left to `width` digits.
    pub fn to_hex_padded(&self, width: usize) -> String {
        format!("{:0>width$}", self.to_hex(), width = width)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_even(&self) -> bool {
        !self.bit(0)
    }

    /// Number of significant bits; zero has bit length 0.
    pub fn bit_length(&self) -> u64 {
        self.0.bits()
    }

    pub fn bit(&self, index: u64) -> bool {
        self.0.bit(index)
    }

    /// Least significant 64 bits.
    pub fn low_u64(&self) -> u64 {
        self.0.iter_u64_digits().next().unwrap_or(0)
    }

    pub fn add(&self, other: &Scalar) -> Scalar {
        Scalar(&self.0 + &other.0)
    }

    /// `self - other`, or `None` when the result would be negative.
    pub fn checked_sub(&self, other: &Scalar) -> Option<Scalar> {
        if self.0 >= other.0 {
            Some(Scalar(&self.0 - &other.0))
        } else {
            None
        }
    }

    pub fn shl(&self, bits: u64) -> Scalar {
        Scalar(&self.0 << bits)
    }

    pub fn shr(&self, bits: u64) -> Scalar {
        Scalar(&self.0 >> bits)
    }

    /// Remainder of division by `modulus`.
    pub fn rem(&self, modulus: &Scalar) -> Scalar {
        Scalar(&self.0 % &modulus.0)
    }

    pub fn mod_add(&self, other: &Scalar, modulus: &Scalar) -> Scalar {
        Scalar((&self.0 + &other.0) % &modulus.0)
    }

    /// `(self - other) mod modulus`, wrapping negative differences.
    pub fn mod_sub(&self, other: &Scalar, modulus: &Scalar) -> Scalar {
        let a = &self.0 % &modulus.0;
        let b = &other.0 % &modulus.0;
        if a >= b {
            Scalar(a - b)
        } else {
            Scalar(&modulus.0 - (b - a))
        }
    }

    pub fn mod_mul(&self, other: &Scalar, modulus: &Scalar) -> Scalar {
        Scalar((&self.0 * &other.0) % &modulus.0)
    }

    pub fn mod_pow(&self, exponent: &Scalar, modulus: &Scalar) -> Scalar {
        Scalar(self.0.modpow(&exponent.0, &modulus.0))
    }

    /// Modular inverse via the extended Euclidean algorithm.
    ///
    /// Returns `None` for zero or when `gcd(self, modulus) != 1`.
    pub fn mod_inverse(&self, modulus: &Scalar) -> Option<Scalar> {
        if self.is_zero() || modulus.is_zero() {
            return None;
        }

        let m = BigInt::from(modulus.0.clone());
        let mut old_r = BigInt::from(&self.0 % &modulus.0);
        let mut r = m.clone();
        let mut old_s = BigInt::one();
        let mut s = BigInt::zero();

        while !r.is_zero() {
            let quotient = &old_r / &r;
            let next_r = &old_r - &quotient * &r;
            old_r = r;
            r = next_r;
            let next_s = &old_s - &quotient * &s;
            old_s = s;
            s = next_s;
        }

        if old_r != BigInt::one() {
            return None;
        }

        let inverse = ((old_s % &m) + &m) % &m;
        // Nonnegative after the shift above.
        Some(Scalar(inverse.to_biguint().expect("inverse is nonnegative")))
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECP256K1_P: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F";

    #[test]
    fn test_hex_round_trip() {
        let s = Scalar::from_hex(SECP256K1_P).unwrap();
        assert_eq!(s.to_hex(), SECP256K1_P);

        // Prefix and case are accepted on input.
        let lower = Scalar::from_hex("0xdeadbeef").unwrap();
        assert_eq!(lower.to_hex(), "DEADBEEF");
    }

    #[test]
    fn test_hex_canonical_form() {
        // Leading zeros are dropped on output.
        assert_eq!(Scalar::from_hex("00ff").unwrap().to_hex(), "FF");
        assert_eq!(Scalar::zero().to_hex(), "0");
        assert_eq!(Scalar::from_u64(42).to_hex(), "2A");
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(Scalar::from_hex("").is_err());
        assert!(Scalar::from_hex("0x").is_err());
        assert!(Scalar::from_hex("xyz").is_err());
    }

    #[test]
    fn test_hex_padded() {
        assert_eq!(Scalar::from_u64(0x2A).to_hex_padded(8), "0000002A");
        let p = Scalar::from_hex(SECP256K1_P).unwrap();
        assert_eq!(p.to_hex_padded(64), SECP256K1_P);
    }

    #[test]
    fn test_basic_arithmetic() {
        let a = Scalar::from_u64(12345);
        let b = Scalar::from_u64(67890);
        assert_eq!(a.add(&b), Scalar::from_u64(80235));
        assert_eq!(b.checked_sub(&a), Some(Scalar::from_u64(55545)));
        assert_eq!(a.checked_sub(&b), None);
        assert_eq!(Scalar::one().shl(16), Scalar::from_u64(65536));
        assert_eq!(Scalar::from_u64(65536).shr(4), Scalar::from_u64(4096));
        assert_eq!(b.rem(&a), Scalar::from_u64(67890 % 12345));
    }

    #[test]
    fn test_mod_sub_wraps() {
        let m = Scalar::from_u64(17);
        let a = Scalar::from_u64(3);
        let b = Scalar::from_u64(10);
        // 3 - 10 mod 17 = 10
        assert_eq!(a.mod_sub(&b, &m), Scalar::from_u64(10));
        assert_eq!(b.mod_sub(&a, &m), Scalar::from_u64(7));
    }

    #[test]
    fn test_mod_mul_and_pow() {
        let m = Scalar::from_u64(97);
        let a = Scalar::from_u64(50);
        let b = Scalar::from_u64(60);
        assert_eq!(a.mod_mul(&b, &m), Scalar::from_u64(3000 % 97));
        // Fermat: a^(p-1) = 1 mod p
        assert_eq!(a.mod_pow(&Scalar::from_u64(96), &m), Scalar::one());
    }

    #[test]
    fn test_mod_inverse_small() {
        let m = Scalar::from_u64(17);
        // 3 * 6 = 18 = 1 mod 17
        assert_eq!(Scalar::from_u64(3).mod_inverse(&m), Some(Scalar::from_u64(6)));
        assert_eq!(Scalar::zero().mod_inverse(&m), None);
        // 6 has no inverse mod 9
        assert_eq!(
            Scalar::from_u64(6).mod_inverse(&Scalar::from_u64(9)),
            None
        );
    }

    #[test]
    fn test_mod_inverse_field_prime() {
        let p = Scalar::from_hex(SECP256K1_P).unwrap();
        let a = Scalar::from_hex("123456789ABCDEF0123456789ABCDEF").unwrap();
        let inv = a.mod_inverse(&p).unwrap();
        assert_eq!(a.mod_mul(&inv, &p), Scalar::one());
    }

    #[test]
    fn test_bit_queries() {
        let n = Scalar::from_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141")
            .unwrap();
        assert_eq!(n.bit_length(), 256);
        assert!(n.bit(0));
        assert!(!n.is_even());
        assert_eq!(Scalar::zero().bit_length(), 0);
        assert_eq!(Scalar::from_u64(0x100).bit_length(), 9);
        assert_eq!(n.low_u64(), 0xBFD25E8CD0364141);
    }
}
