//! secp256k1 affine arithmetic
//!
//! Only what the walk consumes: point add/double, the binary scalar ladder,
//! curve membership, and the SEC1 hex codec (uncompressed and compressed).
//! Not a general ECC library; nothing here is constant-time.

use crate::error::{Result, SolverError};
use crate::math::scalar::Scalar;

/// Field prime `p = 2^256 - 2^32 - 977`.
pub const FIELD_PRIME_HEX: &str =
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F";
/// Group order `n`.
pub const CURVE_ORDER_HEX: &str =
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";
const GENERATOR_X_HEX: &str =
    "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798";
const GENERATOR_Y_HEX: &str =
    "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8";

/// Affine curve point, or the point at infinity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    x: Scalar,
    y: Scalar,
    infinity: bool,
}

impl Point {
    /// The group identity. Coordinates are zeroed so derived equality holds.
    pub fn infinity() -> Self {
        Point {
            x: Scalar::zero(),
            y: Scalar::zero(),
            infinity: true,
        }
    }

    pub fn new(x: Scalar, y: Scalar) -> Self {
        Point {
            x,
            y,
            infinity: false,
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.infinity
    }

    pub fn x(&self) -> &Scalar {
        &self.x
    }

    pub fn y(&self) -> &Scalar {
        &self.y
    }

    /// DP identity: canonical x/y hex joined by a colon.
    ///
    /// Only finite points have keys; the infinity point is never published.
    pub fn key(&self) -> String {
        debug_assert!(!self.infinity);
        format!("{}:{}", self.x.to_hex(), self.y.to_hex())
    }

    /// Inverse of [`Point::key`]. Curve membership is not checked here.
    pub fn from_key(key: &str) -> Result<Self> {
        let (x_hex, y_hex) = key
            .split_once(':')
            .ok_or_else(|| SolverError::InvalidPoint(format!("bad point key: {key}")))?;
        Ok(Point::new(Scalar::from_hex(x_hex)?, Scalar::from_hex(y_hex)?))
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.infinity {
            write!(f, "Infinity")
        } else {
            write!(f, "({}, {})", self.x.to_hex(), self.y.to_hex())
        }
    }
}

/// secp256k1 parameters plus the group operations over them.
#[derive(Debug, Clone)]
pub struct Secp256k1 {
    /// Field prime.
    pub p: Scalar,
    /// Group order.
    pub n: Scalar,
    /// Curve constant in `y^2 = x^3 + b`.
    pub b: Scalar,
    g: Point,
}

impl Secp256k1 {
    pub fn new() -> Self {
        let parse = |hex| Scalar::from_hex(hex).expect("curve constant");
        Secp256k1 {
            p: parse(FIELD_PRIME_HEX),
            n: parse(CURVE_ORDER_HEX),
            b: Scalar::from_u64(7),
            g: Point::new(parse(GENERATOR_X_HEX), parse(GENERATOR_Y_HEX)),
        }
    }

    pub fn generator(&self) -> &Point {
        &self.g
    }

    /// Group addition, handling identity, inverse, and tangent cases.
    pub fn add(&self, a: &Point, b: &Point) -> Point {
        if a.is_infinity() {
            return b.clone();
        }
        if b.is_infinity() {
            return a.clone();
        }
        if a.x == b.x {
            if a.y == b.y {
                return self.double(a);
            }
            // P + (-P) = O
            return Point::infinity();
        }

        // s = (y2 - y1) / (x2 - x1)
        let dy = b.y.mod_sub(&a.y, &self.p);
        let dx = b.x.mod_sub(&a.x, &self.p);
        let dx_inv = dx
            .mod_inverse(&self.p)
            .expect("nonzero field element is invertible");
        let s = dy.mod_mul(&dx_inv, &self.p);

        let x3 = s
            .mod_mul(&s, &self.p)
            .mod_sub(&a.x, &self.p)
            .mod_sub(&b.x, &self.p);
        let y3 = s
            .mod_mul(&a.x.mod_sub(&x3, &self.p), &self.p)
            .mod_sub(&a.y, &self.p);
        Point::new(x3, y3)
    }

    pub fn double(&self, a: &Point) -> Point {
        if a.is_infinity() {
            return a.clone();
        }
        if a.y.is_zero() {
            return Point::infinity();
        }

        // s = 3x^2 / 2y  (curve a-coefficient is zero)
        let three_x2 = Scalar::from_u64(3).mod_mul(&a.x.mod_mul(&a.x, &self.p), &self.p);
        let two_y = Scalar::from_u64(2).mod_mul(&a.y, &self.p);
        let denom_inv = two_y
            .mod_inverse(&self.p)
            .expect("nonzero field element is invertible");
        let s = three_x2.mod_mul(&denom_inv, &self.p);

        let x3 = s
            .mod_mul(&s, &self.p)
            .mod_sub(&a.x, &self.p)
            .mod_sub(&a.x, &self.p);
        let y3 = s
            .mod_mul(&a.x.mod_sub(&x3, &self.p), &self.p)
            .mod_sub(&a.y, &self.p);
        Point::new(x3, y3)
    }

    /// Scalar multiplication via the right-to-left binary ladder.
    pub fn mul(&self, k: &Scalar, point: &Point) -> Point {
        let mut result = Point::infinity();
        let mut addend = point.clone();
        for i in 0..k.bit_length() {
            if k.bit(i) {
                result = self.add(&result, &addend);
            }
            addend = self.double(&addend);
        }
        result
    }

    pub fn negate(&self, point: &Point) -> Point {
        if point.is_infinity() {
            return point.clone();
        }
        Point::new(point.x.clone(), Scalar::zero().mod_sub(&point.y, &self.p))
    }

    /// `y^2 == x^3 + 7 mod p`; the infinity point is on the curve.
    pub fn is_on_curve(&self, point: &Point) -> bool {
        if point.is_infinity() {
            return true;
        }
        let y2 = point.y.mod_mul(&point.y, &self.p);
        let x3 = point
            .x
            .mod_mul(&point.x, &self.p)
            .mod_mul(&point.x, &self.p);
        y2 == x3.mod_add(&self.b, &self.p)
    }

    /// Square root in the field, if one exists.
    ///
    /// `p = 3 mod 4`, so `a^((p+1)/4)` is a root of every quadratic residue.
    pub fn sqrt_mod_p(&self, a: &Scalar) -> Option<Scalar> {
        let exponent = self.p.add(&Scalar::one()).shr(2);
        let root = a.mod_pow(&exponent, &self.p);
        if root.mod_mul(&root, &self.p) == a.rem(&self.p) {
            Some(root)
        } else {
            None
        }
    }

    /// Parse a SEC1 hex public key (uncompressed `04...` or compressed
    /// `02`/`03...`), validating curve membership.
    pub fn parse_point_hex(&self, hex: &str) -> Result<Point> {
        let digits = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        let bytes =
            hex::decode(digits).map_err(|e| SolverError::InvalidPoint(format!("bad hex: {e}")))?;

        match (bytes.len(), bytes.first()) {
            (65, Some(0x04)) => {
                let point = Point::new(
                    Scalar::from_bytes_be(&bytes[1..33]),
                    Scalar::from_bytes_be(&bytes[33..65]),
                );
                if !self.is_on_curve(&point) {
                    return Err(SolverError::InvalidPoint(
                        "coordinates not on curve".to_string(),
                    ));
                }
                Ok(point)
            }
            (33, Some(prefix @ (0x02 | 0x03))) => {
                let x = Scalar::from_bytes_be(&bytes[1..33]);
                let rhs = x
                    .mod_mul(&x, &self.p)
                    .mod_mul(&x, &self.p)
                    .mod_add(&self.b, &self.p);
                let y = self.sqrt_mod_p(&rhs).ok_or_else(|| {
                    SolverError::InvalidPoint("x coordinate not on curve".to_string())
                })?;
                let want_odd = *prefix == 0x03;
                let y = if y.bit(0) == want_odd {
                    y
                } else {
                    Scalar::zero().mod_sub(&y, &self.p)
                };
                Ok(Point::new(x, y))
            }
            _ => Err(SolverError::InvalidPoint(format!(
                "expected 33 or 65 encoded bytes, got {}",
                bytes.len()
            ))),
        }
    }

    /// Uncompressed SEC1 hex: `04 || x || y`, 64 digits per coordinate.
    pub fn point_to_hex(&self, point: &Point) -> String {
        if point.is_infinity() {
            return "00".to_string();
        }
        format!(
            "04{}{}",
            point.x.to_hex_padded(64),
            point.y.to_hex_padded(64)
        )
    }
}

impl Default for Secp256k1 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Standard small multiples of G.
    const G2_X: &str = "C6047F9441ED7D6D3045406E95C07CD85C778E4B8CEF3CA7ABAC09B95C709EE5";
    const G2_Y: &str = "1AE168FEA63DC339A3C58419466CEAFBF99B43A2A12C0F5CF4D6C9C045A97B57";
    const G3_X: &str = "F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9";
    const G3_Y: &str = "388F7B0F632DE8140FE337E62A37F3566500A99934C2231B6CB9FD7584B8E672";

    fn point(x: &str, y: &str) -> Point {
        Point::new(Scalar::from_hex(x).unwrap(), Scalar::from_hex(y).unwrap())
    }

    #[test]
    fn test_generator_on_curve() {
        let curve = Secp256k1::new();
        assert!(curve.is_on_curve(curve.generator()));
        assert!(curve.is_on_curve(&Point::infinity()));
    }

    #[test]
    fn test_known_multiples() {
        let curve = Secp256k1::new();
        let g = curve.generator().clone();
        let g2 = point(G2_X, G2_Y);
        let g3 = point(G3_X, G3_Y);

        assert_eq!(curve.double(&g), g2);
        assert_eq!(curve.add(&g, &g2), g3);
        assert_eq!(curve.mul(&Scalar::from_u64(2), &g), g2);
        assert_eq!(curve.mul(&Scalar::from_u64(3), &g), g3);
    }

    #[test]
    fn test_identity_laws() {
        let curve = Secp256k1::new();
        let g = curve.generator().clone();
        let inf = Point::infinity();

        assert_eq!(curve.add(&g, &inf), g);
        assert_eq!(curve.add(&inf, &g), g);
        assert_eq!(curve.add(&g, &curve.negate(&g)), inf);
        assert_eq!(curve.double(&g), curve.add(&g, &g));
    }

    #[test]
    fn test_mul_edge_scalars() {
        let curve = Secp256k1::new();
        let g = curve.generator().clone();

        assert_eq!(curve.mul(&Scalar::zero(), &g), Point::infinity());
        assert_eq!(curve.mul(&Scalar::one(), &g), g);
        // [n]G = O
        assert_eq!(curve.mul(&curve.n, &g), Point::infinity());
        // [n+1]G = G
        assert_eq!(curve.mul(&curve.n.add(&Scalar::one()), &g), g);
    }

    #[test]
    fn test_multiples_stay_on_curve() {
        let curve = Secp256k1::new();
        for k in [5u64, 42, 1000, 0xDEADBEEF] {
            let p = curve.mul(&Scalar::from_u64(k), curve.generator());
            assert!(curve.is_on_curve(&p), "[{k}]G off curve");
        }
    }

    #[test]
    fn test_uncompressed_codec_round_trip() {
        let curve = Secp256k1::new();
        let p = curve.mul(&Scalar::from_u64(42), curve.generator());
        let hex = curve.point_to_hex(&p);
        assert_eq!(hex.len(), 130);
        assert!(hex.starts_with("04"));
        assert_eq!(curve.parse_point_hex(&hex).unwrap(), p);
    }

    #[test]
    fn test_compressed_decode_even_y() {
        let curve = Secp256k1::new();
        // y(G) is even, so G compresses with an 02 prefix.
        let compressed = format!("02{}", curve.generator().x().to_hex_padded(64));
        let decoded = curve.parse_point_hex(&compressed).unwrap();
        assert_eq!(&decoded, curve.generator());
    }

    #[test]
    fn test_compressed_decode_odd_y() {
        let curve = Secp256k1::new();
        // y(2G) is odd, so 2G compresses with an 03 prefix.
        let g2 = point(G2_X, G2_Y);
        let compressed = format!("03{}", g2.x().to_hex_padded(64));
        assert_eq!(curve.parse_point_hex(&compressed).unwrap(), g2);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let curve = Secp256k1::new();
        assert!(curve.parse_point_hex("deadbeef").is_err());
        assert!(curve.parse_point_hex("").is_err());
        assert!(curve.parse_point_hex("zz").is_err());

        // Valid length, off-curve coordinates: bump y(G) by one.
        let g = curve.generator();
        let bad = format!(
            "04{}{}",
            g.x().to_hex_padded(64),
            g.y().add(&Scalar::one()).to_hex_padded(64)
        );
        assert!(curve.parse_point_hex(&bad).is_err());

        // Unknown prefix byte.
        let bad_prefix = format!("05{}", g.x().to_hex_padded(64));
        assert!(curve.parse_point_hex(&bad_prefix).is_err());
    }

    #[test]
    fn test_sqrt_mod_p() {
        let curve = Secp256k1::new();
        let y = curve.generator().y().clone();
        let y2 = y.mod_mul(&y, &curve.p);
        let root = curve.sqrt_mod_p(&y2).unwrap();
        assert!(root == y || root == Scalar::zero().mod_sub(&y, &curve.p));

        // -1 is a non-residue when p = 3 mod 4.
        let minus_one = curve.p.checked_sub(&Scalar::one()).unwrap();
        assert!(curve.sqrt_mod_p(&minus_one).is_none());
    }

    #[test]
    fn test_point_key_round_trip() {
        let curve = Secp256k1::new();
        let p = curve.mul(&Scalar::from_u64(7), curve.generator());
        let key = p.key();
        assert!(key.contains(':'));
        assert_eq!(Point::from_key(&key).unwrap(), p);
        assert!(Point::from_key("nocolon").is_err());
    }
}
