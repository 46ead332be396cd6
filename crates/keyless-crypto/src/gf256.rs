//! Arithmetic in GF(2^8) with the AES reduction polynomial
//! x^8 + x^4 + x^3 + x + 1 (0x11b).
//!
//! Multiplication and inversion run a fixed number of iterations with no
//! data-dependent branches or table lookups.

/// Low byte of the reduction polynomial (the x^8 term is implicit).
const REDUCTION: u8 = 0x1b;

/// Addition (and subtraction) in GF(2^8).
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiplication in GF(2^8).
pub fn mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    for _ in 0..8 {
        // mask is 0xff when the low bit of b is set
        product ^= a & 0u8.wrapping_sub(b & 1);
        let carry = 0u8.wrapping_sub(a >> 7);
        a = (a << 1) ^ (REDUCTION & carry);
        b >>= 1;
    }
    product
}

/// Multiplicative inverse, computed as a^254. Returns 0 for 0.
pub fn inv(a: u8) -> u8 {
    // 254 = 0b1111_1110
    let mut result = 1u8;
    let mut base = a;
    let mut exp = 254u8;
    for _ in 0..8 {
        let bit = 0u8.wrapping_sub(exp & 1);
        let multiplied = mul(result, base);
        result = (multiplied & bit) | (result & !bit);
        base = mul(base, base);
        exp >>= 1;
    }
    result
}

/// Division a / b. The caller guarantees `b != 0`.
pub fn div(a: u8, b: u8) -> u8 {
    debug_assert!(b != 0, "division by zero in GF(256)");
    mul(a, inv(b))
}

/// Evaluate a polynomial (constant term first) at `x` using Horner's rule.
pub fn poly_eval(coefficients: &[u8], x: u8) -> u8 {
    coefficients
        .iter()
        .rev()
        .fold(0u8, |acc, &c| add(mul(acc, x), c))
}

/// Lagrange interpolation of `points` evaluated at `x`.
///
/// Points must have pairwise distinct x-coordinates.
pub fn interpolate_at(points: &[(u8, u8)], x: u8) -> u8 {
    let mut value = 0u8;
    for (i, &(xi, yi)) in points.iter().enumerate() {
        let mut numerator = 1u8;
        let mut denominator = 1u8;
        for (j, &(xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = mul(numerator, add(x, xj));
            denominator = mul(denominator, add(xi, xj));
        }
        value = add(value, mul(yi, div(numerator, denominator)));
    }
    value
}
