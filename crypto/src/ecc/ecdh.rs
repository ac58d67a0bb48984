// SPDX-License-Identifier: Apache-2.0

//! Raw ECDH, i.e. multiplication of a public curve point with a secret
//! scalar.

use super::{curve, key};
use crate::CryptoError;

/// Multiply a public curve point with a secret scalar and obtain the
/// resulting point's plain affine coordinates.
///
/// This is the bare cooperative Diffie-Hellman primitive: the shared point's
/// coordinates are returned as-is, without any hashing or other
/// postprocessing applied.
///
/// <div class="warning">
///
/// The raw coordinates are not suitable for direct use as key material, run
/// them through a KDF first.
///
/// </div>
///
/// The scalar is treated as secret throughout: its validation and the point
/// multiplication are carried out with control flow and memory access
/// patterns independent of its value, the result's coordinates are extracted
/// through a single fixed serialization path and all internal scalar and
/// point state gets zeroized before returning, on success and failure alike.
///
/// Either both output buffers get written in full and `Ok` is returned, or
/// neither of them is touched.
///
/// # Arguments:
///
/// * `curve_ops` - The curve's associated [`CurveOps`](curve::CurveOps),
///   usually obtained through
///   [`Curve::curve_ops()`](curve::Curve::curve_ops).
/// * `pub_key` - The public point to multiply. Its loading through
///   [`EccPublicKey`](key::EccPublicKey) has verified it to be a valid point
///   on the curve, it does not get revalidated here.
/// * `scalar` - The secret scalar in plain, big-endian encoding. Valid
///   values are in the range `[1, n - 1]`, with `n` the order of the curve's
///   generator; both the zero scalar and out-of-range encodings get rejected
///   with an undifferentiated [`CryptoError::InvalidScalar`].
/// * `result_x` - Receives the product's affine x coordinate in canonical
///   big-endian encoding.
/// * `result_y` - Receives the product's affine y coordinate in canonical
///   big-endian encoding.
pub fn pubkey_scalar_mul(
    curve_ops: &curve::CurveOps,
    pub_key: &key::EccPublicKey,
    scalar: &[u8; curve::SCALAR_LEN],
    result_x: &mut [u8; curve::COORDINATE_LEN],
    result_y: &mut [u8; curve::COORDINATE_LEN],
) -> Result<(), CryptoError> {
    let scalar = curve_ops.canonicalize_scalar(scalar)?;
    let d_q = curve_ops.point_scalar_mul(&scalar, pub_key.get_point());
    // A valid point multiplied by a scalar in [1, n - 1] cannot end up at
    // the point at infinity in a prime order group. Rather than relying on
    // the precondition, map the case to an error.
    d_q.into_affine_plain_coordinates(result_x, Some(result_y))?
        .map_err(|e| match e {
            curve::ProjectivePointIntoAffineError::PointIsIdentity => CryptoError::InvalidResult,
        })
}

#[cfg(test)]
fn test_generator_pub_key(curve_ops: &curve::CurveOps) -> key::EccPublicKey {
    let (g_x, g_y) = curve_ops.get_curve().get_generator_coordinates();
    key::EccPublicKey::try_from_plain_coordinates(curve_ops, g_x, g_y).unwrap()
}

#[test]
fn test_pubkey_scalar_mul_by_one() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let pub_key = test_generator_pub_key(&curve_ops);

    let mut scalar = [0u8; curve::SCALAR_LEN];
    scalar[curve::SCALAR_LEN - 1] = 1;
    let mut x = [0u8; curve::COORDINATE_LEN];
    let mut y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &pub_key, &scalar, &mut x, &mut y).unwrap();

    let (g_x, g_y) = curve.get_generator_coordinates();
    assert_eq!(&x, g_x);
    assert_eq!(&y, g_y);
}

#[test]
fn test_pubkey_scalar_mul_by_order_minus_one() {
    use hex_literal::hex;

    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let pub_key = test_generator_pub_key(&curve_ops);

    // (n - 1) * G = -G, i.e. the generator's x coordinate paired with
    // p - G_y.
    let mut scalar = *curve.get_order();
    scalar[curve::SCALAR_LEN - 1] -= 1;
    let mut x = [0u8; curve::COORDINATE_LEN];
    let mut y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &pub_key, &scalar, &mut x, &mut y).unwrap();

    let (g_x, _) = curve.get_generator_coordinates();
    assert_eq!(&x, g_x);
    assert_eq!(
        y,
        hex!("b7c52588d95c3b9aa25b0403f1eef75702e84bb7597aabe663b82f6f04ef2777")
    );
}

#[test]
fn test_pubkey_scalar_mul_rejects_invalid_scalar() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let pub_key = test_generator_pub_key(&curve_ops);

    // Both the zero scalar and the group order are invalid and get rejected
    // with the very same error. Neither attempt shall touch the output
    // buffers.
    let mut x = [0xaau8; curve::COORDINATE_LEN];
    let mut y = [0xaau8; curve::COORDINATE_LEN];

    let zero = [0u8; curve::SCALAR_LEN];
    let e_zero = pubkey_scalar_mul(&curve_ops, &pub_key, &zero, &mut x, &mut y).unwrap_err();
    assert_eq!(e_zero, CryptoError::InvalidScalar);
    assert_eq!(x, [0xaau8; curve::COORDINATE_LEN]);
    assert_eq!(y, [0xaau8; curve::COORDINATE_LEN]);

    let order = *curve.get_order();
    let e_order = pubkey_scalar_mul(&curve_ops, &pub_key, &order, &mut x, &mut y).unwrap_err();
    assert_eq!(e_order, e_zero);
    assert_eq!(x, [0xaau8; curve::COORDINATE_LEN]);
    assert_eq!(y, [0xaau8; curve::COORDINATE_LEN]);
}

#[cfg(test)]
const TEST_SCALAR_A: [u8; curve::SCALAR_LEN] = {
    use hex_literal::hex;
    hex!("37186b78d53c923dcea5bc23a02bc94e13a5e388455a0a0f6eff1e4ec8b0222c")
};

#[cfg(test)]
const TEST_SCALAR_B: [u8; curve::SCALAR_LEN] = {
    use hex_literal::hex;
    hex!("8f1e3c5a7b9d0214e6f8a0c2d4b6988a1c3e5f70929496b8dacefe1032547698")
};

#[test]
fn test_pubkey_scalar_mul_commutes() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let g = test_generator_pub_key(&curve_ops);

    let mut a_g_x = [0u8; curve::COORDINATE_LEN];
    let mut a_g_y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &g, &TEST_SCALAR_A, &mut a_g_x, &mut a_g_y).unwrap();
    let a_g =
        key::EccPublicKey::try_from_plain_coordinates(&curve_ops, &a_g_x, &a_g_y).unwrap();

    let mut b_g_x = [0u8; curve::COORDINATE_LEN];
    let mut b_g_y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &g, &TEST_SCALAR_B, &mut b_g_x, &mut b_g_y).unwrap();
    let b_g =
        key::EccPublicKey::try_from_plain_coordinates(&curve_ops, &b_g_x, &b_g_y).unwrap();

    let mut a_b_g_x = [0u8; curve::COORDINATE_LEN];
    let mut a_b_g_y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &b_g, &TEST_SCALAR_A, &mut a_b_g_x, &mut a_b_g_y).unwrap();

    let mut b_a_g_x = [0u8; curve::COORDINATE_LEN];
    let mut b_a_g_y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &a_g, &TEST_SCALAR_B, &mut b_a_g_x, &mut b_a_g_y).unwrap();

    assert_eq!(a_b_g_x, b_a_g_x);
    assert_eq!(a_b_g_y, b_a_g_y);
}

#[test]
fn test_pubkey_scalar_mul_deterministic() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let pub_key = test_generator_pub_key(&curve_ops);

    let mut x0 = [0u8; curve::COORDINATE_LEN];
    let mut y0 = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &pub_key, &TEST_SCALAR_A, &mut x0, &mut y0).unwrap();
    let mut x1 = [0u8; curve::COORDINATE_LEN];
    let mut y1 = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &pub_key, &TEST_SCALAR_A, &mut x1, &mut y1).unwrap();

    assert_eq!(x0, x1);
    assert_eq!(y0, y1);
}

#[test]
fn test_pubkey_scalar_mul_matches_ecdh_reference() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let g = test_generator_pub_key(&curve_ops);

    let mut b_g_x = [0u8; curve::COORDINATE_LEN];
    let mut b_g_y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &g, &TEST_SCALAR_B, &mut b_g_x, &mut b_g_y).unwrap();
    let b_g =
        key::EccPublicKey::try_from_plain_coordinates(&curve_ops, &b_g_x, &b_g_y).unwrap();

    let mut x = [0u8; curve::COORDINATE_LEN];
    let mut y = [0u8; curve::COORDINATE_LEN];
    pubkey_scalar_mul(&curve_ops, &b_g, &TEST_SCALAR_A, &mut x, &mut y).unwrap();

    let mut b_g_encoded = [0u8; 1 + 2 * curve::COORDINATE_LEN];
    b_g_encoded[0] = 0x04;
    b_g_encoded[1..1 + curve::COORDINATE_LEN].copy_from_slice(&b_g_x);
    b_g_encoded[1 + curve::COORDINATE_LEN..].copy_from_slice(&b_g_y);
    let b_g_pub = k256::PublicKey::from_sec1_bytes(&b_g_encoded).unwrap();
    let a = k256::NonZeroScalar::from_repr(k256::FieldBytes::from(TEST_SCALAR_A)).unwrap();
    let shared = elliptic_curve::ecdh::diffie_hellman(a, b_g_pub.as_affine());

    assert_eq!(shared.raw_secret_bytes().as_slice(), &x);
}
