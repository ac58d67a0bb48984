// SPDX-License-Identifier: Apache-2.0

use super::curve;
use crate::CryptoError;
use core::convert;

/// ECC public key.
pub struct EccPublicKey {
    curve_id: curve::CurveId,
    point: curve::AffinePoint,
}

impl EccPublicKey {
    /// Get the key's associated curve id.
    pub fn get_curve_id(&self) -> curve::CurveId {
        self.curve_id
    }

    /// Get the key's curve point.
    pub fn get_point(&self) -> &curve::AffinePoint {
        &self.point
    }

    /// Load an ECC public key from a pair of plain, big-endian affine
    /// coordinates.
    ///
    /// The coordinates get validated to describe a point on the curve,
    /// anything else is rejected with [`CryptoError::InvalidPoint`].
    ///
    /// # Arguments:
    ///
    /// * `curve_ops` - The curve's associated [`CurveOps`](curve::CurveOps),
    ///   usually obtained through
    ///   [`Curve::curve_ops()`](curve::Curve::curve_ops).
    /// * `x` - The point's affine x coordinate in big-endian encoding.
    /// * `y` - The point's affine y coordinate in big-endian encoding.
    pub fn try_from_plain_coordinates(
        curve_ops: &curve::CurveOps,
        x: &[u8; curve::COORDINATE_LEN],
        y: &[u8; curve::COORDINATE_LEN],
    ) -> Result<Self, CryptoError> {
        let point = curve::AffinePoint::try_from_plain_coordinates(x, y)?;
        Ok(Self {
            curve_id: curve_ops.get_curve().get_curve_id(),
            point,
        })
    }

    /// Convert the key's point to plain, big-endian affine coordinates.
    ///
    /// # Arguments:
    ///
    /// * `result_x` - Receives the affine x coordinate in big-endian
    ///   encoding.
    /// * `result_y` - Optionally receives the affine y coordinate in
    ///   big-endian encoding.
    pub fn to_plain_coordinates(
        &self,
        result_x: &mut [u8; curve::COORDINATE_LEN],
        result_y: Option<&mut [u8; curve::COORDINATE_LEN]>,
    ) -> Result<(), CryptoError> {
        self.point.to_plain_coordinates(result_x, result_y)
    }
}

impl<'a> convert::TryFrom<(&curve::CurveOps<'a>, &[u8])> for EccPublicKey {
    type Error = CryptoError;

    /// Load an ECC public key from its SEC1 point encoding.
    ///
    /// Both the compressed and the uncompressed form are accepted. The
    /// encoding gets validated to describe a point on the curve; off-curve
    /// encodings, the point at infinity and malformed input are all rejected
    /// with [`CryptoError::InvalidPoint`].
    fn try_from(value: (&curve::CurveOps<'a>, &[u8])) -> Result<Self, CryptoError> {
        let (curve_ops, sec1_encoded_point) = value;
        let pub_key = k256::PublicKey::from_sec1_bytes(sec1_encoded_point)
            .map_err(|_| CryptoError::InvalidPoint)?;
        Ok(Self {
            curve_id: curve_ops.get_curve().get_curve_id(),
            point: curve::AffinePoint::from_backend_point(*pub_key.as_affine()),
        })
    }
}

#[test]
fn test_pub_key_from_sec1_uncompressed() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let (g_x, g_y) = curve.get_generator_coordinates();

    let mut encoded = [0u8; 1 + 2 * curve::COORDINATE_LEN];
    encoded[0] = 0x04;
    encoded[1..1 + curve::COORDINATE_LEN].copy_from_slice(g_x);
    encoded[1 + curve::COORDINATE_LEN..].copy_from_slice(g_y);

    let key = EccPublicKey::try_from((&curve_ops, encoded.as_slice())).unwrap();
    assert_eq!(key.get_curve_id(), curve::CurveId::Secp256k1);
    let mut x = [0u8; curve::COORDINATE_LEN];
    let mut y = [0u8; curve::COORDINATE_LEN];
    key.to_plain_coordinates(&mut x, Some(&mut y)).unwrap();
    assert_eq!(&x, g_x);
    assert_eq!(&y, g_y);
}

#[test]
fn test_pub_key_from_sec1_compressed() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let (g_x, g_y) = curve.get_generator_coordinates();

    // The generator's y coordinate is even.
    let mut encoded = [0u8; 1 + curve::COORDINATE_LEN];
    encoded[0] = 0x02;
    encoded[1..].copy_from_slice(g_x);

    let key = EccPublicKey::try_from((&curve_ops, encoded.as_slice())).unwrap();
    let mut x = [0u8; curve::COORDINATE_LEN];
    let mut y = [0u8; curve::COORDINATE_LEN];
    key.to_plain_coordinates(&mut x, Some(&mut y)).unwrap();
    assert_eq!(&x, g_x);
    assert_eq!(&y, g_y);
}

#[test]
fn test_pub_key_from_sec1_rejects_invalid() {
    let curve = curve::Curve::new(curve::CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let (g_x, g_y) = curve.get_generator_coordinates();

    // Point at infinity.
    assert_eq!(
        EccPublicKey::try_from((&curve_ops, [0u8].as_slice())).err(),
        Some(CryptoError::InvalidPoint)
    );

    // Off-curve coordinates.
    let mut encoded = [0u8; 1 + 2 * curve::COORDINATE_LEN];
    encoded[0] = 0x04;
    encoded[1..1 + curve::COORDINATE_LEN].copy_from_slice(g_x);
    encoded[1 + curve::COORDINATE_LEN..].copy_from_slice(g_y);
    encoded[2 * curve::COORDINATE_LEN] ^= 1;
    assert_eq!(
        EccPublicKey::try_from((&curve_ops, encoded.as_slice())).err(),
        Some(CryptoError::InvalidPoint)
    );

    // Truncated encoding.
    assert_eq!(
        EccPublicKey::try_from((&curve_ops, &encoded[..32])).err(),
        Some(CryptoError::InvalidPoint)
    );
}
