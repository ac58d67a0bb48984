// SPDX-License-Identifier: Apache-2.0

//! Definitions related to elliptic curves and the arithmetic thereon.

use crate::utils_common::zeroize;
use crate::CryptoError;
use elliptic_curve::group::Group as _;
use elliptic_curve::sec1::{FromEncodedPoint as _, ToEncodedPoint as _};
use hex_literal::hex;

/// Length of a curve coordinate's plain, fixed-width big-endian encoding in
/// bytes.
pub const COORDINATE_LEN: usize = 32;

/// Length of a scalar's plain, fixed-width big-endian encoding in bytes.
pub const SCALAR_LEN: usize = 32;

// Domain parameters of the secp256k1 curve, c.f. SEC2, sec. 2.4.1.
const SECP256K1_P: [u8; COORDINATE_LEN] =
    hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
const SECP256K1_N: [u8; SCALAR_LEN] =
    hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
const SECP256K1_G_X: [u8; COORDINATE_LEN] =
    hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
const SECP256K1_G_Y: [u8; COORDINATE_LEN] =
    hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");

/// Identifier of a supported elliptic curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveId {
    /// The secp256k1 Koblitz curve.
    Secp256k1,
}

/// Information about an elliptic curve's domain parameters.
pub struct Curve {
    curve_id: CurveId,
    p: &'static [u8; COORDINATE_LEN],
    order: &'static [u8; SCALAR_LEN],
    nbits: usize,
    cofactor_log2: u8,
}

impl Curve {
    /// Instantiate a `Curve` from a [`CurveId`].
    pub fn new(curve_id: CurveId) -> Self {
        match curve_id {
            CurveId::Secp256k1 => Self {
                curve_id,
                p: &SECP256K1_P,
                order: &SECP256K1_N,
                nbits: 256,
                cofactor_log2: 0,
            },
        }
    }

    /// Get the associated [`CurveId`].
    pub fn get_curve_id(&self) -> CurveId {
        self.curve_id
    }

    /// Get the prime of the curve's underlying field in big-endian encoding.
    pub fn get_p(&self) -> &'static [u8; COORDINATE_LEN] {
        self.p
    }

    /// Get the order of the curve's generator in big-endian encoding.
    pub fn get_order(&self) -> &'static [u8; SCALAR_LEN] {
        self.order
    }

    /// Get the bit width of the curve's underlying field.
    pub fn get_nbits(&self) -> usize {
        self.nbits
    }

    /// Get the base-2 logarithm of the curve's cofactor.
    pub fn get_cofactor_log2(&self) -> u8 {
        self.cofactor_log2
    }

    /// Get the generator's affine coordinates in big-endian encoding.
    pub fn get_generator_coordinates(
        &self,
    ) -> (&'static [u8; COORDINATE_LEN], &'static [u8; COORDINATE_LEN]) {
        match self.curve_id {
            CurveId::Secp256k1 => (&SECP256K1_G_X, &SECP256K1_G_Y),
        }
    }

    /// Obtain a [`CurveOps`] instance for arithmetic on the curve.
    pub fn curve_ops(&self) -> CurveOps {
        CurveOps { curve: self }
    }
}

/// Error information returned by
/// [`ProjectivePoint::into_affine_plain_coordinates()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectivePointIntoAffineError {
    /// The point to convert is the point at infinity, which has no affine
    /// representation.
    PointIsIdentity,
}

/// ECC point in affine representation.
pub struct AffinePoint {
    point: k256::AffinePoint,
}

impl AffinePoint {
    /// Create an `AffinePoint` from a pair of plain, big-endian affine
    /// coordinates.
    ///
    /// The coordinates get validated to describe a point on the curve,
    /// anything else is rejected with [`CryptoError::InvalidPoint`].
    ///
    /// # Arguments:
    ///
    /// * `x` - The point's affine x coordinate in big-endian encoding.
    /// * `y` - The point's affine y coordinate in big-endian encoding.
    pub fn try_from_plain_coordinates(
        x: &[u8; COORDINATE_LEN],
        y: &[u8; COORDINATE_LEN],
    ) -> Result<Self, CryptoError> {
        let encoded = k256::EncodedPoint::from_affine_coordinates(x.into(), y.into(), false);
        let point = Option::<k256::AffinePoint>::from(k256::AffinePoint::from_encoded_point(
            &encoded,
        ))
        .ok_or(CryptoError::InvalidPoint)?;
        Ok(Self { point })
    }

    /// Convert the point into plain, big-endian affine coordinates.
    ///
    /// The coordinates get brought into canonical form and are always both
    /// serialized through the uncompressed encoding path, irrespective of
    /// whether the caller is interested in the y coordinate or not.
    ///
    /// # Arguments:
    ///
    /// * `result_x` - Receives the affine x coordinate in big-endian
    ///   encoding.
    /// * `result_y` - Optionally receives the affine y coordinate in
    ///   big-endian encoding.
    pub fn to_plain_coordinates(
        &self,
        result_x: &mut [u8; COORDINATE_LEN],
        result_y: Option<&mut [u8; COORDINATE_LEN]>,
    ) -> Result<(), CryptoError> {
        let encoded = self.point.to_encoded_point(false);
        // An AffinePoint is never the point at infinity, the uncompressed
        // encoding holds both coordinates.
        let x = encoded.x().ok_or(CryptoError::Internal)?;
        let y = encoded.y().ok_or(CryptoError::Internal)?;
        result_x.copy_from_slice(x.as_slice());
        if let Some(result_y) = result_y {
            result_y.copy_from_slice(y.as_slice());
        }
        Ok(())
    }

    pub(crate) fn from_backend_point(point: k256::AffinePoint) -> Self {
        Self { point }
    }

    fn get_backend_point(&self) -> &k256::AffinePoint {
        &self.point
    }
}

/// ECC point in projective representation, as produced by scalar
/// multiplication.
///
/// Considered to potentially carry secret-derived values, the backing memory
/// gets zeroized on drop.
pub struct ProjectivePoint {
    point: zeroize::ZeroizingFlat<k256::ProjectivePoint>,
}

impl ProjectivePoint {
    /// Convert the point into plain, big-endian affine coordinates.
    ///
    /// The projective representation gets normalized into canonical affine
    /// coordinates, both of which are then serialized through a single,
    /// fixed encoding path. In particular, no code path dependent on the y
    /// coordinate's parity, as taken for compressed SEC1 encodings, is ever
    /// exercised.
    ///
    /// Either both of `result_x` and `result_y` get written or, in case of an
    /// error, neither of them.
    ///
    /// The point at infinity has no affine representation; the attempt to
    /// convert it is reported through the `Ok` variant's inner
    /// [`ProjectivePointIntoAffineError::PointIsIdentity`] error so that
    /// callers can map it to a domain-specific failure.
    ///
    /// # Arguments:
    ///
    /// * `result_x` - Receives the affine x coordinate in big-endian
    ///   encoding.
    /// * `result_y` - Optionally receives the affine y coordinate in
    ///   big-endian encoding.
    pub fn into_affine_plain_coordinates(
        self,
        result_x: &mut [u8; COORDINATE_LEN],
        result_y: Option<&mut [u8; COORDINATE_LEN]>,
    ) -> Result<Result<(), ProjectivePointIntoAffineError>, CryptoError> {
        if bool::from(self.point.is_identity()) {
            return Ok(Err(ProjectivePointIntoAffineError::PointIsIdentity));
        }

        let Self { point } = self;
        let affine = zeroize::ZeroizingFlat::new(point.take_with(|point| point.to_affine()));
        let encoded = zeroize::ZeroizingFlat::new(affine.to_encoded_point(false));
        // The identity case has been ruled out above, the uncompressed
        // encoding holds both coordinates.
        let x = encoded.x().ok_or(CryptoError::Internal)?;
        let y = encoded.y().ok_or(CryptoError::Internal)?;
        result_x.copy_from_slice(x.as_slice());
        if let Some(result_y) = result_y {
            result_y.copy_from_slice(y.as_slice());
        }
        Ok(Ok(()))
    }
}

/// A scalar in canonical form, verified to be in the range `[1, n - 1]`,
/// with `n` the order of the associated curve's generator.
///
/// Considered secret, the backing memory gets zeroized on drop.
pub struct CurveScalar {
    scalar: zeroize::Zeroizing<k256::NonZeroScalar>,
}

impl CurveScalar {
    fn get_backend_scalar(&self) -> &k256::Scalar {
        (&*self.scalar).as_ref()
    }
}

/// ECC point arithmetic.
///
/// Never instantiated directly, but obtained from a [`Curve`] via
/// [`Curve::curve_ops()`].
pub struct CurveOps<'a> {
    curve: &'a Curve,
}

impl<'a> CurveOps<'a> {
    /// Get the associated [`Curve`].
    pub fn get_curve(&self) -> &Curve {
        self.curve
    }

    /// Get the curve's generator point.
    pub fn generator(&self) -> AffinePoint {
        AffinePoint {
            point: k256::AffinePoint::GENERATOR,
        }
    }

    /// Bring a plain, big-endian scalar encoding into canonical form.
    ///
    /// Encodings of values greater than or equal to the curve group's order
    /// as well as the all-zero encoding get rejected with a single,
    /// undifferentiated [`CryptoError::InvalidScalar`]. The validation is
    /// carried out in constant time, no observable signal distinguishes the
    /// two rejection causes from another.
    ///
    /// # Arguments:
    ///
    /// * `scalar` - The scalar's plain, big-endian encoding. Considered
    ///   secret.
    pub fn canonicalize_scalar(
        &self,
        scalar: &[u8; SCALAR_LEN],
    ) -> Result<CurveScalar, CryptoError> {
        let repr = zeroize::ZeroizingFlat::new(k256::FieldBytes::from(*scalar));
        let scalar =
            Option::<k256::NonZeroScalar>::from(repr.take_with(k256::NonZeroScalar::from_repr))
                .ok_or(CryptoError::InvalidScalar)?;
        Ok(CurveScalar {
            scalar: zeroize::Zeroizing::new(scalar),
        })
    }

    /// Multiply a curve point by a scalar.
    ///
    /// The multiplication kernel's control flow and memory access pattern
    /// are independent of the scalar's value.
    ///
    /// # Arguments:
    ///
    /// * `scalar` - The scalar to multiply `point` with. Considered secret.
    /// * `point` - The point to multiply.
    pub fn point_scalar_mul(&self, scalar: &CurveScalar, point: &AffinePoint) -> ProjectivePoint {
        let product =
            k256::ProjectivePoint::from(*point.get_backend_point()) * scalar.get_backend_scalar();
        ProjectivePoint {
            point: zeroize::ZeroizingFlat::new(product),
        }
    }
}

#[test]
fn test_generator_coordinates_consistent() {
    let curve = Curve::new(CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let mut x = [0u8; COORDINATE_LEN];
    let mut y = [0u8; COORDINATE_LEN];
    curve_ops
        .generator()
        .to_plain_coordinates(&mut x, Some(&mut y))
        .unwrap();
    let (g_x, g_y) = curve.get_generator_coordinates();
    assert_eq!(&x, g_x);
    assert_eq!(&y, g_y);
}

#[test]
fn test_point_from_plain_coordinates() {
    let curve = Curve::new(CurveId::Secp256k1);
    let (g_x, g_y) = curve.get_generator_coordinates();
    AffinePoint::try_from_plain_coordinates(g_x, g_y).unwrap();

    // Flipping the y coordinate's least significant bit takes the point off
    // the curve.
    let mut wrong_y = *g_y;
    wrong_y[COORDINATE_LEN - 1] ^= 1;
    assert_eq!(
        AffinePoint::try_from_plain_coordinates(g_x, &wrong_y).err(),
        Some(CryptoError::InvalidPoint)
    );
}

#[test]
fn test_canonicalize_scalar_rejects_invalid() {
    let curve = Curve::new(CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();

    let zero = [0u8; SCALAR_LEN];
    assert_eq!(
        curve_ops.canonicalize_scalar(&zero).err(),
        Some(CryptoError::InvalidScalar)
    );

    let order = *curve.get_order();
    assert_eq!(
        curve_ops.canonicalize_scalar(&order).err(),
        Some(CryptoError::InvalidScalar)
    );

    // The group order's big-endian encoding ends in 0x41, the largest valid
    // scalar is obtained by decrementing the last byte.
    let mut order_minus_one = order;
    order_minus_one[SCALAR_LEN - 1] -= 1;
    assert!(curve_ops.canonicalize_scalar(&order_minus_one).is_ok());
}

#[test]
fn test_point_scalar_mul_by_one() {
    let curve = Curve::new(CurveId::Secp256k1);
    let curve_ops = curve.curve_ops();
    let mut one = [0u8; SCALAR_LEN];
    one[SCALAR_LEN - 1] = 1;
    let one = curve_ops.canonicalize_scalar(&one).unwrap();
    let product = curve_ops.point_scalar_mul(&one, &curve_ops.generator());
    let mut x = [0u8; COORDINATE_LEN];
    let mut y = [0u8; COORDINATE_LEN];
    product
        .into_affine_plain_coordinates(&mut x, Some(&mut y))
        .unwrap()
        .unwrap();
    let (g_x, g_y) = curve.get_generator_coordinates();
    assert_eq!(&x, g_x);
    assert_eq!(&y, g_y);
}
