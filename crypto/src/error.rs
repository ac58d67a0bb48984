// SPDX-License-Identifier: Apache-2.0

//! Crypto related error type definitions.

/// Common error returned by cryptographic primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// Internal logic error.
    Internal,
    /// A curve point is invalid.
    ///
    /// Returned for encodings which don't describe a point on the curve,
    /// including the point at infinity.
    InvalidPoint,
    /// A scalar is invalid for the curve group.
    ///
    /// Returned for the zero scalar as well as for encodings greater than or
    /// equal to the group order, deliberately without any distinction
    /// between the two cases.
    InvalidScalar,
    /// Some computation produced an invalid result.
    ///
    /// Returned when a point multiplication yields the point at infinity,
    /// which has no affine coordinates.
    InvalidResult,
}
