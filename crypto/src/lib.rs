// SPDX-License-Identifier: Apache-2.0

//! Raw elliptic curve Diffie-Hellman point multiplication.
//!
//! The entry point is [`ecc::ecdh::pubkey_scalar_mul()`], which multiplies a
//! validated public curve point with a secret scalar and returns the
//! resulting shared point's plain affine coordinates.

#![no_std]

use ecdh_raw_utils_common as utils_common;

pub mod ecc;
mod error;

pub use error::*;
