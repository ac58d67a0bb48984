// SPDX-License-Identifier: Apache-2.0

pub mod curve;
pub mod ecdh;
mod key;

pub use key::*;
