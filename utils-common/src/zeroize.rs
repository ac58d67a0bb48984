// SPDX-License-Identifier: Apache-2.0

//! Configuration dependent, transparent aliases for the
//! [`zeroize`](https://docs.rs/zeroize/latest/zeroize/index.html) crate, plus
//! the [`ZeroizingFlat`] helper.
//!
//! With the `zeroize` Cargo feature enabled, [`Zeroize`], [`ZeroizeOnDrop`]
//! and [`Zeroizing`] alias the actual definitions from the zeroize crate,
//! otherwise they resolve to trivial drop-in substitutes.

use core::{clone::Clone, convert, mem, ops};
#[cfg(feature = "zeroize")]
use core::ptr;

#[cfg(feature = "zeroize")]
use zeroize;

#[cfg(feature = "zeroize")]
#[doc(hidden)]
mod cfg {
    pub use zeroize::Zeroize;
    pub use zeroize::ZeroizeOnDrop;
    pub use zeroize::Zeroizing;
}

#[cfg(not(feature = "zeroize"))]
#[doc(hidden)]
mod cfg {
    pub trait Zeroize {
        fn zeroize(&mut self);
    }

    impl<T> Zeroize for T {
        fn zeroize(&mut self) {}
    }

    pub trait ZeroizeOnDrop {}

    #[derive(Clone, Copy)]
    #[repr(transparent)]
    pub struct Zeroizing<T>(T);

    impl<T> core::ops::Deref for Zeroizing<T> {
        type Target = T;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl<T> core::ops::DerefMut for Zeroizing<T> {
        fn deref_mut(&mut self) -> &mut Self::Target {
            &mut self.0
        }
    }

    impl<T> From<T> for Zeroizing<T> {
        fn from(value: T) -> Self {
            Self(value)
        }
    }

    impl<T> Zeroizing<T> {
        pub fn new(value: T) -> Self {
            Self(value)
        }
    }
}

/// Configuration abstraction alias for
/// [`zeroize::Zeroize`](https://docs.rs/zeroize/latest/zeroize/trait.Zeroize.html),
/// or an API compatible no-op substitute with the `zeroize` Cargo feature
/// off.
pub use cfg::Zeroize;

/// Configuration abstraction alias for
/// [`zeroize::ZeroizeOnDrop`](https://docs.rs/zeroize/latest/zeroize/trait.ZeroizeOnDrop.html),
/// or an API compatible substitute with the `zeroize` Cargo feature off.
pub use cfg::ZeroizeOnDrop;

/// Configuration abstraction alias for
/// [`zeroize::Zeroizing`](https://docs.rs/zeroize/latest/zeroize/struct.Zeroizing.html),
/// or a trivial, API compatible wrapper with the `zeroize` Cargo feature off.
pub use cfg::Zeroizing;

/// Zeroize a flat type/struct on `drop`.
///
/// For external types not implementing `Zeroize`, this can be used to still
/// clear their memory after the value has been dropped.
///
/// Only the flat memory backing `T` itself is getting cleared, but **not**
/// any heap allocations the value possibly owns.
///
/// <div class="warning">
///
/// No guarantees are being made for temporary copies emitted by the compiler
/// during construction or unpeeling through [`take_with()`](Self::take_with)
/// or [`into_inner()`](Self::into_inner) -- it all depends on compiler
/// optimizations then.
///
/// </div>
///
/// If the `zeroize` Cargo feature is off, `ZeroizingFlat` becomes a trivial
/// wrapper.
#[repr(transparent)]
pub struct ZeroizingFlat<T> {
    value: mem::MaybeUninit<T>,
}

impl<T> ZeroizingFlat<T> {
    /// Wrap a value for zeroization at drop.
    ///
    /// # Arguments:
    ///
    /// * `value` - The value to wrap.
    pub fn new(value: T) -> Self {
        Self {
            value: mem::MaybeUninit::new(value),
        }
    }

    /// Take the wrapped value and invoke a callback on it.
    ///
    /// Functionally equivalent to
    /// ```ignore
    /// f(self.into_inner())
    /// ```
    /// but enables the compiler to invoke `f()` directly on the memory
    /// backing the wrapped value instead of on a temporary stack copy
    /// thereof. Whether that copy elision is actually made depends on
    /// compiler optimizations.
    ///
    /// # Arguments:
    ///
    /// * `f` - The callback to invoke on the unwrapped value. The return
    ///   value gets propagated back.
    pub fn take_with<R, F: FnOnce(T) -> R>(self, f: F) -> R {
        // Don't let Self::drop() run, the wrapped value gets moved into f()
        // below.
        #[cfg_attr(not(feature = "zeroize"), allow(unused_mut))]
        let mut this = mem::ManuallyDrop::new(self);
        let inner = unsafe { this.value.assume_init_read() };
        let r = f(inner);
        #[cfg(feature = "zeroize")]
        {
            let p_value = ptr::addr_of_mut!(this.value);
            unsafe { zeroize::zeroize_flat_type(p_value) };
        }
        r
    }

    /// Take the wrapped value.
    ///
    /// <div class="warning">
    ///
    /// Once unwrapped, no zeroization guarantees apply to the unwrapped value
    /// anymore.
    ///
    /// </div>
    pub fn into_inner(self) -> T {
        self.take_with(|value| value)
    }
}

impl<T> Drop for ZeroizingFlat<T> {
    fn drop(&mut self) {
        unsafe { mem::MaybeUninit::assume_init_drop(&mut self.value) };
        #[cfg(feature = "zeroize")]
        unsafe {
            zeroize::zeroize_flat_type(ptr::addr_of_mut!(self.value))
        };
    }
}

impl<T> convert::From<T> for ZeroizingFlat<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> ops::Deref for ZeroizingFlat<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { self.value.assume_init_ref() }
    }
}

impl<T> ops::DerefMut for ZeroizingFlat<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { self.value.assume_init_mut() }
    }
}

impl<T: Clone> Clone for ZeroizingFlat<T> {
    fn clone(&self) -> Self {
        Self {
            value: mem::MaybeUninit::new(unsafe { self.value.assume_init_ref() }.clone()),
        }
    }
}

#[test]
fn test_zeroizing_flat_take_with() {
    let wrapped = ZeroizingFlat::new([0xa5u8; 32]);
    assert_eq!(wrapped[0], 0xa5);
    let sum = wrapped.take_with(|value| value.iter().map(|b| *b as usize).sum::<usize>());
    assert_eq!(sum, 32 * 0xa5);
}

#[test]
fn test_zeroizing_flat_into_inner() {
    let wrapped = ZeroizingFlat::new(0x5a5a5a5au32);
    assert_eq!(wrapped.into_inner(), 0x5a5a5a5a);
}
