//! Owned allocations that cross the boundary.
//!
//! Each type pairs a raw allocation with the release path that reclaims it, so a
//! pointer handed to C always comes back through the allocator that produced it.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// An allocation whose ownership is handed to the caller as a raw value.
pub trait Transfer: Sized {
    /// The raw form written across the boundary.
    type Raw;

    /// Releases ownership to the caller.
    fn into_raw(self) -> Self::Raw;

    /// Takes ownership back from the caller.
    ///
    /// # Safety
    /// `raw` must have been produced by `into_raw` on the same type and must not
    /// have been reclaimed already.
    unsafe fn from_raw(raw: Self::Raw) -> Self;
}

/// Reclaims and frees a raw value previously produced by `T::into_raw`.
///
/// # Safety
/// Same contract as [`Transfer::from_raw`].
pub(crate) unsafe fn release<T: Transfer>(raw: T::Raw) {
    // Safety: upheld by the caller.
    drop(unsafe { T::from_raw(raw) });
}

/// A heap-allocated, NUL-terminated string owned by the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedString(CString);

impl OwnedString {
    /// Copies `value` into a fresh allocation.
    pub fn copy_of(value: &CStr) -> Self {
        Self(value.to_owned())
    }

    #[cfg(test)]
    pub fn as_c_str(&self) -> &CStr {
        &self.0
    }

    /// Byte length without the terminator.
    pub(crate) fn len(&self) -> usize {
        self.0.as_bytes().len()
    }
}

impl Transfer for OwnedString {
    type Raw = *mut c_char;

    fn into_raw(self) -> Self::Raw {
        self.0.into_raw()
    }

    unsafe fn from_raw(raw: Self::Raw) -> Self {
        // Safety: raw came from CString::into_raw.
        Self(unsafe { CString::from_raw(raw) })
    }
}

/// A heap-allocated byte buffer owned by the receiver.
///
/// The raw form is a `(pointer, length)` pair. An empty buffer is handed out as
/// a null pointer with length 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnedBytes(Box<[u8]>);

impl OwnedBytes {
    /// Copies `bytes` into a fresh allocation.
    pub fn copy_of(bytes: &[u8]) -> Self {
        Self(Box::from(bytes))
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Transfer for OwnedBytes {
    type Raw = (*mut u8, usize);

    fn into_raw(self) -> Self::Raw {
        let len = self.0.len();
        if len == 0 {
            return (ptr::null_mut(), 0);
        }
        (Box::into_raw(self.0).cast::<u8>(), len)
    }

    unsafe fn from_raw((data, len): Self::Raw) -> Self {
        if data.is_null() || len == 0 {
            return Self::default();
        }
        // Safety: data/len came from Box<[u8]>::into_raw with the same length.
        Self(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_copy_is_a_distinct_allocation() {
        let source = c"grüße";
        let copy = OwnedString::copy_of(source);
        assert_eq!(copy.as_c_str(), source);
        assert_ne!(copy.as_c_str().as_ptr(), source.as_ptr());
        assert_eq!(copy.len(), "grüße".len());
    }

    #[test]
    fn string_survives_raw_round_trip() {
        let raw = OwnedString::copy_of(c"hello").into_raw();
        let back = unsafe { OwnedString::from_raw(raw) };
        assert_eq!(back.as_c_str(), c"hello");
    }

    #[test]
    fn bytes_survive_raw_round_trip() {
        let input = [0u8, 1, 2, 255, 0];
        let (data, len) = OwnedBytes::copy_of(&input).into_raw();
        assert!(!data.is_null());
        assert_eq!(len, input.len());
        let back = unsafe { OwnedBytes::from_raw((data, len)) };
        assert_eq!(back.as_slice(), &input);
    }

    #[test]
    fn empty_bytes_are_null() {
        let (data, len) = OwnedBytes::copy_of(&[]).into_raw();
        assert!(data.is_null());
        assert_eq!(len, 0);
        unsafe { release::<OwnedBytes>((data, len)) };
    }
}
