//! Entry points returning NUL-terminated strings allocated by marshal.

use std::os::raw::c_char;

use log::trace;

use crate::ffi::{read_cstr, write_out};
use crate::owned::{OwnedString, Transfer, release};

/// Constant produced by [`set_string`]. Nine bytes, three characters.
pub const FIXED_STRING: &std::ffi::CStr = c"🚁💥!";

/// Copies a caller-owned string into a new allocation.
///
/// The returned string must be freed with `marshal_string_free`.
///
/// # Safety
/// `data` must point to a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn echo_string(data: *const c_char) -> *mut c_char {
    // Safety: upheld by the caller.
    let input = unsafe { read_cstr(data) };
    let copy = OwnedString::copy_of(input);
    trace!("echo_string: copied {} bytes", copy.len());
    copy.into_raw()
}

/// Allocates [`FIXED_STRING`] and writes its address and byte length.
///
/// The string written to `value` must be freed with `marshal_string_free`.
///
/// # Safety
/// `value` and `len` must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn set_string(value: *mut *mut c_char, len: *mut usize) {
    let owned = OwnedString::copy_of(FIXED_STRING);
    let byte_len = owned.len();
    trace!("set_string: handing out {byte_len} bytes");
    // Safety: upheld by the caller.
    unsafe {
        write_out(value, owned.into_raw());
        write_out(len, byte_len);
    }
}

/// Frees a string allocated by marshal.
///
/// # Safety
/// `value` must be null or a string returned by `echo_string` or `set_string`
/// that has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marshal_string_free(value: *mut c_char) {
    if value.is_null() {
        return;
    }
    // Safety: upheld by the caller.
    unsafe { release::<OwnedString>(value) };
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::ptr;

    use super::*;

    #[test]
    fn echo_string_returns_distinct_copy() {
        for input in [c"Hello, World!", c"üöÁ 漢字 🚁", c""] {
            let output = unsafe { echo_string(input.as_ptr()) };
            assert_ne!(output.cast_const(), input.as_ptr());
            assert_eq!(unsafe { CStr::from_ptr(output) }, input);
            unsafe { marshal_string_free(output) };
        }
    }

    #[test]
    fn set_string_reports_byte_length() {
        let mut value: *mut c_char = ptr::null_mut();
        let mut len = 0usize;
        unsafe { set_string(&mut value, &mut len) };

        assert_eq!(len, 9);
        let text = unsafe { CStr::from_ptr(value) };
        assert_eq!(text.to_str().unwrap(), "🚁💥!");
        assert_eq!(text.to_str().unwrap().chars().count(), 3);
        unsafe { marshal_string_free(value) };
    }

    #[test]
    fn free_accepts_null() {
        unsafe { marshal_string_free(ptr::null_mut()) };
    }
}
