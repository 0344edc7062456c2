//! Unchecked pointer plumbing shared by the exported entry points.
//!
//! Nothing in here validates its input. Null, dangling, or misaligned pointers
//! are undefined behavior, which is why every helper is `unsafe`.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::slice;

/// Borrows a caller-owned, NUL-terminated C string.
///
/// # Safety
/// `value` must point to a valid NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn read_cstr<'a>(value: *const c_char) -> &'a CStr {
    // Safety: upheld by the caller.
    unsafe { CStr::from_ptr(value) }
}

/// Borrows a caller-owned byte buffer.
///
/// A zero length never touches `data`, so callers may pass null for empty buffers.
///
/// # Safety
/// When `len > 0`, `data` must be valid for reads of `len` bytes for `'a`.
pub(crate) unsafe fn read_bytes<'a>(data: *const u8, len: usize) -> &'a [u8] {
    if len == 0 {
        return &[];
    }
    // Safety: upheld by the caller.
    unsafe { slice::from_raw_parts(data, len) }
}

/// Borrows a caller-owned value.
///
/// # Safety
/// `value` must be non-null, aligned, and point to an initialized `T` that outlives `'a`.
pub(crate) unsafe fn read_ref<'a, T>(value: *const T) -> &'a T {
    // Safety: upheld by the caller.
    unsafe { &*value }
}

/// Writes `value` into caller-owned storage without reading or dropping the old contents.
///
/// # Safety
/// `out` must be valid for writes and properly aligned for `T`.
pub(crate) unsafe fn write_out<T>(out: *mut T, value: T) {
    // Safety: upheld by the caller.
    unsafe { out.write(value) }
}
