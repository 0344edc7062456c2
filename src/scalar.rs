//! Entry points passing integers by value, by out-pointer, and through a callback.

use log::trace;

use crate::ffi::write_out;

/// Sentinel written by [`set_value`].
pub const SENTINEL_VALUE: i64 = 42;

/// Callback invoked by [`call_out`].
#[allow(non_camel_case_types)]
pub type marshal_callback_t = Option<extern "C" fn(data: i32)>;

/// Returns `a + b`, wrapping on overflow.
#[unsafe(no_mangle)]
pub extern "C" fn add(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

/// Writes `a + b` into caller-owned storage.
///
/// # Safety
/// `result` must be valid for writes of an `int64_t`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn add_result(a: i64, b: i64, result: *mut i64) {
    let sum = add(a, b);
    trace!("add_result: writing {sum} to {result:p}");
    // Safety: upheld by the caller.
    unsafe { write_out(result, sum) };
}

/// Writes [`SENTINEL_VALUE`] into caller-owned storage.
///
/// # Safety
/// `value` must be valid for writes of an `int64_t`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn set_value(value: *mut i64) {
    trace!("set_value: writing {SENTINEL_VALUE} to {value:p}");
    // Safety: upheld by the caller.
    unsafe { write_out(value, SENTINEL_VALUE) };
}

/// Calls `callback` once with `data`. A null callback does nothing.
#[unsafe(no_mangle)]
pub extern "C" fn call_out(callback: marshal_callback_t, data: i32) {
    match callback {
        Some(callback) => {
            trace!("call_out: invoking callback with {data}");
            callback(data);
        }
        None => trace!("call_out: no callback supplied"),
    }
}
