//! Entry points exchanging length-delimited byte buffers.

use std::io::{self, Write};

use log::{trace, warn};

use crate::ffi::{read_bytes, write_out};
use crate::owned::{OwnedBytes, Transfer, release};

/// Copies a caller-owned buffer into a new allocation and writes its address and length.
///
/// The output never aliases the input. An empty input produces a null pointer and
/// length 0. A non-null output must be freed with `marshal_bytes_free`.
///
/// # Safety
/// `input` must be valid for reads of `input_len` bytes, and `output`/`output_len`
/// must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn echo_bytes(
    input: *const u8,
    input_len: usize,
    output: *mut *mut u8,
    output_len: *mut usize,
) {
    // Safety: upheld by the caller.
    let bytes = unsafe { read_bytes(input, input_len) };
    let (data, len) = OwnedBytes::copy_of(bytes).into_raw();
    trace!("echo_bytes: copied {len} bytes from {input:p} to {data:p}");
    // Safety: upheld by the caller.
    unsafe {
        write_out(output, data);
        write_out(output_len, len);
    }
}

/// Prints a caller-owned buffer to stdout followed by a newline.
///
/// The buffer is only borrowed: it is neither modified nor freed.
///
/// # Safety
/// `input` must be valid for reads of `input_len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn read_buffer(input: *const u8, input_len: usize) {
    // Safety: upheld by the caller.
    let bytes = unsafe { read_bytes(input, input_len) };
    trace!("read_buffer: {input_len} bytes at {input:p}");
    if let Err(err) = write_line(&mut io::stdout().lock(), bytes) {
        warn!("read_buffer: failed to write to stdout: {err}");
    }
}

/// Writes `bytes` and a trailing newline to `out`.
pub fn write_line(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Frees a buffer allocated by marshal.
///
/// # Safety
/// `data` must be null or a buffer returned by `echo_bytes`, and `len` must be the
/// length reported alongside it.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marshal_bytes_free(data: *mut u8, len: usize) {
    if data.is_null() {
        return;
    }
    // Safety: upheld by the caller.
    unsafe { release::<OwnedBytes>((data, len)) };
}
