//! The transfer record shared across the boundary.

use std::ffi::CString;
use std::mem::{self, align_of, offset_of};
use std::os::raw::c_char;

use log::trace;

use crate::ffi::{read_cstr, read_ref};
use crate::owned::{Transfer, release};

/// Fixed-layout record exchanged with C callers.
///
/// `text` is a NUL-terminated string owned by whichever side allocated the record.
#[allow(non_camel_case_types)]
#[derive(Debug)]
#[repr(C)]
pub struct transfer_record_t {
    pub integer: i64,
    pub double: f64,
    pub text: *mut c_char,
}

const _: () = {
    assert!(offset_of!(transfer_record_t, integer) == 0);
    assert!(offset_of!(transfer_record_t, double) == 8);
    assert!(offset_of!(transfer_record_t, text) == 16);
    assert!(align_of::<transfer_record_t>() == 8);
};

#[cfg(target_pointer_width = "64")]
const _: () = assert!(mem::size_of::<transfer_record_t>() == 24);

/// Owned, safe counterpart of [`transfer_record_t`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub integer: i64,
    pub double: f64,
    pub text: CString,
}

impl Record {
    /// Copies every field of a caller-owned record, including its text.
    ///
    /// # Safety
    /// `raw.text` must point to a valid NUL-terminated string.
    pub unsafe fn copy_from(raw: &transfer_record_t) -> Self {
        // Safety: upheld by the caller.
        let text = unsafe { read_cstr(raw.text) };
        Self {
            integer: raw.integer,
            double: raw.double,
            text: text.to_owned(),
        }
    }
}

/// A heap-allocated [`transfer_record_t`] whose text is owned alongside it.
///
/// Dropping it frees both the record and its text.
#[derive(Debug)]
pub struct OwnedRecord {
    raw: *mut transfer_record_t,
}

impl OwnedRecord {
    pub fn new(record: Record) -> Self {
        let raw = Box::new(transfer_record_t {
            integer: record.integer,
            double: record.double,
            text: record.text.into_raw(),
        });
        Self {
            raw: Box::into_raw(raw),
        }
    }

    #[cfg(test)]
    fn as_raw(&self) -> &transfer_record_t {
        // Safety: raw is a live Box allocation for as long as self exists.
        unsafe { &*self.raw }
    }
}

impl Transfer for OwnedRecord {
    type Raw = *mut transfer_record_t;

    fn into_raw(self) -> Self::Raw {
        let raw = self.raw;
        mem::forget(self);
        raw
    }

    unsafe fn from_raw(raw: Self::Raw) -> Self {
        Self { raw }
    }
}

impl Drop for OwnedRecord {
    fn drop(&mut self) {
        // Safety: raw came from Box::into_raw and text from CString::into_raw.
        let record = unsafe { Box::from_raw(self.raw) };
        if !record.text.is_null() {
            drop(unsafe { CString::from_raw(record.text) });
        }
    }
}

/// Copies a caller-owned record into a new allocation owned by the caller.
///
/// The returned record and its `text` must be released with `marshal_record_free`.
///
/// # Safety
/// `data` must point to a valid record whose `text` is a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn echo_struct(data: *const transfer_record_t) -> *mut transfer_record_t {
    // Safety: upheld by the caller.
    let input = unsafe { read_ref(data) };
    // Safety: upheld by the caller.
    let record = unsafe { Record::copy_from(input) };
    trace!(
        "echo_struct: integer={} double={} text_len={}",
        record.integer,
        record.double,
        record.text.as_bytes().len()
    );
    OwnedRecord::new(record).into_raw()
}

/// Frees a record, and its text, returned by marshal.
///
/// # Safety
/// `record` must be null or a pointer returned by `echo_struct` that has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marshal_record_free(record: *mut transfer_record_t) {
    if record.is_null() {
        return;
    }
    // Safety: upheld by the caller.
    unsafe { release::<OwnedRecord>(record) };
}
