//! C ABI marshaling conformance fixture.
//!
//! Every exported entry point exercises one way of moving data across a
//! foreign-function boundary: by value, through caller-owned out-pointers, as
//! callee-allocated strings, buffers and records, or through a callback.
//! Anything marshal allocates must be released with the matching
//! `marshal_*_free` function.

pub mod bytes;
pub mod error;
mod ffi;
pub mod logging;
pub mod owned;
pub mod record;
pub mod scalar;
pub mod strings;
pub mod version;
