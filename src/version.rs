//! Version queries.

use std::ffi::CString;
use std::os::raw::c_char;

use once_cell::sync::Lazy;

use crate::error::cstring_from_str_lossy;

/// Revision of the exported C ABI.
pub const ABI_VERSION: u32 = 1;

static VERSION: Lazy<CString> = Lazy::new(|| cstring_from_str_lossy(env!("CARGO_PKG_VERSION")));

/// Returns the ABI revision.
#[unsafe(no_mangle)]
pub extern "C" fn marshal_abi_version() -> u32 {
    ABI_VERSION
}

/// Returns the library version.
///
/// The returned pointer is owned by marshal and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn marshal_version() -> *const c_char {
    VERSION.as_ptr()
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn version_is_stable_across_calls() {
        let first = marshal_version();
        assert_eq!(first, marshal_version());
        let version = unsafe { CStr::from_ptr(first) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn abi_version() {
        assert_eq!(marshal_abi_version(), 1);
    }
}
