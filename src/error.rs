use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Errors raised while configuring marshal from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    #[error("log level {0} is out of range")]
    InvalidLogLevel(u32),
    #[error("logging already initialized by another logger")]
    LoggerInstalled,
}

/// Status codes returned to C callers. Values are stable across releases.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum marshal_status_t {
    MARSHAL_STATUS_OK = 0,
    MARSHAL_STATUS_INVALID_LOG_LEVEL = 1,
    MARSHAL_STATUS_LOGGER_INSTALLED = 2,
}

impl From<MarshalError> for marshal_status_t {
    fn from(value: MarshalError) -> Self {
        match value {
            MarshalError::InvalidLogLevel(_) => Self::MARSHAL_STATUS_INVALID_LOG_LEVEL,
            MarshalError::LoggerInstalled => Self::MARSHAL_STATUS_LOGGER_INSTALLED,
        }
    }
}

impl From<Result<(), MarshalError>> for marshal_status_t {
    fn from(value: Result<(), MarshalError>) -> Self {
        match value {
            Ok(()) => Self::MARSHAL_STATUS_OK,
            Err(err) => err.into(),
        }
    }
}

impl marshal_status_t {
    fn description(self) -> &'static CStr {
        match self {
            Self::MARSHAL_STATUS_OK => c"ok",
            Self::MARSHAL_STATUS_INVALID_LOG_LEVEL => c"log level out of range",
            Self::MARSHAL_STATUS_LOGGER_INSTALLED => {
                c"logging already initialized by another logger"
            }
        }
    }
}

pub(crate) fn cstring_from_str_lossy(value: &str) -> CString {
    match CString::new(value) {
        Ok(value) => value,
        Err(err) => {
            let sanitized: Vec<u8> = err
                .into_vec()
                .into_iter()
                .map(|b| if b == 0 { b' ' } else { b })
                .collect();
            CString::new(sanitized).unwrap_or_default()
        }
    }
}

/// Describes a status code.
///
/// The returned string is static and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn marshal_status_message(status: marshal_status_t) -> *const c_char {
    status.description().as_ptr()
}
