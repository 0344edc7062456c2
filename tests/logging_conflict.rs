use std::ffi::CStr;
use std::ptr;

use log::{Log, Metadata, Record};
use marshal::error::{marshal_status_message, marshal_status_t};
use marshal::logging::marshal_log_init;

struct HostLogger;

impl Log for HostLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        false
    }

    fn log(&self, _record: &Record) {}

    fn flush(&self) {}
}

static HOST_LOGGER: HostLogger = HostLogger;

#[test]
fn reports_logger_installed_by_host() {
    log::set_logger(&HOST_LOGGER).unwrap();

    let status = unsafe { marshal_log_init(ptr::null()) };
    assert_eq!(status, marshal_status_t::MARSHAL_STATUS_LOGGER_INSTALLED);

    let message = unsafe { CStr::from_ptr(marshal_status_message(status)) };
    assert_eq!(
        message.to_str().unwrap(),
        "logging already initialized by another logger"
    );
}
