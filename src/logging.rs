//! Routes marshal's own log records to stderr or to a C callback.

use std::os::raw::{c_char, c_void};
use std::sync::{PoisonError, RwLock};

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

use crate::error::{MarshalError, cstring_from_str_lossy, marshal_status_t};
use crate::ffi::{read_ref, write_out};

const TARGET_PREFIX: &str = "marshal";

static LOGGER: BoundaryLogger = BoundaryLogger::new();
static INSTALLED: OnceCell<bool> = OnceCell::new();

/// Log level values for marshal logging.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum marshal_log_level_t {
    MARSHAL_LOG_LEVEL_OFF = 0,
    MARSHAL_LOG_LEVEL_ERROR = 1,
    MARSHAL_LOG_LEVEL_WARN = 2,
    MARSHAL_LOG_LEVEL_INFO = 3,
    MARSHAL_LOG_LEVEL_DEBUG = 4,
    MARSHAL_LOG_LEVEL_TRACE = 5,
}

impl TryFrom<u32> for marshal_log_level_t {
    type Error = MarshalError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::MARSHAL_LOG_LEVEL_OFF,
            1 => Self::MARSHAL_LOG_LEVEL_ERROR,
            2 => Self::MARSHAL_LOG_LEVEL_WARN,
            3 => Self::MARSHAL_LOG_LEVEL_INFO,
            4 => Self::MARSHAL_LOG_LEVEL_DEBUG,
            5 => Self::MARSHAL_LOG_LEVEL_TRACE,
            other => return Err(MarshalError::InvalidLogLevel(other)),
        })
    }
}

impl From<marshal_log_level_t> for LevelFilter {
    fn from(value: marshal_log_level_t) -> Self {
        match value {
            marshal_log_level_t::MARSHAL_LOG_LEVEL_OFF => LevelFilter::Off,
            marshal_log_level_t::MARSHAL_LOG_LEVEL_ERROR => LevelFilter::Error,
            marshal_log_level_t::MARSHAL_LOG_LEVEL_WARN => LevelFilter::Warn,
            marshal_log_level_t::MARSHAL_LOG_LEVEL_INFO => LevelFilter::Info,
            marshal_log_level_t::MARSHAL_LOG_LEVEL_DEBUG => LevelFilter::Debug,
            marshal_log_level_t::MARSHAL_LOG_LEVEL_TRACE => LevelFilter::Trace,
        }
    }
}

impl From<Level> for marshal_log_level_t {
    fn from(value: Level) -> Self {
        match value {
            Level::Error => Self::MARSHAL_LOG_LEVEL_ERROR,
            Level::Warn => Self::MARSHAL_LOG_LEVEL_WARN,
            Level::Info => Self::MARSHAL_LOG_LEVEL_INFO,
            Level::Debug => Self::MARSHAL_LOG_LEVEL_DEBUG,
            Level::Trace => Self::MARSHAL_LOG_LEVEL_TRACE,
        }
    }
}

/// Log record handed to a C callback.
///
/// `target` and `message` are only valid for the duration of the callback.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct marshal_log_record_t {
    pub level: marshal_log_level_t,
    pub target: *const c_char,
    pub message: *const c_char,
}

/// Callback receiving marshal's log records. May be invoked from any thread.
#[allow(non_camel_case_types)]
pub type marshal_log_callback_t =
    Option<extern "C" fn(record: *const marshal_log_record_t, user_data: *mut c_void)>;

/// Logging configuration supplied by C callers.
///
/// `level` holds a `marshal_log_level_t` value. Without a callback, records are
/// written to stderr; `user_data` is forwarded to the callback unchanged.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct marshal_log_config_t {
    pub level: u32,
    pub callback: marshal_log_callback_t,
    pub user_data: *mut c_void,
}

#[derive(Clone, Copy, Debug)]
struct Sink {
    level: LevelFilter,
    callback: marshal_log_callback_t,
    user_data: usize,
}

impl Sink {
    const DEFAULT: Sink = Sink {
        level: LevelFilter::Info,
        callback: None,
        user_data: 0,
    };

    fn from_config(config: Option<&marshal_log_config_t>) -> Result<Self, MarshalError> {
        let Some(config) = config else {
            return Ok(Self::DEFAULT);
        };
        let level = marshal_log_level_t::try_from(config.level)?;
        Ok(Self {
            level: level.into(),
            callback: config.callback,
            user_data: config.user_data as usize,
        })
    }

    fn accepts(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with(TARGET_PREFIX)
    }

    fn deliver(&self, record: &Record) {
        let Some(callback) = self.callback else {
            eprintln!("{} {}: {}", record.level(), record.target(), record.args());
            return;
        };
        let target = cstring_from_str_lossy(record.target());
        let message = cstring_from_str_lossy(&record.args().to_string());
        let c_record = marshal_log_record_t {
            level: record.level().into(),
            target: target.as_ptr(),
            message: message.as_ptr(),
        };
        callback(&c_record, self.user_data as *mut c_void);
    }
}

struct BoundaryLogger {
    sink: RwLock<Sink>,
}

impl BoundaryLogger {
    const fn new() -> Self {
        Self {
            sink: RwLock::new(Sink::DEFAULT),
        }
    }

    fn sink(&self) -> Sink {
        *self.sink.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, sink: Sink) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = sink;
    }
}

impl Log for BoundaryLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.sink().accepts(metadata)
    }

    fn log(&self, record: &Record) {
        let sink = self.sink();
        if sink.accepts(record.metadata()) {
            sink.deliver(record);
        }
    }

    fn flush(&self) {}
}

fn install() -> Result<(), MarshalError> {
    if *INSTALLED.get_or_init(|| log::set_logger(&LOGGER).is_ok()) {
        Ok(())
    } else {
        Err(MarshalError::LoggerInstalled)
    }
}

fn configure(config: Option<&marshal_log_config_t>) -> Result<(), MarshalError> {
    let sink = Sink::from_config(config)?;
    install()?;
    LOGGER.replace(sink);
    log::set_max_level(sink.level);
    Ok(())
}

/// Fills `config` with the defaults: INFO level, no callback.
///
/// # Safety
/// `config` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marshal_log_config_init(config: *mut marshal_log_config_t) {
    if config.is_null() {
        return;
    }
    let defaults = marshal_log_config_t {
        level: marshal_log_level_t::MARSHAL_LOG_LEVEL_INFO as u32,
        callback: None,
        user_data: std::ptr::null_mut(),
    };
    // Safety: upheld by the caller.
    unsafe { write_out(config, defaults) };
}

/// Installs marshal's logger, or reconfigures it when already installed.
///
/// A null `config` applies the defaults. An out-of-range level leaves the current
/// configuration untouched.
///
/// # Safety
/// `config` must be null or point to a valid configuration.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn marshal_log_init(config: *const marshal_log_config_t) -> marshal_status_t {
    // Safety: upheld by the caller.
    let config = (!config.is_null()).then(|| unsafe { read_ref(config) });
    configure(config).into()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use log::MetadataBuilder;

    use super::*;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        MetadataBuilder::new().level(level).target(target).build()
    }

    #[test]
    fn rejects_out_of_range_level() {
        assert_eq!(
            marshal_log_level_t::try_from(6u32),
            Err(MarshalError::InvalidLogLevel(6))
        );
        assert_eq!(
            marshal_log_level_t::try_from(4u32),
            Ok(marshal_log_level_t::MARSHAL_LOG_LEVEL_DEBUG)
        );
    }

    #[test]
    fn sink_only_accepts_marshal_targets() {
        let sink = Sink {
            level: LevelFilter::Debug,
            ..Sink::DEFAULT
        };
        assert!(sink.accepts(&metadata(Level::Debug, "marshal::bytes")));
        assert!(!sink.accepts(&metadata(Level::Trace, "marshal::bytes")));
        assert!(!sink.accepts(&metadata(Level::Error, "other")));
    }

    #[test]
    fn null_config_uses_defaults() {
        let sink = Sink::from_config(None).unwrap();
        assert_eq!(sink.level, LevelFilter::Info);
        assert!(sink.callback.is_none());
    }

    static DELIVERED: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn count(record: *const marshal_log_record_t, user_data: *mut c_void) {
        let record = unsafe { &*record };
        assert_eq!(record.level, marshal_log_level_t::MARSHAL_LOG_LEVEL_WARN);
        assert_eq!(user_data as usize, 7);
        DELIVERED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn deliver_forwards_to_callback() {
        let sink = Sink {
            level: LevelFilter::Warn,
            callback: Some(count),
            user_data: 7,
        };
        sink.deliver(
            &Record::builder()
                .level(Level::Warn)
                .target("marshal::tests")
                .args(format_args!("hello"))
                .build(),
        );
        assert_eq!(DELIVERED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn config_init_writes_defaults() {
        let mut config = marshal_log_config_t {
            level: 5,
            callback: Some(count),
            user_data: std::ptr::dangling_mut(),
        };
        unsafe { marshal_log_config_init(&mut config) };
        assert_eq!(config.level, 3);
        assert!(config.callback.is_none());
        assert!(config.user_data.is_null());
    }
}
