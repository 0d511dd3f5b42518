//! Log capture for tests.
//!
//! Several contracts in this crate report problems only through the `log`
//! facade, so tests need to assert on exact numbers of WARN/ERROR entries.
//! The global logger can be installed only once per process; this one writes
//! into a thread-local buffer, and the default test harness runs each test on
//! its own thread, so concurrent tests do not see each other's records.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, Metadata, Record};

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

struct RecordingLogger;

impl log::Log for RecordingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static LOGGER: RecordingLogger = RecordingLogger;
static INSTALL: Once = Once::new();

/// Run `f` and return its result together with the log records it produced
/// on the current thread.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<(Level, String)>) {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger should be installed in tests");
        log::set_max_level(log::LevelFilter::Trace);
    });

    RECORDS.with(|records| records.borrow_mut().clear());
    let result = f();
    let records = RECORDS.with(|records| records.borrow_mut().split_off(0));
    (result, records)
}
