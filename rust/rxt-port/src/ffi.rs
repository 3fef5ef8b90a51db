//! C ABI surface.
//!
//! `create_console_port` is the one exported symbol. A host links the
//! `cdylib`, hands it a `Port` record to fill in, and later calls
//! `port.handler(port.context, value)` with the same C calling convention.
//! The declarations for C callers live in `include/rxt_port.h`.

use std::ffi::c_void;

use crate::port::{guarded, ConsoleHandler, Port};
use crate::value::Value;

static CONSOLE: ConsoleHandler = ConsoleHandler::stdout();

/// Handler installed by [`create_console_port`]. Ignores its context and
/// prints `msg` as one line on stdout.
pub extern "C" fn console_handler(_context: *mut c_void, msg: Value) {
    guarded(&CONSOLE, msg);
}

/// Fill `port` with a console port: no context, [`console_handler`].
///
/// A null `port` is a no-op.
///
/// # Safety
///
/// A non-null `port` must be valid for writing one `Port` record. The
/// previous contents are overwritten without being read.
#[no_mangle]
pub unsafe extern "C" fn create_console_port(port: *mut Port<'static>) {
    if port.is_null() {
        tracing::debug!("create_console_port called with null record");
        return;
    }
    // SAFETY: non-null and writable per the contract above.
    unsafe { port.write(Port::console()) };
}
