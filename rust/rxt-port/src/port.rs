//! Ports: a context pointer paired with a handler function.
//!
//! A host runtime delivers values to a [`Port`] without knowing what sits
//! behind it. On the Rust side the behavior is a [`MessageHandler`]; binding
//! one to a port produces the same two-word record the C ABI uses, with a
//! monomorphized trampoline as the function pointer and the handler itself
//! as the context.

use std::ffi::c_void;
use std::fmt;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Handler signature shared with the host: `fn(ctx: ?*anyopaque, msg: Value)`.
pub type Handler = extern "C" fn(context: *mut c_void, msg: Value);

/// Receives values delivered through a port.
///
/// There is no error channel: a handler degrades to diagnostics instead of
/// failing, and must not panic.
pub trait MessageHandler {
    fn handle(&self, value: Value);
}

/// The line a console-style handler writes for `value`, without the newline.
pub fn render(value: Value) -> String {
    value.to_string()
}

fn write_line<W: Write + ?Sized>(out: &mut W, value: Value) -> io::Result<()> {
    if let Err(err) = value.tag() {
        tracing::debug!(bits = value.raw(), %err, "delivering value with unknown tag");
    }
    // one write per line so a shared sink never sees half a line
    let line = format!("{value}\n");
    out.write_all(line.as_bytes())?;
    out.flush()
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Standard stream a [`ConsoleHandler`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sink {
    #[default]
    Stdout,
    Stderr,
}

/// Prints each value as one line on a standard stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleHandler {
    sink: Sink,
}

impl ConsoleHandler {
    pub const fn new(sink: Sink) -> Self {
        Self { sink }
    }

    pub const fn stdout() -> Self {
        Self::new(Sink::Stdout)
    }

    pub fn sink(&self) -> Sink {
        self.sink
    }
}

impl MessageHandler for ConsoleHandler {
    fn handle(&self, value: Value) {
        let result = match self.sink {
            Sink::Stdout => write_line(&mut io::stdout().lock(), value),
            Sink::Stderr => write_line(&mut io::stderr().lock(), value),
        };
        if let Err(err) = result {
            tracing::warn!(sink = ?self.sink, %err, "console port failed to write value");
        }
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Prints each value as one line into an arbitrary writer (a file, a
/// socket, a buffer). Writes are serialized through a mutex.
pub struct WriterHandler<W: Write> {
    out: Mutex<W>,
}

/// A [`WriterHandler`] that keeps everything in memory.
pub type CaptureHandler = WriterHandler<Vec<u8>>;

impl<W: Write> WriterHandler<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CaptureHandler {
    pub fn capture() -> Self {
        Self::new(Vec::new())
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn output(&self) -> String {
        let buf = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<W: Write> MessageHandler for WriterHandler<W> {
    fn handle(&self, value: Value) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = write_line(&mut *out, value) {
            tracing::warn!(%err, "writer port failed to write value");
        }
    }
}

impl<W: Write> fmt::Debug for WriterHandler<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterHandler").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// A (context, handler) pair with the C layout
/// `struct { void *context; Handler handler; }`.
///
/// The port never owns its context. `'ctx` ties a port built from Rust to
/// the handler it borrows; ports handed to a host are `Port<'static>` and
/// the host is responsible for keeping any context alive.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Port<'ctx> {
    context: *mut c_void,
    handler: Handler,
    _context: PhantomData<&'ctx ()>,
}

impl Port<'static> {
    /// Port with no context that prints to stdout.
    pub fn console() -> Self {
        Self {
            context: std::ptr::null_mut(),
            handler: crate::ffi::console_handler,
            _context: PhantomData,
        }
    }
}

impl<'ctx> Port<'ctx> {
    /// Bind `handler` as the port's context, dispatched through an
    /// `extern "C"` trampoline specialized for `H`.
    pub fn bind<H: MessageHandler>(handler: &'ctx H) -> Self {
        Self {
            context: handler as *const H as *mut c_void,
            handler: trampoline::<H>,
            _context: PhantomData,
        }
    }

    /// Deliver a value: `handler(context, value)`.
    pub fn send(&self, value: Value) {
        (self.handler)(self.context, value)
    }

    pub fn context(&self) -> *mut c_void {
        self.context
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }
}

impl fmt::Debug for Port<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("context", &self.context)
            .field("handler", &(self.handler as *const ()))
            .finish()
    }
}

/// Run a handler without letting a panic cross the C boundary.
pub(crate) fn guarded<H: MessageHandler + ?Sized>(handler: &H, value: Value) {
    if panic::catch_unwind(AssertUnwindSafe(|| handler.handle(value))).is_err() {
        tracing::error!(bits = value.raw(), "message handler panicked; value dropped");
    }
}

extern "C" fn trampoline<H: MessageHandler>(context: *mut c_void, msg: Value) {
    // SAFETY: only `Port::bind` installs this trampoline, and it stores a
    // `&H` as the context that outlives the port.
    let handler = unsafe { &*(context as *const H) };
    guarded(handler, msg);
}
