//! rxt port
//!
//! Tagged 64-bit values and the console port a host runtime uses to print
//! them. The crate builds as a `cdylib`; see [`ffi`] for the C surface.

pub mod conformance;
pub mod error;
pub mod ffi;
pub mod port;
pub mod value;

pub use error::ValueError;
pub use port::{CaptureHandler, ConsoleHandler, Handler, MessageHandler, Port, Sink, WriterHandler};
pub use value::{Decoded, Tag, Value};
