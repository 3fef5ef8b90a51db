//! Implementations behind the `rxt-port` subcommands.
//!
//! Everything except [`print`] returns text instead of writing it, so the
//! binary decides where it goes and tests can inspect it.

use std::fmt::Display;
use std::io::Write;

use rxt_port::conformance::{self, VECTORS};
use rxt_port::value::{parse_word, TAG_MASK, WIRE_FORMAT_VERSION};
use rxt_port::{ConsoleHandler, Port, Sink, Value};

use crate::colors::{gray, green, red};
use crate::error::CliError;

fn parse_all(words: &[String]) -> Result<Vec<Value>, CliError> {
    words
        .iter()
        .map(|w| parse_word(w).map_err(CliError::from))
        .collect()
}

/// `0x` followed by all sixteen hex digits.
pub fn format_word(value: Value) -> String {
    format!("{:#018x}", value.raw())
}

/// Write each item as one line and flush.
pub fn write_lines<W, I>(out: &mut W, lines: I) -> Result<(), CliError>
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

/// Deliver each word through a console port, one line per word.
///
/// All words are parsed before anything is delivered.
pub fn print(words: &[String], sink: Sink) -> Result<(), CliError> {
    let values = parse_all(words)?;
    let handler = ConsoleHandler::new(sink);
    let port = match sink {
        Sink::Stdout => Port::console(),
        Sink::Stderr => Port::bind(&handler),
    };
    tracing::debug!(count = values.len(), sink = ?handler.sink(), "delivering words");
    for value in values {
        port.send(value);
    }
    Ok(())
}

/// Field breakdown of a word.
pub fn describe(value: Value) -> String {
    let tag = match value.tag() {
        Ok(tag) => format!("{tag}({})", value.tag_bits()),
        Err(_) => format!("unknown({})", value.tag_bits()),
    };
    format!(
        "{}  tag={}  payload={:#x}  -> {}",
        format_word(value),
        tag,
        value.payload(),
        value
    )
}

pub fn decode(words: &[String]) -> Result<Vec<String>, CliError> {
    Ok(parse_all(words)?.into_iter().map(describe).collect())
}

/// What `rxt-port encode` was asked to pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeRequest {
    Int(i64),
    Bool(bool),
    Nil,
    Addr(String),
}

pub fn encode(request: &EncodeRequest) -> Result<Value, CliError> {
    match request {
        EncodeRequest::Int(n) => Value::from_int(*n).ok_or(CliError::IntegerOutOfRange(*n)),
        EncodeRequest::Bool(b) => Ok(Value::from_bool(*b)),
        EncodeRequest::Nil => Ok(Value::nil()),
        EncodeRequest::Addr(text) => {
            let addr = parse_word(text)?.raw();
            if addr & TAG_MASK != 0 {
                tracing::warn!(addr, "address is not 8-byte aligned; tag bits will be corrupted");
            }
            Ok(Value::from_addr(addr))
        }
    }
}

/// Render the conformance table, one line per vector, plus a summary.
/// Fails if any vector does not match.
pub fn vectors() -> (Vec<String>, Result<(), CliError>) {
    let mismatches = conformance::verify();
    let mut lines = Vec::with_capacity(VECTORS.len() + 1);
    for vector in VECTORS {
        let status = match vector.check() {
            Ok(()) => green("ok  "),
            Err(m) => format!("{} got {:?}", red("FAIL"), m.actual),
        };
        lines.push(format!(
            "{} {}  {:<24} {}",
            status,
            format_word(vector.value()),
            vector.expected,
            gray(vector.note)
        ));
    }
    lines.push(format!(
        "wire format v{}: {} vectors, {} failed",
        WIRE_FORMAT_VERSION,
        VECTORS.len(),
        mismatches.len()
    ));
    let result = if mismatches.is_empty() {
        Ok(())
    } else {
        Err(CliError::VectorsFailed {
            failed: mismatches.len(),
            total: VECTORS.len(),
        })
    };
    (lines, result)
}
