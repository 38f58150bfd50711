//! Error types and the latched error state for the exchange client.
//!
//! # Design
//! Missing preconditions get dedicated variants because callers frequently
//! distinguish "the client was never wired up" from "a transfer actually
//! failed." Data failures land in `Transfer` with the free-text diagnostic
//! the failing capability reported. `Halted` is returned when a data-layer
//! operation refuses to run because an earlier failure is still latched.
//!
//! `ErrorState` reproduces the client's accumulating diagnostic log: once
//! latched it never clears, the log only grows, and when several
//! preconditions fail in one call every default message is appended but
//! only the last-checked kind is retained.

use std::fmt;

/// Errors returned by `ExchangeClient` transfer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// No transport has been set on the client.
    NoTransport,

    /// No source credential has been set; source reads cannot authenticate.
    NoSourceToken,

    /// No destination credential has been set; destination writes cannot
    /// authenticate.
    NoDestinationToken,

    /// The transport or data layer produced no usable response. Carries the
    /// diagnostic text recorded for the failure.
    Transfer(String),

    /// An earlier failure is latched, so the data-layer call was skipped.
    Halted,
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::NoTransport => write!(f, "no transport configured"),
            ExchangeError::NoSourceToken => write!(f, "no source token"),
            ExchangeError::NoDestinationToken => write!(f, "no destination token"),
            ExchangeError::Transfer(msg) => write!(f, "transfer failed: {msg}"),
            ExchangeError::Halted => write!(f, "skipped after earlier failure"),
        }
    }
}

impl std::error::Error for ExchangeError {}

/// Which precondition failed. Retained by the client after a failed call;
/// data failures latch without a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoTransport,
    NoSourceToken,
    NoDestinationToken,
}

impl ErrorKind {
    /// Default log line for this kind.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::NoTransport => "no transport configured",
            ErrorKind::NoSourceToken => "no source token",
            ErrorKind::NoDestinationToken => "no destination token",
        }
    }
}

impl From<ErrorKind> for ExchangeError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoTransport => ExchangeError::NoTransport,
            ErrorKind::NoSourceToken => ExchangeError::NoSourceToken,
            ErrorKind::NoDestinationToken => ExchangeError::NoDestinationToken,
        }
    }
}

/// Latched error flag plus the append-only diagnostic log.
///
/// One-way: nothing in the client clears it. Callers wanting a clean slate
/// construct a new client.
#[derive(Debug, Default)]
pub struct ErrorState {
    latched: bool,
    kind: Option<ErrorKind>,
    log: Vec<String>,
}

impl ErrorState {
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    /// The full diagnostic log, newline-joined in append order.
    pub fn message(&self) -> String {
        self.log.join("\n")
    }

    /// Latch a failed precondition: set the flag, retain the kind, append
    /// its default message. A later latch overwrites the kind (last one
    /// checked wins) while earlier log lines remain.
    pub(crate) fn latch(&mut self, kind: ErrorKind) {
        self.latched = true;
        self.kind = Some(kind);
        self.log.push(kind.default_message().to_string());
    }

    /// Latch a data failure: set the flag and append the diagnostic, but
    /// leave the kind alone.
    pub(crate) fn record(&mut self, diagnostic: &str) {
        self.latched = true;
        self.log.push(diagnostic.to_string());
    }

    /// Append a context line without touching the flag or kind.
    pub(crate) fn note(&mut self, line: &str) {
        self.log.push(line.to_string());
    }
}
