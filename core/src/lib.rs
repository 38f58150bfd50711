//! Synchronous client core for project-to-project record exchange.
//!
//! # Overview
//! Moves records from a "source" project to a "destination" project of a
//! clinical-data-capture platform, over either the remote token-authenticated
//! HTTP API or the host platform's in-process data layer. The client builds
//! requests and bookkeeps failures; all I/O happens behind injected
//! capabilities, keeping the core deterministic and testable with fakes.
//!
//! # Design
//! - `ExchangeClient` owns the configuration (transport, tokens, overwrite
//!   flag) and the latched error state with its accumulating diagnostic log.
//! - The two transfer paths are independent: the HTTP operations check their
//!   own preconditions per call, while the data-layer operations refuse to
//!   run once any failure is latched.
//! - Requests and data-layer call contracts are plain owned data, so test
//!   doubles can capture and compare them.
//! - Payloads pass through as raw strings; the core never parses response
//!   contents.

pub mod client;
pub mod error;
pub mod request;
pub mod store;

pub use client::ExchangeClient;
pub use error::{ErrorKind, ErrorState, ExchangeError};
pub use request::{ApiRequest, ParamValue, Transport};
pub use store::{OverwriteMode, ReadQuery, RecordStore, WriteRequest};
