//! Exchange client mediating record transfer between two projects.
//!
//! # Design
//! `ExchangeClient` orchestrates two independent transfer paths: a remote
//! token-authenticated HTTP API (via the injected `Transport`) and the host
//! platform's in-process data layer (via the injected `RecordStore`). Each
//! operation validates its preconditions, builds a request, invokes one
//! capability, and maps an absent response to an error. No retries, no
//! caching, no parsing of payload contents — payloads pass through raw.
//!
//! Failures latch: the error flag and diagnostic log only grow, and nothing
//! resets them short of constructing a new client. The two paths treat the
//! latch differently, and the asymmetry is deliberate: data-layer
//! operations refuse to run once anything is latched, while the HTTP
//! operations re-check only their own preconditions and will still attempt
//! a transport call on a latched client whose credentials are in place.
//!
//! Not intended for concurrent use; error state and the log are plain
//! instance fields. Callers needing parallel transfers use one client each.

use crate::error::{ErrorKind, ErrorState, ExchangeError};
use crate::request::{ApiRequest, Transport};
use crate::store::{OverwriteMode, ReadQuery, RecordStore, WriteRequest};

/// Synchronous client for source-to-destination record transfer.
pub struct ExchangeClient {
    transport: Option<Box<dyn Transport>>,
    store: Box<dyn RecordStore>,
    source_token: Option<String>,
    destination_token: Option<String>,
    overwrite_blanks: bool,
    error: ErrorState,
}

impl ExchangeClient {
    /// Create an unconfigured client over the host platform's data layer.
    /// Transport and tokens start absent; their absence is only detected
    /// when an operation needs them.
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self {
            transport: None,
            store,
            source_token: None,
            destination_token: None,
            overwrite_blanks: false,
            error: ErrorState::default(),
        }
    }

    pub fn set_transport(&mut self, transport: Box<dyn Transport>) {
        self.transport = Some(transport);
    }

    /// Point the transport at the remote API endpoint. No-op when no
    /// transport has been set.
    pub fn set_endpoint(&mut self, url: &str) {
        if let Some(transport) = self.transport.as_mut() {
            transport.set_endpoint(url);
        }
    }

    pub fn set_source_token(&mut self, token: &str) {
        self.source_token = Some(token.to_string());
    }

    pub fn set_destination_token(&mut self, token: &str) {
        self.destination_token = Some(token.to_string());
    }

    /// Select blank-value handling for destination writes: `false` keeps
    /// existing values when the incoming value is blank, `true` lets
    /// blanks overwrite.
    pub fn set_overwrite_blanks(&mut self, flag: bool) {
        self.overwrite_blanks = flag;
    }

    /// One-shot configuration; absent values are legal and stored as-is.
    pub fn configure(
        &mut self,
        transport: Option<Box<dyn Transport>>,
        source_token: Option<&str>,
        destination_token: Option<&str>,
        overwrite_blanks: bool,
    ) {
        self.transport = transport;
        self.source_token = source_token.map(str::to_string);
        self.destination_token = destination_token.map(str::to_string);
        self.overwrite_blanks = overwrite_blanks;
    }

    /// Whether any operation on this client has failed.
    pub fn has_errors(&self) -> bool {
        self.error.is_latched()
    }

    /// The precondition kind from the most recent failed check, if any.
    /// Data failures latch without setting a kind.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.kind()
    }

    /// The accumulated diagnostic log, newline-joined in append order.
    pub fn message(&self) -> String {
        self.error.message()
    }

    /// Read records from the source project over the HTTP API.
    ///
    /// Empty filter lists mean "no filter". Returns the raw response body
    /// (EAV-format JSON, per the request) without parsing it.
    pub fn fetch_from_source_api(
        &mut self,
        records: &[String],
        forms: &[String],
        events: &[String],
    ) -> Result<String, ExchangeError> {
        let mut missing = None;
        if self.transport.is_none() {
            self.error.latch(ErrorKind::NoTransport);
            missing = Some(ErrorKind::NoTransport);
        }
        if self.source_token.is_none() {
            self.error.latch(ErrorKind::NoSourceToken);
            missing = Some(ErrorKind::NoSourceToken);
        }
        if let Some(kind) = missing {
            self.error.note("fetch_from_source_api");
            tracing::warn!("source fetch refused: {}", kind.default_message());
            return Err(kind.into());
        }

        let token = self.source_token.clone().unwrap_or_default();
        let request = ApiRequest::export(&token, records, forms, events);
        let Some(transport) = self.transport.as_mut() else {
            return Err(ExchangeError::NoTransport);
        };

        tracing::debug!(records = records.len(), "exporting records from source");
        match transport.communicate(&request) {
            Some(payload) => Ok(payload),
            None => {
                let diagnostic = transport.last_message();
                self.error.record(&diagnostic);
                tracing::warn!("source export failed: {diagnostic}");
                Err(ExchangeError::Transfer(diagnostic))
            }
        }
    }

    /// Write records to the destination project over the HTTP API.
    ///
    /// `data` is the pre-serialized EAV payload, typically the untouched
    /// result of `fetch_from_source_api`. Returns the raw response body —
    /// the destination reports a record count, not the records.
    pub fn push_to_destination_api(&mut self, data: &str) -> Result<String, ExchangeError> {
        let mut missing = None;
        if self.transport.is_none() {
            self.error.latch(ErrorKind::NoTransport);
            missing = Some(ErrorKind::NoTransport);
        }
        if self.destination_token.is_none() {
            self.error.latch(ErrorKind::NoDestinationToken);
            missing = Some(ErrorKind::NoDestinationToken);
        }
        if let Some(kind) = missing {
            self.error.note("push_to_destination_api");
            tracing::warn!("destination push refused: {}", kind.default_message());
            return Err(kind.into());
        }

        let token = self.destination_token.clone().unwrap_or_default();
        let overwrite = OverwriteMode::from_overwrite_blanks(self.overwrite_blanks);
        let request = ApiRequest::import(&token, overwrite, data);
        let Some(transport) = self.transport.as_mut() else {
            return Err(ExchangeError::NoTransport);
        };

        tracing::debug!(mode = overwrite.as_str(), "importing records into destination");
        match transport.communicate(&request) {
            Some(payload) => Ok(payload),
            None => {
                let diagnostic = transport.last_message();
                self.error.record(&diagnostic);
                tracing::warn!("destination import failed: {diagnostic}");
                Err(ExchangeError::Transfer(diagnostic))
            }
        }
    }

    /// Read records from a same-instance project through the data layer.
    ///
    /// Refuses to run once any earlier failure is latched; the store is not
    /// called in that case.
    pub fn fetch_from_source_data_layer(
        &mut self,
        project_id: u64,
        records: &[String],
    ) -> Result<String, ExchangeError> {
        if self.error.is_latched() {
            self.error.note("fetch_from_source_data_layer");
            return Err(ExchangeError::Halted);
        }

        let query = ReadQuery {
            project_id,
            format: "json".to_string(),
            records: records.to_vec(),
            fields: Vec::new(),
            events: None,
            groups: None,
            combine_checkboxes: false,
            export_data_access_groups: false,
            export_survey_fields: false,
            filter: None,
            export_labels: false,
            use_csv_headers: false,
        };

        match self.store.read_records(&query) {
            Some(payload) => Ok(payload),
            None => {
                self.error.record("no records");
                tracing::warn!(project_id, "data-layer read returned no records");
                Err(ExchangeError::Transfer("no records".to_string()))
            }
        }
    }

    /// Write records to a same-instance project through the data layer.
    ///
    /// Same latch behavior as `fetch_from_source_data_layer`. Dates in the
    /// payload are expected in year-month-day order.
    pub fn push_to_destination_data_layer(
        &mut self,
        project_id: u64,
        data: &str,
    ) -> Result<String, ExchangeError> {
        if self.error.is_latched() {
            self.error.note("push_to_destination_data_layer");
            return Err(ExchangeError::Halted);
        }

        let request = WriteRequest {
            project_id,
            format: "json".to_string(),
            data: data.to_string(),
            overwrite: OverwriteMode::from_overwrite_blanks(self.overwrite_blanks),
            date_format: "YMD".to_string(),
        };

        match self.store.write_records(&request) {
            Some(response) => Ok(response),
            None => {
                self.error.record("record save failed");
                tracing::warn!(project_id, "data-layer write failed");
                Err(ExchangeError::Transfer("record save failed".to_string()))
            }
        }
    }
}
