//! API request model and the transport capability.
//!
//! # Design
//! A request to the capture platform's API is a flat map of named fields,
//! described here as plain data. The client assembles an `ApiRequest` per
//! call; the injected `Transport` owns everything about putting it on the
//! wire (encoding, endpoint, TLS, timeouts). `ParamValue` is untagged so a
//! request serializes to a flat JSON object of strings and string arrays.
//!
//! All fields use owned types so requests can be captured and compared by
//! test doubles without lifetime concerns.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::OverwriteMode;

/// One named API field: scalar text or a list filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
}

/// A platform API request described as plain data.
///
/// Built fresh per operation by `ExchangeClient`, never persisted. The
/// transport is responsible for executing it and returning the raw
/// response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApiRequest {
    pub params: BTreeMap<String, ParamValue>,
}

fn text(value: &str) -> ParamValue {
    ParamValue::Text(value.to_string())
}

fn list(values: &[String]) -> ParamValue {
    ParamValue::List(values.to_vec())
}

impl ApiRequest {
    /// Record export request: EAV long format, raw values and headers, no
    /// checkbox labels, survey fields, or data access groups.
    pub fn export(token: &str, records: &[String], forms: &[String], events: &[String]) -> Self {
        let mut params = BTreeMap::new();
        params.insert("token".to_string(), text(token));
        params.insert("content".to_string(), text("record"));
        params.insert("format".to_string(), text("json"));
        params.insert("type".to_string(), text("eav"));
        params.insert("records".to_string(), list(records));
        params.insert("forms".to_string(), list(forms));
        params.insert("events".to_string(), list(events));
        params.insert("rawOrLabel".to_string(), text("raw"));
        params.insert("rawOrLabelHeaders".to_string(), text("raw"));
        params.insert("exportCheckboxLabel".to_string(), text("false"));
        params.insert("exportSurveyFields".to_string(), text("false"));
        params.insert("exportDataAccessGroups".to_string(), text("false"));
        params.insert("returnFormat".to_string(), text("json"));
        ApiRequest { params }
    }

    /// Record import request: `data` is the pre-serialized EAV payload. The
    /// destination reports the number of records affected rather than the
    /// records themselves.
    pub fn import(token: &str, overwrite: OverwriteMode, data: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("token".to_string(), text(token));
        params.insert("content".to_string(), text("record"));
        params.insert("format".to_string(), text("json"));
        params.insert("type".to_string(), text("eav"));
        params.insert("overwriteBehavior".to_string(), text(overwrite.as_str()));
        params.insert("forceAutoNumber".to_string(), text("false"));
        params.insert("data".to_string(), text(data));
        params.insert("returnContent".to_string(), text("count"));
        params.insert("returnFormat".to_string(), text("json"));
        ApiRequest { params }
    }

    pub fn get(&self, field: &str) -> Option<&ParamValue> {
        self.params.get(field)
    }
}

/// HTTP communicator capability for cross-instance API calls.
///
/// `communicate` blocks for one round-trip and returns the raw response
/// body, or `None` when the call produced no usable response; the
/// diagnostic for the most recent failure is available from
/// `last_message`. The core performs no retries and imposes no timeouts —
/// any such policy lives in the implementation.
pub trait Transport {
    /// Point the transport at the remote API endpoint.
    fn set_endpoint(&mut self, url: &str);

    /// Execute one request and return the raw response body.
    fn communicate(&mut self, request: &ApiRequest) -> Option<String>;

    /// Diagnostic text for the most recent failed call.
    fn last_message(&self) -> String;
}
