//! In-process data-layer capability for same-instance transfers.
//!
//! # Design
//! The host platform exposes native record read/write calls with a wide,
//! fixed parameter contract. Those contracts are captured here as plain
//! owned structs so a fake store can record and assert on exactly what the
//! client asked for. The client fills most knobs with fixed values; they
//! are still carried explicitly because they are part of the call contract,
//! not implementation detail.

use serde::Serialize;

/// Policy for blank incoming values on write.
///
/// Under `Normal`, blank values are ignored and existing destination values
/// are kept. Under `Overwrite`, blank values erase existing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverwriteMode {
    Normal,
    Overwrite,
}

impl OverwriteMode {
    /// Resolve the mode from the client's overwrite-blanks flag.
    pub fn from_overwrite_blanks(flag: bool) -> Self {
        if flag {
            OverwriteMode::Overwrite
        } else {
            OverwriteMode::Normal
        }
    }

    /// Wire string understood by the platform.
    pub fn as_str(self) -> &'static str {
        match self {
            OverwriteMode::Normal => "normal",
            OverwriteMode::Overwrite => "overwrite",
        }
    }
}

/// Full parameter set of the platform's native record read call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadQuery {
    pub project_id: u64,
    pub format: String,
    pub records: Vec<String>,
    pub fields: Vec<String>,
    pub events: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
    pub combine_checkboxes: bool,
    pub export_data_access_groups: bool,
    pub export_survey_fields: bool,
    pub filter: Option<String>,
    pub export_labels: bool,
    pub use_csv_headers: bool,
}

/// Full parameter set of the platform's native record write call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteRequest {
    pub project_id: u64,
    pub format: String,
    pub data: String,
    pub overwrite: OverwriteMode,
    pub date_format: String,
}

/// Native record read/write capability of the host platform.
///
/// Absence (`None`) means the platform produced no result — an empty or
/// failed read, a rejected write. The store does not distinguish further;
/// the client records a generic diagnostic either way.
pub trait RecordStore {
    fn read_records(&mut self, query: &ReadQuery) -> Option<String>;

    fn write_records(&mut self, request: &WriteRequest) -> Option<String>;
}
