use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

/// API token of the seeded source project (id 101).
pub const SOURCE_TOKEN: &str = "9A81B67422D1C4E0F3A5D2B8C6E91073";
/// API token of the seeded destination project (id 102), initially empty.
pub const DESTINATION_TOKEN: &str = "4E7A90C2B1D8F6E3A2C5B7D90F1E3A48";

/// One exported value in the long (event-attribute-value) record format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EavRow {
    pub record: String,
    pub event: String,
    pub field_name: String,
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct Project {
    pub id: u64,
    /// Field-to-form assignments, used to resolve `forms` export filters.
    pub field_forms: HashMap<String, String>,
    pub rows: Vec<EavRow>,
}

/// Request fields the mock cares about; everything else the client sends
/// (format, type, raw-or-label knobs) is accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct ApiParams {
    pub token: String,
    pub content: String,
    #[serde(default)]
    pub records: Vec<String>,
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default, rename = "overwriteBehavior")]
    pub overwrite_behavior: Option<String>,
    pub data: Option<String>,
    #[serde(default, rename = "returnContent")]
    pub return_content: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Project>>>;

pub fn app() -> Router {
    let mut projects = HashMap::new();
    projects.insert(SOURCE_TOKEN.to_string(), source_fixture());
    projects.insert(
        DESTINATION_TOKEN.to_string(),
        Project {
            id: 102,
            field_forms: data_dictionary(),
            rows: Vec::new(),
        },
    );
    let db: Db = Arc::new(RwLock::new(projects));
    Router::new().route("/api", post(api)).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn data_dictionary() -> HashMap<String, String> {
    HashMap::from([
        ("age".to_string(), "demographics".to_string()),
        ("weight".to_string(), "vitals".to_string()),
        ("pulse".to_string(), "vitals".to_string()),
    ])
}

fn source_fixture() -> Project {
    let row = |record: &str, event: &str, field_name: &str, value: &str| EavRow {
        record: record.to_string(),
        event: event.to_string(),
        field_name: field_name.to_string(),
        value: value.to_string(),
    };
    Project {
        id: 101,
        field_forms: data_dictionary(),
        rows: vec![
            row("1", "event_1", "age", "42"),
            row("1", "event_1", "weight", "81"),
            row("1", "event_2", "pulse", "64"),
            row("2", "event_1", "age", "57"),
        ],
    }
}

async fn api(State(db): State<Db>, Json(params): Json<ApiParams>) -> Response {
    let mut projects = db.write().await;
    let Some(project) = projects.get_mut(&params.token) else {
        tracing::debug!("rejected request with unknown token");
        return (StatusCode::FORBIDDEN, Json(json!({"error": "invalid token"}))).into_response();
    };
    if params.content != "record" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("unsupported content: {}", params.content)})),
        )
            .into_response();
    }
    match params.data.as_deref() {
        Some(data) => import(project, &params, data),
        None => export(project, &params),
    }
}

fn export(project: &Project, params: &ApiParams) -> Response {
    let rows: Vec<EavRow> = project
        .rows
        .iter()
        .filter(|row| params.records.is_empty() || params.records.contains(&row.record))
        .filter(|row| params.events.is_empty() || params.events.contains(&row.event))
        .filter(|row| {
            params.forms.is_empty()
                || project
                    .field_forms
                    .get(&row.field_name)
                    .is_some_and(|form| params.forms.contains(form))
        })
        .cloned()
        .collect();
    tracing::debug!(project = project.id, rows = rows.len(), "export");
    Json(rows).into_response()
}

fn import(project: &mut Project, params: &ApiParams, data: &str) -> Response {
    let rows: Vec<EavRow> = match serde_json::from_str(data) {
        Ok(rows) => rows,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("malformed data: {err}")})),
            )
                .into_response();
        }
    };

    let overwrite = params.overwrite_behavior.as_deref() == Some("overwrite");
    let mut touched: HashSet<String> = HashSet::new();
    for row in rows {
        // Under "normal", blank incoming values leave existing data alone.
        if row.value.is_empty() && !overwrite {
            continue;
        }
        touched.insert(row.record.clone());
        let existing = project
            .rows
            .iter_mut()
            .find(|r| r.record == row.record && r.event == row.event && r.field_name == row.field_name);
        match existing {
            Some(existing) => existing.value = row.value,
            None => project.rows.push(row),
        }
    }

    tracing::info!(project = project.id, count = touched.len(), "import");
    Json(json!({"count": touched.len()})).into_response()
}
