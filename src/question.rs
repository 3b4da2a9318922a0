// Question records: the typed shape of one entry of the template file, the
// shape of a record read back from the service, and the template loader.

use crate::error::MigrateError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

const STAGE_FIELD: &str = "stage";
const NUMBER_FIELD: &str = "questionNumber";

/// One quiz question as it appears in the template. Only `stage` and
/// `questionNumber` are interpreted; everything else (question text,
/// options, answer, explanation, ...) is sent to the service untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub stage: Value,
    #[serde(rename = "questionNumber")]
    pub question_number: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    /// Human-readable identifier used in progress lines.
    pub fn label(&self) -> String {
        format!(
            "Stage {}, question {}",
            display_value(&self.stage),
            display_value(&self.question_number)
        )
    }
}

/// A record as listed by the service. The service adds `id`; `stage` may be
/// missing on records that were not created by this tool.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RemoteRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub stage: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RemoteRecord {
    /// The id as it goes into `<base>/<id>`. Strings are used verbatim,
    /// numbers are printed; anything else has no usable id.
    pub fn id_segment(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Render a scalar without JSON quoting, so `"3"` and `3` both print as 3.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read and validate the template at `path`.
///
/// The file must hold a JSON array of objects, and every object must carry
/// `stage` and `questionNumber`. Records keep their file order.
pub fn load_questions(path: &Path) -> Result<Vec<Question>, MigrateError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MigrateError::FileMissing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(MigrateError::FileUnreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let raw: Vec<Value> =
        serde_json::from_str(&text).map_err(|source| MigrateError::ParseFailure {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), records = raw.len(), "template parsed");

    raw.into_iter()
        .enumerate()
        .map(|(i, value)| question_from_value(i + 1, value))
        .collect()
}

fn question_from_value(index: usize, value: Value) -> Result<Question, MigrateError> {
    let object = value.as_object().ok_or_else(|| MigrateError::InvalidRecord {
        index,
        problem: "is not a JSON object".to_string(),
    })?;
    for field in [STAGE_FIELD, NUMBER_FIELD] {
        if !object.contains_key(field) {
            return Err(MigrateError::missing_field(index, field));
        }
    }
    serde_json::from_value(value).map_err(|e| MigrateError::InvalidRecord {
        index,
        problem: e.to_string(),
    })
}
