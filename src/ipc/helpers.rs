use crate::calc::{GradeResult, ValidationError, SUBJECTS, SUBJECT_COUNT};
use crate::ipc::error::err;
use crate::records::{IndexError, StudentRecord};
use serde_json::{json, Value};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<ValidationError> for HandlerErr {
    fn from(e: ValidationError) -> Self {
        let mut details = e
            .field()
            .zip(e.subject())
            .map(|(field, subject)| json!({ "field": field, "subject": subject }));
        if let Some(d) = details.as_mut() {
            match &e {
                ValidationError::NotNumeric { raw, .. } => d["raw"] = json!(raw),
                ValidationError::OutOfRange { value, .. } => d["value"] = json!(value),
                _ => {}
            }
        }
        HandlerErr {
            code: e.code(),
            message: e.to_string(),
            details,
        }
    }
}

impl From<IndexError> for HandlerErr {
    fn from(e: IndexError) -> Self {
        HandlerErr {
            code: "index_out_of_range",
            message: e.to_string(),
            details: Some(json!({ "index": e.index, "recordCount": e.len })),
        }
    }
}

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Name is passed through untrimmed; blank names are a validation error,
/// not a params error.
pub fn get_name(params: &Value) -> Result<String, HandlerErr> {
    match params.get("name") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(HandlerErr::bad_params("name must be a string")),
    }
}

pub fn get_index(params: &Value) -> Result<usize, HandlerErr> {
    let Some(v) = params.get("index") else {
        return Err(HandlerErr::bad_params("missing index"));
    };
    v.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "index must be a non-negative integer".to_string(),
            details: Some(json!({ "index": v })),
        })
}

/// Mark fields arrive as the front end's raw text. Numbers are accepted and
/// stringified so they go through the same checks; null reads as blank.
pub fn get_raw_scores(params: &Value) -> Result<[String; SUBJECT_COUNT], HandlerErr> {
    let Some(arr) = params.get("scores").and_then(|v| v.as_array()) else {
        return Err(HandlerErr::bad_params("missing scores"));
    };
    if arr.len() != SUBJECT_COUNT {
        return Err(HandlerErr {
            code: "bad_params",
            message: format!("scores must have exactly {} entries", SUBJECT_COUNT),
            details: Some(json!({ "subjects": SUBJECTS, "got": arr.len() })),
        });
    }

    let mut out: [String; SUBJECT_COUNT] = Default::default();
    for (i, v) in arr.iter().enumerate() {
        out[i] = match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Null => String::new(),
            other => {
                return Err(HandlerErr {
                    code: "bad_params",
                    message: format!("scores[{}] must be a string or number", i),
                    details: Some(json!({ "field": i, "value": other })),
                })
            }
        };
    }
    Ok(out)
}

pub fn result_json(r: &GradeResult) -> Value {
    json!({
        "total": r.total,
        "maxTotal": r.max_total,
        "percentage": r.percentage,
        "percentageText": r.percentage_2dp(),
        "letter": r.letter,
        "tier": r.tier,
        "tierColor": r.tier.color(),
        "labels": {
            "total": r.total_label(),
            "percentage": r.percentage_label(),
            "grade": r.grade_label(),
        }
    })
}

pub fn record_json(r: &StudentRecord) -> Value {
    json!({
        "recordId": r.record_id,
        "name": r.name,
        "scores": r.scores,
        "total": r.total,
        "percentage": r.percentage,
        "percentageText": r.percentage_2dp(),
        "letter": r.letter,
    })
}
