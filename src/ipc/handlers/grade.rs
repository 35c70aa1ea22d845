use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_name, get_raw_scores, result_json, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::{json, Value};

fn handle_validate(req: &Request) -> Result<Value, HandlerErr> {
    let name = get_name(&req.params)?;
    let raw = get_raw_scores(&req.params)?;
    let input = calc::validate(&name, &raw)?;
    Ok(json!({ "name": input.name, "scores": input.scores }))
}

/// The "Calculate" button: validate the whole form, then compute.
fn handle_calculate(req: &Request) -> Result<Value, HandlerErr> {
    let name = get_name(&req.params)?;
    let raw = get_raw_scores(&req.params)?;
    let input = calc::validate(&name, &raw)?;
    let result = calc::compute(&input.scores);
    let mut out = result_json(&result);
    out["name"] = json!(input.name);
    out["scores"] = json!(input.scores);
    Ok(out)
}

fn handle_compute(req: &Request) -> Result<Value, HandlerErr> {
    let raw = get_raw_scores(&req.params)?;
    let scores = calc::validate_scores(&raw)?;
    Ok(result_json(&calc::compute(&scores)))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<Value> {
    let res = match req.method.as_str() {
        "grade.validate" => handle_validate(req),
        "grade.calculate" => handle_calculate(req),
        "grade.compute" => handle_compute(req),
        _ => return None,
    };
    Some(match res {
        Ok(v) => ok(&req.id, v),
        Err(e) => {
            tracing::debug!(method = %req.method, code = e.code, "input rejected");
            e.response(&req.id)
        }
    })
}
