use crate::calc::{self, Tier};
use crate::export;
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_index, get_name, get_raw_scores, get_required_str, record_json, result_json, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::records::StudentRecord;
use serde_json::{json, Value};

// Validates and computes before anything touches the table.
fn build_record(params: &Value) -> Result<(StudentRecord, calc::GradeResult), HandlerErr> {
    let name = get_name(params)?;
    let raw = get_raw_scores(params)?;
    let input = calc::validate(&name, &raw)?;
    let result = calc::compute(&input.scores);
    Ok((StudentRecord::new(input, &result), result))
}

fn handle_add(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let (record, result) = build_record(&req.params)?;
    let index = state.table.append(record);
    let added = state.table.get(index)?;
    tracing::info!(index, name = %added.name, letter = %added.letter, "row added");
    Ok(json!({
        "index": index,
        "record": record_json(added),
        "result": result_json(&result),
        "recordCount": state.table.len(),
        "message": "Entry added to table."
    }))
}

fn handle_update(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let index = get_index(&req.params)?;
    // Bounds first so a bad row reports index_out_of_range even with a bad form.
    state.table.get(index)?;
    let (record, result) = build_record(&req.params)?;
    let updated = state.table.update_at(index, record)?;
    tracing::info!(index, name = %updated.name, "row replaced");
    Ok(json!({
        "index": index,
        "record": record_json(updated),
        "result": result_json(&result),
    }))
}

fn handle_remove(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let index = get_index(&req.params)?;
    let removed = state.table.remove_at(index)?;
    tracing::info!(index, name = %removed.name, "row removed");
    Ok(json!({
        "removed": record_json(&removed),
        "recordCount": state.table.len(),
    }))
}

fn handle_get(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let index = get_index(&req.params)?;
    let record = state.table.get(index)?;
    Ok(json!({ "index": index, "record": record_json(record) }))
}

/// Double-click reload: the form gets the stored values back as text, and
/// the result panel shows the stored result without recomputing.
fn handle_load_row(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let index = get_index(&req.params)?;
    let r = state.table.get(index)?;
    let tier: Tier = r.tier();
    Ok(json!({
        "index": index,
        "recordId": r.record_id,
        "name": r.name,
        "scores": r.scores.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "labels": {
            "total": format!("Total: {}", r.total),
            "percentage": format!("Percentage: {}", r.percentage_2dp()),
            "grade": format!("Grade: {}", r.letter),
        },
        "tier": tier,
        "tierColor": tier.color(),
    }))
}

fn handle_list(state: &mut AppState) -> Value {
    let records: Vec<Value> = state.table.records().iter().map(record_json).collect();
    json!({
        "records": records,
        "recordCount": state.table.len(),
    })
}

fn handle_export_csv(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let out_path = get_required_str(&req.params, "outPath")?;
    if out_path.trim().is_empty() {
        return Err(HandlerErr::bad_params("outPath must not be empty"));
    }
    if state.table.is_empty() {
        return Err(HandlerErr {
            code: "empty_table",
            message: "Table is empty. Nothing to export.".to_string(),
            details: None,
        });
    }

    let path = state.config.resolve_export_path(&out_path);
    let csv = state.table.to_csv();
    let summary = export::write_csv(&path, &csv).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "export failed");
        HandlerErr {
            code: "export_failed",
            message: format!("Failed to export: {e:#}"),
            details: Some(json!({ "path": path.to_string_lossy() })),
        }
    })?;

    tracing::info!(
        path = %summary.path.display(),
        rows = state.table.len(),
        bytes = summary.bytes_written,
        "csv exported"
    );
    Ok(json!({
        "path": summary.path.to_string_lossy(),
        "rowsExported": state.table.len(),
        "bytesWritten": summary.bytes_written,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let res = match req.method.as_str() {
        "table.add" => handle_add(state, req),
        "table.update" => handle_update(state, req),
        "table.remove" => handle_remove(state, req),
        "table.get" => handle_get(state, req),
        "table.loadRow" => handle_load_row(state, req),
        "table.list" => Ok(handle_list(state)),
        "table.toCsv" => Ok(json!({ "csv": state.table.to_csv() })),
        "table.exportCsv" => handle_export_csv(state, req),
        _ => return None,
    };
    Some(match res {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
