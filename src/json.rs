use anyhow::Result;
use ndarray::Array1;
use serde_json::{Value, json};

use crate::solver::{
    driver::{SolveResult, SolveStatus},
    tableau::TableauState,
};

/// One snapshot as a JSON object: nested row arrays for the matrix, `null`
/// for absent annotations and for infinite ratio entries.
pub fn state_to_value(state: &TableauState) -> Value {
    json!({
        "iteration": state.iteration,
        "matrix": matrix_value(state),
        "delta": vector_value(&state.delta),
        "rhs": vector_value(&state.rhs),
        "objective_offset": state.objective_offset,
        "nonbasic": state.nonbasic_names,
        "basic": state.basic_names,
        "entering": index_value(state.entering),
        "leaving": index_value(state.leaving),
        "ratios": ratios_value(state),
        "message": state.message,
    })
}

/// A whole solve as a JSON object, history included, for dashboard front
/// ends. Key order and map contents are deterministic.
pub fn result_to_value(result: &SolveResult) -> Value {
    json!({
        "status": status_label(result.status),
        "objective_value": result.objective_value,
        "variable_values": variable_values_value(result),
        "pivots": result.pivots_performed(),
        "history": result.history.iter().map(state_to_value).collect::<Vec<_>>(),
    })
}

/// Pretty-printed rendition of [`result_to_value`].
pub fn result_to_string(result: &SolveResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&result_to_value(result))?)
}

fn status_label(status: SolveStatus) -> &'static str {
    match status {
        SolveStatus::Optimal => "optimal",
        SolveStatus::Unbounded => "unbounded",
        SolveStatus::IterationLimit => "iteration_limit",
    }
}

fn matrix_value(state: &TableauState) -> Value {
    Value::Array(
        state
            .matrix
            .rows()
            .into_iter()
            .map(|row| Value::Array(row.iter().map(|&v| json!(v)).collect()))
            .collect(),
    )
}

fn vector_value(vector: &Array1<f64>) -> Value {
    Value::Array(vector.iter().map(|&v| json!(v)).collect())
}

fn index_value(index: Option<usize>) -> Value {
    match index {
        Some(i) => json!(i),
        None => Value::Null,
    }
}

fn ratios_value(state: &TableauState) -> Value {
    match &state.ratios {
        Some(ratios) => Value::Array(
            ratios
                .iter()
                .map(|&r| if r.is_finite() { json!(r) } else { Value::Null })
                .collect(),
        ),
        None => Value::Null,
    }
}

fn variable_values_value(result: &SolveResult) -> Value {
    match &result.variable_values {
        Some(values) => Value::Object(
            values
                .iter()
                .map(|(name, &value)| (name.clone(), json!(value)))
                .collect(),
        ),
        None => Value::Null,
    }
}
