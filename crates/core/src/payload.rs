//! Id resolution from handler response payloads.

use serde_json::{Number, Value};

/// Resolve the id a type purge is scoped to.
///
/// Returns `None` when the payload is not an object, has no entry under
/// `id_reference`, or the entry is falsy (`null`, `false`, `0`, `""`).
pub fn resolve_id(payload: &Value, id_reference: &str) -> Option<String> {
    let value = payload.as_object()?.get(id_reference)?;

    if !is_truthy(value) {
        return None;
    }

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(render_number(n)),
        other => Some(other.to_string()),
    }
}

/// Integral floats render without a fraction (`1.0` becomes `1`).
fn render_number(n: &Number) -> String {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
