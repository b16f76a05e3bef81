use serde_json::{Map, Value};

/// Normalizes the envelope of a CourtListener response.
///
/// Paginated list responses (objects with a `results` array) get a trustworthy
/// `count`: a finite non-negative number is kept, a numeric string is parsed,
/// anything else falls back to the number of results. `next` and `previous`
/// become a string or `null`. Every other value is returned untouched.
pub fn normalize(value: Value) -> Value {
    let Value::Object(mut object) = value else {
        return value;
    };

    let Some(result_count) = object.get("results").and_then(Value::as_array).map(Vec::len) else {
        return Value::Object(object);
    };

    let count = normalize_count(object.get("count"), result_count);
    object.insert("count".to_string(), count);

    normalize_link(&mut object, "next");
    normalize_link(&mut object, "previous");

    Value::Object(object)
}

fn normalize_count(count: Option<&Value>, fallback: usize) -> Value {
    match count {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f.is_finite() && f >= 0.0) => Value::Number(n.clone()),
        Some(Value::String(s)) => parse_count(s.trim()).unwrap_or_else(|| Value::from(fallback)),
        _ => Value::from(fallback),
    }
}

fn parse_count(s: &str) -> Option<Value> {
    if let Ok(n) = s.parse::<u64>() {
        return Some(Value::from(n));
    }

    let f = s.parse::<f64>().ok().filter(|f| f.is_finite() && *f >= 0.0)?;
    serde_json::Number::from_f64(f).map(Value::Number)
}

fn normalize_link(object: &mut Map<String, Value>, key: &str) {
    let link = match object.get(key) {
        Some(Value::String(s)) => Value::String(s.clone()),
        _ => Value::Null,
    };

    object.insert(key.to_string(), link);
}
