use serde_json::Value;

use crate::config::PaginationConfig;

const DEFAULT_COUNT_FIELD: &str = "count";
const DEFAULT_DATA_FIELD: &str = "data";

/// Result set handed to the pagination engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope {
    /// Every record of the result; the count is the sequence length.
    Records(Vec<Value>),
    /// One page of records plus the total record count across all pages.
    Counted { count: i64, data: Value },
}

impl ResultEnvelope {
    /// Interpret a decoded response body.
    ///
    /// Objects are read through the configured count/data field names,
    /// falling back to literal `count`/`data`. An object without any count
    /// takes the length of its data array.
    #[must_use]
    pub fn from_json(value: Value, config: &PaginationConfig) -> Self {
        match value {
            Value::Array(records) => ResultEnvelope::Records(records),
            Value::Object(mut map) => {
                let data = map
                    .remove(&config.data_field)
                    .or_else(|| map.remove(DEFAULT_DATA_FIELD))
                    .unwrap_or(Value::Null);
                let count = map
                    .get(&config.count_field)
                    .or_else(|| map.get(DEFAULT_COUNT_FIELD))
                    .and_then(count_value)
                    .unwrap_or_else(|| data_len(&data));
                ResultEnvelope::Counted { count, data }
            }
            other => {
                tracing::debug!(kind = %json_kind(&other), "result envelope carries no records");
                ResultEnvelope::Counted {
                    count: 0,
                    data: Value::Null,
                }
            }
        }
    }

    #[must_use]
    pub fn count(&self) -> i64 {
        match self {
            ResultEnvelope::Records(records) => i64::try_from(records.len()).unwrap_or(i64::MAX),
            ResultEnvelope::Counted { count, .. } => *count,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Value {
        match self {
            ResultEnvelope::Records(records) => Value::Array(records),
            ResultEnvelope::Counted { data, .. } => data,
        }
    }
}

fn count_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn data_len(data: &Value) -> i64 {
    data.as_array()
        .map_or(0, |records| i64::try_from(records.len()).unwrap_or(i64::MAX))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
