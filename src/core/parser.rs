use crate::domain::model::RawRecord;
use crate::utils::error::RecordError;
use serde_json::Value;

/// 將一行文字解析為 JSON 物件記錄。非物件的 JSON 也視為解析錯誤。
pub fn parse_record(line: &str) -> Result<RawRecord, RecordError> {
    let value: Value =
        serde_json::from_str(line.trim()).map_err(|e| RecordError::Parse(e.to_string()))?;

    match value {
        Value::Object(data) => Ok(RawRecord::new(data)),
        other => Err(RecordError::Parse(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
