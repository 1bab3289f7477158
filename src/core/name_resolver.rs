use crate::domain::model::{RawRecord, SalesRecord};
use crate::utils::error::RecordError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const SALES_FIELD: &str = "sales";

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// 從銷售紀錄找出最近一次交易的買方名稱。同日期時取列表中較早出現者。
pub fn resolve_name(record: &RawRecord) -> Result<String, RecordError> {
    let sales = sales_history(record)?;

    let mut latest: Option<(NaiveDateTime, SalesRecord)> = None;
    for (index, sale) in sales.into_iter().enumerate() {
        let date = parse_sale_date(&sale.sale_date).ok_or_else(|| {
            RecordError::InvalidSalesHistory(format!(
                "entry {} has unrecognised sale_date '{}'",
                index, sale.sale_date
            ))
        })?;
        // 嚴格大於，確保同日期時保留第一筆
        if latest.as_ref().map_or(true, |(best, _)| date > *best) {
            latest = Some((date, sale));
        }
    }

    latest
        .map(|(_, sale)| sale.name)
        .ok_or(RecordError::NoSalesHistory)
}

/// Reads the embedded sales list. Absent, null and empty lists are all
/// "no history"; anything else that is not a list of `{name, sale_date}`
/// strings is malformed.
pub fn sales_history(record: &RawRecord) -> Result<Vec<SalesRecord>, RecordError> {
    let entries = match record.get(SALES_FIELD) {
        None | Some(Value::Null) => return Err(RecordError::NoSalesHistory),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(RecordError::InvalidSalesHistory(format!(
                "'{}' must be a list",
                SALES_FIELD
            )))
        }
    };

    if entries.is_empty() {
        return Err(RecordError::NoSalesHistory);
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<SalesRecord>(entry.clone()).map_err(|e| {
                RecordError::InvalidSalesHistory(format!("entry {}: {}", index, e))
            })
        })
        .collect()
}

pub fn parse_sale_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        match value {
            serde_json::Value::Object(data) => RawRecord::from(data),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_latest_sale_wins() {
        let rec = record(json!({
            "registered_name": null,
            "sales": [
                {"name": "First Owner", "sale_date": "2015-03-01"},
                {"name": "Current Owner", "sale_date": "2021-07-15"},
                {"name": "Second Owner", "sale_date": "2018-11-30"}
            ]
        }));
        assert_eq!(resolve_name(&rec).unwrap(), "Current Owner");
    }

    #[test]
    fn test_tie_on_latest_date_keeps_first_listed() {
        let rec = record(json!({
            "sales": [
                {"name": "Old", "sale_date": "2010-01-01"},
                {"name": "Alice", "sale_date": "2022-05-05"},
                {"name": "Bob", "sale_date": "2022-05-05"}
            ]
        }));
        assert_eq!(resolve_name(&rec).unwrap(), "Alice");
    }

    #[test]
    fn test_mixed_date_formats_compare_chronologically() {
        let rec = record(json!({
            "sales": [
                {"name": "Morning", "sale_date": "2020-06-01T08:00:00Z"},
                {"name": "Evening", "sale_date": "2020-06-01T20:30:00"},
                {"name": "Earlier", "sale_date": "05/31/2020"}
            ]
        }));
        assert_eq!(resolve_name(&rec).unwrap(), "Evening");
    }

    #[test]
    fn test_absent_null_or_empty_history() {
        for value in [json!({}), json!({"sales": null}), json!({"sales": []})] {
            assert_eq!(
                resolve_name(&record(value)),
                Err(RecordError::NoSalesHistory)
            );
        }
    }

    #[test]
    fn test_malformed_history_is_rejected() {
        let not_a_list = record(json!({"sales": {"name": "A", "sale_date": "2020-01-01"}}));
        assert!(matches!(
            resolve_name(&not_a_list),
            Err(RecordError::InvalidSalesHistory(_))
        ));

        let missing_name = record(json!({"sales": [{"sale_date": "2020-01-01"}]}));
        assert!(matches!(
            resolve_name(&missing_name),
            Err(RecordError::InvalidSalesHistory(_))
        ));

        let bad_date = record(json!({"sales": [{"name": "A", "sale_date": "yesterday"}]}));
        assert_eq!(
            resolve_name(&bad_date),
            Err(RecordError::InvalidSalesHistory(
                "entry 0 has unrecognised sale_date 'yesterday'".to_string()
            ))
        );
    }
}
