use crate::core::schema::REGISTERED_ADDRESS;
use crate::domain::model::{Address, RawRecord};
use crate::utils::error::RecordError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// 只錨定字串開頭；符合後的多餘內容會被忽略
static US_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<street_address>[a-zA-Z0-9 .]+)\n(?P<city>[a-zA-Z0-9 ]+), (?P<state>[A-Z]{2}) (?P<zip>[0-9]{5})",
    )
    .expect("address pattern compiles")
});

/// Splits `street\nCity, ST 12345` into its parts.
pub fn parse_address(text: &str) -> Result<Address, RecordError> {
    let caps = US_ADDRESS
        .captures(text)
        .ok_or_else(|| RecordError::InvalidAddress(normalize_for_display(text)))?;

    Ok(Address {
        street_address: caps["street_address"].to_string(),
        city: caps["city"].to_string(),
        state: caps["state"].to_string(),
        zip: caps["zip"].to_string(),
    })
}

/// Replaces `registered_address` with the four parsed address fields.
pub fn apply_address(record: &mut RawRecord) -> Result<Address, RecordError> {
    let address = match record.get(REGISTERED_ADDRESS) {
        Some(Value::String(text)) => parse_address(text)?,
        Some(other) => return Err(RecordError::InvalidAddress(other.to_string())),
        None => return Err(RecordError::MissingField(REGISTERED_ADDRESS.to_string())),
    };

    record.data.shift_remove(REGISTERED_ADDRESS);
    record.data.insert(
        "street_address".to_string(),
        Value::String(address.street_address.clone()),
    );
    record
        .data
        .insert("city".to_string(), Value::String(address.city.clone()));
    record
        .data
        .insert("state".to_string(), Value::String(address.state.clone()));
    record
        .data
        .insert("zip".to_string(), Value::String(address.zip.clone()));

    Ok(address)
}

fn normalize_for_display(text: &str) -> String {
    text.trim().replace('\n', ", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_two_line_address() {
        let address = parse_address("123 Main St\nSpringfield, IL 62704").unwrap();
        assert_eq!(
            address,
            Address {
                street_address: "123 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62704".to_string(),
            }
        );
    }

    #[test]
    fn test_street_may_contain_periods() {
        let address = parse_address("42 N. Oak Ave.\nSalt Lake City, UT 84101").unwrap();
        assert_eq!(address.street_address, "42 N. Oak Ave.");
        assert_eq!(address.city, "Salt Lake City");
    }

    #[test]
    fn test_trailing_content_is_ignored() {
        let address = parse_address("9 Elm Rd\nDover, DE 19901-1234 USA").unwrap();
        assert_eq!(address.zip, "19901");
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        assert!(parse_address("#9 Elm Rd\nDover, DE 19901").is_err());
    }

    #[test]
    fn test_single_line_address_is_rejected() {
        assert_eq!(
            parse_address("123 Main St, Springfield IL"),
            Err(RecordError::InvalidAddress(
                "123 Main St, Springfield IL".to_string()
            ))
        );
    }

    #[test]
    fn test_error_text_is_trimmed_and_flattened() {
        assert_eq!(
            parse_address("  1 Bay St\nAustin, tx 73301\n"),
            Err(RecordError::InvalidAddress(
                "1 Bay St, Austin, tx 73301".to_string()
            ))
        );
    }

    #[test]
    fn test_state_and_zip_lengths_are_exact() {
        assert!(parse_address("1 Bay St\nAustin, TEX 73301").is_err());
        assert!(parse_address("1 Bay St\nAustin, TX 7330").is_err());
    }

    #[test]
    fn test_apply_replaces_raw_field() {
        let mut record = match json!({
            "license_plate": "ABC",
            "registered_address": "123 Main St\nSpringfield, IL 62704",
            "registered_date": "2020-01-01"
        }) {
            Value::Object(data) => RawRecord::from(data),
            _ => unreachable!(),
        };

        apply_address(&mut record).unwrap();

        assert!(!record.contains("registered_address"));
        let keys: Vec<&str> = record.data.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "license_plate",
                "registered_date",
                "street_address",
                "city",
                "state",
                "zip"
            ]
        );
        assert_eq!(record.get("zip").unwrap(), "62704");
    }

    #[test]
    fn test_apply_rejects_non_text_address() {
        let mut record = match json!({"registered_address": 12345}) {
            Value::Object(data) => RawRecord::from(data),
            _ => unreachable!(),
        };
        assert_eq!(
            apply_address(&mut record),
            Err(RecordError::InvalidAddress("12345".to_string()))
        );
        assert!(record.contains("registered_address"));
    }
}
