use crate::core::schema::{NullPolicy, RequiredFieldSet, Resolver};
use crate::domain::model::RawRecord;
use crate::utils::error::RecordError;

/// A null field whose value must come from its resolver before acceptance.
#[derive(Debug, Clone, Copy)]
pub struct Deferred {
    pub field: &'static str,
    pub resolver: Resolver,
}

/// Rejects the first null field in declared order. Fields with a resolver are
/// returned as deferred instead. Absent fields count as null; schema presence
/// is normally checked first.
pub fn validate_nonnull(
    record: &RawRecord,
    fields: &RequiredFieldSet,
) -> Result<Vec<Deferred>, RecordError> {
    let mut deferred = Vec::new();

    for rule in fields.rules() {
        let is_null = record.get(rule.name).map_or(true, |value| value.is_null());
        if !is_null {
            continue;
        }
        match rule.null_policy {
            NullPolicy::Reject => return Err(RecordError::NullField(rule.name.to_string())),
            NullPolicy::Resolve(resolver) => deferred.push(Deferred {
                field: rule.name,
                resolver,
            }),
        }
    }

    Ok(deferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::VEHICLE_FIELDS;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        match value {
            serde_json::Value::Object(data) => RawRecord::from(data),
            _ => panic!("test record must be an object"),
        }
    }

    fn full() -> serde_json::Value {
        json!({
            "license_plate": "ABC123",
            "make_model": "Honda Civic",
            "year": 2018,
            "registered_name": "Ann Lee",
            "registered_address": "1 A St\nBoise, ID 83702",
            "registered_date": "2020-01-01"
        })
    }

    #[test]
    fn test_no_nulls() {
        let deferred = validate_nonnull(&record(full()), &VEHICLE_FIELDS).unwrap();
        assert!(deferred.is_empty());
    }

    #[test]
    fn test_first_null_field_in_declared_order() {
        let mut value = full();
        value["registered_date"] = json!(null);
        value["make_model"] = json!(null);
        assert_eq!(
            validate_nonnull(&record(value), &VEHICLE_FIELDS).unwrap_err(),
            RecordError::NullField("make_model".to_string())
        );
    }

    #[test]
    fn test_null_registered_name_is_deferred() {
        let mut value = full();
        value["registered_name"] = json!(null);
        let deferred = validate_nonnull(&record(value), &VEHICLE_FIELDS).unwrap();
        assert_eq!(deferred.len(), 1);
        assert_eq!(deferred[0].field, "registered_name");
    }

    #[test]
    fn test_later_null_still_rejects_after_deferral() {
        let mut value = full();
        value["registered_name"] = json!(null);
        value["registered_date"] = json!(null);
        assert_eq!(
            validate_nonnull(&record(value), &VEHICLE_FIELDS).unwrap_err(),
            RecordError::NullField("registered_date".to_string())
        );
    }

    #[test]
    fn test_empty_string_is_not_null() {
        let mut value = full();
        value["license_plate"] = json!("");
        assert!(validate_nonnull(&record(value), &VEHICLE_FIELDS).is_ok());
    }
}
