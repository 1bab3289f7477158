use crate::core::name_resolver::resolve_name;
use crate::domain::model::RawRecord;
use crate::utils::error::RecordError;

/// Derives a value for a required field that arrived as null.
pub type Resolver = fn(&RawRecord) -> Result<String, RecordError>;

#[derive(Debug, Clone, Copy)]
pub enum NullPolicy {
    Reject,
    Resolve(Resolver),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub null_policy: NullPolicy,
}

impl FieldRule {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            null_policy: NullPolicy::Reject,
        }
    }

    pub const fn resolvable(name: &'static str, resolver: Resolver) -> Self {
        Self {
            name,
            null_policy: NullPolicy::Resolve(resolver),
        }
    }
}

/// 必填欄位表；檢查順序即宣告順序。
#[derive(Debug, Clone, Copy)]
pub struct RequiredFieldSet {
    rules: &'static [FieldRule],
}

impl RequiredFieldSet {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.rules.iter().map(|rule| rule.name)
    }
}

pub const REGISTERED_NAME: &str = "registered_name";
pub const REGISTERED_ADDRESS: &str = "registered_address";

const VEHICLE_RULES: [FieldRule; 6] = [
    FieldRule::required("license_plate"),
    FieldRule::required("make_model"),
    FieldRule::required("year"),
    FieldRule::resolvable(REGISTERED_NAME, resolve_name),
    FieldRule::required(REGISTERED_ADDRESS),
    FieldRule::required("registered_date"),
];

pub const VEHICLE_FIELDS: RequiredFieldSet = RequiredFieldSet::new(&VEHICLE_RULES);

pub fn validate_schema(record: &RawRecord, fields: &RequiredFieldSet) -> Result<(), RecordError> {
    match fields.names().find(|name| !record.contains(name)) {
        Some(missing) => Err(RecordError::MissingField(missing.to_string())),
        None => Ok(()),
    }
}
