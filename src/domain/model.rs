use crate::utils::error::RecordError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 一行輸入解析後的原始記錄，保留欄位順序。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    pub data: Map<String, Value>,
}

impl RawRecord {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

/// One `{name, sale_date}` entry of a record's sales history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub name: String,
    pub sale_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameSource {
    #[default]
    Provided,
    SalesHistory,
}

/// A record that passed every validation step. Serializes as the plain
/// normalized JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedRecord {
    pub data: Map<String, Value>,
    #[serde(skip)]
    pub name_source: NameSource,
}

impl ValidatedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn registered_name(&self) -> Option<&str> {
        self.data.get("registered_name").and_then(Value::as_str)
    }

    pub fn address(&self) -> Option<Address> {
        let text = |field: &str| self.data.get(field).and_then(Value::as_str).map(str::to_string);
        Some(Address {
            street_address: text("street_address")?,
            city: text("city")?,
            state: text("state")?,
            zip: text("zip")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accepted {
        line_number: usize,
        record: ValidatedRecord,
    },
    Rejected {
        line_number: usize,
        error: RecordError,
        raw: String,
    },
}

impl Outcome {
    pub fn line_number(&self) -> usize {
        match self {
            Outcome::Accepted { line_number, .. } | Outcome::Rejected { line_number, .. } => {
                *line_number
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }

    /// 拒絕原因文字；接受的記錄回傳 None。
    pub fn reason(&self) -> Option<String> {
        match self {
            Outcome::Accepted { .. } => None,
            Outcome::Rejected { error, .. } => Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub lines_read: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub names_resolved: usize,
    pub rejections: BTreeMap<String, usize>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one input line and its verdict.
    pub fn record(&mut self, outcome: &Outcome) {
        self.lines_read += 1;
        match outcome {
            Outcome::Accepted { record, .. } => {
                self.accepted += 1;
                if record.name_source == NameSource::SalesHistory {
                    self.names_resolved += 1;
                }
            }
            Outcome::Rejected { error, .. } => {
                self.rejected += 1;
                *self.rejections.entry(error.kind().to_string()).or_insert(0) += 1;
            }
        }
    }
}

/// Outcomes of one run, in input order, with the stats accumulated over them.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<Outcome>,
    pub stats: PipelineStats,
}

impl RunReport {
    pub fn rejected(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_accepted())
    }
}
