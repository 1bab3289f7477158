use crate::core::address::apply_address;
use crate::core::nulls::validate_nonnull;
use crate::core::parser::parse_record;
use crate::core::schema::{validate_schema, RequiredFieldSet, REGISTERED_NAME, VEHICLE_FIELDS};
use crate::domain::model::{NameSource, Outcome, PipelineStats, RawRecord, RunReport, ValidatedRecord};
use crate::utils::error::{RecordError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Runs each record through schema, null, name and address checks, stopping
/// at the first failure.
#[derive(Debug, Clone, Copy)]
pub struct Coordinator {
    fields: RequiredFieldSet,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(VEHICLE_FIELDS)
    }
}

impl Coordinator {
    pub fn new(fields: RequiredFieldSet) -> Self {
        Self { fields }
    }

    pub fn validate(&self, mut record: RawRecord) -> std::result::Result<ValidatedRecord, RecordError> {
        validate_schema(&record, &self.fields)?;

        let deferred = validate_nonnull(&record, &self.fields)?;
        let mut name_source = NameSource::Provided;
        for pending in deferred {
            let value = (pending.resolver)(&record)?;
            record
                .data
                .insert(pending.field.to_string(), Value::String(value));
            if pending.field == REGISTERED_NAME {
                name_source = NameSource::SalesHistory;
            }
        }

        apply_address(&mut record)?;

        Ok(ValidatedRecord {
            data: record.data,
            name_source,
        })
    }

    /// 先以 UTF-8 解碼；無法解碼的行視為解析錯誤，不做替換字元的猜測。
    pub fn process_line(&self, line_number: usize, raw: impl AsRef<[u8]>) -> Outcome {
        let raw = raw.as_ref();
        let result = std::str::from_utf8(raw)
            .map_err(|e| RecordError::Parse(format!("line is not valid UTF-8: {}", e)))
            .and_then(parse_record)
            .and_then(|record| self.validate(record));

        match result {
            Ok(record) => Outcome::Accepted {
                line_number,
                record,
            },
            Err(error) => Outcome::Rejected {
                line_number,
                error,
                raw: String::from_utf8_lossy(raw).trim_end().to_string(),
            },
        }
    }

    /// Lazily maps input lines to outcomes, counting each one into `stats`.
    pub fn outcomes<'a, I, T>(&'a self, lines: I, stats: &'a mut PipelineStats) -> Outcomes<'a, I::IntoIter>
    where
        I: IntoIterator<Item = (usize, T)>,
        T: AsRef<[u8]>,
    {
        Outcomes {
            coordinator: self,
            lines: lines.into_iter(),
            stats,
        }
    }

    pub fn run<I, T>(&self, lines: I, mut stats: PipelineStats) -> RunReport
    where
        I: IntoIterator<Item = (usize, T)>,
        T: AsRef<[u8]>,
    {
        let outcomes = self.outcomes(lines, &mut stats).collect();
        RunReport { outcomes, stats }
    }

    /// 以固定數量的 worker 平行驗證，輸出仍依原始行號排序。
    pub async fn run_concurrent<T>(
        &self,
        lines: Vec<(usize, T)>,
        workers: usize,
        mut stats: PipelineStats,
    ) -> Result<RunReport>
    where
        T: AsRef<[u8]> + Send + 'static,
    {
        let workers = workers.max(1);
        let total = lines.len();
        let (input_tx, input_rx) = mpsc::channel::<(usize, (usize, T))>(workers * 4);
        let (output_tx, mut output_rx) = mpsc::channel::<(usize, Outcome)>(workers * 4);
        let input_rx = Arc::new(Mutex::new(input_rx));

        let feeder = tokio::spawn(async move {
            for entry in lines.into_iter().enumerate() {
                if input_tx.send(entry).await.is_err() {
                    break;
                }
            }
        });

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let coordinator = *self;
            let input_rx = Arc::clone(&input_rx);
            let output_tx = output_tx.clone();
            handles.push(tokio::spawn(async move {
                let mut processed = 0usize;
                loop {
                    let next = input_rx.lock().await.recv().await;
                    let Some((seq, (line_number, raw))) = next else {
                        break;
                    };
                    let outcome = coordinator.process_line(line_number, raw);
                    processed += 1;
                    if output_tx.send((seq, outcome)).await.is_err() {
                        break;
                    }
                }
                tracing::debug!("Worker {} processed {} lines", worker_id, processed);
            }));
        }
        drop(output_tx);

        // 依序號重組；統計只在這裡累加
        let mut pending = BTreeMap::new();
        let mut outcomes = Vec::with_capacity(total);
        while let Some((seq, outcome)) = output_rx.recv().await {
            pending.insert(seq, outcome);
            while let Some(outcome) = pending.remove(&outcomes.len()) {
                stats.record(&outcome);
                outcomes.push(outcome);
            }
        }

        feeder.await?;
        for handle in handles {
            handle.await?;
        }

        Ok(RunReport { outcomes, stats })
    }
}

pub struct Outcomes<'a, I> {
    coordinator: &'a Coordinator,
    lines: I,
    stats: &'a mut PipelineStats,
}

impl<I, T> Iterator for Outcomes<'_, I>
where
    I: Iterator<Item = (usize, T)>,
    T: AsRef<[u8]>,
{
    type Item = Outcome;

    fn next(&mut self) -> Option<Outcome> {
        let (line_number, raw) = self.lines.next()?;
        let outcome = self.coordinator.process_line(line_number, raw);
        self.stats.record(&outcome);
        Some(outcome)
    }
}
