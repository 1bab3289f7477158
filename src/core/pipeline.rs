use crate::core::coordinator::Coordinator;
use crate::core::{ConfigProvider, InputLine, Outcome, Pipeline, PipelineStats, RunReport, Storage};
use crate::utils::error::{EtlError, Result};

pub const REJECTS_FILE: &str = "rejects.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// 車籍資料 ETL：讀取 NDJSON、驗證每一行、輸出拒絕報表。
pub struct VehiclePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    coordinator: Coordinator,
}

impl<S: Storage, C: ConfigProvider> VehiclePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            coordinator: Coordinator::default(),
        }
    }

    fn log_outcome(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Accepted {
                line_number,
                record,
            } => {
                if self.config.print_lines() {
                    let rendered = serde_json::Value::Object(record.data.clone());
                    tracing::info!("[{:04}] [OK]: {}", line_number, rendered);
                }
            }
            Outcome::Rejected {
                line_number,
                error,
                raw,
            } => {
                tracing::warn!("[{:04}][ERROR:] {}, [DATA]: {}", line_number, error, raw);
            }
        }
    }

    /// 依換行切分位元組但不解碼；解碼交給 coordinator 逐行處理。
    fn split_lines(bytes: &[u8]) -> Vec<InputLine> {
        if bytes.is_empty() {
            return Vec::new();
        }
        let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);

        body.split(|b| *b == b'\n')
            .enumerate()
            .map(|(index, line)| {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                (index + 1, line.to_vec())
            })
            .collect()
    }

    fn rejects_csv(report: &RunReport) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["line_number", "kind", "reason"])?;
        for outcome in report.rejected() {
            if let Outcome::Rejected {
                line_number, error, ..
            } = outcome
            {
                writer.write_record([
                    line_number.to_string().as_str(),
                    error.kind(),
                    error.to_string().as_str(),
                ])?;
            }
        }
        writer
            .into_inner()
            .map_err(|e| EtlError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for VehiclePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<InputLine>> {
        tracing::debug!("Reading input file: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path()).await?;
        Ok(Self::split_lines(&bytes))
    }

    async fn transform(&self, lines: Vec<InputLine>) -> Result<RunReport> {
        let workers = self.config.workers();
        let report = if workers > 1 {
            tracing::debug!("Validating with {} workers", workers);
            self.coordinator
                .run_concurrent(lines, workers, PipelineStats::new())
                .await?
        } else {
            self.coordinator.run(lines, PipelineStats::new())
        };

        for outcome in &report.outcomes {
            self.log_outcome(outcome);
        }

        Ok(report)
    }

    async fn load(&self, report: &RunReport) -> Result<Option<String>> {
        let Some(report_path) = self.config.report_path() else {
            tracing::debug!("No report path configured, skipping report files");
            return Ok(None);
        };

        let rejects = Self::rejects_csv(report)?;
        self.storage
            .write_file(&format!("{}/{}", report_path, REJECTS_FILE), &rejects)
            .await?;

        let summary = serde_json::to_vec_pretty(&report.stats)?;
        self.storage
            .write_file(&format!("{}/{}", report_path, SUMMARY_FILE), &summary)
            .await?;

        tracing::debug!(
            "Wrote {} rejections and summary to {}",
            report.stats.rejected,
            report_path
        );
        Ok(Some(report_path.to_string()))
    }
}
