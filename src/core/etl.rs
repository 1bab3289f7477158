use crate::core::{Pipeline, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting ETL process...");

        // Extract
        let lines = self.pipeline.extract().await?;
        tracing::info!("Extracted {} lines", lines.len());
        self.monitor.log_stats("extract");

        // Transform
        let report = self.pipeline.transform(lines).await?;
        tracing::info!("Read {} rows", report.stats.lines_read);
        tracing::info!(
            "OK rows: {:04}, Rejected rows: {:04}",
            report.stats.accepted,
            report.stats.rejected
        );
        self.monitor.log_stats("transform");

        // Load
        if let Some(path) = self.pipeline.load(&report).await? {
            tracing::info!("Reports saved to: {}", path);
        }
        self.monitor.log_final_stats();

        Ok(report)
    }
}
