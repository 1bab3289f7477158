use crate::domain::model::RunReport;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn report_path(&self) -> Option<&str>;
    fn workers(&self) -> usize;
    fn print_lines(&self) -> bool;
}

/// Line number (1-based) paired with the undecoded bytes of that line.
pub type InputLine = (usize, Vec<u8>);

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InputLine>>;
    async fn transform(&self, lines: Vec<InputLine>) -> Result<RunReport>;
    async fn load(&self, report: &RunReport) -> Result<Option<String>>;
}
