use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_URL: &str =
    "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/adib_csv-NnJWhpVRJafi03oUOvKnAwYIuMmOzx.csv";
pub const DEFAULT_BANK_CODE: &str = "ADIB";
pub const DEFAULT_REPORTING_YEAR: i32 = 2024;

/// Where the line-item CSV comes from and how its rows are labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderConfig {
    pub source_url: String,
    pub bank_code: String,
    /// Year of the `q1_t` column; history labels are derived from it.
    pub reporting_year: i32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            bank_code: DEFAULT_BANK_CODE.to_string(),
            reporting_year: DEFAULT_REPORTING_YEAR,
        }
    }
}

impl LoaderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Anything that can produce the raw line-item CSV text.
pub trait CsvSource: Send + Sync {
    fn fetch_csv(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Serves a fixed CSV body. Useful for fixtures and offline runs.
#[derive(Debug, Clone)]
pub struct StaticCsvSource {
    body: String,
}

impl StaticCsvSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl CsvSource for StaticCsvSource {
    async fn fetch_csv(&self) -> Result<String> {
        Ok(self.body.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CsvSource for FileCsvSource {
    async fn fetch_csv(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

#[cfg(feature = "http")]
pub use remote::HttpCsvSource;

#[cfg(feature = "http")]
mod remote {
    use super::{CsvSource, LoaderConfig};
    use crate::error::{EarningsError, Result};
    use reqwest::Client;

    #[derive(Clone)]
    pub struct HttpCsvSource {
        client: Client,
        url: String,
    }

    impl HttpCsvSource {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                client: Client::new(),
                url: url.into(),
            }
        }

        pub fn from_config(config: &LoaderConfig) -> Self {
            Self::new(config.source_url.clone())
        }
    }

    impl CsvSource for HttpCsvSource {
        async fn fetch_csv(&self) -> Result<String> {
            let res = self.client.get(&self.url).send().await?;
            let status = res.status();

            if !status.is_success() {
                return Err(EarningsError::HttpStatus(status.as_u16()));
            }

            Ok(res.text().await?)
        }
    }
}
