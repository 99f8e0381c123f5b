use std::net::SocketAddr;

use axum::http::HeaderValue;
use serde::Deserialize;
use salespulse_core::error::{Result, SalesError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SalesError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Browser origins allowed by CORS. Empty disables the CORS layer.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1024..=1024 * 1024 * 1024).contains(&self.max_upload_bytes) {
            return Err(SalesError::BadRequest(
                "server.max_upload_bytes must be between 1024 and 1073741824".into(),
            ));
        }
        self.cors_header_values()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            SalesError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }

    pub fn cors_header_values(&self) -> Result<Vec<HeaderValue>> {
        self.cors_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| {
                    SalesError::BadRequest(format!("server.cors_origins has an invalid origin: {o}"))
                })
            })
            .collect()
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.default_top_n == 0 {
            return Err(SalesError::BadRequest("metrics.default_top_n must be at least 1".into()));
        }
        if self.default_top_n > self.max_top_n {
            return Err(SalesError::BadRequest(
                "metrics.default_top_n must not exceed metrics.max_top_n".into(),
            ));
        }
        Ok(())
    }
}

fn default_top_n() -> usize {
    salespulse_core::metrics::DEFAULT_TOP_N
}
fn default_max_top_n() -> usize {
    1000
}
