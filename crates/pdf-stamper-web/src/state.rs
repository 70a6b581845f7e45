use anyhow::{Context, Result};
use pdf_stamper_core::{AppConfig, PdfStamper};

/// Global application state
///
/// Holds no per-request data: every merge runs its own pipeline.
pub struct AppState {
    pub stamper: PdfStamper,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let stamper = PdfStamper::new(config).context("Invalid stamp configuration")?;
        Ok(Self { stamper })
    }

    pub fn output_name(&self) -> &str {
        &self.stamper.config().output_name
    }
}
