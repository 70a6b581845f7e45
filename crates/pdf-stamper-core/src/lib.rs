//! PDF Stamper Core Library
//!
//! This library merges two PDF documents and labels the second one's pages:
//! - Parsing both inputs and copying their pages, A first, then B
//! - Deriving a label from A's file name
//! - Stamping the label near the top-right corner of every page from B
//! - Handing the serialized result to a sink

pub mod config;
pub mod error;
pub mod label;
pub mod pdf;
pub mod sink;
pub mod util;

pub use config::{AppConfig, StampConfig, TextColor, DEFAULT_OUTPUT_NAME, DEFAULT_STAMP_FONT};
pub use error::{Error, Result};
pub use label::derive_label;
pub use pdf::{Assembly, OutputDocument, PageSummary, PdfSource, SourceDocument, Stamper, assemble, inspect_pdf};
pub use sink::{DirectorySink, FileSink, PdfSink};

use tracing::{debug, info};

/// High-level merge pipeline that combines all components
#[derive(Debug, Clone)]
pub struct PdfStamper {
    config: AppConfig,
}

/// Result of one merge
#[derive(Clone)]
pub struct MergedPdf {
    /// Serialized output document
    pub bytes: Vec<u8>,
    /// Label drawn on the pages from the second document
    pub label: String,
    /// Total pages in the output
    pub page_count: usize,
    /// Pages that received the label
    pub stamped_pages: usize,
    /// File name to offer the sink
    pub suggested_name: String,
}

impl std::fmt::Debug for MergedPdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergedPdf")
            .field("bytes_len", &self.bytes.len())
            .field("label", &self.label)
            .field("page_count", &self.page_count)
            .field("stamped_pages", &self.stamped_pages)
            .field("suggested_name", &self.suggested_name)
            .finish()
    }
}

impl PdfStamper {
    /// Create a stamper with the given configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Merge two parsed documents and stamp B's pages.
    ///
    /// Runs on the calling thread. Nothing is returned unless every step
    /// succeeds.
    pub fn merge_documents(&self, a: &SourceDocument, b: &SourceDocument) -> Result<MergedPdf> {
        let Assembly {
            mut output,
            pages_from_b,
            ..
        } = assemble(a, b)?;

        let label = derive_label(a.name());
        debug!("Derived label '{}' from '{}'", label, a.name());

        let stamper = Stamper::new(self.config.stamp.clone());
        let stamped_pages = stamper.stamp(&mut output, &pages_from_b, &label)?;

        let page_count = output.page_count();
        let bytes = output.into_bytes(self.config.compress)?;

        info!(
            "Merged '{}' ({} pages) and '{}' ({} pages), stamped {} pages with '{}'",
            a.name(),
            a.page_count(),
            b.name(),
            b.page_count(),
            stamped_pages,
            label
        );

        Ok(MergedPdf {
            bytes,
            label,
            page_count,
            stamped_pages,
            suggested_name: self.config.output_name.clone(),
        })
    }

    /// Parse both sources and merge them.
    ///
    /// The two parses run concurrently on blocking threads and are joined
    /// before assembly. Assembly, stamping and serialization then run on a
    /// single blocking thread.
    pub async fn merge(&self, a: PdfSource, b: PdfSource) -> Result<MergedPdf> {
        let (doc_a, doc_b) = tokio::try_join!(parse_blocking(a), parse_blocking(b))?;

        let stamper = self.clone();
        tokio::task::spawn_blocking(move || stamper.merge_documents(&doc_a, &doc_b))
            .await
            .map_err(task_error("assemble/stamp/serialize"))?
    }

    /// Merge, then hand the result to `sink`.
    ///
    /// The sink is only called after a successful merge.
    pub async fn merge_and_save(
        &self,
        a: PdfSource,
        b: PdfSource,
        sink: &dyn PdfSink,
    ) -> Result<MergedPdf> {
        let merged = self.merge(a, b).await?;
        sink.save(&merged.bytes, &merged.suggested_name).await?;
        Ok(merged)
    }
}

async fn parse_blocking(source: PdfSource) -> Result<SourceDocument> {
    tokio::task::spawn_blocking(move || source.parse())
        .await
        .map_err(task_error("parse"))?
}

/// Name the stage a blocking worker was running when it died.
fn task_error(stage: &'static str) -> impl FnOnce(tokio::task::JoinError) -> Error {
    move |e| Error::Task {
        stage,
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let stamper = PdfStamper::new(AppConfig::default());
        assert!(stamper.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.stamp.font_size = -1.0;
        assert!(matches!(PdfStamper::new(config), Err(Error::ConfigInvalid { .. })));
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_worker_panic_names_stage() {
        let joined = tokio::task::spawn_blocking::<_, ()>(|| panic!("stamp blew up")).await;
        let Err(join_err) = joined else {
            panic!("worker should have panicked");
        };

        let err = task_error("assemble/stamp/serialize")(join_err);
        assert_eq!(err.kind(), "task");
        assert!(err.to_string().starts_with("assemble/stamp/serialize task failed"));
    }
}
