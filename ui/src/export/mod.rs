//! PDF export of the report's printable region.
//!
//! The routine expands the scrollable content so off-screen rows are captured, rasterizes
//! the region, always puts the original styling back, then lays the snapshot across A4
//! pages and hands the document to the browser for download. Only one export runs at a
//! time per exporter.

mod paginate;

pub use paginate::{paginate, PageSize, Placement};

use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use thiserror::Error;
use time::Date;
use tracing::{debug, error, warn};

use crate::config::ExportSettings;
use crate::core::{format, platform};

/// Element id of the region captured into the PDF.
pub const PRINTABLE_REGION_ID: &str = "report-printable";
/// Class of the scrollable block inside the printable region.
pub const CONTENT_CLASS: &str = "report-modal__content";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("printable region `{0}` not found")]
    RegionMissing(String),
    #[error("{0} is not loaded")]
    LibraryMissing(&'static str),
    #[error("capture failed: {0}")]
    Capture(String),
    #[error("captured image is empty")]
    EmptyCapture,
    #[error("document assembly failed: {0}")]
    Document(String),
}

/// Inline styles of the content block, saved so they can be put back after capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionStyle {
    pub height: String,
    pub max_height: String,
    pub overflow: String,
}

/// The part of the view that ends up in the PDF.
pub trait PrintableRegion {
    /// Grow the scrollable content to its natural height with visible overflow and return
    /// the styles it replaced.
    fn expand(&self) -> Result<RegionStyle, ExportError>;
    fn restore(&self, saved: &RegionStyle);
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    pub root_id: String,
    pub scale: f64,
    /// Allow cross-origin images in the snapshot.
    pub use_cors: bool,
    pub allow_taint: bool,
    pub exclude_attribute: String,
}

/// Rasterized snapshot, encoded as a PNG data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

pub trait Rasterizer {
    fn capture(&self, options: &CaptureOptions)
        -> LocalBoxFuture<'static, Result<RasterImage, ExportError>>;
}

/// An open PDF document being assembled.
pub trait PdfDocument {
    fn page_size(&self) -> PageSize;
    fn add_page(&mut self) -> Result<(), ExportError>;
    fn add_image(&mut self, image: &RasterImage, placement: &Placement) -> Result<(), ExportError>;
    /// Finish the document and trigger the client-side download.
    fn save(&mut self, filename: &str) -> Result<(), ExportError>;
}

pub trait DocumentAssembler {
    fn create(&self, page: PageSize) -> Result<Box<dyn PdfDocument>, ExportError>;
}

/// User-visible notices.
pub trait Notifier {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    LibrariesNotLoaded,
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { filename: String, pages: usize },
    Refused(Refusal),
    Failed(ExportError),
}

/// `<prefix>-YYYY-MM-DD.pdf`
pub fn export_filename(prefix: &str, date: Date) -> String {
    format!("{prefix}-{}.pdf", format::iso_date(date))
}

pub struct PdfExporter {
    region: Rc<dyn PrintableRegion>,
    rasterizer: Rc<dyn Rasterizer>,
    assembler: Rc<dyn DocumentAssembler>,
    notifier: Rc<dyn Notifier>,
    settings: ExportSettings,
    in_progress: Cell<bool>,
}

impl PdfExporter {
    pub fn new(
        region: Rc<dyn PrintableRegion>,
        rasterizer: Rc<dyn Rasterizer>,
        assembler: Rc<dyn DocumentAssembler>,
        notifier: Rc<dyn Notifier>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            region,
            rasterizer,
            assembler,
            notifier,
            settings,
            in_progress: Cell::new(false),
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.in_progress.get()
    }

    /// Export the printable region as `Robot-Report-<date>.pdf`.
    ///
    /// Refused while the browser libraries are not ready (the user is alerted) or while
    /// another export is running. Errors are logged and reported in the outcome.
    pub async fn export(&self, libraries_ready: bool, date: Date) -> ExportOutcome {
        if !libraries_ready {
            warn!("export requested before report libraries loaded");
            self.notifier.alert(&crate::t!("export-libraries-missing"));
            return ExportOutcome::Refused(Refusal::LibrariesNotLoaded);
        }
        if self.in_progress.get() {
            debug!("export already running");
            return ExportOutcome::Refused(Refusal::AlreadyRunning);
        }

        let _busy = BusyGuard::engage(&self.in_progress);
        match self.run(date).await {
            Ok((filename, pages)) => {
                debug!(filename = %filename, pages, "report exported");
                ExportOutcome::Saved { filename, pages }
            }
            Err(err) => {
                error!(error = %err, "report export failed");
                ExportOutcome::Failed(err)
            }
        }
    }

    async fn run(&self, date: Date) -> Result<(String, usize), ExportError> {
        let saved = self.region.expand()?;
        platform::sleep(self.settings.settle_delay()).await;

        let options = CaptureOptions {
            root_id: PRINTABLE_REGION_ID.to_string(),
            scale: self.settings.scale,
            use_cors: true,
            allow_taint: true,
            exclude_attribute: self.settings.exclude_attribute.clone(),
        };
        let captured = self.rasterizer.capture(&options).await;
        self.region.restore(&saved);
        let image = captured?;

        let mut document = self.assembler.create(PageSize::A4_PORTRAIT)?;
        let placements = paginate(image.width, image.height, document.page_size());
        if placements.is_empty() {
            return Err(ExportError::EmptyCapture);
        }
        for placement in &placements {
            if placement.page > 0 {
                document.add_page()?;
            }
            document.add_image(&image, placement)?;
        }

        let filename = export_filename(&self.settings.filename_prefix, date);
        document.save(&filename)?;
        Ok((filename, placements.len()))
    }
}

/// Clears the export flag however the export ends.
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
