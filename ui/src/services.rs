//! Capabilities the report view needs from its environment, provided through Dioxus context.

use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use crate::charts::{ChartFactory, UnavailableChartFactory};
use crate::config::ReportSettings;
use crate::export::{
    CaptureOptions, DocumentAssembler, ExportError, Notifier, PageSize, PdfDocument, PdfExporter,
    PrintableRegion, RasterImage, Rasterizer, RegionStyle, PRINTABLE_REGION_ID,
};
use crate::loader::{LibraryLoader, UnsupportedHost};
use crate::report::PageScroll;

#[derive(Clone)]
pub struct ReportServices {
    pub loader: LibraryLoader,
    pub charts: Rc<dyn ChartFactory>,
    pub region: Rc<dyn PrintableRegion>,
    pub rasterizer: Rc<dyn Rasterizer>,
    pub assembler: Rc<dyn DocumentAssembler>,
    pub notifier: Rc<dyn Notifier>,
    pub page: Rc<dyn PageScroll>,
    pub settings: ReportSettings,
}

impl ReportServices {
    /// Browser-backed services on wasm, [`ReportServices::unsupported`] elsewhere.
    pub fn for_platform(settings: ReportSettings) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            crate::browser::services(settings)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::unsupported(settings)
        }
    }

    /// Services for targets without a document. Loading fails, so charts stay blank and
    /// export is refused.
    pub fn unsupported(settings: ReportSettings) -> Self {
        Self {
            loader: LibraryLoader::new(Rc::new(UnsupportedHost), settings.libraries.clone()),
            charts: Rc::new(UnavailableChartFactory),
            region: Rc::new(Headless),
            rasterizer: Rc::new(Headless),
            assembler: Rc::new(Headless),
            notifier: Rc::new(Headless),
            page: Rc::new(Headless),
            settings,
        }
    }

    pub fn exporter(&self) -> PdfExporter {
        PdfExporter::new(
            self.region.clone(),
            self.rasterizer.clone(),
            self.assembler.clone(),
            self.notifier.clone(),
            self.settings.export.clone(),
        )
    }
}

/// Stand-in for every browser capability when no browser is present.
struct Headless;

impl PrintableRegion for Headless {
    fn expand(&self) -> Result<RegionStyle, ExportError> {
        Err(ExportError::RegionMissing(PRINTABLE_REGION_ID.to_string()))
    }

    fn restore(&self, _saved: &RegionStyle) {}
}

impl Rasterizer for Headless {
    fn capture(
        &self,
        _options: &CaptureOptions,
    ) -> LocalBoxFuture<'static, Result<RasterImage, ExportError>> {
        future::ready(Err(ExportError::LibraryMissing("html2canvas"))).boxed_local()
    }
}

impl DocumentAssembler for Headless {
    fn create(&self, _page: PageSize) -> Result<Box<dyn PdfDocument>, ExportError> {
        Err(ExportError::LibraryMissing("jsPDF"))
    }
}

impl PageScroll for Headless {
    fn overflow(&self) -> String {
        String::new()
    }

    fn set_overflow(&self, _value: &str) {}
}

impl Notifier for Headless {
    fn alert(&self, message: &str) {
        tracing::warn!(message, "report notice");
    }
}
