//! Runtime settings for the report view: which browser libraries to fetch and how exports
//! are captured. Everything has a working default; hosts override fields as needed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";
pub const CHART_LABELS_URL: &str =
    "https://cdn.jsdelivr.net/npm/chartjs-plugin-datalabels@2.2.0/dist/chartjs-plugin-datalabels.min.js";
pub const HTML2CANVAS_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/html2canvas/1.4.1/html2canvas.min.js";
pub const JSPDF_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/jspdf/2.5.1/jspdf.umd.min.js";

/// The four scripts the report needs before it can draw or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySet {
    /// Chart renderer; must be loaded before `chart_labels`.
    pub chart: String,
    /// Data-label plugin registered against the chart renderer's global.
    pub chart_labels: String,
    pub rasterizer: String,
    pub pdf: String,
}

impl Default for LibrarySet {
    fn default() -> Self {
        Self {
            chart: CHART_JS_URL.into(),
            chart_labels: CHART_LABELS_URL.into(),
            rasterizer: HTML2CANVAS_URL.into(),
            pdf: JSPDF_URL.into(),
        }
    }
}

impl LibrarySet {
    pub fn urls(&self) -> [&str; 4] {
        [
            self.chart.as_str(),
            self.chart_labels.as_str(),
            self.rasterizer.as_str(),
            self.pdf.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Pixel density multiplier for the rasterized snapshot.
    pub scale: f64,
    /// Pause between expanding the printable region and capturing it.
    pub settle_delay_ms: u64,
    /// Elements carrying this attribute are left out of the snapshot.
    pub exclude_attribute: String,
    pub filename_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            settle_delay_ms: 50,
            exclude_attribute: "data-export-exclude".into(),
            filename_prefix: "Robot-Report".into(),
        }
    }
}

impl ExportSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub libraries: LibrarySet,
    pub export: ExportSettings,
}
