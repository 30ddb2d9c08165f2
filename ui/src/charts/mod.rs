//! Chart lifecycle: one live chart instance per named drawing surface.
//!
//! The report view owns a [`ChartRegistry`]. Every call to [`ChartRegistry::render_chart`]
//! destroys whatever instance is attached under that name before asking the injected
//! [`ChartFactory`] for a replacement, so repeated renders never stack instances on one
//! canvas. Each handle moves through `absent -> attached -> destroyed`.

mod chartjs;
mod labels;

pub use chartjs::chart_js_config;
pub use labels::format_data_labels;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Fallback fill used when a request carries no palette.
pub const DEFAULT_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("chart library is not loaded")]
    LibraryUnavailable,
    #[error("drawing surface `{0}` is not attached")]
    SurfaceMissing(String),
    #[error("chart construction failed: {0}")]
    Construction(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartOptions {
    /// Start the value axis at zero (bar charts).
    pub begin_at_zero: bool,
    pub show_legend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_axis_label: Option<String>,
}

/// Everything needed to draw one chart, before it is bound to a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub options: ChartOptions,
    pub colors: Vec<String>,
}

/// Declarative configuration handed to the chart library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    /// Text drawn on each data point, aligned with `values`.
    pub data_labels: Vec<String>,
    pub options: ChartOptions,
}

impl ChartConfig {
    pub fn from_request(request: &ChartRequest) -> Self {
        let colors = if request.colors.is_empty() {
            vec![DEFAULT_COLOR.to_string()]
        } else {
            request.colors.clone()
        };
        Self {
            kind: request.kind,
            labels: request.labels.clone(),
            values: request.values.clone(),
            colors,
            data_labels: format_data_labels(request.kind, &request.values),
            options: request.options.clone(),
        }
    }
}

/// A live chart bound to one drawing surface.
pub trait ChartInstance {
    /// Release the chart's resources. Called exactly once per instance.
    fn destroy(&mut self);
}

/// Builds chart instances on drawing surfaces identified by element id.
pub trait ChartFactory {
    fn create(
        &self,
        surface_id: &str,
        config: &ChartConfig,
    ) -> Result<Box<dyn ChartInstance>, ChartError>;
}

/// Factory for targets without a chart library; every construction fails.
#[derive(Debug, Default)]
pub struct UnavailableChartFactory;

impl ChartFactory for UnavailableChartFactory {
    fn create(&self, _: &str, _: &ChartConfig) -> Result<Box<dyn ChartInstance>, ChartError> {
        Err(ChartError::LibraryUnavailable)
    }
}

enum HandleState {
    Attached(Box<dyn ChartInstance>),
    Destroyed,
}

struct ChartHandle {
    surface_id: String,
    state: HandleState,
}

impl ChartHandle {
    fn release(&mut self) {
        if let HandleState::Attached(mut instance) =
            std::mem::replace(&mut self.state, HandleState::Destroyed)
        {
            instance.destroy();
        }
    }
}

pub struct ChartRegistry {
    factory: Rc<dyn ChartFactory>,
    handles: BTreeMap<String, ChartHandle>,
}

impl ChartRegistry {
    pub fn new(factory: Rc<dyn ChartFactory>) -> Self {
        Self {
            factory,
            handles: BTreeMap::new(),
        }
    }

    /// Draw `request` on `surface_id`, replacing any chart previously registered as `name`.
    ///
    /// Construction failures are logged and leave the surface blank.
    pub fn render_chart(&mut self, name: &str, surface_id: &str, request: &ChartRequest) {
        let handle = self
            .handles
            .entry(name.to_string())
            .or_insert_with(|| ChartHandle {
                surface_id: surface_id.to_string(),
                state: HandleState::Destroyed,
            });
        handle.release();
        handle.surface_id = surface_id.to_string();

        let config = ChartConfig::from_request(request);
        match self.factory.create(surface_id, &config) {
            Ok(instance) => {
                debug!(
                    chart = name,
                    surface = surface_id,
                    points = config.values.len(),
                    "chart rendered"
                );
                handle.state = HandleState::Attached(instance);
            }
            Err(err) => {
                error!(chart = name, surface = surface_id, error = %err, "chart not rendered");
            }
        }
    }

    /// Destroy every live chart and forget all handles.
    pub fn teardown(&mut self) {
        for handle in self.handles.values_mut() {
            handle.release();
        }
        self.handles.clear();
    }

    pub fn is_attached(&self, name: &str) -> bool {
        matches!(
            self.handles.get(name).map(|handle| &handle.state),
            Some(HandleState::Attached(_))
        )
    }

    pub fn surface_of(&self, name: &str) -> Option<&str> {
        self.handles.get(name).map(|handle| handle.surface_id.as_str())
    }

    pub fn live_count(&self) -> usize {
        self.handles
            .values()
            .filter(|handle| matches!(handle.state, HandleState::Attached(_)))
            .count()
    }
}

impl Drop for ChartRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for ChartRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartRegistry")
            .field("charts", &self.handles.keys().collect::<Vec<_>>())
            .field("live", &self.live_count())
            .finish()
    }
}
