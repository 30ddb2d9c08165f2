//! In-memory stand-ins for the browser capabilities, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use crate::charts::{ChartConfig, ChartError, ChartFactory, ChartInstance};
use crate::export::{
    CaptureOptions, DocumentAssembler, ExportError, Notifier, PageSize, PdfDocument, Placement,
    PrintableRegion, RasterImage, Rasterizer, RegionStyle,
};
use crate::loader::{LoadError, LoadFuture, ScriptHost};
use crate::report::PageScroll;

/// Records script injections. Gated hosts hold every load until released.
#[derive(Default)]
pub struct ScriptRecorder {
    gated: bool,
    present: RefCell<Vec<String>>,
    injected: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
    pending: RefCell<HashMap<String, oneshot::Sender<()>>>,
}

impl ScriptRecorder {
    pub fn gated() -> Self {
        Self {
            gated: true,
            ..Self::default()
        }
    }

    pub fn preload(&self, url: &str) {
        self.present.borrow_mut().push(url.to_string());
    }

    pub fn fail_on(&self, url: &str) {
        self.failing.borrow_mut().insert(url.to_string());
    }

    pub fn injected(&self) -> Vec<String> {
        self.injected.borrow().clone()
    }

    /// Script elements in the "document" for `url`, preloaded or injected.
    pub fn script_count(&self, url: &str) -> usize {
        self.present.borrow().iter().filter(|u| *u == url).count()
    }

    pub fn release(&self, url: &str) {
        let sender = self.pending.borrow_mut().remove(url);
        if let Some(sender) = sender {
            let _ = sender.send(());
        }
    }

    pub fn release_all(&self) {
        let senders: Vec<_> = self.pending.borrow_mut().drain().collect();
        for (_, sender) in senders {
            let _ = sender.send(());
        }
    }
}

impl ScriptHost for ScriptRecorder {
    fn has_script(&self, url: &str) -> bool {
        self.present.borrow().iter().any(|u| u == url)
    }

    fn inject(&self, url: &str) -> LoadFuture {
        self.present.borrow_mut().push(url.to_string());
        self.injected.borrow_mut().push(url.to_string());

        let outcome = if self.failing.borrow().contains(url) {
            Err(LoadError::Script {
                url: url.to_string(),
            })
        } else {
            Ok(())
        };

        if !self.gated {
            return future::ready(outcome).boxed_local();
        }

        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(url.to_string(), tx);
        let url = url.to_string();
        async move {
            rx.await.map_err(|_| LoadError::Script { url })?;
            outcome
        }
        .boxed_local()
    }
}

/// Counts chart constructions and destructions, in order.
#[derive(Default)]
pub struct ChartRecorder {
    events: Rc<RefCell<Vec<String>>>,
    destroyed: Rc<RefCell<HashMap<usize, usize>>>,
    configs: RefCell<Vec<(String, ChartConfig)>>,
}

impl ChartRecorder {
    pub fn created(&self) -> usize {
        self.configs.borrow().len()
    }

    pub fn destroy_count(&self, instance: usize) -> usize {
        self.destroyed.borrow().get(&instance).copied().unwrap_or(0)
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    /// `(surface id, config)` for every construction.
    pub fn configs(&self) -> Vec<(String, ChartConfig)> {
        self.configs.borrow().clone()
    }
}

impl ChartFactory for ChartRecorder {
    fn create(
        &self,
        surface_id: &str,
        config: &ChartConfig,
    ) -> Result<Box<dyn ChartInstance>, ChartError> {
        let id = self.configs.borrow().len();
        self.configs
            .borrow_mut()
            .push((surface_id.to_string(), config.clone()));
        self.events.borrow_mut().push(format!("create#{id}"));
        Ok(Box::new(RecordedChart {
            id,
            events: self.events.clone(),
            destroyed: self.destroyed.clone(),
        }))
    }
}

struct RecordedChart {
    id: usize,
    events: Rc<RefCell<Vec<String>>>,
    destroyed: Rc<RefCell<HashMap<usize, usize>>>,
}

impl ChartInstance for RecordedChart {
    fn destroy(&mut self) {
        self.events.borrow_mut().push(format!("destroy#{}", self.id));
        *self.destroyed.borrow_mut().entry(self.id).or_insert(0) += 1;
    }
}

#[derive(Default)]
pub struct RegionRecorder {
    style: RefCell<RegionStyle>,
    expanded: Cell<usize>,
    restored: Cell<usize>,
}

impl RegionRecorder {
    pub fn expanded(&self) -> usize {
        self.expanded.get()
    }

    pub fn restored(&self) -> usize {
        self.restored.get()
    }

    pub fn current(&self) -> RegionStyle {
        self.style.borrow().clone()
    }
}

impl PrintableRegion for RegionRecorder {
    fn expand(&self) -> Result<RegionStyle, ExportError> {
        self.expanded.set(self.expanded.get() + 1);
        let saved = self.style.replace(RegionStyle {
            height: "1840px".into(),
            max_height: "none".into(),
            overflow: "visible".into(),
        });
        Ok(saved)
    }

    fn restore(&self, saved: &RegionStyle) {
        self.restored.set(self.restored.get() + 1);
        *self.style.borrow_mut() = saved.clone();
    }
}

enum CaptureMode {
    Image(u32, u32),
    Fail(String),
}

pub struct CaptureRecorder {
    mode: CaptureMode,
    gated: bool,
    captures: Cell<usize>,
    last: RefCell<Option<CaptureOptions>>,
    pending: RefCell<Vec<oneshot::Sender<()>>>,
}

impl CaptureRecorder {
    fn with(mode: CaptureMode, gated: bool) -> Self {
        Self {
            mode,
            gated,
            captures: Cell::new(0),
            last: RefCell::new(None),
            pending: RefCell::new(Vec::new()),
        }
    }

    pub fn returning(width: u32, height: u32) -> Self {
        Self::with(CaptureMode::Image(width, height), false)
    }

    pub fn failing(reason: &str) -> Self {
        Self::with(CaptureMode::Fail(reason.to_string()), false)
    }

    pub fn gated(width: u32, height: u32) -> Self {
        Self::with(CaptureMode::Image(width, height), true)
    }

    pub fn release(&self) {
        for sender in self.pending.borrow_mut().drain(..) {
            let _ = sender.send(());
        }
    }

    pub fn captures(&self) -> usize {
        self.captures.get()
    }

    pub fn last_options(&self) -> Option<CaptureOptions> {
        self.last.borrow().clone()
    }
}

impl Rasterizer for CaptureRecorder {
    fn capture(
        &self,
        options: &CaptureOptions,
    ) -> LocalBoxFuture<'static, Result<RasterImage, ExportError>> {
        self.captures.set(self.captures.get() + 1);
        *self.last.borrow_mut() = Some(options.clone());

        let result = match &self.mode {
            CaptureMode::Image(width, height) => Ok(RasterImage {
                data_url: "data:image/png;base64,AAAA".into(),
                width: *width,
                height: *height,
            }),
            CaptureMode::Fail(reason) => Err(ExportError::Capture(reason.clone())),
        };

        if !self.gated {
            return future::ready(result).boxed_local();
        }
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push(tx);
        async move {
            rx.await
                .map_err(|_| ExportError::Capture("capture dropped".into()))?;
            result
        }
        .boxed_local()
    }
}

#[derive(Default)]
struct PdfLog {
    pages_added: usize,
    offsets: Vec<f64>,
    saved: Vec<String>,
    fail_save: bool,
}

#[derive(Default)]
pub struct PdfRecorder {
    log: Rc<RefCell<PdfLog>>,
}

impl PdfRecorder {
    pub fn fail_save(&self) {
        self.log.borrow_mut().fail_save = true;
    }

    pub fn saved(&self) -> Vec<String> {
        self.log.borrow().saved.clone()
    }

    pub fn pages_added(&self) -> usize {
        self.log.borrow().pages_added
    }

    pub fn image_offsets(&self) -> Vec<f64> {
        self.log.borrow().offsets.clone()
    }
}

impl DocumentAssembler for PdfRecorder {
    fn create(&self, page: PageSize) -> Result<Box<dyn PdfDocument>, ExportError> {
        Ok(Box::new(RecordedPdf {
            page,
            log: self.log.clone(),
        }))
    }
}

struct RecordedPdf {
    page: PageSize,
    log: Rc<RefCell<PdfLog>>,
}

impl PdfDocument for RecordedPdf {
    fn page_size(&self) -> PageSize {
        self.page
    }

    fn add_page(&mut self) -> Result<(), ExportError> {
        self.log.borrow_mut().pages_added += 1;
        Ok(())
    }

    fn add_image(&mut self, _image: &RasterImage, placement: &Placement) -> Result<(), ExportError> {
        self.log.borrow_mut().offsets.push(placement.y);
        Ok(())
    }

    fn save(&mut self, filename: &str) -> Result<(), ExportError> {
        let mut log = self.log.borrow_mut();
        if log.fail_save {
            return Err(ExportError::Document("save blocked".into()));
        }
        log.saved.push(filename.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct AlertLog {
    messages: RefCell<Vec<String>>,
}

impl AlertLog {
    pub fn count(&self) -> usize {
        self.messages.borrow().len()
    }
}

impl Notifier for AlertLog {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Page scroll container that remembers every overflow it was given.
#[derive(Default)]
pub struct ScrollRecorder {
    overflow: RefCell<String>,
    writes: RefCell<Vec<String>>,
}

impl ScrollRecorder {
    pub fn with_overflow(value: &str) -> Self {
        Self {
            overflow: RefCell::new(value.to_string()),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl PageScroll for ScrollRecorder {
    fn overflow(&self) -> String {
        self.overflow.borrow().clone()
    }

    fn set_overflow(&self, value: &str) {
        *self.overflow.borrow_mut() = value.to_string();
        self.writes.borrow_mut().push(value.to_string());
    }
}
