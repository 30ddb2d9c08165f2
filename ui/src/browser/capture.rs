use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlCanvasElement, HtmlElement};

use crate::export::{
    CaptureOptions, DocumentAssembler, ExportError, Notifier, PageSize, PdfDocument, Placement,
    PrintableRegion, RasterImage, Rasterizer, RegionStyle, CONTENT_CLASS, PRINTABLE_REGION_ID,
};

use super::{call_method, describe, document, global, json_to_js};

/// The scrollable content block inside the printable region.
pub(crate) struct ContentRegion;

impl ContentRegion {
    fn content() -> Result<HtmlElement, ExportError> {
        let missing = || ExportError::RegionMissing(PRINTABLE_REGION_ID.to_string());
        document()
            .and_then(|doc| doc.get_element_by_id(PRINTABLE_REGION_ID))
            .and_then(|root| root.query_selector(&format!(".{CONTENT_CLASS}")).ok().flatten())
            .and_then(|content| content.dyn_into::<HtmlElement>().ok())
            .ok_or_else(missing)
    }
}

impl PrintableRegion for ContentRegion {
    fn expand(&self) -> Result<RegionStyle, ExportError> {
        let content = Self::content()?;
        let style = content.style();
        let saved = RegionStyle {
            height: style.get_property_value("height").unwrap_or_default(),
            max_height: style.get_property_value("max-height").unwrap_or_default(),
            overflow: style.get_property_value("overflow").unwrap_or_default(),
        };

        let natural = content.scroll_height();
        style.set_property("height", &format!("{natural}px")).ok();
        style.set_property("max-height", "none").ok();
        style.set_property("overflow", "visible").ok();
        Ok(saved)
    }

    fn restore(&self, saved: &RegionStyle) {
        let Ok(content) = Self::content() else {
            return;
        };
        let style = content.style();
        style.set_property("height", &saved.height).ok();
        style.set_property("max-height", &saved.max_height).ok();
        style.set_property("overflow", &saved.overflow).ok();
    }
}

/// Snapshots elements with the global `html2canvas` function.
pub(crate) struct Html2Canvas;

impl Rasterizer for Html2Canvas {
    fn capture(
        &self,
        options: &CaptureOptions,
    ) -> LocalBoxFuture<'static, Result<RasterImage, ExportError>> {
        match start_capture(options) {
            Ok((promise, ignore)) => async move {
                let settled = JsFuture::from(promise).await;
                drop(ignore);
                let canvas: HtmlCanvasElement = settled
                    .map_err(|err| ExportError::Capture(describe(&err)))?
                    .dyn_into()
                    .map_err(|_| ExportError::Capture("capture did not return a canvas".into()))?;
                let data_url = canvas
                    .to_data_url_with_type("image/png")
                    .map_err(|err| ExportError::Capture(describe(&err)))?;
                Ok(RasterImage {
                    data_url,
                    width: canvas.width(),
                    height: canvas.height(),
                })
            }
            .boxed_local(),
            Err(err) => future::ready(Err(err)).boxed_local(),
        }
    }
}

type IgnorePredicate = Closure<dyn Fn(Element) -> bool>;

fn start_capture(options: &CaptureOptions) -> Result<(Promise, IgnorePredicate), ExportError> {
    let html2canvas: Function = global("html2canvas")
        .and_then(|value| value.dyn_into().ok())
        .ok_or(ExportError::LibraryMissing("html2canvas"))?;
    let root = document()
        .and_then(|doc| doc.get_element_by_id(&options.root_id))
        .ok_or_else(|| ExportError::RegionMissing(options.root_id.clone()))?;

    let attribute = options.exclude_attribute.clone();
    let ignore = IgnorePredicate::new(move |element: Element| element.has_attribute(&attribute));

    let settings = Object::new();
    let set = |key: &str, value: &JsValue| {
        Reflect::set(&settings, &JsValue::from_str(key), value)
            .map(|_| ())
            .map_err(|err| ExportError::Capture(describe(&err)))
    };
    set("scale", &JsValue::from_f64(options.scale))?;
    set("useCORS", &JsValue::from_bool(options.use_cors))?;
    set("allowTaint", &JsValue::from_bool(options.allow_taint))?;
    set("ignoreElements", ignore.as_ref())?;

    let promise = html2canvas
        .call2(&JsValue::NULL, &root, &settings)
        .map_err(|err| ExportError::Capture(describe(&err)))?
        .dyn_into::<Promise>()
        .map_err(|_| ExportError::Capture("html2canvas did not return a promise".into()))?;
    Ok((promise, ignore))
}

/// Assembles documents with `window.jspdf.jsPDF`.
pub(crate) struct JsPdf;

impl DocumentAssembler for JsPdf {
    fn create(&self, page: PageSize) -> Result<Box<dyn PdfDocument>, ExportError> {
        let constructor: Function = global("jspdf")
            .and_then(|ns| Reflect::get(&ns, &JsValue::from_str("jsPDF")).ok())
            .and_then(|value| value.dyn_into().ok())
            .ok_or(ExportError::LibraryMissing("jsPDF"))?;

        let options = json_to_js(&serde_json::json!({
            "orientation": "portrait",
            "unit": "mm",
            "format": [page.width, page.height]
        }))
        .map_err(document_error)?;
        let doc = Reflect::construct(&constructor, &Array::of1(&options)).map_err(document_error)?;

        let size = Reflect::get(&doc, &JsValue::from_str("internal"))
            .and_then(|internal| Reflect::get(&internal, &JsValue::from_str("pageSize")))
            .map_err(document_error)?;
        let width = call_method(&size, "getWidth", &Array::new())
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(page.width);
        let height = call_method(&size, "getHeight", &Array::new())
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(page.height);

        Ok(Box::new(JsPdfDocument {
            doc,
            page: PageSize { width, height },
        }))
    }
}

struct JsPdfDocument {
    doc: JsValue,
    page: PageSize,
}

impl PdfDocument for JsPdfDocument {
    fn page_size(&self) -> PageSize {
        self.page
    }

    fn add_page(&mut self) -> Result<(), ExportError> {
        call_method(&self.doc, "addPage", &Array::new())
            .map(|_| ())
            .map_err(document_error)
    }

    fn add_image(&mut self, image: &RasterImage, placement: &Placement) -> Result<(), ExportError> {
        let args = Array::new();
        args.push(&JsValue::from_str(&image.data_url));
        args.push(&JsValue::from_str("PNG"));
        args.push(&JsValue::from_f64(0.0));
        args.push(&JsValue::from_f64(placement.y));
        args.push(&JsValue::from_f64(placement.width));
        args.push(&JsValue::from_f64(placement.height));
        call_method(&self.doc, "addImage", &args)
            .map(|_| ())
            .map_err(document_error)
    }

    fn save(&mut self, filename: &str) -> Result<(), ExportError> {
        call_method(&self.doc, "save", &Array::of1(&JsValue::from_str(filename)))
            .map(|_| ())
            .map_err(document_error)
    }
}

fn document_error(err: JsValue) -> ExportError {
    ExportError::Document(describe(&err))
}

pub(crate) struct WindowAlert;

impl Notifier for WindowAlert {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            window.alert_with_message(message).ok();
        }
    }
}
