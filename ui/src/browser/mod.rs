//! Browser implementations of the report capabilities, backed by the globals the CDN
//! scripts install (`Chart`, `ChartDataLabels`, `html2canvas`, `jspdf`).

mod capture;
mod chart;
mod page;
mod scripts;

use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::config::ReportSettings;
use crate::loader::LibraryLoader;
use crate::services::ReportServices;

pub(crate) fn services(settings: ReportSettings) -> ReportServices {
    ReportServices {
        loader: LibraryLoader::new(Rc::new(scripts::DocumentScripts), settings.libraries.clone()),
        charts: Rc::new(chart::ChartJs),
        region: Rc::new(capture::ContentRegion),
        rasterizer: Rc::new(capture::Html2Canvas),
        assembler: Rc::new(capture::JsPdf),
        notifier: Rc::new(capture::WindowAlert),
        page: Rc::new(page::BodyScroll),
        settings,
    }
}

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

/// `window[name]`, when defined.
fn global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    method.apply(target, args)
}

fn json_to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
