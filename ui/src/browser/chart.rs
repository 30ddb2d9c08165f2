use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::charts::{chart_js_config, ChartConfig, ChartError, ChartFactory, ChartInstance};

use super::{call_method, describe, document, global, json_to_js};

/// Builds charts with the global `Chart` constructor.
pub(crate) struct ChartJs;

impl ChartFactory for ChartJs {
    fn create(
        &self,
        surface_id: &str,
        config: &ChartConfig,
    ) -> Result<Box<dyn ChartInstance>, ChartError> {
        let constructor: Function = global("Chart")
            .and_then(|value| value.dyn_into().ok())
            .ok_or(ChartError::LibraryUnavailable)?;
        let canvas = document()
            .and_then(|doc| doc.get_element_by_id(surface_id))
            .ok_or_else(|| ChartError::SurfaceMissing(surface_id.to_string()))?;

        let js_config = json_to_js(&chart_js_config(config))
            .map_err(|err| ChartError::Construction(describe(&err)))?;

        let labels = config.data_labels.clone();
        let formatter = Closure::<dyn Fn(JsValue, JsValue) -> JsValue>::new(
            move |_value: JsValue, context: JsValue| {
                let label = Reflect::get(&context, &JsValue::from_str("dataIndex"))
                    .ok()
                    .and_then(|index| index.as_f64())
                    .and_then(|index| labels.get(index as usize))
                    .cloned()
                    .unwrap_or_default();
                JsValue::from_str(&label)
            },
        );
        attach_formatter(&js_config, &formatter)
            .map_err(|err| ChartError::Construction(describe(&err)))?;

        if let Some(plugin) = global("ChartDataLabels") {
            Reflect::set(&js_config, &JsValue::from_str("plugins"), &Array::of1(&plugin))
                .map_err(|err| ChartError::Construction(describe(&err)))?;
        }

        let instance = Reflect::construct(&constructor, &Array::of2(&canvas, &js_config))
            .map_err(|err| ChartError::Construction(describe(&err)))?;

        Ok(Box::new(LiveChart {
            instance,
            _formatter: formatter,
        }))
    }
}

fn attach_formatter(
    js_config: &JsValue,
    formatter: &Closure<dyn Fn(JsValue, JsValue) -> JsValue>,
) -> Result<(), JsValue> {
    let options = Reflect::get(js_config, &JsValue::from_str("options"))?;
    let plugins = Reflect::get(&options, &JsValue::from_str("plugins"))?;
    let datalabels = Reflect::get(&plugins, &JsValue::from_str("datalabels"))?;
    Reflect::set(
        &datalabels,
        &JsValue::from_str("formatter"),
        formatter.as_ref(),
    )?;
    Ok(())
}

struct LiveChart {
    instance: JsValue,
    // Referenced by the chart's label plugin until the chart is destroyed.
    _formatter: Closure<dyn Fn(JsValue, JsValue) -> JsValue>,
}

impl ChartInstance for LiveChart {
    fn destroy(&mut self) {
        if let Err(err) = call_method(&self.instance, "destroy", &Array::new()) {
            tracing::warn!(error = %describe(&err), "chart destroy failed");
        }
    }
}
