//! Chart.js configuration objects built from [`ChartConfig`].

use serde_json::{json, Value};

use super::{ChartConfig, ChartKind};

/// Chart.js `{ type, data, options }` object. The data-label formatter is attached by the
/// caller since it has to be a JS function.
pub fn chart_js_config(config: &ChartConfig) -> Value {
    let pie = config.kind == ChartKind::Pie;
    let label_color = if pie { "#fff" } else { "#4b5563" };

    let mut options = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "animation": false,
        "plugins": {
            "legend": { "display": config.options.show_legend, "position": "bottom" },
            "datalabels": {
                "display": true,
                "color": label_color,
                "font": { "weight": "bold" }
            }
        }
    });

    if !pie {
        let axis_label = config.options.value_axis_label.as_deref();
        options["scales"] = json!({
            "y": {
                "beginAtZero": config.options.begin_at_zero,
                "title": {
                    "display": axis_label.is_some(),
                    "text": axis_label.unwrap_or_default()
                }
            }
        });
    }

    json!({
        "type": config.kind,
        "data": {
            "labels": config.labels,
            "datasets": [{
                "label": "",
                "data": config.values,
                "backgroundColor": config.colors,
                "borderRadius": 4
            }]
        },
        "options": options
    })
}
