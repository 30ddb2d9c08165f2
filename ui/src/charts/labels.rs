//! Data labels drawn on top of chart segments.

use super::ChartKind;

/// Per-point label text for a dataset.
///
/// Pie slices show their share of the total with one decimal (`"23.8%"`); a zero total
/// yields empty labels. Bars show the raw value.
pub fn format_data_labels(kind: ChartKind, values: &[f64]) -> Vec<String> {
    match kind {
        ChartKind::Pie => {
            let total: f64 = values.iter().sum();
            values
                .iter()
                .map(|value| {
                    if total == 0.0 {
                        String::new()
                    } else {
                        format!("{:.1}%", value / total * 100.0)
                    }
                })
                .collect()
        }
        ChartKind::Bar => values.iter().map(|value| value.to_string()).collect(),
    }
}
