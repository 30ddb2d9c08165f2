use dioxus::prelude::*;

use crate::report::{ReportData, ReportModal};
use crate::views::samples;

/// Landing page that opens the report modal with bundled sample data.
#[component]
pub fn ReportDemo() -> Element {
    crate::i18n::init();

    let mut open_report = use_signal(|| Option::<ReportData>::None);

    rsx! {
        section { class: "page page-demo",
            h1 { {crate::t!("demo-title")} }
            p { {crate::t!("demo-intro")} }

            div { class: "page-demo__actions",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: move |_| open_report.set(samples::individual()),
                    {crate::t!("demo-open-individual")}
                }
                button {
                    r#type: "button",
                    class: "button",
                    onclick: move |_| open_report.set(samples::fleet()),
                    {crate::t!("demo-open-fleet")}
                }
            }
        }

        if let Some(report) = open_report() {
            ReportModal {
                report,
                on_close: move |_| open_report.set(None),
            }
        }
    }
}
