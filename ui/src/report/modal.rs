use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use tracing::{debug, error};

use crate::charts::ChartRegistry;
use crate::core::platform;
use crate::export::{ExportOutcome, CONTENT_CLASS, PRINTABLE_REGION_ID};
use crate::loader::LoadState;
use crate::report::{
    manholes_table, plan_charts, summary_cards, timeline_cards, ReportData, ReportTable,
    ScrollLock,
};
use crate::services::ReportServices;
use crate::t;

/// Modal overlay presenting one report. Expects [`ReportServices`] in context.
#[component]
pub fn ReportModal(report: ReportData, on_close: EventHandler<()>) -> Element {
    crate::i18n::init();

    let services = use_context::<ReportServices>();
    let mut load_state = use_signal(|| services.loader.state());
    let mut exporting = use_signal(|| false);

    let registry = use_hook({
        let factory = services.charts.clone();
        move || Rc::new(RefCell::new(ChartRegistry::new(factory)))
    });
    let exporter = use_hook({
        let services = services.clone();
        move || Rc::new(services.exporter())
    });
    let scroll_lock = use_hook({
        let page = services.page.clone();
        move || Rc::new(ScrollLock::engage(page))
    });

    use_hook({
        let loader = services.loader.clone();
        move || {
            spawn(async move {
                let outcome = loader.ensure_loaded().await;
                if let Err(err) = &outcome {
                    error!(error = %err, "report libraries unavailable; charts may stay blank");
                }
                load_state.set(loader.state());
            });
        }
    });

    // Rebuild every chart the current data calls for once the load has settled.
    let charts = registry.clone();
    use_effect(use_reactive!(|report| {
        let state = load_state();
        if matches!(state, LoadState::NotStarted | LoadState::Pending) {
            return;
        }
        let planned = plan_charts(&report);
        debug!(charts = planned.len(), "rebuilding report charts");
        let mut registry = charts.borrow_mut();
        for chart in &planned {
            registry.render_chart(chart.name.key(), &chart.name.surface_id(), &chart.request);
        }
    }));

    use_drop({
        let registry = registry.clone();
        let scroll_lock = scroll_lock.clone();
        move || {
            registry.borrow_mut().teardown();
            scroll_lock.release();
        }
    });

    let export_handler = {
        let exporter = exporter.clone();
        move |_| {
            if exporter.is_exporting() {
                return;
            }
            let ready = load_state() == LoadState::Ready;
            if ready {
                exporting.set(true);
            }
            let exporter = exporter.clone();
            spawn(async move {
                match exporter.export(ready, platform::today()).await {
                    ExportOutcome::Saved { filename, pages } => {
                        debug!(filename = %filename, pages, "report download started");
                    }
                    ExportOutcome::Refused(reason) => debug!(?reason, "export refused"),
                    ExportOutcome::Failed(_) => {}
                }
                exporting.set(false);
            });
        }
    };

    let title = if report.is_single_unit() {
        t!("report-title-individual")
    } else {
        t!("report-title-aggregate")
    };
    let cards = summary_cards(&report);
    let timeline = timeline_cards(&report);
    let planned = plan_charts(&report);
    let table = manholes_table(&report);

    let chart_status = match load_state() {
        LoadState::NotStarted | LoadState::Pending => Some(t!("report-loading")),
        LoadState::Failed(_) => Some(t!("report-load-failed")),
        LoadState::Ready => None,
    };
    let button = ExportButton::for_state(&load_state(), exporting());

    rsx! {
        div { class: "report-modal__overlay",
            div { class: "report-modal", role: "dialog", "aria-modal": "true",
                div { id: PRINTABLE_REGION_ID, class: "report-modal__printable",
                    header { class: "report-modal__header",
                        h2 { "{title}" }
                        button {
                            r#type: "button",
                            class: "report-modal__close",
                            "data-export-exclude": "true",
                            "aria-label": t!("report-close"),
                            onclick: move |_| on_close.call(()),
                            "×"
                        }
                    }

                    div { class: CONTENT_CLASS,
                        section { class: "report-modal__cards",
                            h3 { {t!("report-section-summary")} }
                            div { class: "report-cards",
                                for card in cards {
                                    InfoCard { key: "{card.title}", title: card.title.clone(), value: card.value.clone() }
                                }
                            }
                        }

                        if !timeline.is_empty() {
                            section { class: "report-modal__timeline",
                                h3 { {t!("report-section-timeline")} }
                                div { class: "report-cards report-cards--timeline",
                                    for card in timeline {
                                        InfoCard { key: "{card.title}", title: card.title.clone(), value: card.value.clone() }
                                    }
                                }
                            }
                        }

                        section { class: "report-modal__charts",
                            h3 { {t!("report-section-charts")} }
                            if let Some(status) = chart_status {
                                p { class: "report-modal__status", "{status}" }
                            }
                            if planned.is_empty() {
                                p { class: "report-modal__placeholder", {t!("report-no-charts")} }
                            }
                            div { class: "report-charts",
                                for chart in planned {
                                    figure { key: "{chart.name.key()}", class: "report-chart",
                                        figcaption { "{chart.name.title()}" }
                                        canvas { id: chart.name.surface_id() }
                                    }
                                }
                            }
                        }

                        if let Some(table) = table {
                            TableView { table }
                        }
                    }
                }

                footer { class: "report-modal__footer",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: button.disabled,
                        onclick: export_handler,
                        "{button.label}"
                    }
                }
            }
        }
    }
}

/// Export button text and availability. After a failed load the button stays enabled so a
/// click can explain why nothing is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExportButton {
    label: String,
    disabled: bool,
}

impl ExportButton {
    fn for_state(load: &LoadState, exporting: bool) -> Self {
        let (label, disabled) = if exporting {
            (t!("report-exporting"), true)
        } else {
            match load {
                LoadState::NotStarted | LoadState::Pending => (t!("report-loading-libs"), true),
                LoadState::Ready | LoadState::Failed(_) => (t!("report-export"), false),
            }
        };
        Self { label, disabled }
    }
}

#[component]
fn InfoCard(title: String, value: String) -> Element {
    rsx! {
        div { class: "info-card",
            span { class: "info-card__title", "{title}" }
            strong { class: "info-card__value", "{value}" }
        }
    }
}

#[component]
fn TableView(table: ReportTable) -> Element {
    rsx! {
        section { class: "report-modal__table",
            h3 { "{table.caption}" }
            table { class: "report-table",
                thead {
                    tr {
                        for column in table.columns.iter() {
                            th { "{column}" }
                        }
                    }
                }
                tbody {
                    for row in table.rows.iter() {
                        tr {
                            for cell in row.iter() {
                                td { "{cell}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::dioxus_core::{AttributeValue, Mutation, Mutations, ScopeId, VirtualDom};
    use serde_json::json;

    use crate::config::ReportSettings;
    use crate::loader::{LibraryLoader, LoadError};
    use crate::report::PageScroll;
    use crate::testing::{
        AlertLog, CaptureRecorder, ChartRecorder, PdfRecorder, RegionRecorder, ScriptRecorder,
        ScrollRecorder,
    };

    /// The report the host currently shows; `None` closes the modal.
    #[derive(Clone, Default)]
    struct Stage(Rc<RefCell<Option<ReportData>>>);

    fn host() -> Element {
        let stage = use_context::<Stage>();
        let current = stage.0.borrow().clone();
        rsx! {
            if let Some(report) = current {
                ReportModal { report, on_close: move |_| {} }
            }
        }
    }

    struct Harness {
        dom: VirtualDom,
        stage: Stage,
        scripts: Rc<ScriptRecorder>,
        charts: Rc<ChartRecorder>,
        rasterizer: Rc<CaptureRecorder>,
        page: Rc<ScrollRecorder>,
        alerts: Rc<AlertLog>,
    }

    impl Harness {
        fn open(scripts: ScriptRecorder, report: ReportData) -> (Self, Mutations) {
            let scripts = Rc::new(scripts);
            let charts = Rc::new(ChartRecorder::default());
            let rasterizer = Rc::new(CaptureRecorder::returning(800, 600));
            let page = Rc::new(ScrollRecorder::with_overflow("scroll"));
            let alerts = Rc::new(AlertLog::default());
            let mut settings = ReportSettings::default();
            settings.export.settle_delay_ms = 0;

            let services = ReportServices {
                loader: LibraryLoader::new(scripts.clone(), settings.libraries.clone()),
                charts: charts.clone(),
                region: Rc::new(RegionRecorder::default()),
                rasterizer: rasterizer.clone(),
                assembler: Rc::new(PdfRecorder::default()),
                notifier: alerts.clone(),
                page: page.clone(),
                settings,
            };
            let stage = Stage(Rc::new(RefCell::new(Some(report))));
            let dom = VirtualDom::new(host)
                .with_root_context(services)
                .with_root_context(stage.clone());

            let mut harness = Self {
                dom,
                stage,
                scripts,
                charts,
                rasterizer,
                page,
                alerts,
            };
            let mut edits = harness.dom.rebuild_to_vec();
            edits.edits.extend(harness.settle().edits);
            (harness, edits)
        }

        /// Run tasks, effects and re-renders until nothing is left to do.
        fn settle(&mut self) -> Mutations {
            let mut all = Mutations::default();
            for _ in 0..8 {
                all.edits.extend(self.dom.render_immediate_to_vec().edits);
            }
            all
        }

        fn show(&mut self, report: Option<ReportData>) -> Mutations {
            *self.stage.0.borrow_mut() = report;
            self.dom.mark_dirty(ScopeId::ROOT);
            self.settle()
        }
    }

    fn texts(mutations: &Mutations) -> Vec<String> {
        mutations
            .edits
            .iter()
            .filter_map(|edit| match edit {
                Mutation::CreateTextNode { value, .. } | Mutation::SetText { value, .. } => {
                    Some(value.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn sets_disabled(mutations: &Mutations, disabled: bool) -> bool {
        mutations.edits.iter().any(|edit| {
            matches!(
                edit,
                Mutation::SetAttribute { name: "disabled", value: AttributeValue::Bool(flag), .. }
                    if *flag == disabled
            )
        })
    }

    fn robot_report(low: u32) -> ReportData {
        serde_json::from_value(json!({
            "analysis_type": "robot_individual",
            "data": {
                "Total Operations": 42,
                "Operations by Blockage Level": { "Low": low, "Medium": 8, "High": 3 },
                "Performance Comparison vs All Robots": {
                    "Robot Avg Operation Time": 12.5,
                    "All Robots Avg Operation Time": 14.0,
                    "Robot Avg Waste": 3.1,
                    "All Robots Avg Waste": 2.6
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn export_button_follows_library_and_export_state() {
        let loading = ExportButton::for_state(&LoadState::Pending, false);
        assert_eq!(loading.label, t!("report-loading-libs"));
        assert!(loading.disabled);
        assert!(ExportButton::for_state(&LoadState::NotStarted, false).disabled);

        let ready = ExportButton::for_state(&LoadState::Ready, false);
        assert_eq!(ready.label, t!("report-export"));
        assert!(!ready.disabled);

        let failed = ExportButton::for_state(&LoadState::Failed(LoadError::Unsupported), false);
        assert!(!failed.disabled);

        let busy = ExportButton::for_state(&LoadState::Ready, true);
        assert_eq!(busy.label, t!("report-exporting"));
        assert!(busy.disabled);
    }

    #[test]
    fn opening_draws_charts_and_locks_page_scroll() {
        let (harness, edits) = Harness::open(ScriptRecorder::default(), robot_report(10));

        assert_eq!(harness.charts.created(), 3);
        assert_eq!(harness.page.overflow(), "hidden");
        assert_eq!(harness.page.writes(), vec!["hidden"]);
        assert!(texts(&edits).contains(&t!("report-export")));
        assert_eq!(harness.rasterizer.captures(), 0);
    }

    #[test]
    fn new_report_rebuilds_each_chart_once() {
        let (mut harness, _) = Harness::open(ScriptRecorder::default(), robot_report(10));
        assert_eq!(harness.charts.created(), 3);

        harness.show(Some(robot_report(25)));

        assert_eq!(harness.charts.created(), 6);
        for instance in 0..3 {
            assert_eq!(harness.charts.destroy_count(instance), 1);
        }
        for instance in 3..6 {
            assert_eq!(harness.charts.destroy_count(instance), 0);
        }
        let events = harness.charts.events();
        let position = |event: &str| events.iter().position(|e| e == event).unwrap();
        assert!(position("destroy#0") < position("create#3"));

        let (_, latest) = harness.charts.configs().pop().unwrap();
        assert_eq!(latest.labels.len(), 2);
        // The page stays locked across re-renders.
        assert_eq!(harness.page.writes(), vec!["hidden"]);
    }

    #[test]
    fn closing_destroys_charts_and_restores_page_scroll() {
        let (mut harness, _) = Harness::open(ScriptRecorder::default(), robot_report(10));

        harness.show(None);

        for instance in 0..3 {
            assert_eq!(harness.charts.destroy_count(instance), 1);
        }
        assert_eq!(harness.page.overflow(), "scroll");
        assert_eq!(harness.page.writes(), vec!["hidden", "scroll"]);
    }

    #[test]
    fn export_waits_for_libraries() {
        let (mut harness, edits) = Harness::open(ScriptRecorder::gated(), robot_report(10));

        assert!(texts(&edits).contains(&t!("report-loading-libs")));
        assert!(sets_disabled(&edits, true));
        assert_eq!(harness.charts.created(), 0);
        assert_eq!(harness.rasterizer.captures(), 0);
        assert_eq!(harness.alerts.count(), 0);

        // Chart.js gates the plugin; the remaining three scripts load in parallel.
        harness.scripts.release_all();
        harness.settle();
        harness.scripts.release_all();
        let edits = harness.settle();

        assert_eq!(harness.charts.created(), 3);
        assert!(texts(&edits).contains(&t!("report-export")));
        assert!(sets_disabled(&edits, false));
        assert_eq!(harness.rasterizer.captures(), 0);
    }
}
