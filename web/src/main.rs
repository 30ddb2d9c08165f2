use dioxus::prelude::*;

use ui::views::ReportDemo;
use ui::{ReportServices, ReportSettings};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    // One service set (and so one library load) for the lifetime of the page.
    use_context_provider(|| ReportServices::for_platform(ReportSettings::default()));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        ReportDemo {}
    }
}
