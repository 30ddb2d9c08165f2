use crate::report::PageScroll;

use super::document;

/// Inline `overflow` of `document.body`.
pub(crate) struct BodyScroll;

impl BodyScroll {
    fn body() -> Option<web_sys::HtmlElement> {
        document().and_then(|doc| doc.body())
    }
}

impl PageScroll for BodyScroll {
    fn overflow(&self) -> String {
        Self::body()
            .and_then(|body| body.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }

    fn set_overflow(&self, value: &str) {
        if let Some(body) = Self::body() {
            body.style().set_property("overflow", value).ok();
        }
    }
}
