//! Keeps the page behind the modal from scrolling while the report is open.

use std::cell::RefCell;
use std::rc::Rc;

/// The page's own scroll container (the document body in a browser).
pub trait PageScroll {
    /// Current inline `overflow` style; empty when none is set.
    fn overflow(&self) -> String;
    fn set_overflow(&self, value: &str);
}

/// Hides page overflow on creation and puts the previous value back on release or drop.
pub struct ScrollLock {
    page: Rc<dyn PageScroll>,
    saved: RefCell<Option<String>>,
}

impl ScrollLock {
    pub fn engage(page: Rc<dyn PageScroll>) -> Self {
        let saved = page.overflow();
        page.set_overflow("hidden");
        Self {
            page,
            saved: RefCell::new(Some(saved)),
        }
    }

    /// Restore the saved overflow. An empty saved value becomes `auto`. Later calls do nothing.
    pub fn release(&self) {
        let Some(saved) = self.saved.borrow_mut().take() else {
            return;
        };
        let restored = if saved.is_empty() { "auto" } else { saved.as_str() };
        self.page.set_overflow(restored);
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.release();
    }
}
