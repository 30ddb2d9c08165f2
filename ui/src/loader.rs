//! One-shot loading of the browser libraries the report depends on.
//!
//! A [`LibraryLoader`] is a cheap, clonable handle. The first call to
//! [`LibraryLoader::ensure_loaded`] starts the load sequence; every later call (while the
//! sequence is still running or after it settled) gets the same shared future back, so each
//! script is requested at most once and all callers see one outcome.
//!
//! Order: the chart renderer must finish before its label plugin is requested. The
//! rasterizer and the PDF assembler load alongside the chart pair.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture, Shared};
use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::LibrarySet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to load script {url}")]
    Script { url: String },
    #[error("document unavailable: {0}")]
    Document(String),
    #[error("report libraries need a browser environment")]
    Unsupported,
}

pub type LoadFuture = LocalBoxFuture<'static, Result<(), LoadError>>;
pub type SharedLoad = Shared<LoadFuture>;

/// Where scripts get injected. The browser implementation appends `<script>` tags to the
/// document head.
pub trait ScriptHost {
    /// Whether a script element for `url` is already part of the document.
    fn has_script(&self, url: &str) -> bool;

    /// Inject a script element for `url`; resolves on its `load` event, fails on `error`.
    fn inject(&self, url: &str) -> LoadFuture;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotStarted,
    Pending,
    Ready,
    Failed(LoadError),
}

#[derive(Clone)]
pub struct LibraryLoader {
    inner: Rc<LoaderInner>,
}

struct LoaderInner {
    host: Rc<dyn ScriptHost>,
    libraries: LibrarySet,
    load: RefCell<Option<SharedLoad>>,
}

impl LibraryLoader {
    pub fn new(host: Rc<dyn ScriptHost>, libraries: LibrarySet) -> Self {
        Self {
            inner: Rc::new(LoaderInner {
                host,
                libraries,
                load: RefCell::new(None),
            }),
        }
    }

    /// Start the load sequence if needed and return the shared completion future.
    pub fn ensure_loaded(&self) -> SharedLoad {
        let mut slot = self.inner.load.borrow_mut();
        if let Some(existing) = slot.as_ref() {
            return existing.clone();
        }

        let shared = load_sequence(self.inner.host.clone(), self.inner.libraries.clone())
            .boxed_local()
            .shared();
        *slot = Some(shared.clone());
        shared
    }

    pub fn state(&self) -> LoadState {
        match self.inner.load.borrow().as_ref() {
            None => LoadState::NotStarted,
            Some(load) => match load.peek() {
                None => LoadState::Pending,
                Some(Ok(())) => LoadState::Ready,
                Some(Err(err)) => LoadState::Failed(err.clone()),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }
}

impl fmt::Debug for LibraryLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryLoader")
            .field("libraries", &self.inner.libraries)
            .field("state", &self.state())
            .finish()
    }
}

// Loaders compare by identity; two handles are equal when they share the same load.
impl PartialEq for LibraryLoader {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

async fn load_sequence(host: Rc<dyn ScriptHost>, libraries: LibrarySet) -> Result<(), LoadError> {
    let chart_pair = async {
        load_script(host.as_ref(), &libraries.chart).await?;
        load_script(host.as_ref(), &libraries.chart_labels).await
    };
    let rasterizer = load_script(host.as_ref(), &libraries.rasterizer);
    let pdf = load_script(host.as_ref(), &libraries.pdf);

    match future::try_join3(chart_pair, rasterizer, pdf).await {
        Ok(_) => {
            debug!("report libraries ready");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "report libraries failed to load");
            Err(err)
        }
    }
}

fn load_script(host: &dyn ScriptHost, url: &str) -> LoadFuture {
    if host.has_script(url) {
        debug!(url, "script already present");
        return future::ready(Ok(())).boxed_local();
    }
    debug!(url, "injecting script");
    host.inject(url)
}

/// Host for targets without a document; every injection fails.
#[derive(Debug, Default)]
pub struct UnsupportedHost;

impl ScriptHost for UnsupportedHost {
    fn has_script(&self, _url: &str) -> bool {
        false
    }

    fn inject(&self, _url: &str) -> LoadFuture {
        future::ready(Err(LoadError::Unsupported)).boxed_local()
    }
}
