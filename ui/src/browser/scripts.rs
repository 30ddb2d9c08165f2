use futures::FutureExt;
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlScriptElement;

use crate::loader::{LoadError, LoadFuture, ScriptHost};

use super::document;

/// Injects `<script>` tags into the document body.
pub(crate) struct DocumentScripts;

impl ScriptHost for DocumentScripts {
    fn has_script(&self, url: &str) -> bool {
        let Some(scripts) = document().map(|doc| doc.get_elements_by_tag_name("script")) else {
            return false;
        };
        (0..scripts.length())
            .filter_map(|index| scripts.item(index))
            .filter_map(|element| element.dyn_into::<HtmlScriptElement>().ok())
            .any(|script| {
                // `src()` is resolved against the page; the attribute keeps the text as written.
                script.src() == url || script.get_attribute("src").as_deref() == Some(url)
            })
    }

    fn inject(&self, url: &str) -> LoadFuture {
        let url = url.to_string();
        async move {
            let doc = document().ok_or_else(|| LoadError::Document("document unavailable".into()))?;
            let script: HtmlScriptElement = doc
                .create_element("script")
                .map_err(|_| LoadError::Document("unable to create script".into()))?
                .dyn_into()
                .map_err(|_| LoadError::Document("script cast failed".into()))?;
            script.set_src(&url);
            script.set_async(true);

            let settled = Promise::new(&mut |resolve, reject| {
                script.set_onload(Some(&resolve));
                script.set_onerror(Some(&reject));
            });

            doc.body()
                .ok_or_else(|| LoadError::Document("missing body".into()))?
                .append_child(&script)
                .map_err(|_| LoadError::Document("unable to append script".into()))?;

            JsFuture::from(settled)
                .await
                .map(|_| ())
                .map_err(|_| LoadError::Script { url })
        }
        .boxed_local()
    }
}
