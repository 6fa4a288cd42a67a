//! Small DOM helpers and the tree-panel layout computation.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Layout values driven by the tree visibility toggle. Pure so the
/// show/hide round trip is testable; the `form_flag` value is mirrored
/// into both search forms' `collection-tree` hidden fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLayout {
    pub panel_style: &'static str,
    pub content_style: &'static str,
    pub tree_visible: bool,
    pub form_flag: &'static str,
}

pub fn tree_layout(visible: bool) -> TreeLayout {
    if visible {
        TreeLayout {
            panel_style: "width:300px;height:auto;background-color:transparent;",
            content_style: "margin-left:310px;",
            tree_visible: true,
            form_flag: "show",
        }
    } else {
        TreeLayout {
            panel_style: "width:40px;height:400px;background-color:#CCC;",
            content_style: "margin-left:50px;",
            tree_visible: false,
            form_flag: "hidden",
        }
    }
}

// Show a transient toast in the #toasts container
pub fn show_toast(message: &str) {
    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            if let Some(container) = doc.get_element_by_id("toasts") {
                if let Ok(toast) = doc.create_element("div") {
                    toast.set_class_name("toast fade-in");
                    toast.set_text_content(Some(message));
                    if container.append_child(&toast).is_err() {
                        return;
                    }

                    // Auto-remove after timeout
                    let container_clone = container.clone();
                    let toast_clone = toast.clone();
                    let cb = Closure::wrap(Box::new(move || {
                        let _ = container_clone.remove_child(&toast_clone);
                    }) as Box<dyn FnMut()>);
                    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                        cb.as_ref().unchecked_ref(),
                        1600,
                    );
                    cb.forget();
                }
            }
        }
    }
}

/// Submit a rendered form by element id (login form, editor forms). The
/// submit is a real page navigation, matching the server-rendered flow.
pub fn submit_form_by_id(id: &str) {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id(id) {
            if let Ok(form) = el.dyn_into::<web_sys::HtmlFormElement>() {
                let _ = form.submit();
            }
        }
    }
}

/// Full-page navigation (post-removal reload of the results page).
pub fn set_location_href(href: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.location().set_href(href);
    }
}

/// Console warning for dropped stale responses.
pub fn warn_stale(panel: &str) {
    web_sys::console::warn_1(&format!("{}: veraltete Antwort verworfen", panel).into());
}
