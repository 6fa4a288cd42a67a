//! Collection tree panel: lazy loading, expand/collapse, reload and the
//! activation fan-out.
//!
//! Activating a node is the synchronization point of the whole page: it
//! propagates the collection path into the search forms and dialogs,
//! refreshes the write/owner controls via `checkuser.xql` and re-derives
//! the sharing checkboxes. After a mutation the tree is reloaded and the
//! previously active node re-activated, which runs the same fan-out again;
//! there is no other consistency mechanism.

use std::collections::HashSet;

use dioxus::prelude::*;

use crate::api;
use crate::dialogs;
use crate::state::{Probe, ProbePanel, Sequencer, SharingState, TreeState, ROOT_KEY};
use crate::ui_utils::{show_toast, tree_layout, warn_stale};

/// Fetch one level of children and install it in the cache.
pub fn load_children(parent: Option<String>, tree: Signal<TreeState>) {
    wasm_bindgen_futures::spawn_local(async move {
        match api::collection_children(parent.as_deref()).await {
            Ok(nodes) => {
                let key = parent.unwrap_or_else(|| ROOT_KEY.to_string());
                let mut tree = tree.clone();
                tree.write().set_children(&key, nodes);
            }
            Err(e) => {
                show_toast(&format!("Sammlungen konnten nicht geladen werden: {}", e));
            }
        }
    });
}

/// Activation fan-out, in fixed order: path propagation (via the
/// view-model, the forms render from it), permission probes, sharing
/// checkbox refresh.
pub fn activate_node(
    title: String,
    key: String,
    tree: Signal<TreeState>,
    probes: Signal<ProbePanel>,
    probe_seq: Signal<Sequencer>,
    sharing: Signal<SharingState>,
    sharing_seq: Signal<Sequencer>,
) {
    {
        let mut tree = tree.clone();
        tree.write().activate(&title, &key);
    }
    let ticket = {
        let mut seq = probe_seq.clone();
        let t = seq.write().begin();
        t
    };
    {
        let mut probes = probes.clone();
        probes.write().reset();
    }
    run_probe("can-write-collection", key.clone(), ticket, probe_seq, probes, |p, o| {
        p.writable = o
    });
    run_probe("can-write-collection-and-not-home", key.clone(), ticket, probe_seq, probes, |p, o| {
        p.writable_not_home = o
    });
    run_probe("is-collection-owner-and-not-home", key.clone(), ticket, probe_seq, probes, |p, o| {
        p.owner_not_home = o
    });
    dialogs::refresh_sharing_checkboxes(key, sharing, sharing_seq);
}

/// One permission probe. The response only lands while its ticket is the
/// newest activation; transport errors count as denied.
fn run_probe(
    action: &'static str,
    collection: String,
    ticket: u64,
    seq: Signal<Sequencer>,
    probes: Signal<ProbePanel>,
    apply: fn(&mut ProbePanel, Probe),
) {
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = Probe::from_result(api::check_user(action, &collection).await);
        if seq.read().is_current(ticket) {
            let mut probes = probes.clone();
            apply(&mut *probes.write(), outcome);
        } else {
            warn_stale("checkuser");
        }
    });
}

/// Full reload: drop the cache, re-fetch the root and every expanded
/// node, then re-activate the previously active node.
pub fn reload_tree(
    tree: Signal<TreeState>,
    probes: Signal<ProbePanel>,
    probe_seq: Signal<Sequencer>,
    sharing: Signal<SharingState>,
    sharing_seq: Signal<Sequencer>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        match api::collection_children(None).await {
            Ok(nodes) => {
                let mut t = tree.clone();
                let mut st = t.write();
                st.clear_children();
                st.set_children(ROOT_KEY, nodes);
            }
            Err(e) => {
                show_toast(&format!("Baum konnte nicht neu geladen werden: {}", e));
                return;
            }
        }
        let expanded = tree.read().missing_expanded();
        for key in expanded {
            if let Ok(nodes) = api::collection_children(Some(&key)).await {
                let mut t = tree.clone();
                t.write().set_children(&key, nodes);
            }
        }
        let active = tree.read().active.clone();
        if let Some(a) = active {
            activate_node(a.title, a.key, tree, probes, probe_seq, sharing, sharing_seq);
        }
    });
}

/// Expand every folder, fetching children level by level until nothing is
/// missing. Failed fetches are not retried.
pub fn expand_all(tree: Signal<TreeState>) {
    wasm_bindgen_futures::spawn_local(async move {
        let mut attempted: HashSet<String> = HashSet::new();
        loop {
            let missing: Vec<String> = {
                let mut t = tree.clone();
                let m = t.write().expand_known_folders();
                m
            };
            let missing: Vec<String> =
                missing.into_iter().filter(|k| attempted.insert(k.clone())).collect();
            if missing.is_empty() {
                break;
            }
            for key in missing {
                if let Ok(nodes) = api::collection_children(Some(&key)).await {
                    let mut t = tree.clone();
                    t.write().set_children(&key, nodes);
                }
            }
        }
    });
}

/// The tree panel: toggle, toolbar and the node list.
pub fn collection_tree_view(
    tree: Signal<TreeState>,
    probes: Signal<ProbePanel>,
    probe_seq: Signal<Sequencer>,
    sharing: Signal<SharingState>,
    sharing_seq: Signal<Sequencer>,
) -> Element {
    let layout = tree_layout(tree.read().visible);
    rsx! {
        div { id: "collection-tree", style: "float:left;{layout.panel_style}",
            div { class: "toolbar",
                button {
                    class: "btn",
                    title: "Baum ein-/ausblenden",
                    onclick: {
                        let tree_signal = tree.clone();
                        move |_| {
                            let current = tree_signal.read().visible;
                            let mut tree_signal = tree_signal.clone();
                            tree_signal.write().visible = !current;
                        }
                    },
                    "≡"
                }
                { layout.tree_visible.then(|| rsx!{
                    button { class: "btn", onclick: {
                            let tree_signal = tree.clone();
                            move |_| { expand_all(tree_signal); }
                        }, "Alle aufklappen" }
                    button { class: "btn", onclick: {
                            let tree_signal = tree.clone();
                            move |_| {
                                let mut tree_signal = tree_signal.clone();
                                tree_signal.write().collapse_all();
                            }
                        }, "Alle zuklappen" }
                    button { class: "btn", onclick: {
                            move |_| { reload_tree(tree, probes, probe_seq, sharing, sharing_seq); }
                        }, "Neu laden" }
                }) }
            }
            { layout.tree_visible.then(|| rsx!{
                div { id: "collection-tree-main",
                    ul { class: "tree-root",
                        { tree_nodes_view(ROOT_KEY.to_string(), tree, probes, probe_seq, sharing, sharing_seq) }
                    }
                }
            }) }
        }
    }
}

/// One cached level of the tree. Recursion happens through the expanded
/// folders; unloaded levels show a loading row while their fetch runs.
fn tree_nodes_view(
    parent: String,
    tree: Signal<TreeState>,
    probes: Signal<ProbePanel>,
    probe_seq: Signal<Sequencer>,
    sharing: Signal<SharingState>,
    sharing_seq: Signal<Sequencer>,
) -> Element {
    let nodes = tree.read().children_of(&parent).map(|s| s.to_vec());
    match nodes {
        None => rsx! {
            li { class: "tree-loading text-muted", "Lade ..." }
        },
        Some(nodes) => rsx! {
            { nodes.into_iter().map(|node| {
                let is_folder = node.is_folder || node.is_lazy;
                let expanded = tree.read().is_expanded(&node.key);
                let is_active = tree.read().active_key().as_deref() == Some(node.key.as_str());
                let row_class = if is_active { "tree-node active" } else { "tree-node" };
                let expander_label = if expanded { "▾" } else { "▸" };
                let key_for_toggle = node.key.clone();
                let key_for_activate = node.key.clone();
                let title_for_activate = node.title.clone();
                let key_for_children = node.key.clone();
                rsx! {
                    li { class: "{row_class}",
                        { is_folder.then(|| rsx!{
                            button { class: "tree-expander", onclick: {
                                    let key = key_for_toggle.clone();
                                    move |_| {
                                        let now_expanded = {
                                            let mut t = tree.clone();
                                            let r = t.write().toggle_expanded(&key);
                                            r
                                        };
                                        if now_expanded && tree.read().children_of(&key).is_none() {
                                            load_children(Some(key.clone()), tree);
                                        }
                                    }
                                }, "{expander_label}" }
                        }) }
                        span { class: "tree-title", onclick: {
                                let title = title_for_activate.clone();
                                let key = key_for_activate.clone();
                                move |_| {
                                    activate_node(title.clone(), key.clone(), tree, probes, probe_seq, sharing, sharing_seq);
                                }
                            }, "{node.title}" }
                        { (is_folder && expanded).then(|| rsx!{
                            ul { class: "tree-children",
                                { tree_nodes_view(key_for_children.clone(), tree, probes, probe_seq, sharing, sharing_seq) }
                            }
                        }) }
                    }
                }
            }) }
        },
    }
}
