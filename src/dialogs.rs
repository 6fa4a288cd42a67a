//! Action dialogs for collections, resources and sharing.
//!
//! Every dialog follows the same protocol: read the fields from its own
//! state, fire the request, and on success close and reload the tree. A
//! failed request keeps the dialog open, shows the error body in an error
//! box and leaves the form values untouched. There are no retries.

use std::rc::Rc;

use dioxus::events::{FormData, MouseData};
use dioxus::prelude::*;

use crate::api;
use crate::state::{Sequencer, SharingState, TreeState};
use crate::types::*;
use crate::ui_utils::{set_location_href, show_toast, warn_stale};

// ----- Sharing refresh (also driven by tree activation) -----

/// Re-derive the sharing checkboxes for a collection: group read/write for
/// the active group (if any, and already saved) and the "other" scope.
/// Both fetches share one ticket; a newer activation or group change
/// supersedes them.
pub fn refresh_sharing_checkboxes(
    collection: String,
    sharing: Signal<SharingState>,
    seq: Signal<Sequencer>,
) {
    let ticket = {
        let mut seq = seq.clone();
        let t = seq.write().begin();
        t
    };
    let selected = sharing.read().selected_group().map(|g| (g.id.clone(), g.unsaved));
    if let Some((group_id, unsaved)) = selected {
        if !unsaved {
            let collection_for_group = collection.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let flags = api::group_permissions(&group_id, &collection_for_group)
                    .await
                    .unwrap_or_default();
                if seq.read().is_current(ticket) {
                    let mut sharing = sharing.clone();
                    sharing.write().apply_group_permissions(flags);
                } else {
                    warn_stale("get-group-permissions");
                }
            });
        }
    }
    wasm_bindgen_futures::spawn_local(async move {
        let flags = api::other_permissions(&collection).await.unwrap_or_default();
        if seq.read().is_current(ticket) {
            let mut sharing = sharing.clone();
            sharing.write().apply_other_permissions(flags);
        } else {
            warn_stale("get-other-permissions");
        }
    });
}

/// Group selection changed: rebuild the member list and the group
/// checkboxes. A locally created, unsaved group has no server state; its
/// member list starts empty and is owned by the current user.
pub fn refresh_group_panel(
    group_id: String,
    collection: Option<String>,
    sharing: Signal<SharingState>,
    seq: Signal<Sequencer>,
) {
    let unsaved = sharing
        .read()
        .groups
        .iter()
        .find(|g| g.id == group_id)
        .map(|g| g.unsaved)
        .unwrap_or(false);
    let ticket = {
        let mut seq = seq.clone();
        let t = seq.write().begin();
        t
    };
    if unsaved {
        let mut sharing = sharing.clone();
        sharing.write().apply_members(&GroupMembersDto { owner: true, members: Vec::new() });
        return;
    }
    {
        let group_id = group_id.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match api::sharing_group_members(&group_id).await {
                Ok(resp) => {
                    if seq.read().is_current(ticket) {
                        let mut sharing = sharing.clone();
                        sharing.write().apply_members(&resp);
                    } else {
                        warn_stale("get-sharing-group-members");
                    }
                }
                Err(e) => {
                    show_toast(&format!("Mitglieder konnten nicht geladen werden: {}", e));
                }
            }
        });
    }
    if let Some(collection) = collection {
        wasm_bindgen_futures::spawn_local(async move {
            let flags = api::group_permissions(&group_id, &collection).await.unwrap_or_default();
            if seq.read().is_current(ticket) {
                let mut sharing = sharing.clone();
                sharing.write().apply_group_permissions(flags);
            } else {
                warn_stale("get-group-permissions");
            }
        });
    }
}

/// Open the sharing dialog and hydrate the group and user choices from
/// the server (the page carries no server-rendered markup to read them
/// from).
pub fn open_sharing_dialog(
    dlg: Signal<Option<SharingDialogState>>,
    sharing: Signal<SharingState>,
    seq: Signal<Sequencer>,
    tree: Signal<TreeState>,
) {
    {
        let mut dlg = dlg.clone();
        dlg.set(Some(SharingDialogState::default()));
    }
    let collection = tree.read().active_key();
    wasm_bindgen_futures::spawn_local(async move {
        match api::list_groups().await {
            Ok(groups) => {
                {
                    let mut sharing = sharing.clone();
                    sharing.write().set_groups(groups);
                }
                let selected = sharing.read().selected.clone();
                if let Some(group_id) = selected {
                    refresh_group_panel(group_id, collection.clone(), sharing, seq);
                }
            }
            Err(e) => {
                let mut dlg = dlg.clone();
                let current = dlg.read().clone();
                if let Some(mut st) = current {
                    st.error = Some(e);
                    dlg.set(Some(st));
                }
            }
        }
        match api::list_users().await {
            Ok(users) => {
                let mut dlg = dlg.clone();
                let current = dlg.read().clone();
                if let Some(mut st) = current {
                    st.users = users;
                    dlg.set(Some(st));
                }
            }
            Err(e) => {
                show_toast(&format!("Benutzerliste konnte nicht geladen werden: {}", e));
            }
        }
    });
}

// ----- Collection dialogs -----

pub fn create_collection_dialog_view(
    dialog: &NameDialogState,
    signal: Signal<Option<NameDialogState>>,
    tree: Signal<TreeState>,
    reload: Rc<dyn Fn()>,
) -> Element {
    let active = tree.read().active.clone();
    let parent_label = active.as_ref().map(|a| a.title.clone()).unwrap_or_default();
    let collection = active.as_ref().map(|a| a.key.clone()).unwrap_or_default();
    let is_running = dialog.in_progress;
    let name_blank = dialog.name.trim().is_empty();
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Neuen Ordner anlegen" }
                span { class: "text-muted", "In Sammlung: " span { class: "collection-path", "{parent_label}" } }
                input {
                    class: "form-control",
                    value: "{dialog.name}",
                    placeholder: "Name des Ordners",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.name = e.value();
                            next.error = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                { dialog_error(dialog.error.as_deref()) }
                { dialog_spinner(is_running, "Lege Ordner an ...") }
                div { style: footer_style(),
                    button { class: "btn", disabled: is_running, onclick: close_handler(signal.clone()), "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: is_running || name_blank,
                        onclick: {
                            let signal = signal.clone();
                            let reload = reload.clone();
                            let snapshot = dialog.clone();
                            let collection = collection.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.error = None;
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let name = snapshot.name.trim().to_string();
                                let collection = collection.clone();
                                let reload = reload.clone();
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::create_collection(&name, &collection).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            show_toast("Ordner wurde angelegt");
                                            reload();
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.error = Some(err.clone());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                            show_toast(&format!("Fehler beim Anlegen: {}", err));
                                        }
                                    }
                                });
                            }
                        },
                        "Anlegen"
                    }
                }
            }
        }
    }
}

pub fn rename_collection_dialog_view(
    dialog: &NameDialogState,
    signal: Signal<Option<NameDialogState>>,
    tree: Signal<TreeState>,
    reload: Rc<dyn Fn()>,
) -> Element {
    let active = tree.read().active.clone();
    let current_label = active.as_ref().map(|a| a.title.clone()).unwrap_or_default();
    let collection = active.as_ref().map(|a| a.key.clone()).unwrap_or_default();
    let is_running = dialog.in_progress;
    let name_blank = dialog.name.trim().is_empty();
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Sammlung umbenennen" }
                span { class: "text-muted", "Aktueller Name: " span { class: "collection-path", "{current_label}" } }
                input {
                    class: "form-control",
                    value: "{dialog.name}",
                    placeholder: "Neuer Name",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.name = e.value();
                            next.error = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                { dialog_error(dialog.error.as_deref()) }
                { dialog_spinner(is_running, "Benenne um ...") }
                div { style: footer_style(),
                    button { class: "btn", disabled: is_running, onclick: close_handler(signal.clone()), "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: is_running || name_blank,
                        onclick: {
                            let signal = signal.clone();
                            let reload = reload.clone();
                            let snapshot = dialog.clone();
                            let collection = collection.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.error = None;
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let name = snapshot.name.trim().to_string();
                                let collection = collection.clone();
                                let reload = reload.clone();
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::rename_collection(&name, &collection).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            show_toast("Sammlung wurde umbenannt");
                                            reload();
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.error = Some(err.clone());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                            show_toast(&format!("Fehler beim Umbenennen: {}", err));
                                        }
                                    }
                                });
                            }
                        },
                        "Umbenennen"
                    }
                }
            }
        }
    }
}

pub fn move_collection_dialog_view(
    dialog: &MoveCollectionDialogState,
    signal: Signal<Option<MoveCollectionDialogState>>,
    tree: Signal<TreeState>,
    reload: Rc<dyn Fn()>,
) -> Element {
    let active = tree.read().active.clone();
    let source_label = active.as_ref().map(|a| a.title.clone()).unwrap_or_default();
    let collection = active.as_ref().map(|a| a.key.clone()).unwrap_or_default();
    let targets = tree.read().known_collections();
    let is_running = dialog.in_progress;
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Sammlung verschieben" }
                span { class: "text-muted", "Sammlung: " span { class: "collection-path", "{source_label}" } }
                select {
                    class: "form-control",
                    onchange: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.target = e.value();
                            next.error = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    },
                    { targets.iter().map(|key| {
                        let selected = dialog.target == *key;
                        let value = key.clone();
                        let label = key.clone();
                        rsx!{ option { value: "{value}", selected: selected, "{label}" } }
                    }) }
                }
                { dialog_error(dialog.error.as_deref()) }
                { dialog_spinner(is_running, "Verschiebe ...") }
                div { style: footer_style(),
                    button { class: "btn", disabled: is_running, onclick: close_handler(signal.clone()), "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: is_running || targets.is_empty(),
                        onclick: {
                            let signal = signal.clone();
                            let reload = reload.clone();
                            let snapshot = dialog.clone();
                            let collection = collection.clone();
                            let targets = targets.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let target = if snapshot.target.is_empty() {
                                    targets.first().cloned().unwrap_or_default()
                                } else {
                                    snapshot.target.clone()
                                };
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.error = None;
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let collection = collection.clone();
                                let reload = reload.clone();
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::move_collection(&target, &collection).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            show_toast("Sammlung wurde verschoben");
                                            reload();
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.error = Some(err.clone());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                            show_toast(&format!("Fehler beim Verschieben: {}", err));
                                        }
                                    }
                                });
                            }
                        },
                        "Verschieben"
                    }
                }
            }
        }
    }
}

pub fn remove_collection_dialog_view(
    dialog: &ConfirmDialogState,
    signal: Signal<Option<ConfirmDialogState>>,
    tree: Signal<TreeState>,
    reload: Rc<dyn Fn()>,
) -> Element {
    let active = tree.read().active.clone();
    let label = active.as_ref().map(|a| a.title.clone()).unwrap_or_default();
    let collection = active.as_ref().map(|a| a.key.clone()).unwrap_or_default();
    let is_running = dialog.in_progress;
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Sammlung löschen" }
                span {
                    "Soll die Sammlung "
                    span { class: "collection-path", "{label}" }
                    " mit allen Ressourcen gelöscht werden?"
                }
                { dialog_error(dialog.error.as_deref()) }
                { dialog_spinner(is_running, "Lösche ...") }
                div { style: footer_style(),
                    button { class: "btn", disabled: is_running, onclick: close_handler(signal.clone()), "Abbrechen" }
                    button {
                        class: "btn btn-danger",
                        disabled: is_running,
                        onclick: {
                            let signal = signal.clone();
                            let reload = reload.clone();
                            let snapshot = dialog.clone();
                            let collection = collection.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.error = None;
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let collection = collection.clone();
                                let reload = reload.clone();
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::remove_collection(&collection).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            show_toast("Sammlung wurde gelöscht");
                                            reload();
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.error = Some(err.clone());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                            show_toast(&format!("Fehler beim Löschen: {}", err));
                                        }
                                    }
                                });
                            }
                        },
                        "Löschen"
                    }
                }
            }
        }
    }
}

// ----- Resource dialogs -----

pub fn remove_resource_dialog_view(
    dialog: &ResourceDialogState,
    signal: Signal<Option<ResourceDialogState>>,
    tree: Signal<TreeState>,
) -> Element {
    let collection = tree.read().active_key().unwrap_or_default();
    let is_running = dialog.in_progress;
    let resource_blank = dialog.resource.trim().is_empty();
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Ressource löschen" }
                input {
                    class: "form-control",
                    value: "{dialog.resource}",
                    placeholder: "Ressourcen-ID",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.resource = e.value();
                            next.error = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                { dialog_error(dialog.error.as_deref()) }
                { dialog_spinner(is_running, "Lösche ...") }
                div { style: footer_style(),
                    button { class: "btn", disabled: is_running, onclick: close_handler(signal.clone()), "Abbrechen" }
                    button {
                        class: "btn btn-danger",
                        disabled: is_running || resource_blank,
                        onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            let collection = collection.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.error = None;
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let resource = snapshot.resource.trim().to_string();
                                let collection = collection.clone();
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::remove_resource(&resource).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            // the results page re-renders server-side
                                            set_location_href(&format!(
                                                "index.xml?reload=true&collection={}",
                                                urlencoding::encode(&collection)
                                            ));
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.error = Some(err.clone());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                            show_toast(&format!("Fehler beim Löschen: {}", err));
                                        }
                                    }
                                });
                            }
                        },
                        "Löschen"
                    }
                }
            }
        }
    }
}

pub fn move_resource_dialog_view(
    dialog: &ResourceDialogState,
    signal: Signal<Option<ResourceDialogState>>,
    tree: Signal<TreeState>,
) -> Element {
    let targets = tree.read().known_collections();
    let is_running = dialog.in_progress;
    let resource_blank = dialog.resource.trim().is_empty();
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Ressource verschieben" }
                input {
                    class: "form-control",
                    value: "{dialog.resource}",
                    placeholder: "Ressourcen-ID",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.resource = e.value();
                            next.error = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                select {
                    class: "form-control",
                    onchange: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.target = e.value();
                            next.error = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    },
                    { targets.iter().map(|key| {
                        let selected = dialog.target == *key;
                        let value = key.clone();
                        let label = key.clone();
                        rsx!{ option { value: "{value}", selected: selected, "{label}" } }
                    }) }
                }
                { dialog_error(dialog.error.as_deref()) }
                { dialog_spinner(is_running, "Verschiebe ...") }
                div { style: footer_style(),
                    button { class: "btn", disabled: is_running, onclick: close_handler(signal.clone()), "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: is_running || resource_blank || targets.is_empty(),
                        onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            let targets = targets.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let target = if snapshot.target.is_empty() {
                                    targets.first().cloned().unwrap_or_default()
                                } else {
                                    snapshot.target.clone()
                                };
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.error = None;
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let resource = snapshot.resource.trim().to_string();
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::move_resource(&target, &resource).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            show_toast("Ressource wurde verschoben");
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.error = Some(err.clone());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                            show_toast(&format!("Fehler beim Verschieben: {}", err));
                                        }
                                    }
                                });
                            }
                        },
                        "Verschieben"
                    }
                }
            }
        }
    }
}

// ----- Sharing dialog -----

pub fn sharing_dialog_view(
    dialog: &SharingDialogState,
    signal: Signal<Option<SharingDialogState>>,
    sharing: Signal<SharingState>,
    sharing_seq: Signal<Sequencer>,
    tree: Signal<TreeState>,
    reload: Rc<dyn Fn()>,
) -> Element {
    let share = sharing.read().clone();
    let active = tree.read().active.clone();
    let title = active.as_ref().map(|a| a.title.clone()).unwrap_or_default();
    let collection = active.as_ref().map(|a| a.key.clone()).unwrap_or_default();
    let is_running = dialog.in_progress;
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Freigabe: {title}" }

                // group scope
                label { class: "checkbox-label",
                    input {
                        r#type: "checkbox",
                        checked: share.share_with_group,
                        oninput: {
                            let current = share.share_with_group;
                            move |_| {
                                let mut sharing = sharing.clone();
                                sharing.write().share_with_group = !current;
                            }
                        }
                    }
                    span { "Mit einer Gruppe teilen" }
                }
                div { class: "sharing-panel",
                    div { class: "toolbar",
                        select {
                            class: "form-control",
                            onchange: {
                                let collection = collection.clone();
                                move |e: Event<FormData>| {
                                    let group_id = e.value();
                                    {
                                        let mut sharing = sharing.clone();
                                        sharing.write().select_group(&group_id);
                                    }
                                    let collection = if collection.is_empty() {
                                        None
                                    } else {
                                        Some(collection.clone())
                                    };
                                    refresh_group_panel(group_id, collection, sharing, sharing_seq);
                                }
                            },
                            { share.groups.iter().map(|g| {
                                let selected = share.selected.as_deref() == Some(g.id.as_str());
                                let value = g.id.clone();
                                let label = if g.unsaved {
                                    format!("{} (neu)", g.label)
                                } else {
                                    g.label.clone()
                                };
                                rsx!{ option { value: "{value}", selected: selected, "{label}" } }
                            }) }
                        }
                        button { class: "btn", onclick: {
                                let signal = signal.clone();
                                let snapshot = dialog.clone();
                                move |_| {
                                    let mut next = snapshot.clone();
                                    next.new_group_open = true;
                                    next.new_group_name = String::new();
                                    let mut signal = signal.clone();
                                    signal.set(Some(next));
                                }
                            }, "Neue Gruppe ..." }
                    }
                    label { class: "checkbox-label",
                        input {
                            r#type: "checkbox",
                            checked: share.group_read,
                            oninput: {
                                let current = share.group_read;
                                move |_| {
                                    let mut sharing = sharing.clone();
                                    sharing.write().group_read = !current;
                                }
                            }
                        }
                        span { "Lesen" }
                    }
                    label { class: "checkbox-label",
                        input {
                            r#type: "checkbox",
                            checked: share.group_write,
                            oninput: {
                                let current = share.group_write;
                                move |_| {
                                    let mut sharing = sharing.clone();
                                    sharing.write().group_write = !current;
                                }
                            }
                        }
                        span { "Schreiben" }
                    }
                    h4 { "Mitglieder" }
                    ul { class: "member-list",
                        { share.members.iter().map(|m| {
                            let name = m.name.clone();
                            let display = m.name.clone();
                            let checked = m.checked;
                            let editable = m.editable;
                            rsx!{
                                li {
                                    label { class: "checkbox-label",
                                        input {
                                            r#type: "checkbox",
                                            checked: checked,
                                            disabled: !editable,
                                            oninput: {
                                                let name = name.clone();
                                                move |_| {
                                                    let mut sharing = sharing.clone();
                                                    sharing.write().set_member_checked(&name, !checked);
                                                }
                                            }
                                        }
                                        span { "{display}" }
                                    }
                                }
                            }
                        }) }
                    }
                    { share.owner.then(|| rsx!{
                        button { class: "btn", onclick: {
                                let signal = signal.clone();
                                let snapshot = dialog.clone();
                                move |_| {
                                    let mut next = snapshot.clone();
                                    next.add_member_open = true;
                                    next.add_member_selection = String::new();
                                    let mut signal = signal.clone();
                                    signal.set(Some(next));
                                }
                            }, "Mitglied hinzufügen ..." }
                    }) }
                }

                // other scope
                label { class: "checkbox-label",
                    input {
                        r#type: "checkbox",
                        checked: share.share_with_other,
                        oninput: {
                            let current = share.share_with_other;
                            move |_| {
                                let mut sharing = sharing.clone();
                                sharing.write().share_with_other = !current;
                            }
                        }
                    }
                    span { "Mit allen anderen teilen" }
                }
                div { class: "sharing-panel",
                    label { class: "checkbox-label",
                        input {
                            r#type: "checkbox",
                            checked: share.other_read,
                            oninput: {
                                let current = share.other_read;
                                move |_| {
                                    let mut sharing = sharing.clone();
                                    sharing.write().other_read = !current;
                                }
                            }
                        }
                        span { "Lesen" }
                    }
                    label { class: "checkbox-label",
                        input {
                            r#type: "checkbox",
                            checked: share.other_write,
                            oninput: {
                                let current = share.other_write;
                                move |_| {
                                    let mut sharing = sharing.clone();
                                    sharing.write().other_write = !current;
                                }
                            }
                        }
                        span { "Schreiben" }
                    }
                }

                { dialog_error(dialog.error.as_deref()) }
                { dialog_spinner(is_running, "Speichere Freigabe ...") }
                div { style: footer_style(),
                    button { class: "btn", disabled: is_running, onclick: close_handler(signal.clone()), "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: is_running,
                        onclick: {
                            let signal = signal.clone();
                            let reload = reload.clone();
                            let snapshot = dialog.clone();
                            let collection = collection.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let update = sharing.read().submission(&collection);
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.error = None;
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let reload = reload.clone();
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::update_collection_sharing(&update).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            show_toast("Freigabe wurde gespeichert");
                                            reload();
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.error = Some(err.clone());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                            show_toast(&format!("Fehler beim Speichern: {}", err));
                                        }
                                    }
                                });
                            }
                        },
                        "Speichern"
                    }
                }
            }

            { dialog.add_member_open.then(|| add_member_dialog_view(dialog, signal.clone(), sharing)) }
            { dialog.new_group_open.then(|| new_group_dialog_view(dialog, signal.clone(), sharing, sharing_seq, tree)) }
        }
    }
}

/// Sub-dialog: pick a user and add it to the member list. A duplicate is
/// a silent no-op, the dialog just closes.
fn add_member_dialog_view(
    dialog: &SharingDialogState,
    signal: Signal<Option<SharingDialogState>>,
    sharing: Signal<SharingState>,
) -> Element {
    let users = dialog.users.clone();
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Mitglied hinzufügen" }
                select {
                    class: "form-control",
                    onchange: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.add_member_selection = e.value();
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    },
                    { users.iter().map(|u| {
                        let selected = dialog.add_member_selection == *u;
                        let value = u.clone();
                        let label = u.clone();
                        rsx!{ option { value: "{value}", selected: selected, "{label}" } }
                    }) }
                }
                div { style: footer_style(),
                    button { class: "btn", onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            move |_| {
                                let mut next = snapshot.clone();
                                next.add_member_open = false;
                                let mut signal = signal.clone();
                                signal.set(Some(next));
                            }
                        }, "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: users.is_empty(),
                        onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            let users = users.clone();
                            move |_| {
                                let chosen = if snapshot.add_member_selection.is_empty() {
                                    users.first().cloned().unwrap_or_default()
                                } else {
                                    snapshot.add_member_selection.clone()
                                };
                                if !chosen.is_empty() {
                                    let mut sharing = sharing.clone();
                                    sharing.write().add_member(&chosen);
                                }
                                let mut next = snapshot.clone();
                                next.add_member_open = false;
                                let mut signal = signal.clone();
                                signal.set(Some(next));
                            }
                        },
                        "Hinzufügen"
                    }
                }
            }
        }
    }
}

/// Sub-dialog: create a group client-side. The group exists on the server
/// only after the sharing form is saved.
fn new_group_dialog_view(
    dialog: &SharingDialogState,
    signal: Signal<Option<SharingDialogState>>,
    sharing: Signal<SharingState>,
    sharing_seq: Signal<Sequencer>,
    tree: Signal<TreeState>,
) -> Element {
    let name_blank = dialog.new_group_name.trim().is_empty();
    rsx! {
        div { style: overlay_style(),
            div { style: dialog_style(),
                h3 { style: "margin:0;", "Neue Gruppe" }
                input {
                    class: "form-control",
                    value: "{dialog.new_group_name}",
                    placeholder: "Name der Gruppe",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.new_group_name = e.value();
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                div { style: footer_style(),
                    button { class: "btn", onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            move |_| {
                                let mut next = snapshot.clone();
                                next.new_group_open = false;
                                let mut signal = signal.clone();
                                signal.set(Some(next));
                            }
                        }, "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: name_blank,
                        onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            move |_| {
                                let name = snapshot.new_group_name.trim().to_string();
                                {
                                    let mut sharing = sharing.clone();
                                    sharing.write().add_group(&name);
                                }
                                let collection = tree.read().active_key();
                                refresh_group_panel(name, collection, sharing, sharing_seq);
                                let mut next = snapshot.clone();
                                next.new_group_open = false;
                                let mut signal = signal.clone();
                                signal.set(Some(next));
                            }
                        },
                        "Anlegen"
                    }
                }
            }
        }
    }
}

// ----- Shared dialog pieces -----

fn close_handler<T: Clone + 'static>(
    signal: Signal<Option<T>>,
) -> impl FnMut(Event<MouseData>) + 'static {
    move |_| {
        let mut signal = signal.clone();
        signal.set(None);
    }
}

fn dialog_error(error: Option<&str>) -> Element {
    rsx! {
        { error.map(|err| rsx!{
            div { class: "alert alert-error", "Fehler: {err}" }
        }) }
    }
}

fn dialog_spinner(running: bool, label: &str) -> Element {
    let label = label.to_string();
    rsx! {
        { running.then(|| rsx!{
            div { class: "dialog-progress",
                span { class: "spinner" }
                span { "{label}" }
            }
        }) }
    }
}

fn overlay_style() -> &'static str {
    "position:fixed;top:0;left:0;width:100vw;height:100vh;padding:16px;display:flex;align-items:center;justify-content:center;background:rgba(6,10,18,0.78);z-index:2000;"
}

fn dialog_style() -> &'static str {
    "background:#0f1117;border:1px solid #1f2937;border-radius:16px;padding:24px;max-width:560px;width:100%;color:#e5e7eb;display:flex;flex-direction:column;gap:14px;max-height:90vh;overflow:auto;"
}

fn footer_style() -> &'static str {
    "display:flex;justify-content:flex-end;gap:12px;margin-top:4px;"
}
