use std::rc::Rc;

use dioxus::events::FormData;
use dioxus::prelude::*;
use dioxus_router::*;

mod api;
mod dialogs;
mod parse;
mod state;
mod tree;
mod types;
mod ui_utils;

#[cfg(test)]
mod tests;

use state::{ProbePanel, Sequencer, SharingState, TreeState};
use ui_utils::{show_toast, submit_form_by_id, tree_layout};

// ----- Routing -----
#[derive(Routable, Clone, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/merkliste")]
    Merkliste {},
}

pub fn main() {
    console_error_panic_hook::set_once();
    dioxus_web::launch::launch(app, vec![], Default::default());
}

fn app() -> Element {
    rsx! {
        div { // root wrapper
            // App Header
            div { class: "app-header",
                div { class: "container",
                    div { class: "brand",
                        span { "📚 Lesesaal" }
                    }
                    nav {
                        Link { to: Route::Home {}, "Suche" }
                        Link { to: Route::Merkliste {}, "Merkliste" }
                    }
                }
            }
            // App Content (Router)
            Router::<Route> {}
            // Toast container for notifications
            div { id: "toasts", class: "toast-container" }
        }
    }
}

// ----- Home: Baum, Suche, Aktionen -----
#[component]
fn Home() -> Element {
    // Baum- und Freigabe-Zustand (ein View-Model pro Panel)
    let tree_state = use_signal(TreeState::new);
    let probes = use_signal(ProbePanel::default);
    let probe_seq = use_signal(Sequencer::default);
    let sharing = use_signal(SharingState::default);
    let sharing_seq = use_signal(Sequencer::default);

    // Dialoge
    let create_dialog = use_signal(|| None as Option<types::NameDialogState>);
    let rename_dialog = use_signal(|| None as Option<types::NameDialogState>);
    let move_dialog = use_signal(|| None as Option<types::MoveCollectionDialogState>);
    let remove_dialog = use_signal(|| None as Option<types::ConfirmDialogState>);
    let remove_resource_dialog = use_signal(|| None as Option<types::ResourceDialogState>);
    let move_resource_dialog = use_signal(|| None as Option<types::ResourceDialogState>);
    let sharing_dialog = use_signal(|| None as Option<types::SharingDialogState>);
    let login_dialog = use_signal(|| None as Option<types::LoginDialogState>);
    let optimize_dialog = use_signal(|| None as Option<types::OptimizeDialogState>);

    // Suche
    let simple_term = use_signal(String::new);
    let adv_field = use_signal(|| "title".to_string());
    let adv_term = use_signal(String::new);

    // Stichwort-Panel
    let keyword_prefix = use_signal(String::new);
    let keywords_html = use_signal(String::new);
    let keyword_form_visible = use_signal(|| true);

    // Wurzelebene des Baums initial laden
    use_effect(move || {
        tree::load_children(None, tree_state);
    });

    // Ein Reload-Pfad für alle Mutationen: Baum neu laden und den aktiven
    // Knoten reaktivieren (stößt Probes und Freigabe-Refresh erneut an)
    let reload_tree_cb: Rc<dyn Fn()> = Rc::new(move || {
        tree::reload_tree(tree_state, probes, probe_seq, sharing, sharing_seq);
    });

    let layout = tree_layout(tree_state.read().visible);
    let probe_panel = *probes.read();
    let active = tree_state.read().active.clone();
    let active_title = active.as_ref().map(|a| a.title.clone()).unwrap_or_default();
    let collection_field = active.as_ref().map(|a| a.form_path()).unwrap_or_default();
    let active_server_path = active.as_ref().map(|a| a.key.clone()).unwrap_or_default();
    let login_state = login_dialog.read().clone().unwrap_or_default();

    rsx! {
        section { class: "panel",
            { tree::collection_tree_view(tree_state, probes, probe_seq, sharing, sharing_seq) }

            div { id: "main-content", style: "{layout.content_style}",
                // Sitzung & Pflege
                div { class: "toolbar",
                    button { class: "btn", onclick: {
                            let login_dialog = login_dialog.clone();
                            move |_| {
                                let mut login_dialog = login_dialog.clone();
                                login_dialog.set(Some(types::LoginDialogState::default()));
                            }
                        }, "Anmelden" }
                    button { class: "btn", onclick: {
                            let optimize_dialog = optimize_dialog.clone();
                            move |_| {
                                let mut optimize_dialog = optimize_dialog.clone();
                                optimize_dialog.set(Some(types::OptimizeDialogState::default()));
                            }
                        }, "Index optimieren ..." }
                }

                // Aktive Sammlung & Aktionen (Sichtbarkeit folgt den Probes)
                div { class: "collection-actions",
                    { active.as_ref().map(|_| rsx!{
                        span { class: "text-muted",
                            "Aktive Sammlung: "
                            span { class: "collection-path", "{active_title}" }
                            " ({collection_field})"
                        }
                    }) }
                    div { class: "toolbar",
                        { probe_panel.writable.is_allowed().then(|| rsx!{
                            button { class: "btn", onclick: {
                                    let create_dialog = create_dialog.clone();
                                    move |_| {
                                        let mut create_dialog = create_dialog.clone();
                                        create_dialog.set(Some(types::NameDialogState::default()));
                                    }
                                }, "Neuer Ordner ..." }
                            button { class: "btn", onclick: move |_| { submit_form_by_id("new-resource-form"); },
                                "Neue Ressource" }
                            button { class: "btn", onclick: move |_| { submit_form_by_id("add-related-form"); },
                                "Verwandte Ressource" }
                        }) }
                        { probe_panel.writable_not_home.is_allowed().then(|| rsx!{
                            button { class: "btn", onclick: {
                                    let rename_dialog = rename_dialog.clone();
                                    move |_| {
                                        let mut rename_dialog = rename_dialog.clone();
                                        rename_dialog.set(Some(types::NameDialogState::default()));
                                    }
                                }, "Umbenennen ..." }
                            button { class: "btn", onclick: {
                                    let move_dialog = move_dialog.clone();
                                    move |_| {
                                        let mut move_dialog = move_dialog.clone();
                                        move_dialog.set(Some(types::MoveCollectionDialogState::default()));
                                    }
                                }, "Verschieben ..." }
                            button { class: "btn btn-danger", onclick: {
                                    let remove_dialog = remove_dialog.clone();
                                    move |_| {
                                        let mut remove_dialog = remove_dialog.clone();
                                        remove_dialog.set(Some(types::ConfirmDialogState::default()));
                                    }
                                }, "Löschen ..." }
                        }) }
                        { probe_panel.owner_not_home.is_allowed().then(|| rsx!{
                            button { class: "btn", onclick: {
                                    move |_| {
                                        dialogs::open_sharing_dialog(sharing_dialog, sharing, sharing_seq, tree_state);
                                    }
                                }, "Freigabe ..." }
                        }) }
                        button { class: "btn", onclick: {
                                let remove_resource_dialog = remove_resource_dialog.clone();
                                move |_| {
                                    let mut remove_resource_dialog = remove_resource_dialog.clone();
                                    remove_resource_dialog.set(Some(types::ResourceDialogState::default()));
                                }
                            }, "Ressource löschen ..." }
                        button { class: "btn", onclick: {
                                let move_resource_dialog = move_resource_dialog.clone();
                                move |_| {
                                    let mut move_resource_dialog = move_resource_dialog.clone();
                                    move_resource_dialog.set(Some(types::ResourceDialogState::default()));
                                }
                            }, "Ressource verschieben ..." }
                    }
                }

                // Einfache Suche: versteckte Felder spiegeln Baumzustand,
                // damit die servergerenderte Trefferseite ihn übernimmt
                form { id: "simple-search-form", action: "index.xml", method: "get",
                    input { r#type: "hidden", name: "collection", value: "{collection_field}" }
                    input { r#type: "hidden", name: "collection-tree", value: "{layout.form_flag}" }
                    div { class: "input-group",
                        AutocompleteInput {
                            name: "input".to_string(),
                            placeholder: "Suchbegriff".to_string(),
                            value: simple_term,
                            field: None,
                        }
                        div { class: "input-group-append",
                            button { class: "btn btn-primary", r#type: "submit", "Suchen" }
                        }
                    }
                }

                // Erweiterte Suche
                details {
                    summary { "Erweiterte Suche" }
                    form { id: "advanced-search-form", action: "index.xml", method: "get",
                        input { r#type: "hidden", name: "collection", value: "{collection_field}" }
                        input { r#type: "hidden", name: "collection-tree", value: "{layout.form_flag}" }
                        div { class: "input-group",
                            select { class: "form-control", name: "operator1",
                                option { value: "and", "und" }
                                option { value: "or", "oder" }
                                option { value: "not", "nicht" }
                            }
                            select { class: "form-control", name: "field1",
                                onchange: {
                                    let adv_field = adv_field.clone();
                                    move |e: Event<FormData>| {
                                        let mut adv_field = adv_field.clone();
                                        adv_field.set(e.value());
                                    }
                                },
                                option { value: "title", "Titel" }
                                option { value: "author", "Autor" }
                                option { value: "subject", "Thema" }
                                option { value: "all", "Alle Felder" }
                            }
                            AutocompleteInput {
                                name: "input1".to_string(),
                                placeholder: "Suchbegriff".to_string(),
                                value: adv_term,
                                field: Some(adv_field.read().clone()),
                            }
                            div { class: "input-group-append",
                                button { class: "btn btn-primary", r#type: "submit", "Suchen" }
                            }
                        }
                    }
                }

                // Stichwort-Index
                div { id: "keywords", class: "panel",
                    h3 { "Stichwörter" }
                    { keyword_form_visible.read().clone().then(|| rsx!{
                        div { class: "input-group",
                            input { class: "form-control", name: "input-keyword-prefix",
                                value: "{keyword_prefix}", placeholder: "Präfix",
                                oninput: {
                                    let keyword_prefix = keyword_prefix.clone();
                                    move |e: Event<FormData>| {
                                        let mut keyword_prefix = keyword_prefix.clone();
                                        keyword_prefix.set(e.value());
                                    }
                                }
                            }
                            div { class: "input-group-append",
                                button { class: "btn", r#type: "button", onclick: {
                                        let keyword_prefix = keyword_prefix.clone();
                                        move |_| {
                                            load_index_terms(
                                                keyword_prefix.read().clone(),
                                                keywords_html,
                                                keyword_form_visible,
                                            );
                                        }
                                    }, "Anzeigen" }
                            }
                        }
                    }) }
                    div { id: "keywords-result", dangerous_inner_html: "{keywords_html}" }
                }

                // Editor-Formulare (unsichtbar; Absenden ist eine echte Navigation)
                form { id: "new-resource-form", action: "../edit/edit.xq", method: "get", style: "display:none",
                    input { r#type: "hidden", name: "type", value: "book-chapter" }
                    input { r#type: "hidden", name: "collection", value: "{active_server_path}" }
                }
                form { id: "add-related-form", action: "../edit/edit.xq", method: "get", style: "display:none",
                    input { r#type: "hidden", name: "type", value: "book-chapter" }
                    input { r#type: "hidden", name: "collection", value: "{active_server_path}" }
                    input { r#type: "hidden", name: "host", value: "" }
                }
                form { id: "login-form", action: "index.xml", method: "post", style: "display:none",
                    input { r#type: "hidden", name: "user", value: "{login_state.user}" }
                    input { r#type: "hidden", name: "password", value: "{login_state.password}" }
                }
            }

            // Dialoge
            { create_dialog.read().as_ref().map(|st| dialogs::create_collection_dialog_view(st, create_dialog.clone(), tree_state, reload_tree_cb.clone())) }
            { rename_dialog.read().as_ref().map(|st| dialogs::rename_collection_dialog_view(st, rename_dialog.clone(), tree_state, reload_tree_cb.clone())) }
            { move_dialog.read().as_ref().map(|st| dialogs::move_collection_dialog_view(st, move_dialog.clone(), tree_state, reload_tree_cb.clone())) }
            { remove_dialog.read().as_ref().map(|st| dialogs::remove_collection_dialog_view(st, remove_dialog.clone(), tree_state, reload_tree_cb.clone())) }
            { remove_resource_dialog.read().as_ref().map(|st| dialogs::remove_resource_dialog_view(st, remove_resource_dialog.clone(), tree_state)) }
            { move_resource_dialog.read().as_ref().map(|st| dialogs::move_resource_dialog_view(st, move_resource_dialog.clone(), tree_state)) }
            { sharing_dialog.read().as_ref().map(|st| dialogs::sharing_dialog_view(st, sharing_dialog.clone(), sharing, sharing_seq, tree_state, reload_tree_cb.clone())) }
            { login_dialog.read().as_ref().map(|st| login_dialog_view(st, login_dialog.clone())) }
            { optimize_dialog.read().as_ref().map(|st| optimize_dialog_view(st, optimize_dialog.clone())) }
        }
    }
}

/// Keyword index terms from `filters.xql`; a `complete` marker on the
/// result list hides the prefix form.
fn load_index_terms(
    prefix: String,
    html: Signal<String>,
    form_visible: Signal<bool>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        match api::index_terms("keywords", &prefix).await {
            Ok(fragment) => {
                if parse::keywords_complete(&fragment) {
                    let mut form_visible = form_visible.clone();
                    form_visible.set(false);
                }
                let mut html = html.clone();
                html.set(fragment);
            }
            Err(e) => {
                show_toast(&format!("Stichwortliste konnte nicht geladen werden: {}", e));
            }
        }
    });
}

// ----- Autocomplete -----

/// Suggestions from `autocomplete.xql` for terms of length >= 3, debounced
/// and sequence-guarded. In the advanced form the sibling field select
/// scopes the suggestions.
#[component]
fn AutocompleteInput(
    name: String,
    placeholder: String,
    value: Signal<String>,
    field: Option<String>,
) -> Element {
    let suggestions = use_signal(Vec::<String>::new);
    let open = use_signal(|| false);
    let seq = use_signal(Sequencer::default);
    rsx! {
        div { class: "autocomplete",
            input {
                class: "form-control",
                name: "{name}",
                placeholder: "{placeholder}",
                value: "{value}",
                autocomplete: "off",
                oninput: {
                    let field = field.clone();
                    move |e: Event<FormData>| {
                        let term = e.value();
                        {
                            let mut value = value.clone();
                            value.set(term.clone());
                        }
                        if term.trim().len() < 3 {
                            let mut open = open.clone();
                            open.set(false);
                            return;
                        }
                        let ticket = {
                            let mut seq = seq.clone();
                            let t = seq.write().begin();
                            t
                        };
                        let field = field.clone();
                        spawn(async move {
                            gloo_timers::future::TimeoutFuture::new(250).await;
                            if !seq.read().is_current(ticket) {
                                return;
                            }
                            match api::autocomplete(term.trim(), field.as_deref()).await {
                                Ok(list) => {
                                    if seq.read().is_current(ticket) {
                                        let mut suggestions = suggestions.clone();
                                        suggestions.set(list);
                                        let mut open = open.clone();
                                        open.set(true);
                                    } else {
                                        ui_utils::warn_stale("autocomplete");
                                    }
                                }
                                Err(_) => {}
                            }
                        });
                    }
                }
            }
            { (*open.read() && !suggestions.read().is_empty()).then(|| rsx!{
                ul { class: "autocomplete-list",
                    { suggestions.read().clone().into_iter().map(|s| {
                        let pick = s.clone();
                        rsx!{
                            li { onclick: move |_| {
                                    {
                                        let mut value = value.clone();
                                        value.set(pick.clone());
                                    }
                                    let mut open = open.clone();
                                    open.set(false);
                                }, "{s}" }
                        }
                    }) }
                }
            }) }
        }
    }
}

// ----- Login & Index-Pflege -----

fn login_dialog_view(
    dialog: &types::LoginDialogState,
    signal: Signal<Option<types::LoginDialogState>>,
) -> Element {
    let is_running = dialog.in_progress;
    rsx! {
        div { style: "position:fixed;top:0;left:0;width:100vw;height:100vh;padding:16px;display:flex;align-items:center;justify-content:center;background:rgba(6,10,18,0.78);z-index:2000;",
            div { id: "login-dialog", style: "background:#0f1117;border:1px solid #1f2937;border-radius:16px;padding:24px;max-width:420px;width:100%;color:#e5e7eb;display:flex;flex-direction:column;gap:14px;",
                h3 { style: "margin:0;", "Anmelden" }
                input {
                    class: "form-control",
                    value: "{dialog.user}",
                    placeholder: "Benutzername",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.user = e.value();
                            next.message = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                input {
                    class: "form-control",
                    r#type: "password",
                    value: "{dialog.password}",
                    placeholder: "Passwort",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.password = e.value();
                            next.message = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                { dialog.message.as_ref().map(|msg| rsx!{
                    div { id: "login-message", class: "alert", "{msg}" }
                }) }
                div { style: "display:flex;justify-content:flex-end;gap:12px;",
                    button { class: "btn", disabled: is_running, onclick: {
                            let signal = signal.clone();
                            move |_| {
                                let mut signal = signal.clone();
                                signal.set(None);
                            }
                        }, "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: is_running,
                        onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.message = Some("Wird geprüft ...".to_string());
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::login(&inflight.user, &inflight.password).await {
                                        Ok(()) => {
                                            // gültige Zugangsdaten: das echte Formular
                                            // absenden, die Seite lädt neu
                                            submit_form_by_id("login-form");
                                        }
                                        Err(err) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.message =
                                                Some(format!("Anmeldung fehlgeschlagen: {}", err));
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                        }
                                    }
                                });
                            }
                        },
                        "Anmelden"
                    }
                }
            }
        }
    }
}

fn optimize_dialog_view(
    dialog: &types::OptimizeDialogState,
    signal: Signal<Option<types::OptimizeDialogState>>,
) -> Element {
    let is_running = dialog.in_progress;
    rsx! {
        div { style: "position:fixed;top:0;left:0;width:100vw;height:100vh;padding:16px;display:flex;align-items:center;justify-content:center;background:rgba(6,10,18,0.78);z-index:2000;",
            div { id: "optimize-dialog", style: "background:#0f1117;border:1px solid #1f2937;border-radius:16px;padding:24px;max-width:420px;width:100%;color:#e5e7eb;display:flex;flex-direction:column;gap:14px;",
                h3 { style: "margin:0;", "Index neu aufbauen" }
                span { class: "text-muted", "Der Neuaufbau kann einige Minuten dauern." }
                input {
                    class: "form-control",
                    r#type: "password",
                    value: "{dialog.pass}",
                    placeholder: "Administrator-Passwort",
                    oninput: {
                        let signal = signal.clone();
                        let snapshot = dialog.clone();
                        move |e: Event<FormData>| {
                            let mut next = snapshot.clone();
                            next.pass = e.value();
                            next.message = None;
                            let mut signal = signal.clone();
                            signal.set(Some(next));
                        }
                    }
                }
                { dialog.message.as_ref().map(|msg| rsx!{
                    div { id: "optimize-message", class: "alert", "{msg}" }
                }) }
                div { style: "display:flex;justify-content:flex-end;gap:12px;",
                    button { class: "btn", disabled: is_running, onclick: {
                            let signal = signal.clone();
                            move |_| {
                                let mut signal = signal.clone();
                                signal.set(None);
                            }
                        }, "Abbrechen" }
                    button {
                        class: "btn btn-primary",
                        disabled: is_running,
                        onclick: {
                            let signal = signal.clone();
                            let snapshot = dialog.clone();
                            move |_| {
                                if snapshot.in_progress {
                                    return;
                                }
                                let mut inflight = snapshot.clone();
                                inflight.in_progress = true;
                                inflight.message = Some("Läuft ...".to_string());
                                {
                                    let mut signal = signal.clone();
                                    signal.set(Some(inflight.clone()));
                                }
                                let signal_async = signal.clone();
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::optimize_index(&inflight.pass).await {
                                        Ok(()) => {
                                            let mut signal = signal_async.clone();
                                            signal.set(None);
                                            show_toast("Index wurde neu aufgebaut");
                                        }
                                        Err(_) => {
                                            let mut updated = inflight.clone();
                                            updated.in_progress = false;
                                            updated.message =
                                                Some("Fehler beim Optimieren!".to_string());
                                            let mut signal = signal_async.clone();
                                            signal.set(Some(updated));
                                        }
                                    }
                                });
                            }
                        },
                        "Starten"
                    }
                }
            }
        }
    }
}

// ----- Merkliste -----
#[component]
fn Merkliste() -> Element {
    let count_html = use_signal(String::new);
    let pos = use_signal(String::new);
    let entry_id = use_signal(String::new);

    // Zähler beim Betreten der Seite laden
    use_effect(move || {
        refresh_personal_count(count_html);
    });

    rsx! {
        section { class: "panel",
            h2 { "Merkliste" }
            div { class: "toolbar",
                span { "Gespeicherte Einträge: " }
                span { id: "personal-list-size", dangerous_inner_html: "{count_html}" }
            }
            div { class: "input-group",
                input { class: "form-control", value: "{pos}", placeholder: "Trefferposition",
                    oninput: {
                        let pos = pos.clone();
                        move |e: Event<FormData>| {
                            let mut pos = pos.clone();
                            pos.set(e.value());
                        }
                    }
                }
                div { class: "input-group-append",
                    button { class: "btn", onclick: {
                            let pos = pos.clone();
                            move |_| {
                                let value = pos.read().trim().to_string();
                                if value.is_empty() {
                                    show_toast("Bitte eine Trefferposition angeben");
                                    return;
                                }
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::personal_list_add(&value).await {
                                        Ok(()) => {
                                            show_toast("Eintrag wurde gespeichert");
                                            refresh_personal_count(count_html);
                                        }
                                        Err(e) => {
                                            show_toast(&format!("Fehler beim Speichern: {}", e));
                                        }
                                    }
                                });
                            }
                        }, "Speichern" }
                }
            }
            div { class: "input-group",
                input { class: "form-control", value: "{entry_id}", placeholder: "Eintrag-ID",
                    oninput: {
                        let entry_id = entry_id.clone();
                        move |e: Event<FormData>| {
                            let mut entry_id = entry_id.clone();
                            entry_id.set(e.value());
                        }
                    }
                }
                div { class: "input-group-append",
                    button { class: "btn btn-danger", onclick: {
                            let entry_id = entry_id.clone();
                            move |_| {
                                let value = entry_id.read().trim().to_string();
                                if value.is_empty() {
                                    show_toast("Bitte eine Eintrag-ID angeben");
                                    return;
                                }
                                wasm_bindgen_futures::spawn_local(async move {
                                    match api::personal_list_remove(&value).await {
                                        Ok(()) => {
                                            show_toast("Eintrag wurde entfernt");
                                            refresh_personal_count(count_html);
                                        }
                                        Err(e) => {
                                            show_toast(&format!("Fehler beim Entfernen: {}", e));
                                        }
                                    }
                                });
                            }
                        }, "Entfernen" }
                }
            }
        }
    }
}

fn refresh_personal_count(count_html: Signal<String>) {
    wasm_bindgen_futures::spawn_local(async move {
        match api::personal_list_count().await {
            Ok(fragment) => {
                let mut count_html = count_html.clone();
                count_html.set(fragment);
            }
            Err(e) => {
                show_toast(&format!("Merklisten-Zähler konnte nicht geladen werden: {}", e));
            }
        }
    });
}
