//! Client for the library server endpoints.
//!
//! All URLs are same-origin relative, exactly as the server-rendered pages
//! expect. Collection mutations and sharing reads go through
//! `operations.xql` with an `action` discriminator; permission probes go
//! through `checkuser.xql`. Response bodies are plain text, tree-widget
//! JSON or small XML fragments handled by [`crate::parse`].

use crate::parse;
use crate::types::*;

pub const BASE: &str = ""; // use same-origin relative URLs

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn map_net(e: reqwasm::Error) -> String {
    format!("Netzwerkfehler: {}", e)
}

fn query_string(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// GET against `operations.xql`, returning the raw response body.
async fn operations_get(params: &[(&str, &str)]) -> Result<String, String> {
    let resp = reqwasm::http::Request::get(&url(&format!("operations.xql?{}", query_string(params))))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    resp.text().await.map_err(map_net)
}

// ----- checkuser.xql -----

/// One permission probe. The body's text content must be the literal
/// `true`; everything else (including malformed bodies) is false. Callers
/// additionally treat `Err` as false (fail-closed).
pub async fn check_user(action: &str, collection: &str) -> Result<bool, String> {
    let qs = query_string(&[("action", action), ("collection", collection)]);
    let resp = reqwasm::http::Request::get(&url(&format!("checkuser.xql?{}", qs)))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    let body = resp.text().await.map_err(map_net)?;
    Ok(parse::probe_is_true(&body))
}

/// Credential check before submitting the login form. Any 2xx means the
/// credentials are valid; otherwise the error body is shown verbatim.
pub async fn login(user: &str, password: &str) -> Result<(), String> {
    let qs = query_string(&[("user", user), ("password", password)]);
    let resp = reqwasm::http::Request::get(&url(&format!("checkuser.xql?{}", qs)))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    Ok(())
}

// ----- collections.xql -----

/// Lazy tree children: no `key` fetches the root level.
pub async fn collection_children(key: Option<&str>) -> Result<Vec<TreeNodeDto>, String> {
    let path = match key {
        Some(k) => format!("collections.xql?{}", query_string(&[("key", k)])),
        None => "collections.xql".to_string(),
    };
    let resp = reqwasm::http::Request::get(&url(&path)).send().await.map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    resp.json().await.map_err(map_net)
}

// ----- operations.xql: collection & resource mutations -----

pub async fn create_collection(name: &str, collection: &str) -> Result<(), String> {
    operations_get(&[("action", "create-collection"), ("name", name), ("collection", collection)])
        .await
        .map(|_| ())
}

pub async fn rename_collection(name: &str, collection: &str) -> Result<(), String> {
    operations_get(&[("action", "rename-collection"), ("name", name), ("collection", collection)])
        .await
        .map(|_| ())
}

pub async fn move_collection(path: &str, collection: &str) -> Result<(), String> {
    operations_get(&[("action", "move-collection"), ("path", path), ("collection", collection)])
        .await
        .map(|_| ())
}

pub async fn remove_collection(collection: &str) -> Result<(), String> {
    operations_get(&[("action", "remove-collection"), ("collection", collection)]).await.map(|_| ())
}

pub async fn remove_resource(resource: &str) -> Result<(), String> {
    operations_get(&[("action", "remove-resource"), ("resource", resource)]).await.map(|_| ())
}

pub async fn move_resource(path: &str, resource: &str) -> Result<(), String> {
    operations_get(&[("action", "move-resource"), ("path", path), ("resource", resource)])
        .await
        .map(|_| ())
}

// ----- operations.xql: sharing reads -----

pub async fn sharing_group_members(group_id: &str) -> Result<GroupMembersDto, String> {
    let body =
        operations_get(&[("action", "get-sharing-group-members"), ("groupId", group_id)]).await?;
    Ok(parse::group_members(&body))
}

pub async fn group_permissions(group_id: &str, collection: &str) -> Result<PermissionFlags, String> {
    let body = operations_get(&[
        ("action", "get-group-permissions"),
        ("groupId", group_id),
        ("collection", collection),
    ])
    .await?;
    Ok(parse::permission_flags(&body))
}

pub async fn other_permissions(collection: &str) -> Result<PermissionFlags, String> {
    let body =
        operations_get(&[("action", "get-other-permissions"), ("collection", collection)]).await?;
    Ok(parse::permission_flags(&body))
}

pub async fn list_groups() -> Result<Vec<String>, String> {
    let body = operations_get(&[("action", "get-groups")]).await?;
    Ok(parse::name_list(&body, "group"))
}

pub async fn list_users() -> Result<Vec<String>, String> {
    let body = operations_get(&[("action", "get-users")]).await?;
    Ok(parse::name_list(&body, "user"))
}

// ----- operations.xql: sharing update (POST, list-valued fields) -----

/// Form-encoded body for [`update_collection_sharing`]. List fields are
/// repeated keys; kept separate so the assembly is testable.
pub fn sharing_form_body(req: &SharingUpdate) -> String {
    let mut pairs: Vec<(&str, String)> = vec![
        ("action", "update-collection-sharing".to_string()),
        ("collection", req.collection.clone()),
    ];
    for v in &req.sharing_with {
        pairs.push(("sharingCollectionWith", v.clone()));
    }
    if let Some(g) = &req.group {
        pairs.push(("groupList", g.clone()));
    }
    for m in &req.members {
        pairs.push(("groupMember", m.clone()));
    }
    for p in &req.group_permissions {
        pairs.push(("groupSharingPermissions", p.clone()));
    }
    for p in &req.other_permissions {
        pairs.push(("otherSharingPermissions", p.clone()));
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn update_collection_sharing(req: &SharingUpdate) -> Result<(), String> {
    let resp = reqwasm::http::Request::post(&url("operations.xql"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(sharing_form_body(req))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    Ok(())
}

// ----- filters.xql -----

/// Keyword index terms as an HTML fragment.
pub async fn index_terms(kind: &str, prefix: &str) -> Result<String, String> {
    let qs = query_string(&[("type", kind), ("prefix", prefix)]);
    let resp = reqwasm::http::Request::get(&url(&format!("filters.xql?{}", qs)))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    resp.text().await.map_err(map_net)
}

// ----- autocomplete.xql -----

/// Field-scoped suggestions as a JSON array of strings.
pub async fn autocomplete(term: &str, field: Option<&str>) -> Result<Vec<String>, String> {
    let mut params = vec![("term", term)];
    if let Some(f) = field {
        params.push(("field", f));
    }
    let resp = reqwasm::http::Request::get(&url(&format!("autocomplete.xql?{}", query_string(&params))))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    resp.json().await.map_err(map_net)
}

// ----- user.xql: personal list -----

pub async fn personal_list_add(pos: &str) -> Result<(), String> {
    let qs = query_string(&[("list", "add"), ("pos", pos)]);
    let resp = reqwasm::http::Request::get(&url(&format!("user.xql?{}", qs)))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    Ok(())
}

pub async fn personal_list_remove(id: &str) -> Result<(), String> {
    let qs = query_string(&[("list", "remove"), ("id", id)]);
    let resp = reqwasm::http::Request::get(&url(&format!("user.xql?{}", qs)))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    Ok(())
}

/// Current size of the personal list as an HTML fragment.
pub async fn personal_list_count() -> Result<String, String> {
    let resp = reqwasm::http::Request::get(&url("user.xql?action=count"))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    resp.text().await.map_err(map_net)
}

// ----- optimize.xql -----

/// Trigger an index rebuild; only the HTTP status is inspected.
pub async fn optimize_index(pass: &str) -> Result<(), String> {
    let resp = reqwasm::http::Request::get(&url(&format!("optimize.xql?{}", query_string(&[("pass", pass)]))))
        .send()
        .await
        .map_err(map_net)?;
    if !resp.ok() {
        return Err(resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into()));
    }
    Ok(())
}
