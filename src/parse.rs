//! Response parsing for the server's text and fragment bodies.
//!
//! The library server answers permission probes with plain text and the
//! sharing reads with small XML fragments (`<owner>`, `<member>`, `<read/>`,
//! `<write/>`). There is no schema; only element presence and text content
//! carry meaning, so a minimal element scanner does the job of a full XML
//! parser here.

use crate::types::{GroupMembersDto, PermissionFlags};

/// `checkuser.xql` answers a probe with a body whose text content is the
/// literal `true` when the check passes. Anything else counts as false.
pub fn probe_is_true(body: &str) -> bool {
    strip_tags(body).trim() == "true"
}

/// Remove all `<...>` spans, keeping the text content.
pub fn strip_tags(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_tag = false;
    for ch in body.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// True if the fragment contains an element named `name`, either
/// self-closing (`<read/>`) or with content (`<read>...</read>`).
pub fn has_element(body: &str, name: &str) -> bool {
    next_element(body, name, 0).is_some()
}

/// Raw inner content of every `<name>...</name>` element, in document
/// order. Self-closing elements contribute an empty string.
pub fn element_contents(body: &str, name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some((content_start, after)) = next_element(body, name, pos) {
        match content_start {
            Some(start) => {
                let close = format!("</{}>", name);
                match body[start..].find(&close) {
                    Some(rel) => {
                        out.push(body[start..start + rel].to_string());
                        pos = start + rel + close.len();
                    }
                    None => {
                        // unterminated element, take the rest
                        out.push(body[start..].to_string());
                        break;
                    }
                }
            }
            None => {
                out.push(String::new());
                pos = after;
            }
        }
    }
    out
}

/// Text content of every `<name>` element, tags stripped and trimmed,
/// empty entries dropped. Used for `<member>`, `<group>` and `<user>`
/// lists.
pub fn name_list(body: &str, name: &str) -> Vec<String> {
    element_contents(body, name)
        .iter()
        .map(|raw| strip_tags(raw).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read/write presence in a `get-group-permissions` /
/// `get-other-permissions` fragment.
pub fn permission_flags(body: &str) -> PermissionFlags {
    PermissionFlags { read: has_element(body, "read"), write: has_element(body, "write") }
}

/// Owner flag and member names of a `get-sharing-group-members` fragment.
///
/// The owner flag appears either as `<owner>true</owner>` or as a nested
/// `<owner><true/></owner>`; both shapes are accepted.
pub fn group_members(body: &str) -> GroupMembersDto {
    let owner = element_contents(body, "owner")
        .iter()
        .any(|raw| raw.contains("<true") || strip_tags(raw).trim() == "true");
    GroupMembersDto { owner, members: name_list(body, "member") }
}

/// `filters.xql` signals an exhausted keyword index by putting the class
/// `complete` on the fragment's result list; the prefix form is hidden
/// once this is seen.
pub fn keywords_complete(html: &str) -> bool {
    let mut pos = 0;
    while let Some(rel) = html[pos..].find("<ul") {
        let start = pos + rel;
        let end = match html[start..].find('>') {
            Some(e) => start + e,
            None => return false,
        };
        let attrs = &html[start..end];
        if attrs.contains("class") && attrs.contains("complete") {
            return true;
        }
        pos = end + 1;
    }
    false
}

/// Locate the next `<name ...>` start tag at or after `byte_pos`.
///
/// Returns `(Some(content_start), _)` for an open tag and `(None,
/// after_tag)` for a self-closing one; `None` when the element does not
/// occur again.
fn next_element(body: &str, name: &str, byte_pos: usize) -> Option<(Option<usize>, usize)> {
    let open = format!("<{}", name);
    let mut pos = byte_pos;
    while let Some(rel) = body[pos..].find(&open) {
        let start = pos + rel;
        let after_name = start + open.len();
        // reject prefix matches such as <members> when scanning for <member>
        let boundary = body[after_name..].chars().next();
        match boundary {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => {
                let tag_end = body[after_name..].find('>').map(|e| after_name + e)?;
                if body[..tag_end].ends_with('/') {
                    return Some((None, tag_end + 1));
                }
                return Some((Some(tag_end + 1), tag_end + 1));
            }
            _ => {
                pos = after_name;
            }
        }
    }
    None
}
