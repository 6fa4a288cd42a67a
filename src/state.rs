//! Per-panel view-models and the pure reducers that map server responses
//! onto them.
//!
//! All real state lives on the server; everything here is a transient
//! projection that is rebuilt from responses. Keeping the reducers free of
//! DOM and network concerns makes the panel behavior testable on the host
//! target.

use std::collections::{HashMap, HashSet};

use crate::types::{GroupMembersDto, PermissionFlags, SharingUpdate, TreeNodeDto};

/// Cache key for the root level of the collection tree.
pub const ROOT_KEY: &str = "";

/// Outcome of a permission probe for one group of controls.
///
/// Controls are visible only in `Allowed`; both `Loading` and `Denied`
/// hide them, so a slow or failed probe never exposes a control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Probe {
    #[default]
    Loading,
    Allowed,
    Denied,
}

impl Probe {
    /// Fail-closed mapping: only the literal server `true` allows.
    pub fn from_result(res: Result<bool, String>) -> Self {
        match res {
            Ok(true) => Probe::Allowed,
            _ => Probe::Denied,
        }
    }

    pub fn is_allowed(self) -> bool {
        matches!(self, Probe::Allowed)
    }
}

/// The three probes driven by a tree activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbePanel {
    /// `can-write-collection`: create-folder / create-resource controls.
    pub writable: Probe,
    /// `can-write-collection-and-not-home`: rename / move / remove.
    pub writable_not_home: Probe,
    /// `is-collection-owner-and-not-home`: sharing control.
    pub owner_not_home: Probe,
}

impl ProbePanel {
    /// A new activation puts every probe back into `Loading`.
    pub fn reset(&mut self) {
        *self = ProbePanel::default();
    }
}

/// Monotonic ticket counter per panel. A response is applied only while
/// its ticket is still the newest one, so a rapid sequence of activations
/// cannot interleave stale UI updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sequencer {
    current: u64,
}

impl Sequencer {
    pub fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current == ticket
    }
}

/// The collection currently activated in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCollection {
    pub title: String,
    /// Full server path including the `/db` prefix.
    pub key: String,
}

impl ActiveCollection {
    /// Path as carried by the search forms: the `/db` prefix is stripped,
    /// the server-side page rendering adds it back.
    pub fn form_path(&self) -> String {
        strip_db_prefix(&self.key)
    }
}

/// Drop a leading `/db` from a collection key.
pub fn strip_db_prefix(key: &str) -> String {
    key.strip_prefix("/db").unwrap_or(key).to_string()
}

/// View-model of the collection tree panel.
///
/// `children` caches fetched child lists per parent key (`ROOT_KEY` for
/// the top level). A reload drops only this cache; expansion state and the
/// active node survive so the reload can re-activate the same node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeState {
    pub children: HashMap<String, Vec<TreeNodeDto>>,
    pub expanded: HashSet<String>,
    pub active: Option<ActiveCollection>,
    pub visible: bool,
}

impl TreeState {
    pub fn new() -> Self {
        TreeState { visible: true, ..Default::default() }
    }

    pub fn children_of(&self, key: &str) -> Option<&[TreeNodeDto]> {
        self.children.get(key).map(|v| v.as_slice())
    }

    pub fn set_children(&mut self, parent: &str, nodes: Vec<TreeNodeDto>) {
        self.children.insert(parent.to_string(), nodes);
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// Toggle a folder; returns true when the node is now expanded (the
    /// caller then fetches missing children).
    pub fn toggle_expanded(&mut self, key: &str) -> bool {
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.to_string());
            true
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Expand every folder known to the cache. Returns the keys whose
    /// children are not cached yet so the caller can fetch them.
    pub fn expand_known_folders(&mut self) -> Vec<String> {
        let folders: Vec<String> = self
            .children
            .values()
            .flatten()
            .filter(|n| n.is_folder || n.is_lazy)
            .map(|n| n.key.clone())
            .collect();
        let mut missing = Vec::new();
        for key in folders {
            if !self.children.contains_key(&key) {
                missing.push(key.clone());
            }
            self.expanded.insert(key);
        }
        missing
    }

    /// Reload semantics: drop the cache, keep expansion and active node.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Expanded keys that need a fetch after a reload.
    pub fn missing_expanded(&self) -> Vec<String> {
        self.expanded.iter().filter(|k| !self.children.contains_key(*k)).cloned().collect()
    }

    pub fn activate(&mut self, title: &str, key: &str) {
        self.active = Some(ActiveCollection { title: title.to_string(), key: key.to_string() });
    }

    pub fn active_key(&self) -> Option<String> {
        self.active.as_ref().map(|a| a.key.clone())
    }

    /// Sorted list of all cached collection keys, used by the move-target
    /// selects.
    pub fn known_collections(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .children
            .values()
            .flatten()
            .filter(|n| n.is_folder || n.is_lazy)
            .map(|n| n.key.clone())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

/// One group option of the sharing dialog. `unsaved` marks a group that
/// was created in this dialog and does not exist on the server yet; such a
/// group is owned by the current user by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOption {
    pub id: String,
    pub label: String,
    pub unsaved: bool,
}

/// One entry of the member list. `editable` mirrors group ownership;
/// members of foreign groups are shown but cannot be unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub name: String,
    pub checked: bool,
    pub editable: bool,
}

/// View-model of the sharing panel: group options, member list and the
/// read/write checkboxes for the group and "other" scopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharingState {
    pub groups: Vec<GroupOption>,
    pub selected: Option<String>,
    pub owner: bool,
    pub members: Vec<MemberEntry>,
    pub share_with_group: bool,
    pub group_read: bool,
    pub group_write: bool,
    pub share_with_other: bool,
    pub other_read: bool,
    pub other_write: bool,
}

impl SharingState {
    /// Install the server's group list (`get-groups`). Locally created
    /// unsaved groups are kept; the selection is preserved when still
    /// present, otherwise the first option is selected.
    pub fn set_groups(&mut self, names: Vec<String>) {
        let unsaved: Vec<GroupOption> = self.groups.iter().filter(|g| g.unsaved).cloned().collect();
        self.groups = names
            .into_iter()
            .map(|n| GroupOption { id: n.clone(), label: n, unsaved: false })
            .collect();
        self.groups.extend(unsaved);
        let still_there = self
            .selected
            .as_ref()
            .map(|sel| self.groups.iter().any(|g| &g.id == sel))
            .unwrap_or(false);
        if !still_there {
            self.selected = self.groups.first().map(|g| g.id.clone());
        }
    }

    pub fn selected_group(&self) -> Option<&GroupOption> {
        let sel = self.selected.as_ref()?;
        self.groups.iter().find(|g| &g.id == sel)
    }

    pub fn selected_is_unsaved(&self) -> bool {
        self.selected_group().map(|g| g.unsaved).unwrap_or(false)
    }

    pub fn select_group(&mut self, id: &str) {
        if self.groups.iter().any(|g| g.id == id) {
            self.selected = Some(id.to_string());
        }
    }

    /// Rebuild the member list from a `get-sharing-group-members`
    /// response. The list is replaced entirely, never diffed. Ownership is
    /// the server flag, or implied for an unsaved local group.
    pub fn apply_members(&mut self, resp: &GroupMembersDto) {
        let owner = resp.owner || self.selected_is_unsaved();
        self.owner = owner;
        self.members.clear();
        for name in &resp.members {
            self.push_member(name, true, owner);
        }
    }

    /// Client-side add from the add-member dialog. A duplicate value is a
    /// silent no-op; returns whether the entry was added.
    pub fn add_member(&mut self, name: &str) -> bool {
        if self.members.iter().any(|m| m.name == name) {
            return false;
        }
        let editable = self.owner;
        self.push_member(name, true, editable);
        true
    }

    fn push_member(&mut self, name: &str, checked: bool, editable: bool) {
        self.members.push(MemberEntry { name: name.to_string(), checked, editable });
    }

    pub fn set_member_checked(&mut self, name: &str, checked: bool) {
        if let Some(m) = self.members.iter_mut().find(|m| m.name == name) {
            if m.editable {
                m.checked = checked;
            }
        }
    }

    /// Client-side group creation: append an unsaved option, select it and
    /// start with an empty, owned member list.
    pub fn add_group(&mut self, name: &str) {
        if name.is_empty() || self.groups.iter().any(|g| g.id == name) {
            return;
        }
        self.groups.push(GroupOption { id: name.to_string(), label: name.to_string(), unsaved: true });
        self.selected = Some(name.to_string());
        self.owner = true;
        self.members.clear();
    }

    /// `get-group-permissions` response: write and read follow element
    /// presence; the sharing checkbox is on when either is present.
    pub fn apply_group_permissions(&mut self, flags: PermissionFlags) {
        self.group_read = flags.read;
        self.group_write = flags.write;
        self.share_with_group = flags.read || flags.write;
    }

    /// `get-other-permissions` response, same mapping without the group
    /// dimension.
    pub fn apply_other_permissions(&mut self, flags: PermissionFlags) {
        self.other_read = flags.read;
        self.other_write = flags.write;
        self.share_with_other = flags.read || flags.write;
    }

    /// Assemble the flat `update-collection-sharing` parameter set from
    /// the checked entries.
    pub fn submission(&self, collection: &str) -> SharingUpdate {
        let mut sharing_with = Vec::new();
        if self.share_with_group {
            sharing_with.push("group".to_string());
        }
        if self.share_with_other {
            sharing_with.push("other".to_string());
        }
        let mut group_permissions = Vec::new();
        if self.group_read {
            group_permissions.push("read".to_string());
        }
        if self.group_write {
            group_permissions.push("write".to_string());
        }
        let mut other_permissions = Vec::new();
        if self.other_read {
            other_permissions.push("read".to_string());
        }
        if self.other_write {
            other_permissions.push("write".to_string());
        }
        SharingUpdate {
            collection: collection.to_string(),
            sharing_with,
            group: self.selected.clone(),
            members: self.members.iter().filter(|m| m.checked).map(|m| m.name.clone()).collect(),
            group_permissions,
            other_permissions,
        }
    }
}
