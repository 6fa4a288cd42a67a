//! Type definitions for the Lesesaal web UI.
//!
//! This module contains the data structures exchanged with the library
//! server and the per-dialog state structs used by the UI. The server
//! endpoints answer with tree-widget JSON, plain text or small XML
//! fragments; the types here mirror exactly what the client consumes.

use serde::{Deserialize, Serialize};

/// A node of the collection tree as delivered by `collections.xql`.
///
/// Field names follow the tree-widget JSON contract of the server; lazy
/// folder nodes deliver their children only on a follow-up request with
/// `key=<collection key>`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TreeNodeDto {
    pub title: String,
    pub key: String,
    #[serde(default, rename = "isFolder")]
    pub is_folder: bool,
    #[serde(default, rename = "isLazy")]
    pub is_lazy: bool,
}

/// Read/write flags for one sharing scope (a group or "other").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionFlags {
    pub read: bool,
    pub write: bool,
}

/// Result of `get-sharing-group-members`: the server-confirmed owner flag
/// plus the member names of the group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMembersDto {
    pub owner: bool,
    pub members: Vec<String>,
}

/// Flat parameter set for the `update-collection-sharing` POST.
///
/// List-valued fields are sent as repeated form keys; their lengths depend
/// only on which checkboxes are checked, never on entry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharingUpdate {
    pub collection: String,
    pub sharing_with: Vec<String>,
    pub group: Option<String>,
    pub members: Vec<String>,
    pub group_permissions: Vec<String>,
    pub other_permissions: Vec<String>,
}

// ----- Dialog state -----
//
// Every dialog is a `Signal<Option<State>>`: `Some` means open. A failed
// request keeps the dialog open and stores the error text in the state.

/// Create/rename collection dialogs: a single name field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameDialogState {
    pub name: String,
    pub in_progress: bool,
    pub error: Option<String>,
}

/// Move-collection dialog: target collection picked from the known keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveCollectionDialogState {
    pub target: String,
    pub in_progress: bool,
    pub error: Option<String>,
}

/// Remove-collection confirmation dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmDialogState {
    pub in_progress: bool,
    pub error: Option<String>,
}

/// Remove/move resource dialogs: the resource id plus, for moves, the
/// target collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDialogState {
    pub resource: String,
    pub target: String,
    pub in_progress: bool,
    pub error: Option<String>,
}

/// Sharing dialog. The sharing panel's view-model itself
/// ([`crate::state::SharingState`]) lives outside the dialog so checkbox
/// state survives close/reopen; this struct holds only dialog-local bits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharingDialogState {
    /// User names offered by the add-member sub-dialog (`get-users`).
    pub users: Vec<String>,
    pub add_member_open: bool,
    pub add_member_selection: String,
    pub new_group_open: bool,
    pub new_group_name: String,
    pub in_progress: bool,
    pub error: Option<String>,
}

/// Login dialog; `message` shows the probe progress or the server error
/// body verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginDialogState {
    pub user: String,
    pub password: String,
    pub message: Option<String>,
    pub in_progress: bool,
}

/// Index-optimize dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizeDialogState {
    pub pass: String,
    pub message: Option<String>,
    pub in_progress: bool,
}
