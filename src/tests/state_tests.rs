#[cfg(test)]
mod tests {
    use crate::state::{strip_db_prefix, Probe, Sequencer, SharingState, TreeState, ROOT_KEY};
    use crate::types::{GroupMembersDto, PermissionFlags, TreeNodeDto};

    fn node(title: &str, key: &str, folder: bool) -> TreeNodeDto {
        TreeNodeDto {
            title: title.to_string(),
            key: key.to_string(),
            is_folder: folder,
            is_lazy: folder,
        }
    }

    #[test]
    fn test_probe_fail_closed() {
        assert_eq!(Probe::from_result(Ok(true)), Probe::Allowed);
        assert_eq!(Probe::from_result(Ok(false)), Probe::Denied);
        assert_eq!(Probe::from_result(Err("Netzwerkfehler".to_string())), Probe::Denied);
        assert!(!Probe::Loading.is_allowed());
        assert!(!Probe::Denied.is_allowed());
        assert!(Probe::Allowed.is_allowed());
    }

    #[test]
    fn test_sequencer_supersedes_older_tickets() {
        let mut seq = Sequencer::default();
        let first = seq.begin();
        assert!(seq.is_current(first));
        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_strip_db_prefix() {
        assert_eq!(strip_db_prefix("/db/mods/eXide"), "/mods/eXide");
        assert_eq!(strip_db_prefix("/db"), "");
        assert_eq!(strip_db_prefix("/andere/sammlung"), "/andere/sammlung");
    }

    #[test]
    fn test_tree_json_contract() {
        let body = r#"[{"title":"Heimat","key":"/db/mods/users/admin","isFolder":true,"isLazy":true},
                       {"title":"eXide","key":"/db/mods/eXide"}]"#;
        let nodes: Vec<TreeNodeDto> = serde_json::from_str(body).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_folder && nodes[0].is_lazy);
        assert!(!nodes[1].is_folder && !nodes[1].is_lazy);
    }

    #[test]
    fn test_tree_toggle_round_trip() {
        let mut tree = TreeState::new();
        assert!(tree.toggle_expanded("/db/a"));
        assert!(tree.is_expanded("/db/a"));
        assert!(!tree.toggle_expanded("/db/a"));
        assert!(!tree.is_expanded("/db/a"));
    }

    #[test]
    fn test_tree_reload_keeps_expansion_and_active() {
        let mut tree = TreeState::new();
        tree.set_children(ROOT_KEY, vec![node("a", "/db/a", true)]);
        tree.set_children("/db/a", vec![node("b", "/db/a/b", true)]);
        tree.toggle_expanded("/db/a");
        tree.activate("a", "/db/a");

        tree.clear_children();

        assert!(tree.is_expanded("/db/a"));
        assert_eq!(tree.active_key().as_deref(), Some("/db/a"));
        assert_eq!(tree.missing_expanded(), vec!["/db/a".to_string()]);
    }

    #[test]
    fn test_tree_expand_known_folders_reports_missing() {
        let mut tree = TreeState::new();
        tree.set_children(ROOT_KEY, vec![node("a", "/db/a", true), node("doc", "/db/doc.xml", false)]);
        tree.set_children("/db/a", vec![node("b", "/db/a/b", true)]);

        let missing = tree.expand_known_folders();

        // /db/a is cached, /db/a/b is not; the resource never expands
        assert_eq!(missing, vec!["/db/a/b".to_string()]);
        assert!(tree.is_expanded("/db/a"));
        assert!(tree.is_expanded("/db/a/b"));
        assert!(!tree.is_expanded("/db/doc.xml"));
    }

    #[test]
    fn test_tree_known_collections_sorted_unique() {
        let mut tree = TreeState::new();
        tree.set_children(ROOT_KEY, vec![node("b", "/db/b", true), node("a", "/db/a", true)]);
        tree.set_children("/db/b", vec![node("a", "/db/a", true)]);
        assert_eq!(tree.known_collections(), vec!["/db/a".to_string(), "/db/b".to_string()]);
    }

    #[test]
    fn test_sharing_set_groups_selects_first_and_keeps_selection() {
        let mut sharing = SharingState::default();
        sharing.set_groups(vec!["staff".to_string(), "editors".to_string()]);
        assert_eq!(sharing.selected.as_deref(), Some("staff"));

        sharing.select_group("editors");
        sharing.set_groups(vec!["staff".to_string(), "editors".to_string()]);
        assert_eq!(sharing.selected.as_deref(), Some("editors"));
    }

    #[test]
    fn test_sharing_set_groups_keeps_unsaved_groups() {
        let mut sharing = SharingState::default();
        sharing.set_groups(vec!["staff".to_string()]);
        sharing.add_group("projekt-x");
        sharing.set_groups(vec!["staff".to_string()]);
        assert!(sharing.groups.iter().any(|g| g.id == "projekt-x" && g.unsaved));
        // selection survived because the unsaved group is still present
        assert_eq!(sharing.selected.as_deref(), Some("projekt-x"));
    }

    #[test]
    fn test_sharing_members_rebuilt_not_diffed() {
        let mut sharing = SharingState::default();
        sharing.set_groups(vec!["staff".to_string()]);
        sharing.apply_members(&GroupMembersDto {
            owner: true,
            members: vec!["alice".to_string(), "bob".to_string()],
        });
        assert_eq!(sharing.members.len(), 2);
        assert!(sharing.owner);
        assert!(sharing.members.iter().all(|m| m.checked && m.editable));

        // a second response replaces the list entirely
        sharing.apply_members(&GroupMembersDto { owner: false, members: vec!["carol".to_string()] });
        assert_eq!(sharing.members.len(), 1);
        assert!(!sharing.owner);
        assert!(!sharing.members[0].editable);
    }

    #[test]
    fn test_sharing_unsaved_group_implies_ownership() {
        let mut sharing = SharingState::default();
        sharing.add_group("projekt-x");
        // server knows nothing about the group, owner flag stays false
        sharing.apply_members(&GroupMembersDto { owner: false, members: Vec::new() });
        assert!(sharing.owner);
    }

    #[test]
    fn test_add_member_duplicate_is_silent_noop() {
        let mut sharing = SharingState::default();
        sharing.add_group("projekt-x");
        assert!(sharing.add_member("alice"));
        assert!(!sharing.add_member("alice"));
        assert_eq!(sharing.members.iter().filter(|m| m.name == "alice").count(), 1);
    }

    #[test]
    fn test_member_checkbox_respects_editable() {
        let mut sharing = SharingState::default();
        sharing.set_groups(vec!["staff".to_string()]);
        sharing.apply_members(&GroupMembersDto { owner: false, members: vec!["alice".to_string()] });
        sharing.set_member_checked("alice", false);
        assert!(sharing.members[0].checked, "foreign group members cannot be unchecked");
    }

    #[test]
    fn test_group_permissions_write_only_checks_sharing() {
        let mut sharing = SharingState::default();
        sharing.apply_group_permissions(PermissionFlags { read: false, write: true });
        assert!(sharing.group_write);
        assert!(!sharing.group_read);
        // read+write count >= 1 turns the sharing checkbox on
        assert!(sharing.share_with_group);
    }

    #[test]
    fn test_other_permissions_absent_unchecks_everything() {
        let mut sharing = SharingState::default();
        sharing.apply_other_permissions(PermissionFlags { read: true, write: false });
        assert!(sharing.share_with_other);
        sharing.apply_other_permissions(PermissionFlags::default());
        assert!(!sharing.other_read && !sharing.other_write && !sharing.share_with_other);
    }

    #[test]
    fn test_submission_counts_follow_checked_state() {
        let mut sharing = SharingState::default();
        sharing.set_groups(vec!["staff".to_string()]);
        sharing.apply_members(&GroupMembersDto {
            owner: true,
            members: vec!["alice".to_string(), "bob".to_string()],
        });
        sharing.set_member_checked("bob", false);
        sharing.share_with_group = true;
        sharing.group_write = true;
        sharing.share_with_other = true;
        sharing.other_read = true;
        sharing.other_write = true;

        let update = sharing.submission("/db/mods/test");

        assert_eq!(update.collection, "/db/mods/test");
        assert_eq!(update.sharing_with, vec!["group", "other"]);
        assert_eq!(update.group.as_deref(), Some("staff"));
        assert_eq!(update.members, vec!["alice"]);
        assert_eq!(update.group_permissions.len(), 1);
        assert_eq!(update.other_permissions.len(), 2);
    }

    #[test]
    fn test_submission_independent_of_member_order() {
        let mut a = SharingState::default();
        a.set_groups(vec!["staff".to_string()]);
        a.apply_members(&GroupMembersDto {
            owner: true,
            members: vec!["alice".to_string(), "bob".to_string()],
        });
        let mut b = SharingState::default();
        b.set_groups(vec!["staff".to_string()]);
        b.apply_members(&GroupMembersDto {
            owner: true,
            members: vec!["bob".to_string(), "alice".to_string()],
        });
        let ua = a.submission("/db/x");
        let ub = b.submission("/db/x");
        assert_eq!(ua.members.len(), ub.members.len());
        assert_eq!(ua.group_permissions.len(), ub.group_permissions.len());
    }
}
