#[cfg(test)]
mod tests {
    use crate::api::sharing_form_body;
    use crate::types::SharingUpdate;

    fn count_key(body: &str, key: &str) -> usize {
        body.split('&').filter(|pair| pair.starts_with(&format!("{}=", key))).count()
    }

    #[test]
    fn test_sharing_form_body_action_and_collection() {
        let body = sharing_form_body(&SharingUpdate {
            collection: "/db/mods/test".to_string(),
            ..Default::default()
        });
        assert!(body.starts_with("action=update-collection-sharing&"));
        assert!(body.contains("collection=%2Fdb%2Fmods%2Ftest"));
    }

    #[test]
    fn test_sharing_form_body_repeats_list_keys() {
        let body = sharing_form_body(&SharingUpdate {
            collection: "/db/x".to_string(),
            sharing_with: vec!["group".to_string(), "other".to_string()],
            group: Some("staff".to_string()),
            members: vec!["alice".to_string(), "bob".to_string()],
            group_permissions: vec!["write".to_string()],
            other_permissions: vec!["read".to_string(), "write".to_string()],
        });
        assert_eq!(count_key(&body, "sharingCollectionWith"), 2);
        assert_eq!(count_key(&body, "groupList"), 1);
        assert_eq!(count_key(&body, "groupMember"), 2);
        assert_eq!(count_key(&body, "groupSharingPermissions"), 1);
        assert_eq!(count_key(&body, "otherSharingPermissions"), 2);
    }

    #[test]
    fn test_sharing_form_body_omits_missing_group() {
        let body = sharing_form_body(&SharingUpdate {
            collection: "/db/x".to_string(),
            ..Default::default()
        });
        assert_eq!(count_key(&body, "groupList"), 0);
        assert_eq!(count_key(&body, "groupMember"), 0);
    }

    #[test]
    fn test_sharing_form_body_encodes_values() {
        let body = sharing_form_body(&SharingUpdate {
            collection: "/db/mit leerzeichen".to_string(),
            members: vec!["a&b".to_string()],
            ..Default::default()
        });
        assert!(body.contains("collection=%2Fdb%2Fmit%20leerzeichen"));
        assert!(body.contains("groupMember=a%26b"));
    }
}
