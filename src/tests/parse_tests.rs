#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_probe_literal_true() {
        assert!(parse::probe_is_true("true"));
        assert!(parse::probe_is_true(" true\n"));
    }

    #[test]
    fn test_probe_wrapped_true() {
        // checkuser.xql wraps the text into an element
        assert!(parse::probe_is_true("<result>true</result>"));
    }

    #[test]
    fn test_probe_everything_else_is_false() {
        assert!(!parse::probe_is_true("false"));
        assert!(!parse::probe_is_true(""));
        assert!(!parse::probe_is_true("TRUE"));
        assert!(!parse::probe_is_true("truely"));
        assert!(!parse::probe_is_true("<error>denied</error>"));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(parse::strip_tags("<a><b>x</b>y</a>"), "xy");
        assert_eq!(parse::strip_tags("plain"), "plain");
        assert_eq!(parse::strip_tags("<empty/>"), "");
    }

    #[test]
    fn test_has_element_self_closing_and_open() {
        assert!(parse::has_element("<permissions><write/></permissions>", "write"));
        assert!(parse::has_element("<write>yes</write>", "write"));
        assert!(parse::has_element("<write attr=\"1\"/>", "write"));
        assert!(!parse::has_element("<permissions/>", "write"));
    }

    #[test]
    fn test_has_element_ignores_prefix_matches() {
        // <written/> must not count as <write/>
        assert!(!parse::has_element("<written/>", "write"));
        assert_eq!(parse::name_list("<members><member>a</member></members>", "member"), vec!["a"]);
    }

    #[test]
    fn test_permission_flags_write_only() {
        let flags = parse::permission_flags("<permissions><write/></permissions>");
        assert!(flags.write);
        assert!(!flags.read);
    }

    #[test]
    fn test_permission_flags_both_and_none() {
        let both = parse::permission_flags("<permissions><read/><write/></permissions>");
        assert!(both.read && both.write);
        let none = parse::permission_flags("<permissions/>");
        assert!(!none.read && !none.write);
    }

    #[test]
    fn test_group_members_owner_nested() {
        let body = "<sharing><owner><true/></owner><member>alice</member><member>bob</member></sharing>";
        let dto = parse::group_members(body);
        assert!(dto.owner);
        assert_eq!(dto.members, vec!["alice", "bob"]);
    }

    #[test]
    fn test_group_members_owner_text() {
        let dto = parse::group_members("<owner>true</owner><member>carol</member>");
        assert!(dto.owner);
        assert_eq!(dto.members, vec!["carol"]);
    }

    #[test]
    fn test_group_members_not_owner() {
        let dto = parse::group_members("<owner>false</owner><member>carol</member>");
        assert!(!dto.owner);
        let dto = parse::group_members("<member>dave</member>");
        assert!(!dto.owner);
    }

    #[test]
    fn test_name_list() {
        let body = "<groups><group>staff</group><group>editors</group><group/></groups>";
        assert_eq!(parse::name_list(body, "group"), vec!["staff", "editors"]);
        assert!(parse::name_list("", "group").is_empty());
    }

    #[test]
    fn test_keywords_complete() {
        assert!(parse::keywords_complete(
            "<div><ul class=\"terms complete\"><li>a</li></ul></div>"
        ));
        assert!(!parse::keywords_complete("<div><ul class=\"terms\"><li>a</li></ul></div>"));
        assert!(!parse::keywords_complete("<div><p>keine Treffer</p></div>"));
    }
}
