#[cfg(test)]
mod tests {
    use crate::ui_utils::tree_layout;

    #[test]
    fn test_layout_flags_mirror_visibility() {
        assert_eq!(tree_layout(true).form_flag, "show");
        assert_eq!(tree_layout(false).form_flag, "hidden");
        assert!(tree_layout(true).tree_visible);
        assert!(!tree_layout(false).tree_visible);
    }

    #[test]
    fn test_layout_double_toggle_round_trip() {
        let initial = tree_layout(true);
        let hidden = tree_layout(false);
        assert_ne!(initial, hidden);
        // toggling twice restores every layout value
        assert_eq!(tree_layout(true), initial);
    }

    #[test]
    fn test_hidden_layout_collapses_panel() {
        let hidden = tree_layout(false);
        assert!(hidden.panel_style.contains("width:40px"));
        assert!(hidden.content_style.contains("margin-left:50px"));
        let shown = tree_layout(true);
        assert!(shown.panel_style.contains("width:300px"));
        assert!(shown.content_style.contains("margin-left:310px"));
    }
}
