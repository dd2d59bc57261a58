//! Unit tests for the lookout-tree crate.


mod resolver_tests {
    use lookout_protocol::Finder;
    use rstest::rstest;

    use super::support::{centred_parent, duplicate_hello, hello_column};
    use crate::{
        Element, ElementTree, FinderResolver, MemoryTree, ResolveError, ResolvePolicy,
        semantics_id_of,
    };

    fn resolve(tree: &MemoryTree, finder: &Finder) -> Result<Vec<String>, ResolveError> {
        let resolver = FinderResolver::new(tree, ResolvePolicy::default());
        Ok(resolver
            .resolve(finder)?
            .into_iter()
            .map(|node| label_of(tree, node))
            .collect())
    }

    fn label_of(tree: &MemoryTree, node: crate::NodeId) -> String {
        tree.key(node)
            .map(ToString::to_string)
            .or_else(|| tree.text(node).map(str::to_owned))
            .unwrap_or_else(|| tree.type_name(node).unwrap_or_default().to_owned())
    }

    #[rstest]
    fn base_finders_return_every_match(duplicate_hello: MemoryTree) {
        let matches = resolve(&duplicate_hello, &Finder::by_text("hello")).expect("resolve");
        assert_eq!(matches, vec!["hello", "hello"]);
    }

    #[rstest]
    fn matches_are_in_document_order(hello_column: MemoryTree) {
        let matches = resolve(&hello_column, &Finder::by_type("Text")).expect("resolve");
        assert_eq!(matches, vec!["[<'text1'>]", "[<'text2'>]", "[<'text3'>]"]);
    }

    #[rstest]
    fn repeated_resolution_is_stable(hello_column: MemoryTree) {
        let finder = Finder::descendant(Finder::by_key("column"), Finder::by_type("Text"), false);
        assert_eq!(
            resolve(&hello_column, &finder),
            resolve(&hello_column, &finder)
        );
    }

    #[rstest]
    #[case::excluded(false, Vec::new())]
    #[case::included(true, vec!["[<'column'>]"])]
    fn descendant_match_root_controls_root_inclusion(
        hello_column: MemoryTree,
        #[case] match_root: bool,
        #[case] expected: Vec<&str>,
    ) {
        let finder = Finder::descendant(
            Finder::by_key("column"),
            Finder::by_type("Column"),
            match_root,
        );
        assert_eq!(resolve(&hello_column, &finder).expect("resolve"), expected);
    }

    #[rstest]
    fn descendant_restricts_matching_to_subtree(hello_column: MemoryTree) {
        let finder = Finder::descendant(Finder::by_key("column"), Finder::by_key("text2"), false);
        assert_eq!(
            resolve(&hello_column, &finder).expect("resolve"),
            vec!["[<'text2'>]"]
        );
    }

    #[rstest]
    fn ancestor_walks_up_to_matching_node(centred_parent: MemoryTree) {
        let finder = Finder::ancestor(Finder::by_key("leftchild"), Finder::by_key("parent"), false);
        assert_eq!(
            resolve(&centred_parent, &finder).expect("resolve"),
            vec!["[<'parent'>]"]
        );
    }

    #[rstest]
    fn ancestor_without_match_is_empty(centred_parent: MemoryTree) {
        let finder = Finder::ancestor(
            Finder::by_key("leftchild"),
            Finder::by_key("rightchild"),
            false,
        );
        assert_eq!(resolve(&centred_parent, &finder), Ok(Vec::new()));
    }

    #[rstest]
    #[case::strict(false, 0)]
    #[case::inclusive(true, 1)]
    fn ancestor_match_root_includes_anchor(
        centred_parent: MemoryTree,
        #[case] match_root: bool,
        #[case] expected: usize,
    ) {
        let finder = Finder::ancestor(
            Finder::by_key("leftchild"),
            Finder::by_key("leftchild"),
            match_root,
        );
        let matches = resolve(&centred_parent, &finder).expect("resolve");
        assert_eq!(matches.len(), expected);
    }

    #[rstest]
    fn relational_anchor_must_be_unique(duplicate_hello: MemoryTree) {
        let finder = Finder::descendant(Finder::by_text("hello"), Finder::by_type("Text"), true);
        assert!(matches!(
            resolve(&duplicate_hello, &finder),
            Err(ResolveError::AmbiguousMatch { count: 2, .. })
        ));
    }

    #[rstest]
    fn descendant_of_leaf_matches_nothing(hello_column: MemoryTree) {
        let finder = Finder::descendant(Finder::by_key("text1"), Finder::by_key("text2"), false);
        assert_eq!(resolve(&hello_column, &finder), Ok(Vec::new()));
    }

    #[rstest]
    fn single_distinguishes_none_from_many(duplicate_hello: MemoryTree) {
        let resolver = FinderResolver::new(&duplicate_hello, ResolvePolicy::default());
        let none = resolver
            .resolve_single(&Finder::by_text("goodbye"))
            .expect_err("no match");
        let many = resolver
            .resolve_single(&Finder::by_text("hello"))
            .expect_err("ambiguous");
        assert_eq!(none.to_string(), "no matching element for text \"goodbye\"");
        assert_eq!(
            many.to_string(),
            "too many matching elements (2) for text \"hello\""
        );
    }

    #[rstest]
    #[case::skipped(true, 0)]
    #[case::visible(false, 1)]
    fn offstage_subtrees_follow_policy(#[case] skip_offstage: bool, #[case] expected: usize) {
        let mut tree = MemoryTree::new();
        let root = tree.insert_root(Element::new("Overlay")).expect("root");
        let hidden = tree
            .insert_child(root, Element::new("Offstage").offstage())
            .expect("offstage");
        tree.insert_child(hidden, Element::new("Text").with_text("secret"))
            .expect("text");

        let resolver = FinderResolver::new(&tree, ResolvePolicy { skip_offstage });
        let matches = resolver.resolve(&Finder::by_text("secret")).expect("resolve");
        assert_eq!(matches.len(), expected);
    }

    #[test]
    fn label_patterns_match_by_regex() {
        let mut tree = MemoryTree::new();
        let root = tree.insert_root(Element::new("Column")).expect("root");
        for label in ["Submit order", "Submit payment", "Cancel"] {
            tree.insert_child(root, Element::new("Button").with_semantics_label(label))
                .expect("button");
        }
        let resolver = FinderResolver::new(&tree, ResolvePolicy::default());

        let pattern = resolver
            .resolve(&Finder::by_semantics_pattern("^Submit"))
            .expect("resolve");
        let literal = resolver
            .resolve(&Finder::by_semantics_label("Cancel"))
            .expect("resolve");
        assert_eq!(pattern.len(), 2);
        assert_eq!(literal.len(), 1);
    }

    #[test]
    fn invalid_patterns_surface_as_errors() {
        let tree = MemoryTree::new();
        let resolver = FinderResolver::new(&tree, ResolvePolicy::default());
        assert!(matches!(
            resolver.resolve(&Finder::by_semantics_pattern("(")),
            Err(ResolveError::InvalidPattern { .. })
        ));
    }

    #[rstest]
    fn semantics_id_comes_from_nearest_carrier(centred_parent: MemoryTree) {
        let resolver = FinderResolver::new(&centred_parent, ResolvePolicy::default());
        let child = resolver
            .resolve_single(&Finder::by_key("leftchild"))
            .expect("child");
        assert_eq!(semantics_id_of(&centred_parent, child), Some(7));
        let root = centred_parent.root().expect("root");
        assert_eq!(semantics_id_of(&centred_parent, root), None);
    }
}

mod diagnostics_tests {
    use lookout_protocol::DiagnosticsNode;
    use rstest::rstest;

    use super::support::hello_column;
    use crate::{DiagnosticsRef, ElementTree, MemoryTree, serialize};

    fn widget_root(tree: &MemoryTree) -> DiagnosticsRef {
        DiagnosticsRef::Widget(tree.root().expect("root"))
    }

    fn render_root(tree: &MemoryTree) -> DiagnosticsRef {
        let root = tree.root().expect("root");
        DiagnosticsRef::RenderObject(tree.render_object(root).expect("render object"))
    }

    fn depth_of(node: &DiagnosticsNode) -> usize {
        node.children
            .as_ref()
            .map_or(0, |children| 1 + children.iter().map(depth_of).max().unwrap_or(0))
    }

    #[rstest]
    #[case::widget(true)]
    #[case::render(false)]
    fn zero_depth_has_no_children_key(hello_column: MemoryTree, #[case] widget: bool) {
        let node = if widget {
            widget_root(&hello_column)
        } else {
            render_root(&hello_column)
        };
        let dump = serialize(&hello_column, node, 0, true).expect("serialize");
        assert!(dump.children.is_none());
        let value = serde_json::to_value(&dump).expect("serialise");
        assert!(!value.as_object().expect("object").contains_key("children"));
    }

    #[rstest]
    fn explored_leaves_get_empty_children(hello_column: MemoryTree) {
        let dump = serialize(&hello_column, widget_root(&hello_column), 5, false).expect("serialize");
        let children = dump.children.as_ref().expect("children");
        assert_eq!(children.len(), 3);
        for child in children {
            assert!(child.children.as_ref().is_some_and(Vec::is_empty));
        }
    }

    #[rstest]
    #[case::one(1, 1)]
    #[case::two(2, 2)]
    fn depth_budget_bounds_the_walk(
        hello_column: MemoryTree,
        #[case] max_depth: u32,
        #[case] expected: usize,
    ) {
        let dump =
            serialize(&hello_column, widget_root(&hello_column), max_depth, false).expect("serialize");
        assert_eq!(depth_of(&dump), expected);
        if max_depth == 1 {
            let children = dump.children.as_ref().expect("children");
            assert!(children.iter().all(|child| child.children.is_none()));
        }
    }

    #[rstest]
    fn properties_are_omitted_unless_requested(hello_column: MemoryTree) {
        let without = serialize(&hello_column, widget_root(&hello_column), 1, false).expect("serialize");
        assert!(without.properties.is_none());
        let value = serde_json::to_value(&without).expect("serialise");
        assert!(!value.as_object().expect("object").contains_key("properties"));

        let with = serialize(&hello_column, widget_root(&hello_column), 1, true).expect("serialize");
        let properties = with.properties.as_ref().expect("properties");
        assert_eq!(properties.len(), 1);
        let property = properties.first().expect("property");
        assert_eq!(property.name, "mainAxisSize");
        assert_eq!(property.description, "max");
        assert_eq!(property.property_type, "EnumProperty");

        let text = with
            .children
            .as_ref()
            .and_then(|children| children.first())
            .and_then(|child| child.properties.as_ref())
            .and_then(|properties| properties.first())
            .expect("text property");
        assert_eq!(text.description, "\"Hello1\"");
        assert_eq!(text.property_type, "StringProperty");
    }

    #[rstest]
    fn widget_nodes_describe_type_and_key(hello_column: MemoryTree) {
        let dump = serialize(&hello_column, widget_root(&hello_column), 1, false).expect("serialize");
        assert_eq!(dump.description, "Column-[<'column'>]");
        assert_eq!(dump.widget_runtime_type.as_deref(), Some("Column"));
    }

    #[rstest]
    fn render_flavour_walks_render_tree(hello_column: MemoryTree) {
        let dump = serialize(&hello_column, render_root(&hello_column), 1, true).expect("serialize");
        assert_eq!(dump.description, "RenderFlex");
        assert!(dump.widget_runtime_type.is_none());
        let children = dump.children.as_ref().expect("children");
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|child| child.description == "RenderParagraph"));
        assert!(
            children
                .iter()
                .all(|child| child.properties.as_ref().is_some_and(Vec::is_empty))
        );
    }
}

mod memory_tests {
    use crate::{Element, ElementTree, LiveTree, MemoryTree, TreeError, TreeSource};

    #[test]
    fn rejects_second_root_and_unknown_parent() {
        let mut tree = MemoryTree::new();
        let root = tree.insert_root(Element::new("App")).expect("root");
        assert_eq!(
            tree.insert_root(Element::new("App")),
            Err(TreeError::RootAlreadySet)
        );

        let mut other = MemoryTree::new();
        assert_eq!(
            other.insert_child(root, Element::new("Text")),
            Err(TreeError::UnknownNode(root))
        );
    }

    #[test]
    fn snapshots_are_isolated_from_later_updates() {
        let mut tree = MemoryTree::new();
        let root = tree
            .insert_root(Element::new("Text").with_text("before"))
            .expect("root");
        let live = LiveTree::new(tree);

        let snapshot = live.snapshot();
        live.update(|current| current.set_text(root, "after"))
            .expect("update");

        assert_eq!(snapshot.text(root), Some("before"));
        assert_eq!(live.snapshot().text(root), Some("after"));
    }
}
