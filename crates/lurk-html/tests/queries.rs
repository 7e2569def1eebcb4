//! Structural query coverage over parsed documents: tag/occurrence
//! lookup, fixed positional paths, and class matching the way forum
//! markup uses it (whole class string, case-insensitive).

use lurk_html::{parse_document, Document, HtmlTag, NodeKind, NodeRef};

const FORUM_PAGE: &str = "<html><body>\
<div class=\"Posts\" id=\"main\">\
<div class=\"Post\"><span class=\"Author\">alice</span><span class=\"Body\">hi there</span></div>\
<div class=\"post\"><span class=\"Author\">bob</span></div>\
<div class=\"Post pinned\"><span class=\"Author\">carol</span></div>\
<ul><li>one</li><li>two</li><li>three</li></ul>\
<x-widget data-x=\"1\">w</x-widget>\
</div>\
</body></html>";

fn body(doc: &Document) -> NodeRef<'_> {
    doc.root().children(true)[1]
}

fn posts_container(doc: &Document) -> NodeRef<'_> {
    body(doc).children(true)[0]
}

#[test]
fn test_children_elements_only_filter() {
    let doc = parse_document("<div>a<span>b</span>c<em>d</em></div>").unwrap();
    let div = body(&doc).children(true)[0];
    assert_eq!(div.child_count(false), 4);
    assert_eq!(div.child_count(true), 2);
    assert_eq!(div.text_children_count(), 2);
    let tags: Vec<HtmlTag> = div.children(true).iter().map(|c| c.tag()).collect();
    assert_eq!(tags, vec![HtmlTag::Span, HtmlTag::Em]);
}

#[test]
fn test_child_by_tag_counts_occurrences_of_that_tag_only() {
    let doc = parse_document(FORUM_PAGE).unwrap();
    let container = posts_container(&doc);

    let (first, idx) = container.child_by_tag(HtmlTag::Div, 0).unwrap();
    assert_eq!(idx, 0);
    assert_eq!(first.class_attribute(), Some("Post"));

    let (second, idx) = container.child_by_tag(HtmlTag::Div, 1).unwrap();
    assert_eq!(idx, 1);
    assert_eq!(second.class_attribute(), Some("post"));

    // the ul between divs and the widget do not shift div occurrences
    let (ul, _) = container.child_by_tag(HtmlTag::Ul, 0).unwrap();
    assert_eq!(ul.child_count(true), 3);

    assert!(container.child_by_tag(HtmlTag::Div, 3).is_none());
    assert!(container.child_by_tag(HtmlTag::Table, 0).is_none());
}

#[test]
fn test_descendant_by_path_walks_fixed_indices() {
    let doc =
        parse_document("<div><span>a</span><span>b</span><ul><li>x</li><li>y</li></ul></div>")
            .unwrap();
    let div = body(&doc).children(true)[0];

    let li = div
        .descendant_by_path(&[(HtmlTag::Ul, 2), (HtmlTag::Li, 1)])
        .unwrap();
    assert_eq!(li.children_inner_text(), "y");

    // wrong tag at the index
    assert!(div.descendant_by_path(&[(HtmlTag::Ol, 2)]).is_none());
    // index out of range fails cleanly
    assert!(div.descendant_by_path(&[(HtmlTag::Ul, 9)]).is_none());
    assert!(div
        .descendant_by_path(&[(HtmlTag::Ul, 2), (HtmlTag::Li, 5)])
        .is_none());
}

#[test]
fn test_class_match_is_whole_string_case_insensitive() {
    let doc = parse_document(FORUM_PAGE).unwrap();
    let container = posts_container(&doc);

    // "Post" and "post" both match; "Post pinned" does not
    let matched = container.children_by_class("post", HtmlTag::Div);
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].class_attribute(), Some("Post"));
    assert_eq!(matched[1].class_attribute(), Some("post"));

    let first = container.child_by_class("POST", HtmlTag::Div).unwrap();
    assert_eq!(first.class_attribute(), Some("Post"));

    // tag restriction applies
    assert!(container.child_by_class("Post", HtmlTag::Span).is_none());
}

#[test]
fn test_descendants_by_class_preorder() {
    let doc = parse_document(FORUM_PAGE).unwrap();
    let authors = body(&doc).descendants_by_class("author", HtmlTag::Span);
    let names: Vec<String> = authors.iter().map(|a| a.children_inner_text()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}

#[test]
fn test_children_inner_text_is_direct_only() {
    let doc = parse_document("<div>a<span>skip</span>b</div>").unwrap();
    let div = body(&doc).children(true)[0];
    assert_eq!(div.children_inner_text(), "ab");
}

#[test]
fn test_attributes() {
    let doc = parse_document(FORUM_PAGE).unwrap();
    let container = posts_container(&doc);
    assert_eq!(container.attribute("class"), Some("Posts"));
    assert_eq!(container.attribute("CLASS"), Some("Posts"));
    assert_eq!(container.id_attribute(), Some("main"));
    assert!(container.has_class_attribute());
    assert_eq!(container.attribute_count(), 2);
    assert!(!container.has_attribute("style"));
}

#[test]
fn test_unknown_tag_name_comes_from_source() {
    let doc = parse_document(FORUM_PAGE).unwrap();
    let container = posts_container(&doc);
    let widget = container
        .children(true)
        .into_iter()
        .find(|c| c.tag() == HtmlTag::Unknown)
        .unwrap();
    assert_eq!(widget.tag_name(), Some("x-widget"));
    assert_eq!(widget.attribute("data-x"), Some("1"));
}

#[test]
fn test_tag_source_span_points_at_opening_tag() {
    let doc = parse_document(FORUM_PAGE).unwrap();
    let container = posts_container(&doc);
    let span = container.tag_source_span().unwrap();
    assert_eq!(
        &doc.raw_html()[span],
        "<div class=\"Posts\" id=\"main\">"
    );
    assert_eq!(
        container.raw_tag_html(),
        Some("<div class=\"Posts\" id=\"main\">")
    );
}

#[test]
fn test_path_is_root_first() {
    let doc = parse_document("<html><body><div><span>s</span></div></body></html>").unwrap();
    let div = body(&doc).children(true)[0];
    let span = div.children(true)[0];
    assert_eq!(
        span.path(),
        vec![
            ("html".to_string(), 0),
            ("body".to_string(), 1),
            ("div".to_string(), 0),
            ("span".to_string(), 0),
        ]
    );
}

#[test]
fn test_parent_and_kind() {
    let doc = parse_document("<div>text</div>").unwrap();
    let div = body(&doc).children(true)[0];
    assert_eq!(div.parent().unwrap().tag(), HtmlTag::Body);
    assert_eq!(div.kind(), NodeKind::Element);
    let text = div.children(false)[0];
    assert_eq!(text.kind(), NodeKind::Text);
    assert_eq!(text.inner_text(), Some("text"));
    assert!(doc.document_node().is_document());
}
