use std::fs;
use std::io::Cursor;

use domtree::application::{ApplicationError, Document};
use domtree::config::MarkupSettings;
use domtree::domain::{DomainError, ErrorKind};
use domtree::util::testing;
use rstest::rstest;
use tempfile::TempDir;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(String::from).collect()
}

#[test]
fn given_lines_when_building_then_renders_same_text() {
    let mut document = Document::new(lines("<html>\n<p>\nHello world\n</p>\n</html>\n"));
    assert!(!document.is_built());

    document.build().unwrap();

    assert!(document.is_built());
    assert_eq!(
        document.render().unwrap(),
        "<html>\n<p>\nHello world\n</p>\n</html>\n"
    );
}

#[test]
fn given_unbuilt_document_when_editing_then_tree_not_built() {
    let mut document = Document::new(lines("<html>\nx\n</html>\n"));

    assert!(matches!(document.render(), Err(DomainError::TreeNotBuilt)));
    assert!(matches!(document.debug_print(), Err(DomainError::TreeNotBuilt)));
    assert!(matches!(
        document.replace("a", "b"),
        Err(DomainError::TreeNotBuilt)
    ));
    assert!(matches!(document.bold_row(1), Err(DomainError::TreeNotBuilt)));
    assert!(matches!(document.remove("p"), Err(DomainError::TreeNotBuilt)));
    assert!(matches!(
        document.tag_word("x", "em"),
        Err(DomainError::TreeNotBuilt)
    ));
    assert!(document.tree().is_none());
}

#[test]
fn given_built_document_when_building_again_then_source_consumed() {
    let mut document = Document::new(lines("<html>\nx\n</html>\n"));
    document.build().unwrap();

    let err = document.build().unwrap_err();

    assert!(matches!(err, DomainError::SourceConsumed));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(document.tree().is_some());
}

#[test]
fn given_malformed_source_when_building_then_no_tree_kept() {
    let mut document = Document::from_reader(Cursor::new("<html>\n<p>\nx\n</b>\n</html>\n"));

    let err = document.build().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Structure);
    assert!(document.tree().is_none());
    assert!(matches!(document.render(), Err(DomainError::TreeNotBuilt)));
}

#[test]
fn given_file_when_loading_from_path_then_builds() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.html");
    fs::write(&path, "<html>\n<ul>\n<li>\nonly\n</li>\n</ul>\n</html>\n").unwrap();

    let mut document = Document::from_path(&path).unwrap();
    document.build().unwrap();
    let removed = document.remove("ul").unwrap();

    assert_eq!(removed, 1);
    assert_eq!(
        document.render().unwrap(),
        "<html>\n<p>\nonly\n</p>\n</html>\n"
    );
}

#[test]
fn given_missing_file_when_loading_then_input_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.html");

    let err = Document::from_path(&path).unwrap_err();

    match err {
        ApplicationError::InputNotFound(p) => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_fixture_when_parsing_then_scenarios_hold() {
    let text = fs::read_to_string(testing::document_fixture("simple.html")).unwrap();
    let mut document = Document::parse(&text).unwrap();

    assert_eq!(document.replace("div", "section").unwrap(), 0);
    assert_eq!(document.remove("p").unwrap(), 1);
    assert_eq!(document.render().unwrap(), "<html>\nHello world\n</html>\n");
}

#[test]
fn given_default_settings_when_bolding_row_then_uses_b_wrapper() {
    let text = fs::read_to_string(testing::document_fixture("table.html")).unwrap();
    let mut document = Document::parse(&text).unwrap();

    assert_eq!(document.bold_row(2).unwrap(), 2);
    let tree = document.tree().unwrap();
    assert_eq!(tree.count_elements("b"), 2);
}

#[rstest]
#[case("div")]
#[case("li")]
#[case("table")]
fn given_unsupported_tag_when_removing_then_configuration_error(#[case] tag: &str) {
    let text = fs::read_to_string(testing::document_fixture("article.html")).unwrap();
    let mut document = Document::parse(&text).unwrap();
    let before = document.render().unwrap();

    let err = document.remove(tag).unwrap_err();

    assert!(matches!(err, DomainError::UnsupportedTag { operation: "remove", .. }));
    assert_eq!(document.render().unwrap(), before);
}

#[test]
fn given_unsupported_tag_when_tagging_word_then_configuration_error() {
    let mut document = Document::parse("<p>\ncat\n</p>\n").unwrap();

    let err = document.tag_word("cat", "span").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(document.render().unwrap(), "<p>\ncat\n</p>\n");
}

#[test]
fn given_custom_settings_when_editing_then_vocabulary_applies() {
    let markup = MarkupSettings {
        table_tag: "grid".into(),
        bold_tag: "strong".into(),
        paragraph_tag: "para".into(),
        inline_tags: vec!["span".into()],
        list_tags: vec!["menu".into()],
        word_tags: vec!["mark".into()],
    };
    let text = "<doc>\n<grid>\n<row>\n<cell>\nv\n</cell>\n</row>\n</grid>\n\
        <menu>\n<item>\nfox\n</item>\n</menu>\n<span>\nend\n</span>\n</doc>\n";
    let mut document = Document::new(lines(text)).with_settings(markup.clone());
    assert_eq!(document.settings(), &markup);
    document.build().unwrap();

    assert_eq!(document.bold_row(1).unwrap(), 1);
    assert_eq!(document.remove("menu").unwrap(), 1);
    assert_eq!(document.remove("span").unwrap(), 1);
    assert_eq!(document.tag_word("fox", "mark").unwrap(), 1);
    assert!(document.remove("p").is_err());

    assert_eq!(
        document.render().unwrap(),
        "<doc>\n<grid>\n<row>\n<cell>\n<strong>\nv\n</strong>\n</cell>\n</row>\n</grid>\n\
         <para>\n<mark>\nfox\n</mark>\n</para>\nend\n</doc>\n"
    );
}

#[test]
fn given_document_when_debug_printing_then_outline_returned() {
    let document = Document::parse("<html>\n<p>\nhi\n</p>\n</html>\n").unwrap();

    let outline = document.debug_print().unwrap();

    assert!(outline.starts_with("html"));
    assert!(outline.contains("└── hi"));
}
