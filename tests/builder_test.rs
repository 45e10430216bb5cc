use std::fs;
use std::io::{self, BufReader, Cursor, Read};

use domtree::domain::{DomainError, ErrorKind, Line, TreeBuilder};
use domtree::util::testing;
use rstest::rstest;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_fixture_when_building_then_root_is_first_tag() {
    let builder = TreeBuilder::new();
    let text = fs::read_to_string(testing::document_fixture("article.html")).unwrap();

    let tree = builder.build_from_str(&text).unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.label(root), Some("html"));
    assert_eq!(tree.leaf_count(), 8);
    assert_eq!(tree.count_elements("li"), 3);
}

#[test]
fn given_inline_angle_brackets_when_building_then_line_is_text() {
    let builder = TreeBuilder::new();
    assert_eq!(
        builder.classify("Is this a <em> line?"),
        Line::Text("Is this a <em> line?")
    );

    let text = fs::read_to_string(testing::document_fixture("article.html")).unwrap();
    let tree = builder.build_from_str(&text).unwrap();
    assert!(tree
        .leaf_labels()
        .contains(&"Is this a <em> line?".to_string()));
}

#[test]
fn given_reader_when_building_then_same_tree_as_from_str() {
    let builder = TreeBuilder::new();
    let text = fs::read_to_string(testing::document_fixture("table.html")).unwrap();

    let from_str = builder.build_from_str(&text).unwrap();
    let from_reader = builder
        .build_from_reader(BufReader::new(Cursor::new(text.clone())))
        .unwrap();

    assert_eq!(from_reader.render(), from_str.render());
}

#[test]
fn given_unbalanced_fixture_when_building_then_mismatch_on_line_four() {
    let builder = TreeBuilder::new();
    let text = fs::read_to_string(testing::document_fixture("unbalanced.html")).unwrap();

    let err = builder.build_from_str(&text).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Structure);
    assert!(matches!(err, DomainError::MismatchedClose { line: 4, .. }));
    assert!(err.to_string().starts_with("line 4:"), "{err}");
}

#[rstest]
#[case("", "EmptyDocument")]
#[case("hello\n", "MissingRootTag")]
#[case("</html>\n", "MissingRootTag")]
#[case("<html>\n</html>\n", "EmptyElement")]
#[case("<html>\nx\n</html>\n</p>\n", "UnexpectedClose")]
#[case("<html>\nx\n</html>\n<p>\n", "TrailingContent")]
#[case("<html>\n<p>\nx\n</p>\n", "UnclosedElement")]
fn given_malformed_input_when_building_then_specific_error(
    #[case] text: &str,
    #[case] expected: &str,
) {
    let err = TreeBuilder::new().build_from_str(text).unwrap_err();
    let name = format!("{err:?}");
    assert!(name.starts_with(expected), "{name}");
    assert_eq!(err.kind(), ErrorKind::Structure);
}

struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        }
        self.served = true;
        let head = b"<html>\n";
        buf[..head.len()].copy_from_slice(head);
        Ok(head.len())
    }
}

#[test]
fn given_failing_source_when_building_then_io_error_with_line() {
    let reader = BufReader::new(FailingReader { served: false });

    let err = TreeBuilder::new().build_from_reader(reader).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err, DomainError::Read { line: 2, .. }));
}

#[test]
fn given_deeply_nested_document_when_building_then_no_stack_overflow() {
    let depth = 20_000;
    let mut lines: Vec<String> = (0..depth).map(|i| format!("<d{i}>")).collect();
    lines.push("core".to_string());
    lines.extend((0..depth).rev().map(|i| format!("</d{i}>")));

    let tree = TreeBuilder::new().build_from_lines(lines).unwrap();

    assert_eq!(tree.depth(), depth + 1);
    assert_eq!(tree.render().lines().count(), 2 * depth + 1);
}
