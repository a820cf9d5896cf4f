use lsp_types::Position;
use workflowlens::document::parser::parse_workflow;
use workflowlens::yamlpath::{locate, Element, KeyPath};

const WORKFLOW: &str = "\
name: CI
on:
  push:
    branches: [main]
  pull_request:
jobs:
  build:
    runs-on: ubuntu-latest
    env:
      RUST_LOG: debug
    steps:
      - uses: actions/checkout@v4
      - name: Test
        run: |
          cargo build
          cargo test
  lint:
    steps:
      - run: cargo clippy
";

fn offset_of(needle: &str) -> usize {
    WORKFLOW.find(needle).unwrap()
}

#[test]
fn test_offsets_inside_leaf_scalars() {
    let snapshot = parse_workflow(WORKFLOW).unwrap();
    let cases = [
        ("CI", "name"),
        ("ubuntu-latest", "jobs.build.runs-on"),
        ("debug", "jobs.build.env.RUST_LOG"),
        ("checkout", "jobs.build.steps.uses"),
        ("Test", "jobs.build.steps.name"),
        ("cargo test", "jobs.build.steps.run"),
        ("cargo clippy", "jobs.lint.steps.run"),
    ];
    for (needle, expected) in cases {
        let located = snapshot.locate(offset_of(needle) + 1).unwrap();
        assert_eq!(located.path.to_string(), expected, "at {:?}", needle);
    }
}

#[test]
fn test_path_has_one_segment_per_keyed_ancestor() {
    let snapshot = parse_workflow(WORKFLOW).unwrap();
    let located = snapshot.locate(offset_of("cargo build")).unwrap();
    assert_eq!(
        located.path,
        KeyPath::from_keys(["jobs", "build", "steps", "run"])
    );
}

#[test]
fn test_implicit_empty_value() {
    let snapshot = parse_workflow(WORKFLOW).unwrap();
    let located = snapshot.locate(offset_of("pull_request") + 3).unwrap();
    assert_eq!(located.path.to_string(), "on.pull_request");
    let pair = located.pair().unwrap();
    assert!(pair.value.span().is_empty());
}

#[test]
fn test_position_translation_round_trip() {
    let snapshot = parse_workflow(WORKFLOW).unwrap();
    let offset = snapshot.offset_at(Position::new(7, 14));
    let located = snapshot.locate(offset).unwrap();
    assert_eq!(located.path.to_string(), "jobs.build.runs-on");
    assert!(matches!(located.element, Element::Pair(_)));
}

#[test]
fn test_end_of_document_falls_back_to_root() {
    let snapshot = parse_workflow(WORKFLOW).unwrap();
    let end = WORKFLOW.chars().count();
    assert!(locate(snapshot.root(), end).is_some());
    assert!(locate(snapshot.root(), end + 1).is_none());
}

#[test]
fn test_empty_document() {
    let snapshot = parse_workflow("").unwrap();
    let located = snapshot.locate(0).unwrap();
    assert!(located.path.is_empty());
}

#[test]
fn test_first_key_of_a_step() {
    let text = "steps:\n  - uses: a\n  - run: make\n";
    let snapshot = parse_workflow(text).unwrap();

    let located = snapshot.locate(text.find("run").unwrap()).unwrap();
    assert_eq!(located.path.to_string(), "steps.run");
    assert_eq!(located.pair().unwrap().key.value, "run");

    let located = snapshot.locate(text.find("uses").unwrap() + 1).unwrap();
    assert_eq!(located.path.to_string(), "steps.uses");
}

#[test]
fn test_key_of_nested_step_entry() {
    let snapshot = parse_workflow(WORKFLOW).unwrap();
    let located = snapshot.locate(offset_of("name: Test")).unwrap();
    assert_eq!(located.path.to_string(), "jobs.build.steps.name");
}
