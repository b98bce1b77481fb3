//! Integration tests for the layout pipeline
//!
//! Layout documents are written to temporary directories, then built,
//! classified, serialized and labeled through the public API.

use layoutseq::config::Config;
use layoutseq::discovery::FileFinder;
use layoutseq::hierarchy::{ClassHierarchy, HierarchyTable};
use layoutseq::parser::LayoutTreeBuilder;
use layoutseq::pipeline::{BatchProcessor, LayoutTokenizer};
use layoutseq::report::{LayoutCategory, TokenListWriter};
use layoutseq::tokens::{self, Token};
use layoutseq::tree::WidgetType;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_layout(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write layout");
    path
}

fn token_strings(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Synthetic hierarchy keyed by class name
struct FixedHierarchy(HashMap<String, Vec<String>>);

impl FixedHierarchy {
    fn new(entries: &[(&str, &[&str])]) -> Self {
        Self(
            entries
                .iter()
                .map(|(class, chain)| {
                    (class.to_string(), chain.iter().map(|c| c.to_string()).collect())
                })
                .collect(),
        )
    }
}

impl ClassHierarchy for FixedHierarchy {
    fn ancestor_chain(&self, class_name: &str) -> Option<Vec<String>> {
        self.0.get(class_name).cloned()
    }
}

#[test]
fn test_linear_layout_with_text_and_button() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(
        dir.path(),
        "activity_main.xml",
        r#"<LinearLayout><TextView /><Button /></LinearLayout>"#,
    );

    let table = HierarchyTable::android_framework();
    let layout = LayoutTokenizer::new(&table).tokenize(&path).unwrap();

    assert_eq!(
        token_strings(&layout.tokens),
        vec!["Layout", "{", "TextView", "Button", "}"]
    );
}

#[test]
fn test_include_expands_into_parent_registry() {
    let dir = TempDir::new().unwrap();
    write_layout(dir.path(), "b.xml", "<TextView />");
    let a = write_layout(
        dir.path(),
        "a.xml",
        r#"<LinearLayout><include layout="@layout/b" /></LinearLayout>"#,
    );

    let built = LayoutTreeBuilder::new().build(&a).unwrap();
    let root = built.root.unwrap();

    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].class_name, "android.widget.TextView");
    assert_eq!(built.registry.len(), 2);
    assert!(root.iter().all(|node| built.registry.contains(node.id)));
}

#[test]
fn test_nested_includes() {
    let dir = TempDir::new().unwrap();
    write_layout(dir.path(), "leaf.xml", "<ImageView />");
    write_layout(
        dir.path(),
        "middle.xml",
        r#"<FrameLayout><include layout="@layout/leaf" /><TextView /></FrameLayout>"#,
    );
    let top = write_layout(
        dir.path(),
        "activity_top.xml",
        r#"<LinearLayout><include layout="@layout/middle" /><Button /></LinearLayout>"#,
    );

    let table = HierarchyTable::android_framework();
    let layout = LayoutTokenizer::new(&table).tokenize(&top).unwrap();

    assert_eq!(
        tokens::join(&layout.tokens),
        "Layout { Layout { ImageView TextView } Button }"
    );
    assert_eq!(layout.registry.len(), 5);
}

#[test]
fn test_toolbar_serializes_as_leaf() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(
        dir.path(),
        "activity_bar.xml",
        r#"<LinearLayout>
    <android.support.v7.widget.Toolbar>
        <TextView />
        <ImageButton />
    </android.support.v7.widget.Toolbar>
    <EditText />
</LinearLayout>"#,
    );

    let hierarchy = FixedHierarchy::new(&[
        ("android.widget.LinearLayout", &["android.view.ViewGroup", "android.view.View"]),
        ("android.widget.EditText", &["android.widget.TextView", "android.view.View"]),
        ("android.support.v7.widget.Toolbar", &["android.view.View"]),
    ]);
    let layout = LayoutTokenizer::new(&hierarchy).tokenize(&path).unwrap();

    assert_eq!(tokens::join(&layout.tokens), "Layout { Toolbar EditText }");
    let root = layout.root.unwrap();
    assert!(!root.children[0].has_children());
    // pruned nodes were still built
    assert_eq!(layout.registry.len(), 5);
}

#[test]
fn test_unknown_class_with_child_is_layout() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(
        dir.path(),
        "activity_custom.xml",
        r#"<com.example.ui.Card><TextView /></com.example.ui.Card>"#,
    );

    let table = HierarchyTable::android_framework();
    let layout = LayoutTokenizer::new(&table).tokenize(&path).unwrap();

    assert_eq!(layout.root.unwrap().widget_type, Some(WidgetType::Layout));
    assert_eq!(tokens::join(&layout.tokens), "Layout { TextView }");
}

#[test]
fn test_custom_view_resolves_through_app_hierarchy() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(
        dir.path(),
        "activity_custom.xml",
        r#"<LinearLayout><com.example.FancyButton /><com.example.Mystery /></LinearLayout>"#,
    );

    let mut table = HierarchyTable::android_framework();
    table.insert("com.example.FancyButton", "android.widget.Button");

    let layout = LayoutTokenizer::new(&table).tokenize(&path).unwrap();
    assert_eq!(
        tokens::join(&layout.tokens),
        "Layout { Button Unclassified }"
    );
}

#[test]
fn test_bracket_balance_and_vocabulary() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(
        dir.path(),
        "activity_form.xml",
        r#"<ScrollView>
    <LinearLayout>
        <TextView />
        <EditText />
        <CheckBox />
        <RadioGroup>
            <RadioButton />
            <RadioButton />
        </RadioGroup>
        <Switch />
        <ListView />
    </LinearLayout>
</ScrollView>"#,
    );

    let table = HierarchyTable::android_framework();
    let layout = LayoutTokenizer::new(&table).tokenize(&path).unwrap();

    let mut depth = 0i32;
    for token in &layout.tokens {
        match token {
            Token::Open => depth += 1,
            Token::Close => {
                depth -= 1;
                assert!(depth >= 0);
            }
            Token::Widget(widget) => assert!(WidgetType::ALL.contains(widget)),
        }
    }
    assert_eq!(depth, 0);

    let root = layout.root.unwrap();
    let with_children = root.iter().filter(|n| n.has_children()).count();
    assert_eq!(layout.tokens.len(), root.node_count() + 2 * with_children);
}

#[test]
fn test_batch_output_file() {
    let dir = TempDir::new().unwrap();
    let layout_dir = dir.path().join("res/layout");
    fs::create_dir_all(&layout_dir).unwrap();

    let body = r#"<LinearLayout><TextView /><Button /><ImageView /></LinearLayout>"#;
    write_layout(&layout_dir, "activity_main.xml", body);
    write_layout(&layout_dir, "fragment_list.xml", body);
    write_layout(&layout_dir, "item_contact.xml", body);
    write_layout(&layout_dir, "abc_toolbar_item.xml", body);
    write_layout(&layout_dir, "activity_small.xml", "<FrameLayout><TextView /></FrameLayout>");
    write_layout(&layout_dir, "dialog_confirm.xml", body);
    write_layout(&layout_dir, "activity_broken.xml", "<LinearLayout><TextView>");

    let config = Config::default();
    let table = HierarchyTable::android_framework();
    let layouts = FileFinder::new(&config).find_layouts(dir.path()).unwrap();
    let result = BatchProcessor::new(&config, &table).unwrap().process(&layouts);

    let token_dir = dir.path().join("out");
    let path = TokenListWriter::new("com.example", &token_dir)
        .write(&result.records)
        .unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(
        lines,
        vec![
            "com.example 2 item_contact.xml Layout { TextView Button ImageView }",
            "com.example 1 activity_main.xml Layout { TextView Button ImageView }",
            "com.example 1 fragment_list.xml Layout { TextView Button ImageView }",
        ]
    );
    assert_eq!(result.stats.files, 7);
    assert_eq!(result.stats.failed, 1);
    assert_eq!(result.stats.too_small, 1);
    assert_eq!(result.stats.excluded, 1);
    assert_eq!(result.stats.unlabeled, 1);
}

#[test]
fn test_min_tokens_boundary() {
    let dir = TempDir::new().unwrap();
    let layout_dir = dir.path().join("res/layout");
    fs::create_dir_all(&layout_dir).unwrap();

    // 5 tokens: dropped
    write_layout(&layout_dir, "activity_five.xml", "<LinearLayout><TextView /><Button /></LinearLayout>");
    // 6 tokens: kept
    write_layout(
        &layout_dir,
        "activity_six.xml",
        "<LinearLayout><TextView /><Button /><Switch /></LinearLayout>",
    );

    let config = Config::default();
    let table = HierarchyTable::android_framework();
    let layouts = FileFinder::new(&config).find_layouts(dir.path()).unwrap();
    let result = BatchProcessor::new(&config, &table).unwrap().process(&layouts);

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].file_name, "activity_six.xml");
    assert_eq!(result.records[0].category, LayoutCategory::Screen);
}

#[test]
fn test_categories_are_exclusive() {
    let config = Config::default();
    let labeler = layoutseq::report::FileLabeler::new(&config).unwrap();

    for name in [
        "activity_item_detail.xml",
        "fragment_row.xml",
        "card_activity.xml",
    ] {
        assert_eq!(labeler.categorize(name), Some(LayoutCategory::ListItem), "{}", name);
    }
    assert_eq!(labeler.categorize("activity_detail.xml"), Some(LayoutCategory::Screen));
}
