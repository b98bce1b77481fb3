//! Integration tests for smali loading and the resource-usage scanner

use layoutseq::analysis::ResourceUsageScanner;
use layoutseq::bytecode::{BytecodeSource, ClassInfo, FieldInfo, InvokeExpr, MethodBody, MethodRef, Operand, Statement, ValueType};
use layoutseq::hierarchy::{ClassHierarchy, HierarchyTable};
use layoutseq::parser::SmaliProgram;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const R_LAYOUT: &str = r#".class public final Lcom/example/app/R$layout;
.super Ljava/lang/Object;
.source "R.java"

# static fields
.field public static final activity_main:I = 0x7f0b001c

.field public static final activity_settings:I = 0x7f0b001d

.field public static final item_contact:I = 0x7f0b001e


# direct methods
.method private constructor <init>()V
    .locals 0

    invoke-direct {p0}, Ljava/lang/Object;-><init>()V

    return-void
.end method
"#;

const R_ID: &str = r#".class public final Lcom/example/app/R$id;
.super Ljava/lang/Object;

.field public static final title:I = 0x7f080001

.method private constructor <init>()V
    .locals 0
    invoke-direct {p0}, Ljava/lang/Object;-><init>()V
    return-void
.end method
"#;

const MAIN_ACTIVITY: &str = r#".class public Lcom/example/app/MainActivity;
.super Landroidx/appcompat/app/AppCompatActivity;
.source "MainActivity.java"


# virtual methods
.method protected onCreate(Landroid/os/Bundle;)V
    .locals 1
    .param p1, "savedInstanceState"    # Landroid/os/Bundle;

    .line 12
    invoke-super {p0, p1}, Landroidx/appcompat/app/AppCompatActivity;->onCreate(Landroid/os/Bundle;)V

    .line 13
    const v0, 0x7f0b001c

    invoke-virtual {p0, v0}, Lcom/example/app/MainActivity;->setContentView(I)V

    return-void
.end method
"#;

const SETTINGS_ACTIVITY: &str = r#".class public Lcom/example/app/SettingsActivity;
.super Landroid/app/Activity;

.method protected onCreate(Landroid/os/Bundle;)V
    .locals 2

    invoke-super {p0, p1}, Landroid/app/Activity;->onCreate(Landroid/os/Bundle;)V

    invoke-virtual {p0}, Lcom/example/app/SettingsActivity;->pickLayout()I

    move-result v0

    invoke-virtual {p0, v0}, Lcom/example/app/SettingsActivity;->setContentView(I)V

    return-void
.end method

.method private pickLayout()I
    .locals 1

    const v0, 0x7f0b001d

    return v0
.end method
"#;

const FANCY_BUTTON: &str = r#".class public Lcom/example/app/widget/FancyButton;
.super Landroid/widget/Button;
"#;

const LIBRARY_ACTIVITY: &str = r#".class public Lcom/thirdparty/LibActivity;
.super Landroid/app/Activity;

.method protected onCreate(Landroid/os/Bundle;)V
    .locals 1
    const v0, 0x7f0b001e
    invoke-virtual {p0, v0}, Lcom/thirdparty/LibActivity;->setContentView(I)V
    return-void
.end method
"#;

fn write_smali(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn sample_app() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let smali = dir.path().join("smali");
    write_smali(&smali, "com/example/app/R$layout.smali", R_LAYOUT);
    write_smali(&smali, "com/example/app/R$id.smali", R_ID);
    write_smali(&smali, "com/example/app/MainActivity.smali", MAIN_ACTIVITY);
    write_smali(&smali, "com/example/app/SettingsActivity.smali", SETTINGS_ACTIVITY);
    write_smali(&smali, "com/example/app/widget/FancyButton.smali", FANCY_BUTTON);
    write_smali(&smali, "com/thirdparty/LibActivity.smali", LIBRARY_ACTIVITY);
    write_smali(&smali, "com/example/app/Broken.smali", ".method broken()V\n");
    (dir, smali)
}

#[test]
fn test_program_skips_unparseable_files() {
    let (_dir, smali) = sample_app();
    let program = SmaliProgram::load(&[smali]).unwrap();

    assert_eq!(program.len(), 6);
    let names: Vec<_> = program.classes().iter().map(|c| c.info.name.as_str()).collect();
    assert!(names.contains(&"com.example.app.R$layout"));
    assert!(!names.iter().any(|n| n.ends_with("Broken")));
}

#[test]
fn test_scanner_finds_literal_entry_calls() {
    let (_dir, smali) = sample_app();
    let program = SmaliProgram::load(&[smali]).unwrap();

    let mut scanner = ResourceUsageScanner::new("com.example.app", "com.example.app");
    scanner.scan(&program);
    let usage = scanner.into_usage();

    assert_eq!(usage.layout_ids.len(), 3);
    assert_eq!(usage.layout_ids.get(&0x7f0b001c).map(String::as_str), Some("activity_main"));
    // R$id fields are not layouts
    assert!(!usage.layout_ids.contains_key(&0x7f080001));

    assert_eq!(usage.reachable_ids, vec![0x7f0b001c]);
    assert_eq!(usage.valid_layout_names(), vec!["activity_main"]);
    // SettingsActivity passes a method result
    assert_eq!(usage.unresolved_calls, 1);
}

#[test]
fn test_scanner_ignores_classes_outside_prefix() {
    let (_dir, smali) = sample_app();
    let program = SmaliProgram::load(&[smali]).unwrap();

    let mut scanner = ResourceUsageScanner::new("com.example.app", "com.thirdparty");
    scanner.scan(&program);
    let usage = scanner.usage();

    // R classes live outside the prefix, so the id 0x7f0b001e has no name
    assert!(usage.layout_ids.is_empty());
    assert_eq!(usage.reachable_ids, vec![0x7f0b001e]);
    assert!(usage.valid_layout_names().is_empty());
}

#[test]
fn test_entry_call_inside_try_block_is_reachable() {
    let (_dir, smali) = sample_app();
    write_smali(
        &smali,
        "com/example/app/SettingsActivity.smali",
        r#".class public Lcom/example/app/SettingsActivity;
.super Landroid/app/Activity;

.method protected onCreate(Landroid/os/Bundle;)V
    .locals 1

    const v0, 0x7f0b001d

    :try_start_0
    invoke-virtual {p0, v0}, Lcom/example/app/SettingsActivity;->setContentView(I)V
    :try_end_0
    .catch Ljava/lang/RuntimeException; {:try_start_0 .. :try_end_0} :catch_0

    return-void

    :catch_0
    move-exception v0
    return-void
.end method
"#,
    );
    let program = SmaliProgram::load(&[smali]).unwrap();

    let mut scanner = ResourceUsageScanner::new("com.example.app", "com.example.app");
    scanner.scan(&program);

    assert_eq!(
        scanner.valid_layout_names(),
        vec!["activity_main", "activity_settings"]
    );
    assert_eq!(scanner.usage().unresolved_calls, 0);
}

#[test]
fn test_smali_supers_extend_framework_hierarchy() {
    let (_dir, smali) = sample_app();
    let program = SmaliProgram::load(&[smali]).unwrap();

    let mut table = HierarchyTable::android_framework();
    table.extend(program.hierarchy());

    let chain = table.ancestor_chain("com.example.app.widget.FancyButton").unwrap();
    assert_eq!(
        chain,
        vec![
            "android.widget.Button",
            "android.widget.TextView",
            "android.view.View",
            "java.lang.Object",
        ]
    );
    assert!(table.ancestor_chain("com.example.app.Unknown").is_none());
}

/// Hand-built bytecode source
struct InMemorySource {
    classes: Vec<(ClassInfo, Vec<MethodBody>)>,
}

impl BytecodeSource for InMemorySource {
    fn for_each_application_method_body(
        &self,
        package_prefix: &str,
        visitor: &mut dyn FnMut(&ClassInfo, &MethodBody),
    ) {
        for (class, bodies) in &self.classes {
            if class.name.starts_with(package_prefix) {
                for body in bodies {
                    visitor(class, body);
                }
            }
        }
    }
}

fn set_content_view(param: ValueType, arg: Operand) -> Statement {
    Statement::Invoke(InvokeExpr {
        method: MethodRef {
            class_name: "com.example.Main".to_string(),
            name: "setContentView".to_string(),
            param_types: vec![param],
            return_type: ValueType::Void,
        },
        args: vec![arg],
    })
}

#[test]
fn test_scanner_over_in_memory_source() {
    let mut layout = ClassInfo::new("com.example.R$layout");
    layout.fields.push(FieldInfo {
        name: "main".to_string(),
        field_type: ValueType::Int,
        constant: Some(7),
    });

    let main = ClassInfo::new("com.example.Main");
    let body = MethodBody {
        name: "onCreate".to_string(),
        statements: vec![
            set_content_view(ValueType::Int, Operand::IntConstant(7)),
            set_content_view(ValueType::Int, Operand::Local("v0".to_string())),
            set_content_view(
                ValueType::Object("android.view.View".to_string()),
                Operand::Local("v1".to_string()),
            ),
        ],
    };

    let init = MethodBody {
        name: "<init>".to_string(),
        statements: Vec::new(),
    };
    let source = InMemorySource {
        classes: vec![(layout, vec![init]), (main, vec![body])],
    };

    let mut scanner = ResourceUsageScanner::new("com.example", "com.example");
    scanner.scan(&source);

    assert_eq!(scanner.valid_layout_names(), vec!["main"]);
    assert_eq!(scanner.usage().unresolved_calls, 2);
}
