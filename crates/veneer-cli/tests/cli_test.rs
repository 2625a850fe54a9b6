//! Integration tests for `veneer generate` and `veneer check`.

use std::path::Path;
use tempfile::TempDir;
use termcolor::ColorChoice;
use veneer_cli::commands::{check, generate};
use veneer_cli::{CommandOptions, OutputFormat};

const METADATA: &str = r#"{
    "types": [
        { "name": "Acme.Widget", "kind": "class",
          "members": [
            { "kind": "property", "name": "Name", "type": "string" },
            { "kind": "property", "name": "Tint", "type": "Host.Color" }
          ] },
        { "name": "Acme.DerivedWidget", "kind": "class", "bases": ["Acme.Widget"],
          "members": [ { "kind": "method", "name": "Spin" } ] },
        { "name": "Acme.Broken", "kind": "class", "bases": ["Acme.Missing"] }
    ]
}"#;

const CONFIG: &str = r#"
metadata = "types.json"
out-dir = "out"

[[target]]
target = "Acme.Widget"
options = { proxy-base-classes = true }

[[target]]
target = "Acme.DerivedWidget"
options = { proxy-base-classes = true }

[[replacement]]
foreign = "Host.Color"
local = "Acme.RgbColor"
"#;

fn project(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("types.json"), METADATA).unwrap();
    std::fs::write(dir.path().join("veneer.toml"), config).unwrap();
    dir
}

fn options(dir: &Path) -> CommandOptions {
    CommandOptions {
        config: dir.join("veneer.toml"),
        format: OutputFormat::Json,
        color: ColorChoice::Never,
    }
}

#[test]
fn test_generate_writes_all_files() {
    let dir = project(CONFIG);
    let summary = generate::execute(&options(dir.path()), None).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.targets, 2);
    assert_eq!(summary.files, 5);

    let out = dir.path().join("out");
    for name in [
        "Acme.IWidget.g.cs",
        "Acme.WidgetProxy.g.cs",
        "Acme.IDerivedWidget.g.cs",
        "Acme.DerivedWidgetProxy.g.cs",
        "Veneer.Extra.g.cs",
    ] {
        assert!(out.join(name).is_file(), "missing {}", name);
    }

    let proxy = std::fs::read_to_string(out.join("Acme.WidgetProxy.g.cs")).unwrap();
    assert!(proxy.contains("global::Veneer.Adapter.Adapt<Acme.RgbColor>(_Instance.Tint)"));
}

#[test]
fn test_generate_skips_unchanged_files() {
    let dir = project(CONFIG);
    generate::execute(&options(dir.path()), None).unwrap();
    let again = generate::execute(&options(dir.path()), None).unwrap();
    assert_eq!(again.files, 0);
}

#[test]
fn test_generate_out_dir_override() {
    let dir = project(CONFIG);
    let target = dir.path().join("elsewhere");
    generate::execute(&options(dir.path()), Some(target.clone())).unwrap();
    assert!(target.join("Veneer.Extra.g.cs").is_file());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_check_reports_failed_target_without_writing() {
    let config = format!("{}\n[[target]]\ntarget = \"Acme.Broken\"\n", CONFIG);
    let dir = project(&config);
    let summary = check::execute(&options(dir.path())).unwrap();

    assert!(!summary.is_success());
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.targets, 2);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_metadata_is_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("veneer.toml"), CONFIG).unwrap();
    let err = check::execute(&options(dir.path())).unwrap_err();
    assert!(err.to_string().contains("type metadata"));
}
