//! Integration tests for the compilation driver
//!
//! These tests drive the public API against a real temporary directory:
//! - Loading a task file and compiling each of its groups
//! - Plugging a custom compiler engine into the driver
//! - Destination layout and source map relocation

use std::path::Path;
use tempfile::TempDir;
use tsb::cli::task::{load_task_file, run_task};
use tsb::{
    CompilationSettings, CompilerEngine, CompilerPhase, Driver, OsHost, OutputArtifact,
    PhaseResult, RunConfiguration, SourceUnit, TaskOptions,
};

/// Helper to create a file (and its parent directories) under `root`
fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn read(root: &Path, name: &str) -> String {
    std::fs::read_to_string(root.join(name)).unwrap()
}

fn host_for(root: &Path) -> OsHost {
    OsHost::with_current_directory(&root.to_string_lossy())
}

/// Engine that upper-cases every non-declaration source into a `.js` file.
#[derive(Default)]
struct UpperCaseEngine {
    units: Vec<SourceUnit>,
}

impl CompilerEngine for UpperCaseEngine {
    fn add_file(&mut self, unit: SourceUnit) {
        self.units.push(unit);
    }

    fn compile<'a>(
        &'a mut self,
        _settings: &'a CompilationSettings,
        resolve_path: &'a dyn Fn(&str) -> String,
    ) -> Box<dyn Iterator<Item = PhaseResult> + 'a> {
        let mut emit = PhaseResult::new(CompilerPhase::Emit);
        for unit in self.units.iter().filter(|unit| !unit.path.ends_with(".d.ts")) {
            let stem = unit.path.trim_end_matches(".ts");
            emit.output_files.push(OutputArtifact {
                name: resolve_path(&format!("{stem}.js")),
                text: unit.text.to_uppercase(),
                write_byte_order_mark: false,
            });
        }
        Box::new([PhaseResult::new(CompilerPhase::Syntax), emit].into_iter())
    }
}

#[test]
fn test_task_file_groups_compile_independently() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/a.ts", "/// <reference path=\"shared/util.ts\"/>\nlet a = util;\n");
    write(root, "src/shared/util.ts", "let util = 1;\n");
    write(root, "src/broken.ts", "let b; /* oops\n");
    write(
        root,
        "task.json",
        r#"{
            "options": { "basePath": "src", "noLib": true },
            "files": [
                { "src": ["src/broken.ts"], "dest": "out/broken" },
                { "src": ["src/a.ts"], "dest": "out/app" },
                { "src": ["src/a.ts"], "dest": "out/bundle.js" }
            ]
        }"#,
    );

    let task = load_task_file(&root.join("task.json")).unwrap();
    let host = host_for(root);
    let succeeded = run_task(&host, "lib", &task.options, &task.files);

    // The broken group fails; the others still produce their outputs.
    assert!(!succeeded);
    assert!(!root.join("out/broken").exists());
    assert_eq!(read(root, "out/app/shared/util.js"), "let util = 1;");
    assert!(read(root, "out/app/a.js").ends_with("let a = util;"));

    let bundle = read(root, "out/bundle.js");
    let util_at = bundle.find("let util = 1;").unwrap();
    let a_at = bundle.find("let a = util;").unwrap();
    assert!(util_at < a_at, "dependency must come first:\n{bundle}");
}

#[test]
fn test_custom_engine_outputs_are_placed_by_the_driver() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "app/x.ts", "let x;\n");
    let host = host_for(root);
    let options = TaskOptions {
        nolib: Some(true),
        ..TaskOptions::default()
    };
    let config = RunConfiguration::resolve(&options, Some("dist"), &host);

    let succeeded = Driver::new(&host, "lib")
        .with_engine(UpperCaseEngine::default())
        .run(&["app/x.ts".to_string()], &config);

    assert!(succeeded);
    assert_eq!(read(root, "dist/app/x.js"), "LET X;\n");
}

#[test]
fn test_source_maps_follow_their_scripts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/deep/x.ts", "let x = 1;\nlet y = 2;\n");
    let host = host_for(root);
    let options = TaskOptions {
        nolib: Some(true),
        sourcemap: Some(true),
        ..TaskOptions::default()
    };
    let config = RunConfiguration::resolve(&options, Some("out/js"), &host);

    let written = Driver::new(&host, "lib")
        .run_to_outcome(&["src/deep/x.ts".to_string()], &config)
        .unwrap();

    assert_eq!(written.len(), 2);
    let map: serde_json::Value =
        serde_json::from_str(&read(root, "out/js/src/deep/x.js.map")).unwrap();
    assert_eq!(map["sources"], serde_json::json!(["../../../../src/deep/x.ts"]));
    assert!(read(root, "out/js/src/deep/x.js").ends_with("//# sourceMappingURL=x.js.map"));
}
