use super::config::{RunConfiguration, TaskOptions};
use super::host::IoHost;
use super::output::{OutputWriter, compute_destination, ensure_directory, rewrite_source_map};
use super::test_host::MemoryHost;

fn config(host: &MemoryHost, destination: Option<&str>, base_path: Option<&str>) -> RunConfiguration {
    let options = TaskOptions {
        base_path: base_path.map(str::to_string),
        ..TaskOptions::default()
    };
    RunConfiguration::resolve(&options, destination, host)
}

#[test]
fn destination_reroots_the_cwd_relative_path() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("out"), None);

    let destination = compute_destination(&host, "/work/a/x.js", &config).unwrap();
    assert_eq!(destination, "/work/out/a/x.js");
}

#[test]
fn destination_strips_the_base_path() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("build/js"), Some("src"));

    let destination = compute_destination(&host, "/work/src/app/x.js", &config).unwrap();
    assert_eq!(destination, "/work/build/js/app/x.js");
}

#[test]
fn destination_outside_the_base_path_is_an_error() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("out"), Some("src"));

    let err = compute_destination(&host, "/work/test/x.js", &config).unwrap_err();
    assert_eq!(err.to_string(), "/work/test/x.js is not under base path 'src/'");
}

#[test]
fn destination_accepts_an_absolute_destination() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("/srv/site"), None);

    let destination = compute_destination(&host, "/work/a/x.js", &config).unwrap();
    assert_eq!(destination, "/srv/site/a/x.js");
}

#[test]
fn destination_keeps_the_name_without_a_directory() {
    let host = MemoryHost::new("/work");

    let none = config(&host, None, Some("src"));
    assert_eq!(
        compute_destination(&host, "/work/test/x.js", &none).unwrap(),
        "/work/test/x.js"
    );

    let single = config(&host, Some("out/all.js"), None);
    assert_eq!(
        compute_destination(&host, "/work/out/all.js", &single).unwrap(),
        "/work/out/all.js"
    );
}

#[test]
fn relocated_map_points_back_at_its_source() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("out"), None);
    let map = r#"{"version":3,"file":"x.js","sourceRoot":"","sources":["x.ts"],"names":[],"mappings":"AAAA"}"#;

    let rewritten =
        rewrite_source_map(&host, "/work/a/x.js.map", "/work/out/a/x.js.map", map, &config)
            .unwrap();

    assert_eq!(
        rewritten,
        r#"{"version":3,"file":"x.js","sourceRoot":"","sources":["../../a/x.ts"],"names":[],"mappings":"AAAA"}"#
    );
}

#[test]
fn relocated_map_keeps_only_the_first_source() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("out/js"), Some("src"));
    let map = r#"{"version":3,"sources":["x.ts","y.ts"]}"#;

    let rewritten =
        rewrite_source_map(&host, "/work/src/x.js.map", "/work/out/js/x.js.map", map, &config)
            .unwrap();

    let value: serde_json::Value = serde_json::from_str(&rewritten).unwrap();
    assert_eq!(value["sources"], serde_json::json!(["../../src/x.ts"]));
}

#[test]
fn maps_that_did_not_move_are_untouched() {
    let host = MemoryHost::new("/work");
    let map = r#"{"sources":["x.ts"]}"#;

    let no_dest = config(&host, None, None);
    let same = rewrite_source_map(&host, "/work/x.js.map", "/work/x.js.map", map, &no_dest).unwrap();
    assert_eq!(same, map);

    let single = config(&host, Some("all.js"), None);
    let same =
        rewrite_source_map(&host, "/work/all.js.map", "/work/all.js.map", map, &single).unwrap();
    assert_eq!(same, map);
}

#[test]
fn non_map_artifacts_are_untouched() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("out"), None);
    let text = "not json at all";

    let same = rewrite_source_map(&host, "/work/x.js", "/work/out/x.js", text, &config).unwrap();
    assert_eq!(same, text);
}

#[test]
fn map_without_sources_list_is_an_error() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("out"), None);

    let err = rewrite_source_map(
        &host,
        "/work/x.js.map",
        "/work/out/x.js.map",
        r#"{"version":3}"#,
        &config,
    )
    .unwrap_err();
    assert!(err.to_string().contains("no sources"));
}

#[test]
fn map_with_empty_sources_is_left_alone() {
    let host = MemoryHost::new("/work");
    let config = config(&host, Some("out"), None);
    let map = r#"{"version":3,"sources":[]}"#;

    let same = rewrite_source_map(&host, "/work/x.js.map", "/work/out/x.js.map", map, &config)
        .unwrap();
    assert_eq!(same, map);
}

#[test]
fn writer_creates_missing_directories() {
    let host = MemoryHost::new("/work");
    let mut writer = OutputWriter::new();

    writer
        .write(&host, "/work/out/a/b/x.js", "let x;", false)
        .unwrap();

    assert!(host.directory_exists("/work/out"));
    assert!(host.directory_exists("/work/out/a/b"));
    assert_eq!(host.contents("/work/out/a/b/x.js").as_deref(), Some("let x;"));
    assert_eq!(writer.written(), ["/work/out/a/b/x.js"]);
}

#[test]
fn writer_does_not_record_failed_writes() {
    let host = MemoryHost::new("/work");
    host.fail_writes_under("/work/locked");
    let mut writer = OutputWriter::new();

    assert!(writer.write(&host, "/work/locked/x.js", "", false).is_err());
    assert!(writer.written().is_empty());
}

#[test]
fn ensure_directory_rejects_a_file_in_the_way() {
    let host = MemoryHost::new("/work");
    host.add_file("/work/out", "i am a file");

    let err = ensure_directory(&host, "/work/out/a").unwrap_err();
    assert_eq!(err.to_string(), "\"/work/out\" exists but isn't a directory");
    assert!(!host.directory_exists("/work/out/a"));
}

#[test]
fn ensure_directory_is_a_no_op_for_existing_directories() {
    let host = MemoryHost::new("/work");
    host.add_directory("/work/out");

    ensure_directory(&host, "/work/out").unwrap();
    assert!(host.directory_exists("/work/out"));
}
