use super::args::{CliArgs, Module, NewLine, Target};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn positional_files_and_destination() {
    let args = CliArgs::try_parse_from(["tsb", "a.ts", "b.ts", "-d", "out"]).unwrap();

    assert_eq!(args.files, vec!["a.ts", "b.ts"]);
    assert_eq!(args.dest.as_deref(), Some("out"));
    assert_eq!(args.task, None);
}

#[test]
fn camel_case_and_kebab_case_flags_are_equivalent() {
    let camel = CliArgs::try_parse_from([
        "tsb",
        "--sourceMap",
        "--noLib",
        "--basePath",
        "src",
        "--libDir",
        "/opt/lib",
    ])
    .unwrap();
    let kebab = CliArgs::try_parse_from([
        "tsb",
        "--source-map",
        "--no-lib",
        "--base-path",
        "src",
        "--lib-dir",
        "/opt/lib",
    ])
    .unwrap();

    for args in [camel, kebab] {
        assert!(args.source_map);
        assert!(args.no_lib);
        assert_eq!(args.base_path.as_deref(), Some("src"));
        assert_eq!(args.lib_dir, Some(PathBuf::from("/opt/lib")));
    }
}

#[test]
fn value_enums_ignore_case() {
    let args = CliArgs::try_parse_from([
        "tsb", "--target", "ES5", "--module", "AMD", "--newLine", "CRLF",
    ])
    .unwrap();

    assert_eq!(args.target, Some(Target::Es5));
    assert_eq!(args.module, Some(Module::Amd));
    assert_eq!(args.new_line, Some(NewLine::Crlf));
}

#[test]
fn rejects_unknown_target() {
    assert!(CliArgs::try_parse_from(["tsb", "--target", "es2099"]).is_err());
}

#[test]
fn unset_flags_do_not_become_options() {
    let args = CliArgs::try_parse_from(["tsb", "a.ts"]).unwrap();
    let options = args.task_options();

    assert_eq!(options.sourcemap, None);
    assert_eq!(options.nolib, None);
    assert_eq!(options.ignore_type_check, None);
    assert_eq!(options.target, None);
}

#[test]
fn set_flags_become_task_options() {
    let args = CliArgs::try_parse_from([
        "tsb",
        "--declaration",
        "--comments",
        "--ignoreTypeCheck",
        "false",
        "--disallowAsi",
        "-t",
        "es5",
        "-m",
        "node",
        "--newLine",
        "lf",
    ])
    .unwrap();
    let options = args.task_options();

    assert_eq!(options.declaration, Some(true));
    assert_eq!(options.comments, Some(true));
    assert_eq!(options.ignore_type_check, Some(false));
    assert_eq!(options.disallow_asi, Some(true));
    assert_eq!(options.target.as_deref(), Some("es5"));
    assert_eq!(options.module.as_deref(), Some("node"));
    assert_eq!(options.new_line.as_deref(), Some("lf"));
}
