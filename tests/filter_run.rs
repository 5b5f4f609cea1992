use std::fs;
use std::path::Path;

use filterline::{
    CancelFlag, ConfigError, CoreError, CustomConfigBuilder, FileRunner, FilterConfig, FilterLineError, InputFilter,
    RuleLoader, StreamStats,
};

const LOG: &str = "\
10:00:01 main INFO  boot
10:00:02 net  ERROR connect refused host=db
10:00:03 main DEBUG tick
10:00:04 net  WARN  retry
10:00:05 main ERROR panic begin
stack frame 1
stack frame 2
end of stack
10:00:06 main INFO  done
";

fn write_project_config(root: &Path, name: &str, content: &str) {
    let dir = root.join(".vscode");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_string_filter_writes_sibling_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    fs::write(&input, LOG).unwrap();

    let set = InputFilter::contains("ERROR").unwrap().compile().unwrap();
    let report = FileRunner::default().run(&input, &set).unwrap();

    assert_eq!(report.output, dir.path().join("app.log.filterline.log"));
    assert!(!report.overwrite);
    assert_eq!(report.stats, StreamStats { lines_read: 9, lines_kept: 2 });
    assert_eq!(
        fs::read_to_string(&report.output).unwrap(),
        "10:00:02 net  ERROR connect refused host=db\n10:00:05 main ERROR panic begin\n"
    );
    // 输入文件保持不变
    assert_eq!(fs::read_to_string(&input).unwrap(), LOG);
}

#[test]
fn test_second_pass_overwrites_filtered_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    fs::write(&input, LOG).unwrap();

    let first = FileRunner::default()
        .run(&input, &InputFilter::not_contains("DEBUG").unwrap().compile().unwrap())
        .unwrap();
    let second = FileRunner::default()
        .run(&first.output, &InputFilter::matches(r"^\d\d:").unwrap().compile().unwrap())
        .unwrap();

    assert!(second.overwrite);
    assert_eq!(second.output, first.output);
    assert_eq!(second.stats, StreamStats { lines_read: 8, lines_kept: 5 });
    let lines: Vec<String> = fs::read_to_string(&second.output).unwrap().lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|line| !line.contains("DEBUG") && !line.starts_with("stack")));
}

#[test]
fn test_general_config_from_project_root() {
    let root = tempfile::tempdir().unwrap();
    write_project_config(
        root.path(),
        "filterline.eoml",
        "# triage rules\n\
         type:general\n\
         prefix:^(\\S+) (\\S+)\\s*\n\
         rules:\n\
         [\n\
         src:^ERROR panic\n\
         until:^end of stack\n\
         tag:PANIC\n\
         flag:main\n\
         -\n\
         src:^ERROR connect refused host=(\\w+)\n\
         dest:DB DOWN\n\
         tag:NET\n\
         -\n\
         src:^WARN\n\
         ]\n",
    );
    let input = root.path().join("app.log");
    fs::write(&input, LOG).unwrap();

    let config = FilterConfig::discover(root.path());
    let set = RuleLoader::new().load(&config).unwrap();
    let report = FileRunner::from_config(&config).run(&input, &set).unwrap();

    let expected = [
        format!("{:>8} {:>8}  {:>4} {:>4} {}", "10:00:02", "net", "", "NET", "DB DOWN db"),
        format!("{:>8} {:>8}  {:>4} {:>4} {}", "10:00:04", "net", "", "", "WARN  retry"),
        format!("{:>8} {:>8}  {:>4} {:>4} {}", "10:00:05", "main", "main", "PANIC", "ERROR panic begin"),
        "stack frame 1".to_string(),
        "stack frame 2".to_string(),
        "end of stack".to_string(),
    ];
    let out = fs::read_to_string(&report.output).unwrap();
    assert_eq!(out.lines().collect::<Vec<_>>(), expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_json_config_equivalent_to_markup() {
    let root = tempfile::tempdir().unwrap();
    write_project_config(
        root.path(),
        "filterline.json",
        r#"{"type": "regexlist_notmatchany", "rules": ["DEBUG", "^stack"]}"#,
    );
    let other = tempfile::tempdir().unwrap();
    write_project_config(
        other.path(),
        "filterline.txt",
        "type:regexlist_notmatchany\nrules:\n[\nDEBUG\n^stack\n]\n",
    );
    let input_dir = tempfile::tempdir().unwrap();
    let input = input_dir.path().join("app.log");
    fs::write(&input, LOG).unwrap();

    let mut outputs = Vec::new();
    for root in [root.path(), other.path()] {
        let config = CustomConfigBuilder::new()
            .project_root(root)
            .output_path(root.join("out.log"))
            .build();
        let set = RuleLoader::new().load(&config).unwrap();
        let report = FileRunner::from_config(&config).run(&input, &set).unwrap();
        assert_eq!(report.stats.lines_kept, 6);
        outputs.push(fs::read_to_string(report.output).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_bad_config_leaves_no_output() {
    let root = tempfile::tempdir().unwrap();
    write_project_config(root.path(), "filterline.txt", "type:general\nrules:\n[\nsrc:(unclosed\n]\n");
    let input = root.path().join("app.log");
    fs::write(&input, LOG).unwrap();

    let err = RuleLoader::new().load(&FilterConfig::discover(root.path())).unwrap_err();
    assert!(matches!(
        err,
        FilterLineError::Core(CoreError::Config(ConfigError::InvalidSourcePattern { .. }))
    ));
    assert!(!root.path().join("app.log.filterline.log").exists());
}

#[test]
fn test_missing_config() {
    let root = tempfile::tempdir().unwrap();
    let err = RuleLoader::new().load(&FilterConfig::discover(root.path())).unwrap_err();
    assert!(matches!(err, FilterLineError::ConfigNotFound(_)));
}

#[test]
fn test_cancelled_run_publishes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    fs::write(&input, LOG).unwrap();
    let existing = dir.path().join("app.log.filterline.log");
    fs::write(&existing, "previous result\n").unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();
    let set = InputFilter::contains("INFO").unwrap().compile().unwrap();
    let err = FileRunner::default().with_cancel(cancel).run(&input, &set).unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(fs::read_to_string(&existing).unwrap(), "previous result\n");
    // 目录里只剩输入和旧输出，临时文件已清理
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let set = InputFilter::contains("x").unwrap().compile().unwrap();
    let err = FileRunner::default().run(&dir.path().join("absent.log"), &set).unwrap_err();
    assert!(matches!(err, FilterLineError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[cfg(feature = "async-io")]
#[tokio::test]
async fn test_async_run_matches_sync() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    fs::write(&input, LOG).unwrap();
    let set = InputFilter::not_matches("^stack").unwrap().compile().unwrap();

    let sync_report = FileRunner::new(
        CustomConfigBuilder::new().output_path(dir.path().join("sync.log")).build().output,
    )
    .run(&input, &set)
    .unwrap();
    let async_report = FileRunner::new(
        CustomConfigBuilder::new().output_path(dir.path().join("async.log")).build().output,
    )
    .run_async(&input, &set)
    .await
    .unwrap();

    assert_eq!(async_report.stats, sync_report.stats);
    assert_eq!(
        fs::read_to_string(async_report.output).unwrap(),
        fs::read_to_string(sync_report.output).unwrap()
    );
}
