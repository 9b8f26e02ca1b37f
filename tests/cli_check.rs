mod common;

use common::TestEnv;

#[test]
fn test_check_lists_directories_in_order() {
    let env = TestEnv::new();
    env.write_file("a/b/file2", "x");
    env.write_file("a/file1", "x");
    std::fs::create_dir_all(env.project_path("c")).unwrap();

    let result = env.run(&["check", "--recursion-limit", "100"]);
    assert!(result.success, "stderr:\n{}", result.stderr);

    let root = env.root();
    let listed: Vec<&str> = result
        .stdout
        .lines()
        .filter_map(|l| l.strip_prefix("  "))
        .collect();
    let expected: Vec<String> = ["", "a", "a/b", "c"]
        .iter()
        .map(|rel| {
            if rel.is_empty() {
                root.display().to_string()
            } else {
                root.join(rel).display().to_string()
            }
        })
        .collect();
    assert_eq!(listed, expected, "stdout:\n{}", result.stdout);
    assert!(result.stdout.contains("Config: (defaults)"));
}

#[test]
fn test_check_json_honors_exclude_path() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.project_path("a/b")).unwrap();

    let result = env.run(&["--json", "check", "--exclude-path", "/b$"]);
    assert!(result.success, "stderr:\n{}", result.stderr);

    let value: serde_json::Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(value["event"], "check");
    let dirs: Vec<String> = value["directories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap().to_string())
        .collect();
    assert_eq!(dirs.len(), 2, "{dirs:?}");
    assert!(!dirs.iter().any(|d| d.ends_with("/b")));
}

#[test]
fn test_check_reports_recursion_limit() {
    let env = TestEnv::new();
    for i in 0..12 {
        env.write_file(&format!("f{i}"), "x");
    }

    let result = env.run(&["check"]);
    assert!(!result.success);
    assert!(
        result.stderr.contains("recursion limit exceeded"),
        "stderr:\n{}",
        result.stderr
    );
}

#[test]
fn test_check_rejects_invalid_pattern() {
    let env = TestEnv::new();

    let result = env.run(&["check", "--include-change", "(unclosed"]);
    assert!(!result.success);
    assert!(result.stderr.contains("(unclosed"), "stderr:\n{}", result.stderr);
}

#[test]
fn test_check_reads_project_config_and_warns_on_typo() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.project_path("src/nested")).unwrap();
    env.write_file(
        "treewatch.toml",
        "[watch]\ninclude_paths = [\"src\"]\nrecursion_limt = 5\n",
    );

    let result = env.run(&["check"]);
    assert!(result.success, "stderr:\n{}", result.stderr);
    assert!(result.stdout.contains("treewatch.toml"));
    assert!(result.stdout.contains("2 directories would be watched"), "stdout:\n{}", result.stdout);
    assert!(result.stderr.contains("recursion_limt"), "stderr:\n{}", result.stderr);
    assert!(result.stderr.contains("Did you mean 'recursion_limit'?"));
}

#[test]
fn test_check_env_override_recursion_limit() {
    let env = TestEnv::new();
    for i in 0..12 {
        env.write_file(&format!("f{i}"), "x");
    }

    let result = env.run_with_env(&["check"], &[("TREEWATCH_RECURSION_LIMIT", "50")]);
    assert!(result.success, "stderr:\n{}", result.stderr);
}
