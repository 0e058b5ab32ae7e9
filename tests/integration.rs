use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn caselens_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("caselens");
    path
}

fn case_id(n: u32) -> String {
    format!("1000000000000000{:02}", n)
}

/// Six cases in two obvious groups around (0, 0) and (10, 10).
const POINTS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [10.0, 10.0],
    [11.0, 10.0],
    [10.0, 11.0],
];

fn write_case(dir: &Path, id: &str, summary: &str, embedding: &[f32]) {
    let record = serde_json::json!({
        "Id": id,
        "CaseDate": "2024-03-01",
        "CityName": "臺中",
        "CityId": 6,
        "Summary": summary,
        "CaseTitle": format!("案件 {}", id),
        "embedding": embedding,
    });
    fs::write(dir.join(format!("{}.json", id)), record.to_string()).unwrap();
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let cases_dir = root.join("cases");
    fs::create_dir_all(&cases_dir).unwrap();

    for (i, point) in POINTS.iter().enumerate() {
        let id = case_id(i as u32 + 1);
        let summary = format!("{} 判決摘要。{}", id, "被告涉犯詐欺取財罪。".repeat(15));
        write_case(&cases_dir, &id, &summary, point);
    }
    // too short to be kept
    write_case(&cases_dir, &case_id(7), "short", &[5.0, 5.0]);

    let config_content = format!(
        r#"[corpus]
dir = "{root}/cases"
dims = 2

[db]
path = "{root}/data/caselens.sqlite"

[clustering]
clusters = 2
max_iterations = 10
output_dir = "{root}/out"

[retrieval]
final_limit = 3
strategy = "index"
"#,
        root = root.display()
    );

    let config_path = config_dir.join("caselens.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_caselens(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = caselens_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run caselens binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn search_json(config_path: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["search"];
    full.extend_from_slice(args);
    full.push("--json");
    let (stdout, stderr, success) = run_caselens(config_path, &full);
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    serde_json::from_str(&stdout).unwrap()
}

fn ranked_ids(response: &serde_json::Value) -> Vec<String> {
    response["similarity"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hit| hit["documentId"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_caselens(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));

    let (_, _, success) = run_caselens(&config_path, &["init"]);
    assert!(success, "Second init failed (not idempotent)");
}

#[test]
fn test_import_skips_bad_cases() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_caselens(&config_path, &["import"]);
    assert!(success, "import failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("loaded:  6"), "stdout={}", stdout);
    assert!(stdout.contains("skipped: 1"), "stdout={}", stdout);

    // re-import upserts rather than duplicating
    let (stdout, _, success) = run_caselens(&config_path, &["import"]);
    assert!(success);
    assert!(stdout.contains("indexed: 6"), "stdout={}", stdout);
}

#[test]
fn test_cluster_writes_files() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_caselens(&config_path, &["cluster"]);
    assert!(success, "cluster failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("into 2 clusters"), "stdout={}", stdout);

    let out = tmp.path().join("out");
    let index: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("cluster-index.json")).unwrap()).unwrap();
    let index = index.as_object().unwrap();
    assert_eq!(index.len(), 6);
    for n in 1..=3 {
        assert_eq!(index[&case_id(n)], case_id(1));
    }
    for n in 4..=6 {
        assert_eq!(index[&case_id(n)], case_id(4));
    }

    let cluster: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.join(format!("cluster-{}.json", case_id(4)))).unwrap(),
    )
    .unwrap();
    assert_eq!(cluster["id"], case_id(4));
    assert_eq!(cluster["docIds"].as_array().unwrap().len(), 3);
    // labeling is disabled, so every cluster gets the fallback label
    assert_eq!(cluster["keywords"], serde_json::json!(["unclassified"]));
    assert_eq!(cluster["name"], "unclassified");
    assert_eq!(
        cluster["summary"],
        format!("Summary for cluster {} with 3 documents", case_id(4))
    );
}

#[test]
fn test_cluster_override_and_invalid_k() {
    let (tmp, config_path) = setup_test_env();

    let out = tmp.path().join("single");
    let (stdout, stderr, success) = run_caselens(
        &config_path,
        &["cluster", "--clusters", "1", "--output-dir", out.to_str().unwrap()],
    );
    assert!(success, "cluster failed: stdout={}, stderr={}", stdout, stderr);
    assert!(out.join("cluster-index.json").is_file());

    let (_, _, success) = run_caselens(&config_path, &["cluster", "--clusters", "7"]);
    assert!(!success, "K larger than the corpus must fail");
}

#[test]
fn test_search_by_id_strategies_agree() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_caselens(&config_path, &["import"]);
    assert!(success, "import failed: {}", stderr);

    let query = case_id(4);
    let index = search_json(&config_path, &[query.as_str(), "--strategy", "index"]);
    let brute = search_json(&config_path, &[query.as_str(), "--strategy", "brute"]);

    let expected = vec![case_id(5), case_id(6), case_id(4)];
    assert_eq!(ranked_ids(&index), expected);
    assert_eq!(ranked_ids(&brute), expected);
    assert_eq!(index["similarity"], brute["similarity"]);

    let doc = &index["documents"][&case_id(5)];
    assert_eq!(doc["metadata"]["CaseTitle"], format!("案件 {}", case_id(5)));
    assert!(doc.get("vector").is_none());
}

#[test]
fn test_index_search_requires_import() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_caselens(&config_path, &["search", case_id(1).as_str()]);
    assert!(!success);
    assert!(stderr.contains("caselens import"), "stderr={}", stderr);
}

#[test]
fn test_free_text_search_needs_embedding_provider() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) =
        run_caselens(&config_path, &["search", "詐欺取財", "--strategy", "brute"]);
    assert!(!success);
    assert!(stderr.contains("disabled"), "stderr={}", stderr);
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_caselens(&tmp.path().join("nope.toml"), &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
