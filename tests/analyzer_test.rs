use std::fs;
use std::io::Write;
use std::sync::Arc;

use wordfreq_core::{
    AnalysisInput, Analyzer, AnalyzerConfig, DiskCacheStore, FileInput, RankedEntry, RawRequest,
};

fn entries(pairs: &[(&str, u64)]) -> Vec<RankedEntry> {
    pairs.iter().map(|&(w, c)| RankedEntry::new(w, c)).collect()
}

fn txt_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn scenario_top_two() {
    let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
    let result = analyzer
        .analyze_request(Some("a a b b b c".into()), None, 2, vec![])
        .unwrap();
    assert_eq!(result, entries(&[("b", 3), ("a", 2)]));
}

#[test]
fn scenario_exclude_b() {
    let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
    let result = analyzer
        .analyze_request(Some("a a b b b c".into()), None, 5, vec!["b".into()])
        .unwrap();
    assert_eq!(result, entries(&[("a", 2), ("c", 1)]));
}

#[test]
fn scenario_empty_text() {
    let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
    let result = analyzer.analyze_request(Some(String::new()), None, 5, vec![]).unwrap();
    assert!(result.is_empty());
}

#[test]
fn file_split_anywhere_matches_single_pass() {
    let content = "The the THE cat";
    let file = txt_file(content);
    for chunk_size in 1..=content.len() + 1 {
        let config = AnalyzerConfig {
            chunk_size,
            ..AnalyzerConfig::default()
        };
        let analyzer = Analyzer::in_memory(config);
        let result = analyzer
            .analyze(&AnalysisInput::file(FileInput::new(file.path()), 10))
            .unwrap();
        assert_eq!(result, entries(&[("the", 3), ("cat", 1)]), "chunk size {}", chunk_size);
    }
}

#[test]
fn file_and_text_agree() {
    let content = "It was the best of times, it was the worst of times.";
    let file = txt_file(content);
    let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
    let from_text = analyzer.analyze(&AnalysisInput::text(content, 4)).unwrap();
    let from_file = analyzer
        .analyze(&AnalysisInput::file(FileInput::new(file.path()), 4))
        .unwrap();
    assert_eq!(from_text, from_file);
    assert_eq!(from_text, entries(&[("it", 2), ("of", 2), ("the", 2), ("times", 2)]));
}

#[test]
fn disk_cache_survives_a_new_analyzer() {
    let dir = tempfile::tempdir().unwrap();
    let input = AnalysisInput::text("x y y z z z", 2);

    let first = Analyzer::with_disk_cache_or_memory(dir.path(), AnalyzerConfig::default());
    let cold = first.analyze(&input).unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

    let second = Analyzer::with_disk_cache_or_memory(dir.path(), AnalyzerConfig::default());
    let warm = second.analyze(&input).unwrap();
    assert_eq!(cold, warm);
    assert_eq!(warm, entries(&[("z", 3), ("y", 2)]));
}

#[test]
fn exclusion_order_shares_one_cache_entry() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DiskCacheStore::open(dir.path()).unwrap());
    let analyzer = Analyzer::new(store, AnalyzerConfig::default());

    let a = AnalysisInput::text("a b c d a b", 3).with_exclude(["c", "d"]);
    let b = AnalysisInput::text("a b c d a b", 3).with_exclude(["D", "c"]);
    assert_eq!(analyzer.analyze(&a).unwrap(), analyzer.analyze(&b).unwrap());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn validated_file_request_runs_end_to_end() {
    let file = txt_file("Rust rust RUST go go python");
    let input = RawRequest {
        text_file: Some(file.path().to_path_buf()),
        top: Some(2),
        exclude: Some(vec!["Go".into()]),
        ..RawRequest::default()
    }
    .validate()
    .unwrap();
    let analyzer = Analyzer::in_memory(AnalyzerConfig::default());
    let result = analyzer.analyze(&input).unwrap();
    assert_eq!(result, entries(&[("rust", 3), ("python", 1)]));
}
