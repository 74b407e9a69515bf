use bookscan_challenges::book_scanning::{Challenge, Solution, Track};
use bookscan_runtime::*;
use serde_json::json;
use std::{
    fs,
    path::{Path, PathBuf},
};

const SCENARIO: &str = "3 2 2\n1 2 3\n2 1 1\n0 1\n1 0 1\n2\n";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bookscan-runtime-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn settings(dir: &Path, algorithm: &str) -> RunSettings {
    let input = dir.join("a_example.txt");
    fs::write(&input, SCENARIO).unwrap();
    RunSettings {
        input,
        output: dir.join("out").join("a_example.txt"),
        algorithm: algorithm.to_string(),
        hyperparameters: None,
        checkpoints: false,
    }
}

fn checkpoint_scores(report: &RunReport) -> Vec<u64> {
    report
        .checkpoints
        .iter()
        .map(|p| p.rsplit(".score_").next().unwrap().parse().unwrap())
        .collect()
}

#[test]
fn test_compute_solution_writes_output() {
    let dir = scratch_dir("greedy");
    let settings = settings(&dir, "greedy_sorted");
    let report = compute_solution(&settings).unwrap();
    assert_eq!(report.algorithm, "greedy_sorted");
    assert_eq!(report.score, 5);
    assert_eq!(report.num_libraries_used, 2);
    assert_eq!(report.num_books_shipped, 2);
    assert!(report.checkpoints.is_empty());
    assert_eq!(
        fs::read_to_string(&settings.output).unwrap(),
        "2\n1 1\n2\n0 1\n1\n"
    );
    assert_eq!(verify_solution(&settings.input, &settings.output).unwrap(), 5);
}

#[test]
fn test_output_is_overwritten() {
    let dir = scratch_dir("overwrite");
    let settings = settings(&dir, "greedy_exact");
    fs::create_dir_all(settings.output.parent().unwrap()).unwrap();
    fs::write(&settings.output, "stale").unwrap();
    compute_solution(&settings).unwrap();
    let written: Solution = fs::read_to_string(&settings.output)
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(written.len(), 2);
}

#[test]
fn test_brute_force_checkpoints() {
    let dir = scratch_dir("brute_force");
    let settings = settings(&dir, "brute_force");
    let report = compute_solution(&settings).unwrap();
    assert_eq!(report.score, 5);
    assert_eq!(checkpoint_scores(&report), vec![3, 5]);
    for path in &report.checkpoints {
        assert!(Path::new(path).exists());
    }
    let last = fs::read_to_string(report.checkpoints.last().unwrap()).unwrap();
    assert_eq!(last, fs::read_to_string(&settings.output).unwrap());
}

#[test]
fn test_output_keeps_best_union_score() {
    // library 2 holds the same book as library 0: the search saves 0+2 last
    // because its nominal score is 20, but its union score is only 10
    let dir = scratch_dir("best_union");
    let mut settings = settings(&dir, "brute_force");
    fs::write(&settings.input, "2 3 3\n10 5\n1 1 1\n0\n1 1 1\n1\n1 1 1\n0\n").unwrap();
    settings.output = dir.join("out.txt");
    let report = compute_solution(&settings).unwrap();
    assert_eq!(report.score, 15);
    assert_eq!(checkpoint_scores(&report), vec![10, 15]);
    let output = fs::read_to_string(&settings.output).unwrap();
    assert_eq!(output, fs::read_to_string(&report.checkpoints[1]).unwrap());
    assert_eq!(verify_solution(&settings.input, &settings.output).unwrap(), 15);
}

#[test]
fn test_parallel_checkpoints_increase() {
    let dir = scratch_dir("parallel");
    let mut settings = settings(&dir, "brute_force_parallel");
    settings.hyperparameters = json!({"workers": 2}).as_object().cloned();
    let report = compute_solution(&settings).unwrap();
    assert_eq!(report.score, 5);
    let scores = checkpoint_scores(&report);
    assert!(scores.windows(2).all(|w| w[0] < w[1]), "{:?}", scores);
    assert_eq!(scores.last(), Some(&5));
}

#[test]
fn test_forced_checkpoints() {
    let dir = scratch_dir("forced");
    let mut settings = settings(&dir, "greedy_popularity");
    settings.checkpoints = true;
    let report = compute_solution(&settings).unwrap();
    assert_eq!(checkpoint_scores(&report), vec![5]);
}

#[test]
fn test_unknown_algorithm() {
    let dir = scratch_dir("unknown");
    let settings = settings(&dir, "hill_climbing");
    let err = compute_solution(&settings).unwrap_err();
    assert!(err.to_string().contains("brute_force_parallel"));
    assert!(!settings.output.exists());
}

#[test]
fn test_malformed_input() {
    let dir = scratch_dir("malformed");
    let settings = settings(&dir, "greedy_sorted");
    fs::write(&settings.input, "3 2 2\n1 2\n").unwrap();
    let err = compute_solution(&settings).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

#[test]
fn test_verify_rejects_infeasible_submission() {
    let dir = scratch_dir("verify");
    let settings = settings(&dir, "greedy_sorted");
    let submission = dir.join("submission.txt");
    // library 0 ships two books with a single shipping day
    fs::write(&submission, "1\n0 2\n0 1\n").unwrap();
    assert!(verify_solution(&settings.input, &submission).is_err());
}

#[test]
fn test_generate_instance() {
    let dir = scratch_dir("generate");
    let track = Track {
        books: 40,
        libraries: 6,
        days: 10,
    };
    let output = dir.join("generated").join("g.txt");
    let text = generate_instance("some seed", &track, Some(&output)).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), text);
    assert_eq!(generate_instance("some seed", &track, None).unwrap(), text);
    assert_ne!(generate_instance("other seed", &track, None).unwrap(), text);

    let challenge: Challenge = text.parse().unwrap();
    assert_eq!(challenge.num_books, 40);
    assert_eq!(challenge.num_libraries(), 6);
}
