//! The run harness behind the `bookscan` binary: loads an instance, runs one
//! registry algorithm, keeps checkpoint files and writes the submission.

use anyhow::{anyhow, Context, Result};
use bookscan_algorithms::book_scanning as algorithms;
use bookscan_challenges::book_scanning::{Challenge, Solution, Track};
use bookscan_utils::{checkpoint_path, save_file, seed_from_str};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub algorithm: String,
    pub hyperparameters: Option<Map<String, Value>>,
    /// Forces checkpoint files for algorithms that do not ask for them.
    pub checkpoints: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub algorithm: String,
    pub score: u64,
    pub num_libraries_used: usize,
    pub num_books_shipped: usize,
    pub checkpoints: Vec<String>,
    pub elapsed_ms: u64,
}

/// Receives every solution an algorithm saves and keeps the one with the
/// highest union score, a later save winning ties. Checkpoint files are only
/// written for union scores beating the previous checkpoint.
pub struct Checkpointer<'a> {
    challenge: &'a Challenge,
    output: &'a Path,
    enabled: bool,
    best: RefCell<Option<(u64, Solution)>>,
    last_score: RefCell<Option<u64>>,
    written: RefCell<Vec<PathBuf>>,
}

impl<'a> Checkpointer<'a> {
    pub fn new(challenge: &'a Challenge, output: &'a Path, enabled: bool) -> Self {
        Self {
            challenge,
            output,
            enabled,
            best: RefCell::new(None),
            last_score: RefCell::new(None),
            written: RefCell::new(Vec::new()),
        }
    }

    pub fn save(&self, solution: &Solution) -> Result<()> {
        let score = self.challenge.evaluate_total_score(solution)?;
        {
            let mut best = self.best.borrow_mut();
            if best.as_ref().map_or(true, |(best_score, _)| score >= *best_score) {
                *best = Some((score, solution.clone()));
            } else {
                debug!("saved solution kept aside, score {} is below the best", score);
            }
        }
        if !self.enabled {
            return Ok(());
        }
        let mut last_score = self.last_score.borrow_mut();
        if last_score.map_or(false, |last| score <= last) {
            debug!("checkpoint skipped, score {} is not an improvement", score);
            return Ok(());
        }
        let path = checkpoint_path(self.output, score);
        save_file(&path, &solution.to_submission())?;
        info!("checkpoint {} written", path.display());
        *last_score = Some(score);
        self.written.borrow_mut().push(path);
        Ok(())
    }

    /// The highest scoring solution saved so far.
    pub fn best(&self) -> Option<Solution> {
        self.best.borrow().as_ref().map(|(_, solution)| solution.clone())
    }

    pub fn written(&self) -> Vec<PathBuf> {
        self.written.borrow().clone()
    }
}

pub fn compute_solution(settings: &RunSettings) -> Result<RunReport> {
    let start = Instant::now();
    let entry = algorithms::find(&settings.algorithm).ok_or_else(|| {
        anyhow!(
            "Unknown algorithm '{}'. Available: {}",
            settings.algorithm,
            algorithms::names().join(", ")
        )
    })?;
    let challenge = Challenge::load(&settings.input)?;
    info!(
        "{}: {} books, {} libraries, {} days",
        settings.input.display(),
        challenge.num_books,
        challenge.num_libraries(),
        challenge.num_days
    );

    let checkpointer = Checkpointer::new(
        &challenge,
        &settings.output,
        entry.checkpoints || settings.checkpoints,
    );
    let save_solution = |solution: &Solution| checkpointer.save(solution);
    (entry.solve)(&challenge, &save_solution, &settings.hyperparameters)?;

    let solution = checkpointer
        .best()
        .ok_or_else(|| anyhow!("Algorithm {} did not save a solution", entry.name))?;
    let score = challenge
        .evaluate_solution(&solution)
        .with_context(|| format!("Algorithm {} produced an invalid solution", entry.name))?;
    save_file(&settings.output, &solution.to_submission())?;
    info!("{} written with score {}", settings.output.display(), score);

    Ok(RunReport {
        algorithm: entry.name.to_string(),
        score,
        num_libraries_used: solution.len(),
        num_books_shipped: solution.num_books_shipped(),
        checkpoints: checkpointer
            .written()
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

/// Checks a submission file against an input file and returns its score.
pub fn verify_solution(input: &Path, submission: &Path) -> Result<u64> {
    let challenge = Challenge::load(input)?;
    let text = fs::read_to_string(submission)
        .with_context(|| format!("Failed to read submission file {}", submission.display()))?;
    let solution = text
        .parse::<Solution>()
        .with_context(|| format!("Failed to parse submission file {}", submission.display()))?;
    challenge.evaluate_solution(&solution)
}

/// Generates an instance in the input file format. Writes it to `output`
/// when given and returns the text either way.
pub fn generate_instance(seed: &str, track: &Track, output: Option<&Path>) -> Result<String> {
    let challenge = Challenge::generate_instance(&seed_from_str(seed), track)?;
    let text = challenge.to_input();
    if let Some(output) = output {
        save_file(output, &text)?;
    }
    Ok(text)
}
