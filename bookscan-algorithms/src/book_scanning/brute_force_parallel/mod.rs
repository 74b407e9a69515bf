// Exhaustive backtracking with the top-level branches spread over scoped
// worker threads. Workers own their accumulators and report improvements
// over a channel. Only the parent calls `save_solution`.
use crate::book_scanning::brute_force::{SearchState, SearchTree};
use anyhow::{anyhow, Result};
use bookscan_challenges::book_scanning::*;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::mpsc;
use std::thread;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Hyperparameters {
    pub max_depth: Option<usize>,
    /// Defaults to the available parallelism.
    pub workers: Option<usize>,
}

pub fn help() {
    println!("Exhaustive backtracking with one task per top-level library.");
    println!("Tasks are dealt round-robin to scoped worker threads. Improvements are");
    println!("merged by the caller thread, which saves only new global bests.");
    println!("Hyperparameters (all optional):");
    println!("  max_depth: maximum number of libraries per branch (default unlimited).");
    println!("  workers: number of worker threads (default available parallelism).");
}

/// A strictly better nominal score found by one worker.
#[derive(Debug, Clone)]
pub struct Improvement {
    pub worker: usize,
    pub score: u64,
    pub solution: Solution,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{} of {total_workers} workers failed: {failed_workers:?}", .failed_workers.len())]
pub struct PartialResult {
    pub failed_workers: Vec<usize>,
    pub total_workers: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub best_score: u64,
    pub best: Option<Solution>,
    pub partial: Option<PartialResult>,
}

/// Deals `tasks` round-robin to `num_workers` scoped threads and runs `work`
/// on each with a per-worker `SearchState`. Every improvement a worker emits
/// reaches `on_improvement` on the calling thread.
///
/// A worker that panics or returns an error is listed in the returned
/// `PartialResult`. If every worker fails the whole fan-out fails.
pub fn fan_out<W>(
    tasks: Vec<usize>,
    num_workers: usize,
    work: W,
    on_improvement: &mut dyn FnMut(Improvement) -> Result<()>,
) -> Result<Option<PartialResult>>
where
    W: Fn(usize, &mut SearchState, &mut dyn FnMut(u64, &Solution) -> Result<()>) -> Result<()>
        + Sync,
{
    if tasks.is_empty() {
        return Ok(None);
    }
    let num_workers = num_workers.clamp(1, tasks.len());
    let mut chunks: Vec<Vec<usize>> = vec![Vec::new(); num_workers];
    for (i, task) in tasks.into_iter().enumerate() {
        chunks[i % num_workers].push(task);
    }

    let work = &work;
    let (failed_workers, forward_error) = thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<Improvement>();
        let handles: Vec<_> = chunks
            .into_iter()
            .enumerate()
            .map(|(worker, chunk)| {
                let tx = tx.clone();
                scope.spawn(move || -> Result<()> {
                    let mut state = SearchState::new();
                    let mut emit = |score: u64, solution: &Solution| -> Result<()> {
                        tx.send(Improvement {
                            worker,
                            score,
                            solution: solution.clone(),
                        })
                        .map_err(|_| anyhow!("Worker {} lost its result channel", worker))
                    };
                    for task in chunk {
                        work(task, &mut state, &mut emit)?;
                    }
                    Ok(())
                })
            })
            .collect();
        drop(tx);

        let mut forward_error = None;
        for improvement in rx.iter() {
            if let Err(e) = on_improvement(improvement) {
                forward_error = Some(e);
                break;
            }
        }
        drop(rx);

        let mut failed_workers = Vec::new();
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("worker {} failed: {}", worker, e);
                    failed_workers.push(worker);
                }
                Err(_) => {
                    warn!("worker {} panicked", worker);
                    failed_workers.push(worker);
                }
            }
        }
        (failed_workers, forward_error)
    });

    if let Some(e) = forward_error {
        return Err(e);
    }
    if failed_workers.len() == num_workers {
        return Err(anyhow!("All {} workers failed", num_workers));
    }
    if failed_workers.is_empty() {
        return Ok(None);
    }
    Ok(Some(PartialResult {
        failed_workers,
        total_workers: num_workers,
    }))
}

/// Runs the parallel search, saving each new global best as it arrives.
pub fn search(
    challenge: &Challenge,
    max_depth: Option<usize>,
    num_workers: usize,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
) -> Result<SearchReport> {
    let tree = SearchTree::new(challenge, max_depth);
    let tasks = tree.top_level_branches();
    debug!(
        "brute_force_parallel: {} top-level branches over {} workers",
        tasks.len(),
        num_workers
    );

    let mut best_score = 0u64;
    let mut best: Option<Solution> = None;
    let partial = fan_out(
        tasks,
        num_workers,
        |position, state, emit| tree.branch(position, challenge.num_days, state, emit),
        &mut |improvement| {
            if improvement.score <= best_score {
                return Ok(());
            }
            debug!(
                "brute_force_parallel: worker {} found global best {}",
                improvement.worker, improvement.score
            );
            best_score = improvement.score;
            save_solution(&improvement.solution)?;
            best = Some(improvement.solution);
            Ok(())
        },
    )?;

    Ok(SearchReport {
        best_score,
        best,
        partial,
    })
}

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let hyperparameters = match hyperparameters {
        Some(hyperparameters) => {
            serde_json::from_value::<Hyperparameters>(Value::Object(hyperparameters.clone()))
                .map_err(|e| anyhow!("Failed to parse hyperparameters: {}", e))?
        }
        None => Hyperparameters::default(),
    };
    let num_workers = match hyperparameters.workers {
        Some(workers) => workers,
        None => thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
    };

    let report = search(challenge, hyperparameters.max_depth, num_workers, save_solution)?;
    if let Some(partial) = &report.partial {
        warn!("brute_force_parallel: partial result, {}", partial);
    }
    if report.best.is_none() {
        save_solution(&Solution::new())?;
    }
    info!("brute_force_parallel: best nominal score {}", report.best_score);
    Ok(())
}
