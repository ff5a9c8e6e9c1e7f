//! Batch solver driver: partitions scenarios across worker threads, each with its own HiGHS
//! instance (§4.7, §5).
use crate::domain::Study;
use crate::error::{Error, Result};
use crate::lp::adequacy::AdequacyBuilder;
use crate::lp::mapper::InputMapper;
use highs::{HighsModelStatus, RowProblem, Sense};
use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Options controlling the local LP solve (§2 item 3, §4.9).
#[derive(Clone, Debug, Default)]
pub struct SolveOptions {
    /// Number of worker threads to partition scenarios across. Defaults to
    /// `std::thread::available_parallelism()`, overridable via the `HADAR_WORKERS` environment
    /// variable.
    pub workers: Option<usize>,
    /// Wall-clock budget for the whole solve. `None` means wait indefinitely.
    pub deadline: Option<Duration>,
}

impl SolveOptions {
    /// Resolve the worker count: explicit `workers`, else `HADAR_WORKERS`, else the platform's
    /// available parallelism, else `1`.
    fn worker_count(&self) -> usize {
        if let Some(n) = self.workers {
            return n.max(1);
        }
        if let Ok(val) = std::env::var("HADAR_WORKERS") {
            if let Ok(n) = val.parse::<usize>() {
                return n.max(1);
            }
        }
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }
}

/// Split `0..nb_scn` into `workers` contiguous, near-equal batches (mirroring
/// `numpy.array_split`'s semantics, as the source's batch driver relies on).
fn partition_scenarios(nb_scn: usize, workers: usize) -> Vec<Vec<usize>> {
    let workers = workers.min(nb_scn.max(1));
    let base = nb_scn / workers;
    let remainder = nb_scn % workers;

    let mut batches = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = base + usize::from(i < remainder);
        if len == 0 {
            break;
        }
        batches.push((start..start + len).collect());
        start += len;
    }
    batches
}

/// Solve every scenario's batch on its own thread, building one `RowProblem` per batch covering
/// all its scenarios (scenarios never share a constraint, so a block-diagonal LP per batch is
/// exact, per §4.7).
fn solve_batch(study: &Arc<Study>, scenarios: &[usize]) -> Result<HashMap<String, f64>> {
    let mut problem = RowProblem::default();
    let mut mapper = InputMapper::new();
    let mut adequacy = AdequacyBuilder::new();
    let mut prev_capacity: HashMap<(usize, Arc<str>, String), highs::Col> = HashMap::new();

    for (network, node) in study.iter_nodes() {
        for t in 0..study.horizon {
            for &scn in scenarios {
                let node_key: Arc<str> = format!("{}/{}", network.name, node.name).into();
                let lp_node = mapper.map_node(&mut problem, scn, t, &network.name, &node_key, node);

                for storage in &lp_node.storages {
                    let key = (scn, node_key.clone(), storage.name.to_string());
                    let prev = prev_capacity.get(&key).copied();
                    adequacy.add_storage_recurrence(
                        &mut problem,
                        storage.var_capacity,
                        storage.var_in,
                        storage.var_out,
                        storage.efficiency,
                        storage.init_capacity,
                        prev,
                    );
                    prev_capacity.insert(key, storage.var_capacity);
                }

                adequacy.add_node(scn, t, node_key, &lp_node);
            }
        }
    }
    adequacy.build(&mut problem);

    let ids = mapper.into_ids();
    let solved = problem.optimise(Sense::Minimise).solve();
    match solved.status() {
        HighsModelStatus::Optimal => {
            let solution = solved.get_solution();
            let columns = solution.columns();
            Ok(ids.into_iter().zip(columns.iter().copied()).collect())
        }
        HighsModelStatus::Infeasible => Err(Error::Infeasible {
            scenario: scenarios.first().copied().unwrap_or(0),
            node: None,
            time: None,
        }),
        status => Err(Error::Optimizer {
            scenario: scenarios.first().copied().unwrap_or(0),
            node: None,
            time: None,
            reason: format!("{status:?}"),
        }),
    }
}

/// Solve `study` locally, partitioning scenarios across worker threads per `options` (§4.7).
///
/// Each batch runs on its own `std::thread`; the driver waits for every batch's result via
/// `mpsc::Receiver::recv_timeout` against `options.deadline`. If the deadline elapses before all
/// batches report in, the solve fails with [`Error::Timeout`] — the still-running worker threads
/// are detached and left to finish in the background (a blocking HiGHS FFI call cannot be
/// cancelled mid-solve), and their results are discarded: this is "stop waiting, not stop
/// computing" (§9 Open Question), matching the "no partial results" requirement.
pub fn solve(study: &Study, options: &SolveOptions) -> Result<HashMap<String, f64>> {
    if study.nb_scn == 0 {
        return Ok(HashMap::new());
    }

    let study = Arc::new(study.clone());
    let workers = options.worker_count();
    let batches = partition_scenarios(study.nb_scn, workers);
    let total = batches.len();

    let (tx, rx) = mpsc::channel();
    for batch in batches {
        let tx = tx.clone();
        let study = Arc::clone(&study);
        std::thread::spawn(move || {
            let result = solve_batch(&study, &batch);
            // Ignore send errors: the receiver may already have timed out and been dropped.
            let _ = tx.send(result);
        });
    }
    drop(tx);

    let deadline = options.deadline.map(|d| Instant::now() + d);
    let mut merged = HashMap::new();
    let mut received = 0;

    while received < total {
        let result = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(remaining) {
                    Ok(result) => result,
                    Err(_) => {
                        return Err(Error::Timeout {
                            pending: total - received,
                        });
                    }
                }
            }
            None => match rx.recv() {
                Ok(result) => result,
                Err(_) => break,
            },
        };
        merged.extend(result?);
        received += 1;
    }

    Ok(merged)
}
