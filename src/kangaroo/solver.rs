//! Engine coordinator
//!
//! Owns the frozen configuration, the jump table, the shared DP table, and
//! the worker pool. Publishes atomic counters for progress reporting and a
//! stats snapshot; derives and holds the solution once a verified collision
//! lands.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::checkpoint::{Checkpoint, CheckpointDp};
use crate::config::SolverConfig;
use crate::dp::{DpTable, PublishOutcome};
use crate::error::{Result, SolverError};
use crate::kangaroo::collision::CollisionSolver;
use crate::kangaroo::jump::JumpTable;
use crate::kangaroo::walker;
use crate::math::{Point, Scalar, Secp256k1};

/// Snapshot of engine progress.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_jumps: u64,
    pub distinguished_points: u64,
    pub collisions_found: u64,
    pub elapsed_seconds: u64,
    /// Worker count while running, zero otherwise.
    pub threads_active: i32,
    pub range_start: String,
    pub range_end: String,
    /// Recovered private key, uppercase hex, once solved.
    pub found_key: Option<String>,
    pub is_solved: bool,
}

/// State shared between the coordinator and the walker threads.
pub(crate) struct SharedState {
    pub curve: Secp256k1,
    pub jumps: JumpTable,
    pub target: Point,
    pub range_start: Scalar,
    pub range_end: Scalar,
    pub range_width: Scalar,
    pub dp_bits: u32,
    pub threads: u32,

    running: AtomicBool,
    solved: AtomicBool,
    total_jumps: AtomicU64,
    dp_count: AtomicU64,
    collisions: AtomicU64,
    dp_table: Mutex<DpTable>,
    solution: Mutex<Option<Scalar>>,
    collision_solver: CollisionSolver,
    started_at: Mutex<Instant>,
}

impl SharedState {
    fn new(curve: Secp256k1, config: &SolverConfig, jumps: JumpTable) -> Self {
        let collision_solver = CollisionSolver::new(curve.clone(), config.target.clone());
        SharedState {
            curve,
            jumps,
            target: config.target.clone(),
            range_start: config.range_start.clone(),
            range_end: config.range_end.clone(),
            range_width: config.range_width.clone(),
            dp_bits: config.dp_bits,
            threads: config.threads,
            running: AtomicBool::new(false),
            solved: AtomicBool::new(false),
            total_jumps: AtomicU64::new(0),
            dp_count: AtomicU64::new(0),
            collisions: AtomicU64::new(0),
            dp_table: Mutex::new(DpTable::new()),
            solution: Mutex::new(None),
            collision_solver,
            started_at: Mutex::new(Instant::now()),
        }
    }

    /// Walkers poll this every step.
    pub(crate) fn is_live(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.solved.load(Ordering::Acquire)
    }

    pub(crate) fn add_jumps(&self, count: u64) {
        if count > 0 {
            self.total_jumps.fetch_add(count, Ordering::Relaxed);
        }
    }

    fn elapsed_seconds(&self) -> u64 {
        self.started_at
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
            .as_secs()
    }

    fn lock_table(&self) -> std::sync::MutexGuard<'_, DpTable> {
        self.dp_table.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publish a distinguished point; the whole transaction, verification
    /// included, happens under the table lock. Returns true when this
    /// publish solved the instance and the caller should exit.
    pub(crate) fn publish_dp(&self, point: &Point, distance: &Scalar, is_tame: bool) -> bool {
        let seen_at = self.elapsed_seconds();
        let mut table = self.lock_table();
        match table.publish(point, distance, is_tame, seen_at, &self.collision_solver) {
            PublishOutcome::Stored => {
                self.dp_count.fetch_add(1, Ordering::Relaxed);
                false
            }
            PublishOutcome::DuplicateSameKind => false,
            PublishOutcome::FalsePositive => {
                self.collisions.fetch_add(1, Ordering::Relaxed);
                false
            }
            PublishOutcome::Solved(key) => {
                self.collisions.fetch_add(1, Ordering::Relaxed);
                // Solution must be visible before the flag flips, and the
                // first verified key wins.
                let mut slot = self.solution.lock().unwrap_or_else(|e| e.into_inner());
                if slot.is_none() {
                    *slot = Some(key.clone());
                    info!("collision verified, private key {}", key.to_hex());
                }
                drop(slot);
                self.solved.store(true, Ordering::Release);
                true
            }
        }
    }

    fn solution(&self) -> Option<Scalar> {
        if self.solved.load(Ordering::Acquire) {
            self.solution
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        } else {
            None
        }
    }
}

/// Parallel kangaroo engine with an initialize/start/stop lifecycle.
pub struct KangarooSolver {
    shared: Option<Arc<SharedState>>,
    workers: Vec<JoinHandle<()>>,
    /// Set by a checkpoint load; makes the next start keep the restored
    /// table and counters instead of clearing them.
    resume: bool,
}

impl KangarooSolver {
    pub fn new() -> Self {
        KangarooSolver {
            shared: None,
            workers: Vec::new(),
            resume: false,
        }
    }

    /// Parse inputs, precompute the jump table, and freeze configuration.
    /// Any prior run is stopped and discarded first.
    pub fn initialize(
        &mut self,
        pubkey_hex: &str,
        range_start_hex: &str,
        range_end_hex: &str,
        threads: i32,
        dp_bits: i32,
    ) -> Result<()> {
        self.stop();
        self.shared = None;
        self.resume = false;

        let curve = Secp256k1::new();
        let config = SolverConfig::from_args(
            &curve,
            pubkey_hex,
            range_start_hex,
            range_end_hex,
            threads,
            dp_bits,
        )?;
        let jumps = JumpTable::build(&curve, &config.range_width);

        info!(
            "solver initialized: range 0x{}..0x{}, {} threads, {} dp bits",
            config.range_start.to_hex(),
            config.range_end.to_hex(),
            config.threads,
            config.dp_bits
        );

        self.shared = Some(Arc::new(SharedState::new(curve, &config, jumps)));
        Ok(())
    }

    /// Spawn the worker pool. Returns false when uninitialized or already
    /// running. Counters and the DP table are cleared unless this start
    /// resumes a loaded checkpoint.
    pub fn start(&mut self) -> bool {
        let Some(shared) = self.shared.clone() else {
            return false;
        };
        if shared.running.load(Ordering::Acquire) {
            return false;
        }

        if self.resume {
            self.resume = false;
        } else {
            shared.lock_table().clear();
            shared.total_jumps.store(0, Ordering::Relaxed);
            shared.dp_count.store(0, Ordering::Relaxed);
            shared.collisions.store(0, Ordering::Relaxed);
        }
        *shared.solution.lock().unwrap_or_else(|e| e.into_inner()) = None;
        shared.solved.store(false, Ordering::Release);
        *shared.started_at.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
        shared.running.store(true, Ordering::Release);

        for worker_id in 0..shared.threads as usize {
            let state = shared.clone();
            self.workers
                .push(std::thread::spawn(move || walker::run(&state, worker_id)));
        }

        info!("solver started with {} walkers", shared.threads);
        true
    }

    /// Stop walkers and join them. Idempotent; returns once every worker
    /// thread has exited.
    pub fn stop(&mut self) {
        if let Some(shared) = &self.shared {
            shared.running.store(false, Ordering::Release);
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .as_ref()
            .map(|s| s.running.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    pub fn is_solved(&self) -> bool {
        self.shared
            .as_ref()
            .map(|s| s.solved.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// The verified private key, once found.
    pub fn solution(&self) -> Option<Scalar> {
        self.shared.as_ref().and_then(|s| s.solution())
    }

    /// Progress snapshot; `None` before initialization.
    pub fn stats(&self) -> Option<Stats> {
        let shared = self.shared.as_ref()?;
        let running = shared.running.load(Ordering::Acquire);
        let solution = shared.solution();
        Some(Stats {
            total_jumps: shared.total_jumps.load(Ordering::Relaxed),
            distinguished_points: shared.dp_count.load(Ordering::Relaxed),
            collisions_found: shared.collisions.load(Ordering::Relaxed),
            elapsed_seconds: shared.elapsed_seconds(),
            threads_active: if running { shared.threads as i32 } else { 0 },
            range_start: shared.range_start.to_hex(),
            range_end: shared.range_end.to_hex(),
            is_solved: solution.is_some(),
            found_key: solution.map(|k| k.to_hex()),
        })
    }

    /// Snapshot the DP table and run metadata to `path` (§ checkpoint
    /// format). Allowed while running; the table lock is held only while
    /// the record is composed.
    pub fn save_checkpoint(&self, path: &std::path::Path) -> Result<()> {
        let shared = self.shared.as_ref().ok_or(SolverError::NotInitialized)?;

        let checkpoint = {
            let table = shared.lock_table();
            let distinguished_points: Vec<CheckpointDp> = table
                .entries()
                .map(|entry| CheckpointDp {
                    point: entry.point.key(),
                    distance: entry.distance.to_hex(),
                    is_tame: entry.is_tame,
                    timestamp: entry.seen_at,
                })
                .collect();
            Checkpoint::compose(
                shared.total_jumps.load(Ordering::Relaxed),
                shared.range_start.to_hex(),
                shared.range_end.to_hex(),
                shared.threads,
                shared.dp_bits,
                distinguished_points,
            )
        };

        checkpoint.write(path)?;
        info!(
            "checkpoint saved to {} ({} distinguished points)",
            path.display(),
            checkpoint.distinguished_points_count
        );
        Ok(())
    }

    /// Restore the DP table and counters from a checkpoint written for the
    /// same range. Requires an initialized, stopped solver; walker
    /// positions are not preserved, so the next `start` re-seeds walkers
    /// while keeping the restored state.
    pub fn load_checkpoint(&mut self, path: &std::path::Path) -> Result<()> {
        let shared = self.shared.as_ref().ok_or(SolverError::NotInitialized)?;
        if shared.running.load(Ordering::Acquire) {
            return Err(SolverError::AlreadyRunning);
        }

        let checkpoint = Checkpoint::read(path)?;
        if checkpoint.range_start != shared.range_start.to_hex()
            || checkpoint.range_end != shared.range_end.to_hex()
        {
            return Err(SolverError::CheckpointFormat(
                "checkpoint range does not match configured range".to_string(),
            ));
        }
        if checkpoint.distinguished_bits != shared.dp_bits {
            log::warn!(
                "checkpoint dp_bits {} differs from configured {}",
                checkpoint.distinguished_bits,
                shared.dp_bits
            );
        }

        let entries = checkpoint.to_entries(&shared.curve)?;
        let restored = entries.len() as u64;
        {
            let mut table = shared.lock_table();
            table.clear();
            for entry in entries {
                table.insert(entry);
            }
        }
        shared
            .total_jumps
            .store(checkpoint.total_jumps, Ordering::Relaxed);
        shared.dp_count.store(restored, Ordering::Relaxed);
        shared.collisions.store(0, Ordering::Relaxed);
        self.resume = true;

        info!(
            "checkpoint loaded from {} ({} distinguished points, {} jumps)",
            path.display(),
            restored,
            checkpoint.total_jumps
        );
        Ok(())
    }
}

impl Default for KangarooSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KangarooSolver {
    fn drop(&mut self) {
        self.stop();
    }
}
