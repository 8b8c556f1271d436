use std::time::{Duration, Instant};

use common::{TaskAssignment, TaskReport};
use tracing::{debug, info, warn};

/// How long an assignment may stay silent before its slot is considered
/// abandoned and handed to the next worker that asks.
pub const TASK_TIMEOUT: Duration = Duration::from_millis(10_250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotStatus {
    /// Not assigned to anyone yet.
    Free,
    /// Assigned at `since`; eligible for re-issue once TASK_TIMEOUT elapses.
    Pending { since: Instant },
    /// Completion recorded. Terminal.
    Finished,
}

/// The coordinator's authoritative record of every task. Callers reach it
/// only through an `Arc<Mutex<Ledger>>`, and `poll` runs report and
/// assignment under that single lock hold, so both halves are atomic to
/// every observer. Nothing here does I/O or calls user code.
#[derive(Debug)]
pub struct Ledger {
    input_files: Vec<String>,
    n_reduce: u32,
    map_slots: Vec<SlotStatus>,
    map_done: usize,
    reduce_slots: Vec<SlotStatus>,
    reduce_done: usize,
}

impl Ledger {
    pub fn new(input_files: Vec<String>, n_reduce: u32) -> Self {
        let map_slots = vec![SlotStatus::Free; input_files.len()];
        let reduce_slots = vec![SlotStatus::Free; n_reduce as usize];
        Self {
            input_files,
            n_reduce,
            map_slots,
            map_done: 0,
            reduce_slots,
            reduce_done: 0,
        }
    }

    /// Records the worker's previous result, then decides its next
    /// assignment. `now` is taken as a parameter so the timeout scan is
    /// driven by the caller's clock.
    pub fn poll(&mut self, report: TaskReport, now: Instant) -> TaskAssignment {
        self.record(report);
        self.assign(now)
    }

    /// True iff every map and every reduce slot is Finished.
    pub fn done(&self) -> bool {
        self.map_done == self.input_files.len() && self.reduce_done == self.n_reduce as usize
    }

    fn record(&mut self, report: TaskReport) {
        match report {
            TaskReport::None => {}
            TaskReport::Map { task } => {
                Self::finish_slot(&mut self.map_slots, &mut self.map_done, task, "map");
            }
            TaskReport::Reduce { task } => {
                Self::finish_slot(&mut self.reduce_slots, &mut self.reduce_done, task, "reduce");
            }
        }
    }

    // A slot never leaves Finished, and each slot bumps the completed
    // counter exactly once: a stale worker re-reporting a slot that a
    // faster duplicate already finished is ignored, as is an index the
    // ledger never issued.
    fn finish_slot(slots: &mut [SlotStatus], done: &mut usize, task: u32, phase: &str) {
        let Some(slot) = slots.get_mut(task as usize) else {
            warn!("completion report for out-of-range {} task {}, ignoring", phase, task);
            return;
        };
        if *slot == SlotStatus::Finished {
            debug!("duplicate completion report for {} task {}, ignoring", phase, task);
            return;
        }
        *slot = SlotStatus::Finished;
        *done += 1;
        info!("{} task {} finished", phase, task);
    }

    // Phase order is fixed: no reduce task is handed out while any map task
    // is unfinished. That is the entire shuffle barrier.
    fn assign(&mut self, now: Instant) -> TaskAssignment {
        if self.map_done < self.input_files.len() {
            return match Self::select_slot(&mut self.map_slots, now) {
                Some(task) => TaskAssignment::Map {
                    task,
                    input: self.input_files[task as usize].clone(),
                    n_reduce: self.n_reduce,
                },
                None => TaskAssignment::Retry,
            };
        }

        if self.reduce_done < self.n_reduce as usize {
            return match Self::select_slot(&mut self.reduce_slots, now) {
                Some(task) => TaskAssignment::Reduce {
                    task,
                    n_map: self.input_files.len() as u32,
                },
                None => TaskAssignment::Retry,
            };
        }

        TaskAssignment::Exit
    }

    /// Lowest-index Free slot first; failing that, the lowest-index Pending
    /// slot whose assignment has outlived TASK_TIMEOUT. The winner is
    /// stamped with `now`, which also resets the timeout window of a
    /// re-issued slot.
    fn select_slot(slots: &mut [SlotStatus], now: Instant) -> Option<u32> {
        let free = slots.iter().position(|s| *s == SlotStatus::Free);

        let pick = free.or_else(|| {
            slots.iter().position(|s| match s {
                SlotStatus::Pending { since } => now.duration_since(*since) > TASK_TIMEOUT,
                _ => false,
            })
        })?;

        slots[pick] = SlotStatus::Pending { since: now };
        Some(pick as u32)
    }
}
