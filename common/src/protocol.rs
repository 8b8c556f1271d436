use serde::{Deserialize, Serialize};

/* --------- Wire types between worker and coordinator --------- */

/// What the worker finished since its last poll, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskReport {
    /// Nothing to report (first poll, or the previous answer was a retry).
    None,
    Map { task: u32 },
    Reduce { task: u32 },
}

/// The coordinator's answer to a poll.
///
/// Payload fields only exist on the variants that carry work: a map task
/// needs the reduce count to partition its output, a reduce task needs the
/// map count to know how many partition files to gather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskAssignment {
    Map {
        task: u32,
        input: String,
        n_reduce: u32,
    },
    Reduce {
        task: u32,
        n_map: u32,
    },
    /// Everything is assigned but not yet finished; poll again shortly.
    Retry,
    /// Both phases are complete, the worker can shut down.
    Exit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollRequest {
    pub report: TaskReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
    pub assignment: TaskAssignment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoneResponse {
    pub done: bool,
}
