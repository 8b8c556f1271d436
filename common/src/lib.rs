pub mod protocol;
pub mod store;
pub mod wordcount;
pub mod workload;

pub use protocol::{DoneResponse, PollRequest, PollResponse, TaskAssignment, TaskReport};
pub use store::KeyValue;
pub use workload::{MapFn, ReduceFn, Workload};
