use crate::store::KeyValue;
use crate::wordcount;

/// User-supplied map function: (input identifier, full contents) to an
/// unordered batch of key/value records.
pub type MapFn = fn(&str, &str) -> Vec<KeyValue>;

/// User-supplied reduce function: (key, every value routed to that key) to
/// one output string.
pub type ReduceFn = fn(&str, &[String]) -> String;

/// A named pair of map and reduce functions. Workers pick one at startup;
/// every worker in a job must run the same one.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub name: &'static str,
    pub map: MapFn,
    pub reduce: ReduceFn,
}

/// Looks a workload up by its CLI name.
pub fn by_name(name: &str) -> Option<Workload> {
    match name {
        "wordcount" => Some(Workload {
            name: "wordcount",
            map: wordcount::map,
            reduce: wordcount::reduce,
        }),
        _ => None,
    }
}
