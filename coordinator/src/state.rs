use std::sync::{Arc, Mutex};

use crate::ledger::Ledger;

/// Shared handler state. The ledger is the only thing that needs mutual
/// exclusion; one mutex guards all of it.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<Ledger>>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }
}
