// ── Incremental event log window ──
//
// Tracks the newest N record numbers seen on the device and caches the
// records for exactly those numbers. Each cycle computes a plan from the
// fresh enumeration, fetches only what is missing, then applies the plan,
// which evicts everything that fell out of the window.

use std::collections::BTreeMap;

use crate::model::SystemLogRecord;
use crate::model::log::sort_newest_first;

/// What one cycle needs to do for the log domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlan {
    /// Newest `capacity` numbers, descending.
    pub window: Vec<u32>,
    /// Numbers in `window` that have no cached record, ascending.
    pub to_fetch: Vec<u32>,
    /// Same set as the current window with every record cached.
    pub unchanged: bool,
}

#[derive(Debug, Clone)]
pub struct LogRecordWindow {
    capacity: usize,
    /// Descending.
    window: Vec<u32>,
    records: BTreeMap<u32, SystemLogRecord>,
}

impl LogRecordWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            window: Vec::new(),
            records: BTreeMap::new(),
        }
    }

    /// Current window, highest number first.
    pub fn window(&self) -> &[u32] {
        &self.window
    }

    pub fn is_cached(&self, number: u32) -> bool {
        self.records.contains_key(&number)
    }

    pub fn cached_len(&self) -> usize {
        self.records.len()
    }

    /// Plan against a fresh enumeration, given in any order.
    pub fn plan(&self, enumerated: &[u32]) -> WindowPlan {
        let mut window = enumerated.to_vec();
        window.sort_unstable_by(|a, b| b.cmp(a));
        window.dedup();
        window.truncate(self.capacity);

        let mut to_fetch: Vec<u32> = window
            .iter()
            .copied()
            .filter(|n| !self.records.contains_key(n))
            .collect();
        to_fetch.sort_unstable();

        let unchanged = window == self.window && to_fetch.is_empty();
        WindowPlan {
            window,
            to_fetch,
            unchanged,
        }
    }

    /// Adopt the planned window, cache the fetched records and evict the
    /// rest. `fetched` pairs each requested number with its record;
    /// records for numbers outside the window are dropped.
    pub fn apply(&mut self, plan: WindowPlan, fetched: Vec<(u32, SystemLogRecord)>) {
        self.window = plan.window;
        for (number, record) in fetched {
            self.records.insert(number, record);
        }
        let window = &self.window;
        self.records.retain(|n, _| window.contains(n));
    }

    /// Cached records, newest first by date/time.
    pub fn records(&self) -> Vec<SystemLogRecord> {
        let mut records: Vec<SystemLogRecord> = self.records.values().cloned().collect();
        // Ties and undated records fall back to descending number order.
        records.reverse();
        sort_newest_first(&mut records);
        records
    }
}
