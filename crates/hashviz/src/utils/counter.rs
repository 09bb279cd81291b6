//! Process wide statistics, enabled by the `counter` and `counter_time` features.
//!
//! Counters are registered lazily the first time a `counter!` site runs and are
//! dumped with [report_counters].
use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

pub enum Counter {
    Count(CounterU64),
    Time(CounterTime),
}

impl Counter {
    pub fn format(&self) -> String {
        match self {
            Counter::Count(a) => a.value().to_string(),
            Counter::Time(a) => super::timer::format_elapsed(a.value()),
        }
    }
}

#[derive(Default)]
pub struct CounterU64 {
    atomic: AtomicU64,
}

impl CounterU64 {
    pub const fn new() -> Self {
        Self {
            atomic: AtomicU64::new(0),
        }
    }
    pub fn add(&self, amount: u64) {
        // Addition commutes, no ordering needed between workers
        self.atomic.fetch_add(amount, Ordering::Relaxed);
    }
    pub fn value(&self) -> u64 {
        self.atomic.load(Ordering::Acquire)
    }
}

#[derive(Default)]
pub struct CounterTime {
    nanos: AtomicU64,
}

impl CounterTime {
    pub const fn new() -> Self {
        Self {
            nanos: AtomicU64::new(0),
        }
    }
    pub fn add(&self, dur: std::time::Duration) {
        self.nanos
            .fetch_add(dur.as_nanos() as u64, Ordering::Relaxed);
    }
    pub fn value(&self) -> std::time::Duration {
        std::time::Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

lazy_static::lazy_static! {
    pub static ref __COUNTERS: Mutex<BTreeMap<&'static str, Arc<Counter>>> = Mutex::new(BTreeMap::new());
}

fn counters() -> std::sync::MutexGuard<'static, BTreeMap<&'static str, Arc<Counter>>> {
    // A panic while holding the lock cannot leave the map half updated
    __COUNTERS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn insert_counter(descr: &'static str, counter: Counter) -> Arc<Counter> {
    counters().entry(descr).or_insert_with(|| Arc::new(counter)).clone()
}

/// Current value of a count counter, if it has been hit at least once.
pub fn counter_value(descr: &str) -> Option<u64> {
    match counters().get(descr).map(|c| &**c) {
        Some(Counter::Count(c)) => Some(c.value()),
        _ => None,
    }
}

pub fn report_counters() {
    for (counter_name, counter) in counters().iter() {
        log::info!(target: "counter_report", "{}: {}", counter_name, counter.format())
    }
}

#[macro_export]
macro_rules! counter {
    ($descr:literal) => {
        $crate::counter!($descr, 1)
    };
    ($descr:literal, $amount:expr) => {
        if cfg!(feature = "counter") {
            use $crate::utils::counter::{insert_counter, lazy_static, Counter, CounterU64};
            lazy_static::lazy_static! {
                static ref COUNTER_REF: std::sync::Arc<Counter> = {
                    insert_counter($descr, Counter::Count(CounterU64::new()))
                };
            }

            if let Counter::Count(c) = &**COUNTER_REF {
                c.add($amount as u64);
            }
        }
    };
}

pub use counter;
// Reexport for ease of use
pub use lazy_static;
