use std::ops::{Deref, DerefMut};

use super::counter::CounterTime;

pub struct TimedResult<T> {
    pub res: T,
    pub elapsed: std::time::Duration,
}

impl<T> Deref for TimedResult<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.res
    }
}

impl<T> DerefMut for TimedResult<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.res
    }
}

pub fn timed_scope<R, F: FnOnce() -> R>(f: F) -> TimedResult<R> {
    let begin = std::time::Instant::now();
    let res = f();

    TimedResult {
        res,
        elapsed: begin.elapsed(),
    }
}

pub fn timed_scope_log<R, F: FnOnce() -> R>(label: &'static str, f: F) -> TimedResult<R> {
    let time_res = timed_scope(f);
    log::info!(target: "scoped timer", "{}: {}", label, format_elapsed(time_res.elapsed));
    time_res
}

pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    if elapsed < std::time::Duration::from_millis(1) {
        let micro = elapsed.as_secs_f32() * 1000. * 1000.;
        format!("{micro:.3}µs")
    } else if elapsed < std::time::Duration::from_secs(1) {
        let milli = elapsed.as_secs_f32() * 1000.;
        format!("{milli:.3}ms")
    } else if elapsed < std::time::Duration::from_secs(60) {
        let s = elapsed.as_secs_f32();
        format!("{s:.3}s")
    } else {
        let elapsed_secs = elapsed.as_secs_f32();
        let elapsed_minutes = elapsed_secs / 60.;
        let h = (elapsed_minutes / 60.) as u32;
        let m = (elapsed_minutes % 60.0) as u32;
        let s = (elapsed_secs % 60.0) as u32;
        format!("{h}h{m}m{s}s")
    }
}

pub fn timed_scope_accumulate_<R, F: FnOnce() -> R>(timer: &CounterTime, f: F) -> R {
    let timed_res = timed_scope(f);
    timer.add(timed_res.elapsed);
    timed_res.res
}

/// Runs the closure and, with the `counter_time` feature, adds its duration to a named counter.
#[macro_export]
macro_rules! timed_scope_accumulate {
    ($descr:literal, $f: expr) => {
        if cfg!(feature = "counter_time") {
            use $crate::utils::counter::{insert_counter, lazy_static, Counter, CounterTime};
            use $crate::utils::timer::timed_scope_accumulate_;
            lazy_static::lazy_static! {
                static ref COUNTER_REF: std::sync::Arc<Counter> = {
                    insert_counter($descr, Counter::Time(CounterTime::new()))
                };
            }
            match &**COUNTER_REF {
                Counter::Time(c) => timed_scope_accumulate_(c, $f),
                _ => ($f)(),
            }
        } else {
            ($f)()
        }
    };
}

pub use timed_scope_accumulate;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::format_elapsed;

    #[test]
    fn elapsed_units() {
        assert_eq!(format_elapsed(Duration::from_micros(250)), "250.000µs");
        assert_eq!(format_elapsed(Duration::from_millis(20)), "20.000ms");
        assert_eq!(format_elapsed(Duration::from_secs(2)), "2.000s");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "1h2m5s");
    }
}
