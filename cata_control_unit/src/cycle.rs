//! Fixed-period control loop.
//!
//! One periodic task executes the controller's per-cycle update; it is
//! the only writer of mechanism state. With the `rt` feature the loop
//! runs under PREEMPT_RT conventions — `mlockall`, `SCHED_FIFO`, and
//! absolute-time `clock_nanosleep` pacing; without it, a plain
//! `std::thread::sleep` loop approximates the period for development
//! and tests.
//!
//! Overruns are counted and logged, never fatal: a control loop that
//! halts is worse than one that conservatively keeps commanding stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cata_common::config::LauncherConfig;
use tracing::{debug, warn};

use crate::adapters::{DistanceSensor, LauncherMotor, LimitSwitch};
use crate::controller::CatapultController;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics, updated without allocation.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of cycles that exceeded the period budget.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle duration. O(1).
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        if duration_ns < self.min_cycle_ns {
            self.min_cycle_ns = duration_ns;
        }
        if duration_ns > self.max_cycle_ns {
            self.max_cycle_ns = duration_ns;
        }
        self.sum_cycle_ns += duration_ns;
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock memory pages and request SCHED_FIFO at the given priority.
///
/// No-op without the `rt` feature.
#[cfg(feature = "rt")]
pub fn rt_setup(priority: i32) -> Result<(), String> {
    use nix::sys::mman::{MlockAllFlags, mlockall};

    mlockall(MlockAllFlags::MCL_CURRENT | MlockAllFlags::MCL_FUTURE)
        .map_err(|e| format!("mlockall failed: {e}"))?;

    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(format!("sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
pub fn rt_setup(_priority: i32) -> Result<(), String> {
    Ok(())
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the controller and drives it at the configured fixed period.
pub struct CycleRunner<L, D, M> {
    controller: CatapultController<L, D, M>,
    cycle_time: Duration,
    telemetry_interval: u64,
    stats: CycleStats,
}

impl<L, D, M> CycleRunner<L, D, M>
where
    L: LimitSwitch,
    D: DistanceSensor,
    M: LauncherMotor,
{
    pub fn new(config: &LauncherConfig, controller: CatapultController<L, D, M>) -> Self {
        Self {
            controller,
            cycle_time: Duration::from_millis(config.cycle_time_ms),
            telemetry_interval: config.telemetry_interval,
            stats: CycleStats::new(),
        }
    }

    /// The owned controller, for wiring intent handles before `run`.
    pub fn controller(&mut self) -> &mut CatapultController<L, D, M> {
        &mut self.controller
    }

    /// Timing statistics collected so far.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Run until `running` clears. `before_tick` executes at the start
    /// of every cycle — the caller uses it to feed driver input (and,
    /// in simulation, to advance the rig).
    pub fn run<F>(&mut self, running: &AtomicBool, mut before_tick: F)
    where
        F: FnMut(&mut CatapultController<L, D, M>),
    {
        #[cfg(feature = "rt")]
        self.run_rt_loop(running, &mut before_tick);

        #[cfg(not(feature = "rt"))]
        self.run_sim_loop(running, &mut before_tick);

        self.controller.shutdown();
        debug!(
            "cycle loop stopped after {} cycles ({} overruns)",
            self.stats.cycle_count, self.stats.overruns
        );
    }

    /// One cycle body: caller hook, then the controller tick.
    fn cycle_body<F>(&mut self, before_tick: &mut F)
    where
        F: FnMut(&mut CatapultController<L, D, M>),
    {
        before_tick(&mut self.controller);
        self.controller.tick();
    }

    /// Account for a finished cycle: stats, overrun check, telemetry.
    fn record_cycle(&mut self, duration_ns: i64) {
        self.stats.record(duration_ns);
        let budget_ns = self.cycle_time.as_nanos() as i64;
        if duration_ns > budget_ns {
            self.stats.overruns += 1;
            warn!("cycle overrun: {duration_ns}ns > {budget_ns}ns budget");
        }

        if self.stats.cycle_count % self.telemetry_interval == 0 {
            debug!(
                state = ?self.controller.state(),
                command = ?self.controller.last_command(),
                faults = ?self.controller.faults(),
                avg_cycle_ns = self.stats.avg_cycle_ns(),
                "launcher telemetry"
            );
        }
    }

    /// Absolute-time paced loop on `CLOCK_MONOTONIC` (drift-free).
    #[cfg(feature = "rt")]
    fn run_rt_loop<F>(&mut self, running: &AtomicBool, before_tick: &mut F)
    where
        F: FnMut(&mut CatapultController<L, D, M>),
    {
        use nix::sys::time::TimeSpec;
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let period_ns = self.cycle_time.as_nanos() as i64;
        let Ok(mut next_wake) = clock_gettime(clock) else {
            warn!("clock_gettime failed, falling back to sleep pacing");
            return self.run_sim_loop(running, before_tick);
        };

        while running.load(Ordering::SeqCst) {
            next_wake = add_ns(next_wake, period_ns);

            let start = clock_gettime(clock).unwrap_or(next_wake);
            self.cycle_body(before_tick);
            let end = clock_gettime(clock).unwrap_or(start);
            self.record_cycle(diff_ns(&end, &start));

            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }

        fn add_ns(ts: TimeSpec, ns: i64) -> TimeSpec {
            let mut secs = ts.tv_sec();
            let mut nanos = ts.tv_nsec() + ns;
            while nanos >= 1_000_000_000 {
                secs += 1;
                nanos -= 1_000_000_000;
            }
            TimeSpec::new(secs, nanos)
        }

        fn diff_ns(a: &TimeSpec, b: &TimeSpec) -> i64 {
            (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
        }
    }

    /// Relative-sleep loop for development without RT privileges.
    fn run_sim_loop<F>(&mut self, running: &AtomicBool, before_tick: &mut F)
    where
        F: FnMut(&mut CatapultController<L, D, M>),
    {
        use std::time::Instant;

        while running.load(Ordering::SeqCst) {
            let start = Instant::now();
            self.cycle_body(before_tick);

            let elapsed = start.elapsed();
            self.record_cycle(elapsed.as_nanos() as i64);
            if let Some(remaining) = self.cycle_time.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
