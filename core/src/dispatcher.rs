//! Bounded dispatch of work units.
//!
//! A single task owns the whole [`RunState`]. In-flight requests live in a
//! `FuturesUnordered` polled by that task, so completions are handled one at
//! a time and never race with launching.

use crate::stats::{Stats, Summary};
use crate::types::{RequestResult, WorkUnit};
use crate::{Error, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::future::{self, FutureExt};
use std::future::Future;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Running,
    /// No units left to launch, waiting for the outstanding ones.
    Draining,
    Done,
}

/// Hooks called by the dispatcher. Purely observational.
pub trait Observer {
    fn on_launch(&self, _unit: &WorkUnit) {}

    fn on_success(&self, _unit: &WorkUnit, _result: &RequestResult) {}

    fn on_failure(&self, _unit: &WorkUnit, _error: &Error) {}

    fn on_done(&self, _run: &RunState) {}
}

impl Observer for () {}

impl<T: Observer + ?Sized> Observer for &T {
    fn on_launch(&self, unit: &WorkUnit) {
        (**self).on_launch(unit)
    }

    fn on_success(&self, unit: &WorkUnit, result: &RequestResult) {
        (**self).on_success(unit, result)
    }

    fn on_failure(&self, unit: &WorkUnit, error: &Error) {
        (**self).on_failure(unit, error)
    }

    fn on_done(&self, run: &RunState) {
        (**self).on_done(run)
    }
}

impl<T: Observer + ?Sized> Observer for Arc<T> {
    fn on_launch(&self, unit: &WorkUnit) {
        (**self).on_launch(unit)
    }

    fn on_success(&self, unit: &WorkUnit, result: &RequestResult) {
        (**self).on_success(unit, result)
    }

    fn on_failure(&self, unit: &WorkUnit, error: &Error) {
        (**self).on_failure(unit, error)
    }

    fn on_done(&self, run: &RunState) {
        (**self).on_done(run)
    }
}

impl<A: Observer, B: Observer> Observer for (A, B) {
    fn on_launch(&self, unit: &WorkUnit) {
        self.0.on_launch(unit);
        self.1.on_launch(unit);
    }

    fn on_success(&self, unit: &WorkUnit, result: &RequestResult) {
        self.0.on_success(unit, result);
        self.1.on_success(unit, result);
    }

    fn on_failure(&self, unit: &WorkUnit, error: &Error) {
        self.0.on_failure(unit, error);
        self.1.on_failure(unit, error);
    }

    fn on_done(&self, run: &RunState) {
        self.0.on_done(run);
        self.1.on_done(run);
    }
}

/// State of a single run, owned by its [`Dispatcher`].
#[derive(Debug)]
pub struct RunState {
    state: DispatchState,
    launched: usize,
    completed: usize,
    outstanding: usize,
    peak_outstanding: usize,
    stats: Stats,
    started: Option<Instant>,
    elapsed: Duration,
}

impl RunState {
    fn new() -> Self {
        Self {
            state: DispatchState::Idle,
            launched: 0,
            completed: 0,
            outstanding: 0,
            peak_outstanding: 0,
            stats: Stats::default(),
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    fn transition(&mut self, state: DispatchState) {
        log::debug!("dispatcher state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn on_launch(&mut self) {
        self.launched += 1;
        self.outstanding += 1;
        self.peak_outstanding = self.peak_outstanding.max(self.outstanding);
    }

    fn on_complete(&mut self) {
        debug_assert!(self.outstanding > 0);
        self.outstanding -= 1;
        self.completed += 1;
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Number of units launched so far, also the index of the next unit.
    pub fn launched(&self) -> usize {
        self.launched
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Highest number of requests that were in flight at once.
    pub fn peak_outstanding(&self) -> usize {
        self.peak_outstanding
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Wall clock time from the first launch until the last completion.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn summary(&self) -> Result<Summary> {
        self.stats.summary(self.elapsed)
    }
}

pub struct Dispatcher<I> {
    units: I,
    concurrency: NonZeroUsize,
    run: RunState,
}

impl<I: Iterator<Item = WorkUnit>> Dispatcher<I> {
    pub fn new<U>(units: U, concurrency: NonZeroUsize) -> Self
    where
        U: IntoIterator<Item = WorkUnit, IntoIter = I>,
    {
        Self {
            units: units.into_iter(),
            concurrency,
            run: RunState::new(),
        }
    }

    /// Runs `execute` for every unit with at most `concurrency` of them in
    /// flight, resolving once every unit has either succeeded or failed.
    ///
    /// Units are launched in order but may complete in any order. A failed
    /// or panicking unit is logged and counted, it never stops the run.
    pub async fn run<F, Fut, O>(mut self, execute: F, observer: &O) -> RunState
    where
        F: Fn(WorkUnit) -> Fut,
        Fut: Future<Output = Result<RequestResult>>,
        O: Observer + ?Sized,
    {
        let execute = &execute;
        let launch = move |unit: WorkUnit| {
            let call_unit = unit.clone();
            // `execute` itself is called inside the guarded future
            AssertUnwindSafe(future::lazy(move |_| execute(call_unit)).flatten())
                .catch_unwind()
                .map(move |res| {
                    let res = match res {
                        Ok(res) => res,
                        Err(_) => Err(Error::UnitPanicked(unit.to_string())),
                    };
                    (unit, res)
                })
        };

        let mut in_flight = FuturesUnordered::new();

        self.run.started = Some(Instant::now());
        self.run.transition(DispatchState::Running);
        self.fill(&mut in_flight, &launch, observer);

        while let Some((unit, res)) = in_flight.next().await {
            self.run.on_complete();
            self.fill(&mut in_flight, &launch, observer);

            match res {
                Ok(result) => {
                    self.run.stats.record(&result);
                    observer.on_success(&unit, &result);
                }
                Err(e) => {
                    log::error!("failed to run {}:\n{}", unit, e);
                    self.run.stats.record_failure();
                    observer.on_failure(&unit, &e);
                }
            }
        }

        debug_assert_eq!(self.run.outstanding, 0);
        debug_assert_ne!(self.run.state, DispatchState::Done);

        self.run.elapsed = self.run.started.map(|s| s.elapsed()).unwrap_or_default();
        self.run.transition(DispatchState::Done);
        observer.on_done(&self.run);

        self.run
    }

    /// Launches units until the ceiling is reached or there are none left.
    fn fill<T, L, O>(&mut self, in_flight: &mut FuturesUnordered<T>, launch: &L, observer: &O)
    where
        L: Fn(WorkUnit) -> T,
        O: Observer + ?Sized,
    {
        while self.run.outstanding < self.concurrency.get() {
            if self.run.state != DispatchState::Running {
                return;
            }

            match self.units.next() {
                Some(unit) => {
                    observer.on_launch(&unit);
                    self.run.on_launch();
                    in_flight.push(launch(unit));
                }
                None => self.run.transition(DispatchState::Draining),
            }
        }
    }
}
