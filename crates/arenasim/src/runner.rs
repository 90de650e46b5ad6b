//! # Scenario Runner
//!
//! Drives one strategy through a scripted list of steps. The observer sees a
//! report after `init` and after every successful step; the first failing
//! step halts the run and comes back as [`HarnessError::Step`].

use arenasim_core::{Snapshot, Strategy, Word};
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::scenario::{Scenario, Step};

/// A step with its arguments converted into the scenario's domain.
#[derive(Clone, Copy, Debug)]
enum Op<W: Word> {
    Allocate(W),
    Release(W),
}

/// What the observer receives after each step.
#[derive(Clone, Debug)]
pub struct StepReport<W: Word> {
    /// 0 for the initial state, then 1-based step numbers.
    pub index: usize,
    /// The step just executed; `None` for the initial state.
    pub step: Option<Step>,
    /// Address returned by an allocation.
    pub address: Option<W>,
    /// The arena after the step.
    pub snapshot: Snapshot<W>,
}

impl<W: Word> StepReport<W> {
    /// Heading in the form `0. init` or `3. allocate(3)`.
    #[must_use]
    pub fn heading(&self) -> String {
        match &self.step {
            None => format!("{}. init", self.index),
            Some(step) => format!("{}. {step}", self.index),
        }
    }
}

/// Totals of a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps executed.
    pub steps: usize,
    /// Successful allocations.
    pub allocations: usize,
    /// Successful releases.
    pub releases: usize,
}

/// Executes a scenario against one strategy instance.
pub struct Runner<W: Word> {
    strategy: Box<dyn Strategy<W>>,
    steps: Vec<(Step, Op<W>)>,
}

impl<W: Word> Runner<W> {
    /// Builds the strategy and checks every number against the domain before
    /// anything runs.
    ///
    /// # Errors
    ///
    /// [`HarnessError::OutOfDomain`] for values that do not fit `W`, or
    /// [`HarnessError::Init`] if the strategy rejects the capacity.
    pub fn new(scenario: &Scenario) -> HarnessResult<Self> {
        let fit = |field: &'static str, value: u64| {
            W::from_u64(value).ok_or(HarnessError::OutOfDomain {
                field,
                value,
                domain: scenario.domain,
            })
        };

        let capacity = fit("capacity", scenario.capacity)?;
        let steps = scenario
            .steps
            .iter()
            .map(|&step| {
                let op = match step {
                    Step::Allocate { size } => Op::Allocate(fit("size", size)?),
                    Step::Release { address } => Op::Release(fit("address", address)?),
                };
                Ok((step, op))
            })
            .collect::<HarnessResult<Vec<_>>>()?;

        let strategy = scenario.strategy.build(capacity)?;
        Ok(Self { strategy, steps })
    }

    /// The strategy being driven.
    #[must_use]
    pub fn strategy(&self) -> &dyn Strategy<W> {
        self.strategy.as_ref()
    }

    /// Runs every step, reporting after each one.
    ///
    /// # Errors
    ///
    /// The first failing step as [`HarnessError::Step`], or whatever the
    /// observer returns.
    pub fn run<F>(&mut self, mut observe: F) -> HarnessResult<RunSummary>
    where
        F: FnMut(&StepReport<W>) -> HarnessResult<()>,
    {
        let mut summary = RunSummary::default();

        observe(&StepReport {
            index: 0,
            step: None,
            address: None,
            snapshot: self.strategy.snapshot(),
        })?;

        for (position, &(step, op)) in self.steps.iter().enumerate() {
            let index = position + 1;
            info!(index, %step, strategy = self.strategy.name(), "step");

            let result = match op {
                Op::Allocate(size) => self.strategy.allocate(size).map(Some),
                Op::Release(address) => self.strategy.release(address).map(|()| None),
            };

            let address = result.map_err(|source| {
                warn!(index, %step, error = %source, "halting scenario");
                HarnessError::Step {
                    index,
                    step,
                    source,
                }
            })?;

            summary.steps += 1;
            match op {
                Op::Allocate(_) => summary.allocations += 1,
                Op::Release(_) => summary.releases += 1,
            }

            observe(&StepReport {
                index,
                step: Some(step),
                address,
                snapshot: self.strategy.snapshot(),
            })?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use arenasim_core::{AllocError, StrategyKind};

    use super::*;
    use crate::scenario::Domain;

    #[test]
    fn test_demo_runs_to_completion() {
        for kind in StrategyKind::ALL {
            let mut runner = Runner::<u8>::new(&Scenario::demo(kind)).unwrap();
            let mut headings = Vec::new();

            let summary = runner
                .run(|report| {
                    headings.push(report.heading());
                    Ok(())
                })
                .unwrap();

            assert_eq!(headings[0], "0. init");
            assert_eq!(headings[1], "1. allocate(7)");
            assert_eq!(summary.allocations, 4);
            assert_eq!(headings.len(), summary.steps + 1);
        }
    }

    #[test]
    fn test_halts_at_first_failure() {
        let scenario = Scenario {
            strategy: StrategyKind::BoundaryTag,
            capacity: 32,
            domain: Domain::U8,
            steps: vec![
                Step::Allocate { size: 7 },
                Step::Release { address: 0x03 },
                Step::Allocate { size: 2 },
            ],
        };

        let mut runner = Runner::<u8>::new(&scenario).unwrap();
        let mut seen = 0;
        let err = runner
            .run(|_| {
                seen += 1;
                Ok(())
            })
            .unwrap_err();

        assert_eq!(seen, 2);
        match err {
            HarnessError::Step { index, source, .. } => {
                assert_eq!(index, 2);
                assert_eq!(source, AllocError::InvalidAddress { address: 3 });
            }
            other => panic!("unexpected {other}"),
        }
        assert_eq!(runner.strategy().blocks().len(), 2);
    }

    #[test]
    fn test_values_checked_against_domain() {
        let scenario = Scenario {
            strategy: StrategyKind::FreeList,
            capacity: 300,
            domain: Domain::U8,
            steps: Vec::new(),
        };
        assert!(matches!(
            Runner::<u8>::new(&scenario),
            Err(HarnessError::OutOfDomain {
                field: "capacity",
                value: 300,
                ..
            })
        ));
        assert!(Runner::<u16>::new(&scenario).is_ok());
    }

    #[test]
    fn test_allocation_address_is_reported() {
        let mut runner = Runner::<u8>::new(&Scenario::demo(StrategyKind::BoundaryTag)).unwrap();
        let mut addresses = Vec::new();
        runner
            .run(|report| {
                addresses.extend(report.address);
                Ok(())
            })
            .unwrap();
        assert_eq!(addresses, vec![0x02, 0x0c, 0x11, 0x17]);
    }
}
