//! Game controller
//!
//! Owns the lock state, the RNG, the round timer and the orchestrator.
//! Input is validated synchronously; animations run alongside. While a win
//! or failure sequence plays, input is ignored, and the secret is replaced
//! only after the sequence has finished.

use std::time::Duration;

use futures_util::StreamExt;
use futures_util::future::LocalBoxFuture;
use futures_util::stream::FuturesUnordered;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::anim::{Actor, AnimationEngine, Orchestrator, SequenceReport, StageOutcome};
use crate::diagnostics::{self, DiagnosticsSink};
use crate::error::ConfigError;
use crate::input::PointerEvent;
use crate::settings::Settings;
use crate::sim::{Direction, GameStatus, LockState, ValidationResult};
use crate::timer::ElapsedTimer;

/// Result of feeding one direction to the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub direction: Direction,
    pub result: ValidationResult,
    /// Status after the input was committed
    pub status: GameStatus,
}

/// How a finished round was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Won {
        elapsed: Duration,
        report: SequenceReport,
    },
    Failed {
        report: SequenceReport,
    },
}

impl RoundOutcome {
    pub fn report(&self) -> &SequenceReport {
        match self {
            RoundOutcome::Won { report, .. } | RoundOutcome::Failed { report } => report,
        }
    }
}

/// Tally across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub wins: u32,
    pub failures: u32,
    /// Fastest win
    pub best: Option<Duration>,
}

impl RoundStats {
    fn record(&mut self, outcome: &RoundOutcome) {
        match outcome {
            RoundOutcome::Won { elapsed, .. } => {
                self.wins += 1;
                self.best = Some(self.best.map_or(*elapsed, |b| b.min(*elapsed)));
            }
            RoundOutcome::Failed { .. } => self.failures += 1,
        }
    }
}

/// A win or failure sequence in flight
struct PendingRound {
    status: GameStatus,
    /// Round time captured when the timer was stopped (wins only)
    elapsed: Duration,
    sequence: LocalBoxFuture<'static, SequenceReport>,
}

/// Single owner of the game state
pub struct VaultController<E, R = Pcg32> {
    settings: Settings,
    lock: LockState,
    rng: R,
    timer: ElapsedTimer,
    orchestrator: Orchestrator<E>,
    diagnostics: Box<dyn DiagnosticsSink>,
    stats: RoundStats,
}

impl<E: AnimationEngine + 'static> VaultController<E, Pcg32> {
    /// Controller with a seeded PCG generator
    pub fn with_seed(
        settings: Settings,
        engine: E,
        seed: u64,
        diagnostics: impl DiagnosticsSink + 'static,
    ) -> Result<Self, ConfigError> {
        Self::new(settings, engine, Pcg32::seed_from_u64(seed), diagnostics)
    }
}

impl<E: AnimationEngine + 'static, R: Rng> VaultController<E, R> {
    /// Generate the first secret and start the round timer
    pub fn new(
        settings: Settings,
        engine: E,
        mut rng: R,
        diagnostics: impl DiagnosticsSink + 'static,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let lock = LockState::generate(settings.combination_length, settings.max_rotations, &mut rng)?;
        let orchestrator = Orchestrator::new(engine, settings.animation.clone());

        let mut controller = Self {
            settings,
            lock,
            rng,
            timer: ElapsedTimer::new(),
            orchestrator,
            diagnostics: Box::new(diagnostics),
            stats: RoundStats::default(),
        };
        controller
            .diagnostics
            .emit(&diagnostics::secret_summary(controller.lock.secret()));
        controller.timer.start();
        Ok(controller)
    }

    pub fn lock(&self) -> &LockState {
        &self.lock
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer(&self) -> &ElapsedTimer {
        &self.timer
    }

    pub fn orchestrator(&self) -> &Orchestrator<E> {
        &self.orchestrator
    }

    pub fn stats(&self) -> RoundStats {
        self.stats
    }

    /// Input is only validated while the attempt is in progress
    pub fn accepts_input(&self) -> bool {
        !self.lock.status().is_terminal()
    }

    /// Validate and commit one direction.
    ///
    /// Returns `None` when the input is ignored because a win or failure is
    /// still being resolved.
    pub fn submit(&mut self, direction: Direction) -> Option<Submission> {
        if !self.accepts_input() {
            log::debug!("Ignoring {} input while {}", direction, self.lock.status().as_str());
            return None;
        }

        let validation = self.lock.validate(direction);
        let status = self.lock.commit(&validation);

        match status {
            GameStatus::Normal => self
                .diagnostics
                .emit(&diagnostics::progress_line(&self.lock, &validation.result)),
            GameStatus::Failure => {
                log::info!("Wrong direction ({}), attempt failed", direction);
                self.diagnostics.emit(&diagnostics::failure_line(&self.lock));
            }
            GameStatus::Win => log::info!("Combination complete"),
        }

        Some(Submission {
            direction,
            result: validation.result,
            status,
        })
    }

    /// Handle turn for an accepted, non-terminal submission.
    ///
    /// The future is independent of the controller, so it can be driven
    /// while further input is handled.
    pub fn handle_turn(
        &self,
        submission: &Submission,
    ) -> Option<LocalBoxFuture<'static, StageOutcome>> {
        if !submission.result.accepted || submission.status != GameStatus::Normal {
            return None;
        }
        let orchestrator = self.orchestrator.clone();
        let direction = submission.direction;
        Some(Box::pin(async move { orchestrator.turn_handle(direction).await }))
    }

    /// Play the win or failure sequence, then replace the secret.
    ///
    /// Returns `Ok(None)` if the attempt is still in progress.
    pub async fn resolve(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<RoundOutcome>, ConfigError> {
        let Some(round) = self.begin_round(cancel) else {
            return Ok(None);
        };
        let PendingRound {
            status,
            elapsed,
            sequence,
        } = round;
        let report = sequence.await;
        self.finish_round(status, elapsed, report).map(Some)
    }

    /// Drive the game from a stream of pointer events until the stream
    /// closes or `cancel` fires.
    ///
    /// Handle turns play concurrently with input handling. Events that
    /// arrive during a win or failure sequence are dropped.
    pub async fn run(
        &mut self,
        mut inputs: mpsc::UnboundedReceiver<PointerEvent>,
        cancel: CancellationToken,
    ) -> Result<RoundStats, ConfigError> {
        let mut turns: FuturesUnordered<LocalBoxFuture<'static, StageOutcome>> =
            FuturesUnordered::new();
        let mut pending: Option<PendingRound> = None;
        let mut inputs_open = true;

        loop {
            if !inputs_open && pending.is_none() {
                while turns.next().await.is_some() {}
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled(), if pending.is_none() => break,
                report = async {
                    match pending.as_mut() {
                        Some(round) => (&mut round.sequence).await,
                        None => std::future::pending().await,
                    }
                }, if pending.is_some() => {
                    if let Some(round) = pending.take() {
                        self.finish_round(round.status, round.elapsed, report)?;
                    }
                }
                Some(outcome) = turns.next(), if !turns.is_empty() => {
                    log::trace!("Handle turn finished: {:?}", outcome);
                }
                event = inputs.recv(), if inputs_open => match event {
                    Some(event) => {
                        if let Some(round) = self.on_pointer(event, &mut turns, &cancel) {
                            pending = Some(round);
                        }
                    }
                    None => inputs_open = false,
                },
            }
        }

        log::info!(
            "Stopped after {} wins and {} failures",
            self.stats.wins,
            self.stats.failures
        );
        Ok(self.stats)
    }

    fn on_pointer(
        &mut self,
        event: PointerEvent,
        turns: &mut FuturesUnordered<LocalBoxFuture<'static, StageOutcome>>,
        cancel: &CancellationToken,
    ) -> Option<PendingRound> {
        if self.settings.debounce_while_turning && self.orchestrator.is_busy(Actor::Handle) {
            log::debug!("Ignoring press while the handle is turning");
            return None;
        }

        let submission = self.submit(event.direction())?;
        if let Some(turn) = self.handle_turn(&submission) {
            turns.push(turn);
        }
        self.begin_round(cancel)
    }

    /// Stop the clock on a win and hand back the sequence to play
    fn begin_round(&mut self, cancel: &CancellationToken) -> Option<PendingRound> {
        let status = self.lock.status();
        let orchestrator = self.orchestrator.clone();
        let cancel = cancel.clone();

        match status {
            GameStatus::Normal => None,
            GameStatus::Win => {
                let elapsed = self.timer.stop();
                self.diagnostics.emit(&diagnostics::win_line(elapsed));
                Some(PendingRound {
                    status,
                    elapsed,
                    sequence: Box::pin(async move { orchestrator.play_win(&cancel).await }),
                })
            }
            GameStatus::Failure => Some(PendingRound {
                status,
                elapsed: Duration::ZERO,
                sequence: Box::pin(async move { orchestrator.play_failure(&cancel).await }),
            }),
        }
    }

    /// Replace the secret once the sequence is over and resume input
    fn finish_round(
        &mut self,
        status: GameStatus,
        elapsed: Duration,
        report: SequenceReport,
    ) -> Result<RoundOutcome, ConfigError> {
        self.lock.regenerate(
            self.settings.combination_length,
            self.settings.max_rotations,
            &mut self.rng,
        )?;
        log::info!("New combination generated (#{})", self.lock.generation());
        self.diagnostics
            .emit(&diagnostics::secret_summary(self.lock.secret()));

        let outcome = if status == GameStatus::Win {
            self.timer.start();
            RoundOutcome::Won { elapsed, report }
        } else {
            RoundOutcome::Failed { report }
        };
        self.stats.record(&outcome);
        Ok(outcome)
    }
}
