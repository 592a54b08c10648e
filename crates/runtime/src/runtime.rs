//! High-level runtime orchestrator.
//!
//! The runtime plays the phase scheduler: it owns the artillery state, lends
//! it to the rules engine one call at a time, applies each attack's damage as a
//! single batch and broadcasts every report line.

use std::sync::Arc;
use std::time::Duration;

use barrage_content::MunitionCatalog;
use barrage_core::{
    ArtilleryConfig, ArtilleryState, AttackDeclaration, AttackId, EntityId, Hex, Phase,
    ReportEntry, ReportLog, ReportSink, ResolutionEngine, ResolutionOutcome, ResolutionReport,
    Sinks, TagDesignation, TargetingTick, Turn, WeaponId,
};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::broadcast;

use crate::api::{ArbitrationProvider, LowestIdProvider, ReportEvent, Result, RuntimeError};
use crate::ledger::DamageLedger;
use crate::oracle::{Battlefield, BlockingArbiter, DefenseCooldowns, OracleBundle};

/// Runtime configuration shared across the orchestrator and collaborators.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub rules: ArtilleryConfig,
    /// Seed every roll in the session is derived from.
    pub session_seed: u64,
    pub report_buffer_size: usize,
    /// How long a homing arbitration may take before the safe default applies.
    pub arbitration_timeout: Duration,
}

impl RuntimeConfig {
    pub const DEFAULT_ARBITRATION_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules: ArtilleryConfig::default(),
            session_seed: 0,
            report_buffer_size: 256,
            arbitration_timeout: Self::DEFAULT_ARBITRATION_TIMEOUT,
        }
    }
}

/// Main runtime that orchestrates artillery resolution.
pub struct Runtime {
    config: RuntimeConfig,
    state: ArtilleryState,
    oracles: OracleBundle,
    cooldowns: DefenseCooldowns,
    log: ReportLog,
    reports_tx: broadcast::Sender<ReportEvent>,
}

/// Appends to the session log and fans each entry out to subscribers.
struct BroadcastSink<'a> {
    log: &'a mut ReportLog,
    tx: &'a broadcast::Sender<ReportEvent>,
}

impl ReportSink for BroadcastSink<'_> {
    fn push(&mut self, entry: ReportEntry) {
        let event = ReportEvent::new(self.log.len(), entry.clone());
        tracing::debug!(target: "barrage::report", "{}", event.text);
        self.log.push(entry);
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &ArtilleryState {
        &self.state
    }

    pub fn turn(&self) -> Turn {
        self.state.turn
    }

    pub fn battlefield(&self) -> &Battlefield {
        self.oracles.battlefield()
    }

    pub fn munitions(&self) -> &MunitionCatalog {
        self.oracles.munitions()
    }

    /// Every report line produced so far.
    pub fn reports(&self) -> &ReportLog {
        &self.log
    }

    /// Hex-encoded SHA-256 of the report log.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.log.digest())
    }

    /// Subscribe to report events.
    pub fn subscribe_reports(&self) -> broadcast::Receiver<ReportEvent> {
        self.reports_tx.subscribe()
    }

    fn engine(&mut self) -> ResolutionEngine<'_> {
        ResolutionEngine::new(&mut self.state, &self.config.rules)
    }

    /// Starts the next turn: designations expire and point defenses cool down.
    pub fn begin_turn(&mut self) -> Turn {
        let turn = self.state.advance_turn();
        self.cooldowns.reset();
        let discarded = self.state.attacks.discard_resolved();
        tracing::info!(turn = turn.0, discarded, "Turn started");
        turn
    }

    /// Records a targeting-laser result made this turn.
    pub fn record_designation(&mut self, designation: TagDesignation) {
        tracing::debug!(
            tagger = %designation.tagger,
            target = %designation.target,
            hit = designation.hit,
            "Designation recorded"
        );
        self.engine().record_designation(designation);
    }

    /// Hexes `firer` now hits automatically, per weapon.
    pub fn auto_hit_hexes(&self, firer: EntityId) -> Vec<(WeaponId, Hex)> {
        self.state.convergence.auto_hit_hexes(firer)
    }

    pub fn declare_attack(&mut self, declaration: AttackDeclaration) -> Result<AttackId> {
        let env = self.oracles.as_env();
        let mut sink = BroadcastSink {
            log: &mut self.log,
            tx: &self.reports_tx,
        };
        let firer = declaration.firer;
        let id = ResolutionEngine::new(&mut self.state, &self.config.rules)
            .declare_attack(declaration, &env, &mut sink)
            .inspect_err(|error| {
                tracing::warn!(%firer, %error, "Attack declaration rejected");
            })?;

        tracing::info!(attack = %id, %firer, "Attack declared");
        Ok(id)
    }

    /// Runs the targeting phase countdown for every attack in flight.
    pub fn tick_targeting_phase(&mut self) -> Result<Vec<TargetingTick>> {
        let mut sink = BroadcastSink {
            log: &mut self.log,
            tx: &self.reports_tx,
        };
        let ticks = ResolutionEngine::new(&mut self.state, &self.config.rules)
            .tick_targeting_phase(&mut sink)
            .inspect_err(|error| {
                tracing::error!(%error, "Targeting phase refused");
            })?;

        for tick in ticks.iter().filter(|tick| tick.imminent) {
            tracing::info!(attack = %tick.attack, firer = %tick.firer, "Artillery fire imminent");
        }
        Ok(ticks)
    }

    /// Attacks ready to land in `phase`, in declaration order.
    pub fn due_attacks(&mut self, phase: Phase) -> Vec<AttackId> {
        self.engine().due_attacks(phase)
    }

    /// Resolves one attack and applies its damage to the battlefield.
    ///
    /// Homing arbitration parks the calling worker thread until the provider
    /// answers; the builder guarantees a multi-threaded runtime for that.
    pub async fn resolve(&mut self, attack: AttackId, phase: Phase) -> Result<ResolutionReport> {
        self.resolve_now(attack, phase)
    }

    /// Resolves every attack due in `phase`, one after another.
    ///
    /// Stops at the first contract violation; reports already produced for
    /// earlier attacks stay in the log.
    pub async fn resolve_phase(&mut self, phase: Phase) -> Result<Vec<ResolutionReport>> {
        let due = self.due_attacks(phase);
        tracing::info!(%phase, attacks = due.len(), "Resolving artillery phase");

        let mut reports = Vec::with_capacity(due.len());
        for attack in due {
            reports.push(self.resolve(attack, phase).await?);
        }
        Ok(reports)
    }

    fn resolve_now(&mut self, attack: AttackId, phase: Phase) -> Result<ResolutionReport> {
        let mut ledger = DamageLedger::new();

        let result = {
            let env = self.oracles.as_env();
            let mut reports = BroadcastSink {
                log: &mut self.log,
                tx: &self.reports_tx,
            };
            let sinks = Sinks {
                damage: &mut ledger,
                cooldowns: &mut self.cooldowns,
                reports: &mut reports,
            };
            ResolutionEngine::new(&mut self.state, &self.config.rules)
                .resolve(attack, phase, &env, sinks)
        };

        let report = result.map_err(|error| {
            tracing::error!(%attack, %phase, %error, "Artillery resolution aborted");
            RuntimeError::from(error)
        })?;

        let commands = ledger.len();
        let applied = ledger.apply(&mut self.oracles.battlefield);
        match &report.outcome {
            ResolutionOutcome::Impossible { reason } => {
                tracing::info!(%attack, %reason, "Attack could not succeed");
            }
            outcome => tracing::info!(
                %attack,
                ?outcome,
                commands,
                destroyed = applied.destroyed_units.len(),
                "Attack resolved"
            ),
        }
        Ok(report)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    battlefield: Option<Battlefield>,
    munitions: Option<MunitionCatalog>,
    arbitration: Option<Arc<dyn ArbitrationProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            battlefield: None,
            munitions: None,
            arbitration: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the board and everything on it. Defaults to an empty 16×17 map.
    pub fn battlefield(mut self, battlefield: Battlefield) -> Self {
        self.battlefield = Some(battlefield);
        self
    }

    /// Set the required munition catalog
    pub fn munitions(mut self, munitions: MunitionCatalog) -> Self {
        self.munitions = Some(munitions);
        self
    }

    /// Set the arbitration provider. Defaults to [`LowestIdProvider`].
    pub fn arbitration(mut self, provider: impl ArbitrationProvider + 'static) -> Self {
        self.arbitration = Some(Arc::new(provider));
        self
    }

    /// Build the runtime
    ///
    /// Must be called from inside a multi-threaded tokio runtime; arbitration
    /// blocks one of its workers while the provider answers.
    pub fn build(self) -> Result<Runtime> {
        let munitions = self.munitions.ok_or(RuntimeError::MissingMunitions)?;
        let handle = Handle::try_current().map_err(RuntimeError::NoAsyncRuntime)?;
        if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
            return Err(RuntimeError::CurrentThreadRuntime);
        }

        let provider = self
            .arbitration
            .unwrap_or_else(|| Arc::new(LowestIdProvider));
        let arbiter = BlockingArbiter::new(provider, self.config.arbitration_timeout, handle);
        let battlefield = self
            .battlefield
            .unwrap_or_else(|| Battlefield::new(16, 17));

        let (reports_tx, _reports_rx) =
            broadcast::channel::<ReportEvent>(self.config.report_buffer_size.max(1));

        tracing::info!(
            seed = self.config.session_seed,
            munitions = munitions.len(),
            "Artillery runtime ready"
        );

        Ok(Runtime {
            state: ArtilleryState::new(self.config.session_seed),
            oracles: OracleBundle::new(battlefield, munitions, arbiter),
            cooldowns: DefenseCooldowns::new(),
            log: ReportLog::new(),
            reports_tx,
            config: self.config,
        })
    }
}
