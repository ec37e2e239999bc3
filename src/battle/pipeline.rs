use crate::battle::commands::{execute_command_batch, BattleCommand};
use crate::battle::effectiveness::EffectivenessResolver;
use crate::battle::phases::{Phase, PhaseContext, PhaseKind, PhaseQueue};
use crate::battle::state::{BattleEvent, BattleState, EventBus, TurnRng};
use crate::battle::turn_order::validate_forced_order;
use crate::config::EngineConfig;
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::player::{BattlerIndex, PlayerAction};
use schema::TypeChart;
use std::collections::HashSet;

/// Where the pipeline stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The named phase is about to execute.
    Reached(PhaseKind),
    /// The command phase is waiting for actions from standing combatants.
    AwaitingActions,
    /// The battle is over; nothing is left to run.
    BattleEnded,
}

/// Runs a battle one phase at a time.
///
/// The pipeline owns the battle state. Callers submit actions, optionally force
/// a turn order, and advance to the phase they want to inspect.
#[derive(Debug)]
pub struct PhasePipeline {
    state: BattleState,
    config: EngineConfig,
    resolver: EffectivenessResolver,
    rng: TurnRng,
    bus: EventBus,
    current: Option<Phase>,
    queue: PhaseQueue,
    forced_order: Option<Vec<BattlerIndex>>,
    executed_this_round: HashSet<PhaseKind>,
}

impl PhasePipeline {
    pub fn new(state: BattleState, config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => TurnRng::new_seeded(seed),
            None => TurnRng::new_random(),
        };
        let resolver = EffectivenessResolver::new(TypeChart::default(), config.forced_effectiveness);
        Self {
            state,
            config,
            resolver,
            rng,
            bus: EventBus::new(),
            current: Some(Phase::TurnStart),
            queue: PhaseQueue::new(),
            forced_order: None,
            executed_this_round: HashSet::new(),
        }
    }

    /// Replaces the randomness source, e.g. with scripted outcomes for tests.
    pub fn with_rng(mut self, rng: TurnRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_resolver(mut self, resolver: EffectivenessResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Get the current battle state (read-only)
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the events emitted so far (read-only)
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Takes the events emitted so far, leaving the bus empty.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.bus).into_events()
    }

    /// The phase that will execute next, if the battle is not over.
    pub fn current_phase(&self) -> Option<&Phase> {
        self.current.as_ref()
    }

    pub fn current_kind(&self) -> Option<PhaseKind> {
        self.current.as_ref().map(Phase::kind)
    }

    /// Kinds of the phases queued after the current one.
    pub fn upcoming(&self) -> Vec<PhaseKind> {
        self.queue.iter().map(Phase::kind).collect()
    }

    pub fn is_over(&self) -> bool {
        self.current.is_none()
    }

    /// Standing combatants that still need to submit an action this round.
    pub fn awaiting_actions(&self) -> Vec<BattlerIndex> {
        self.state.battlers_awaiting_action()
    }

    /// Queue an action for `battler`, validated against the current state.
    pub fn submit_action(&mut self, battler: BattlerIndex, action: PlayerAction) -> BattleResult<()> {
        self.validate_action(battler, &action)?;
        tracing::debug!(%battler, %action, "action submitted");
        execute_command_batch(
            vec![BattleCommand::QueueAction { battler, action }],
            &mut self.state,
            &mut self.bus,
        )
    }

    /// Fix the order of the next round's actions. Consumed by the next command phase.
    pub fn set_turn_order(&mut self, order: Vec<BattlerIndex>) -> BattleResult<()> {
        if self.is_over() {
            return Err(BattleStateError::BattleOver.into());
        }
        validate_forced_order(&order, &self.state.standing_battlers())?;
        tracing::debug!(?order, "turn order forced");
        self.forced_order = Some(order);
        Ok(())
    }

    /// Executes the current phase and returns where the pipeline now stands.
    pub fn step(&mut self) -> BattleResult<AdvanceOutcome> {
        match self.blocked() {
            Some(outcome) => Ok(outcome),
            None => {
                self.execute_current()?;
                Ok(self.position())
            }
        }
    }

    /// Runs phases until one of `kind` is about to execute.
    pub fn advance_to(&mut self, kind: PhaseKind) -> BattleResult<AdvanceOutcome> {
        loop {
            if self.current_kind() == Some(kind) {
                return Ok(AdvanceOutcome::Reached(kind));
            }
            if let Some(outcome) = self.blocked() {
                return Ok(outcome);
            }
            self.execute_current()?;
        }
    }

    /// Runs phases until one of `kind` has executed.
    pub fn advance_past(&mut self, kind: PhaseKind) -> BattleResult<AdvanceOutcome> {
        match self.advance_to(kind)? {
            AdvanceOutcome::Reached(_) => self.step(),
            outcome => Ok(outcome),
        }
    }

    /// Runs the rest of the current round and stops at the next round's start.
    pub fn to_next_turn(&mut self) -> BattleResult<AdvanceOutcome> {
        if self.current_kind() == Some(PhaseKind::TurnStart) {
            if let AdvanceOutcome::BattleEnded = self.step()? {
                return Ok(AdvanceOutcome::BattleEnded);
            }
        }
        self.advance_to(PhaseKind::TurnStart)
    }

    fn position(&self) -> AdvanceOutcome {
        match self.current_kind() {
            Some(kind) => AdvanceOutcome::Reached(kind),
            None => AdvanceOutcome::BattleEnded,
        }
    }

    /// Why the current phase cannot run, if it cannot.
    fn blocked(&self) -> Option<AdvanceOutcome> {
        match self.current_kind() {
            None => Some(AdvanceOutcome::BattleEnded),
            Some(PhaseKind::CommandPhase) if !self.awaiting_actions().is_empty() => {
                Some(AdvanceOutcome::AwaitingActions)
            }
            Some(_) => None,
        }
    }

    fn execute_current(&mut self) -> BattleResult<()> {
        let Some(phase) = self.current.take() else {
            return Ok(());
        };
        let kind = phase.kind();
        tracing::debug!(phase = %kind, turn = self.state.turn_number, "executing phase");

        let mut ctx = PhaseContext {
            state: &self.state,
            config: &self.config,
            resolver: &self.resolver,
            rng: &mut self.rng,
            forced_order: self.forced_order.as_deref(),
        };
        let outcome = match phase.execute(&mut ctx) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.current = Some(phase);
                return Err(err);
            }
        };

        if kind == PhaseKind::TurnStart {
            self.executed_this_round.clear();
        }
        if !kind.is_repeatable() {
            let first_run = self.executed_this_round.insert(kind);
            debug_assert!(first_run, "{} ran twice in round {}", kind, self.state.turn_number);
        }
        if kind == PhaseKind::CommandPhase {
            self.forced_order = None;
        }

        execute_command_batch(outcome.commands, &mut self.state, &mut self.bus)?;

        if kind == PhaseKind::BattleEndPhase {
            self.queue.clear();
        } else {
            self.queue.push_front_all(outcome.next_phases);
        }
        self.current = self.queue.pop_front();
        Ok(())
    }

    /// Validate that an action is legal in the current state
    fn validate_action(&self, battler: BattlerIndex, action: &PlayerAction) -> BattleResult<()> {
        if self.is_over() || self.state.game_state.is_over() {
            return Err(BattleStateError::BattleOver.into());
        }
        let combatant = self
            .state
            .combatant(battler)
            .ok_or(BattleStateError::UnknownBattler(battler))?;
        if combatant.is_fainted() {
            return Err(ActionError::FaintedCombatant(battler).into());
        }
        if self.state.action_queue.contains_key(&battler) {
            return Err(ActionError::AlreadySubmitted(battler).into());
        }

        match action {
            PlayerAction::UseMove { move_index, target } => {
                let move_used = combatant
                    .move_at(*move_index)
                    .ok_or(ActionError::InvalidMoveIndex {
                        battler,
                        index: *move_index,
                    })?;
                if let Some(target) = target {
                    if *target == battler || self.state.combatant(*target).is_none() {
                        return Err(ActionError::InvalidTarget {
                            battler,
                            target: *target,
                            move_used,
                        }
                        .into());
                    }
                }
            }
            PlayerAction::Forfeit => {
                // Forfeit is always valid
            }
        }
        Ok(())
    }
}
