//! Ordering of the actions submitted for a round.

use crate::battle::state::BattleState;
use crate::battle::stats::effective_speed;
use crate::config::TieBreak;
use crate::errors::{ActionError, BattleResult, BattleStateError, TurnOrderError};
use crate::move_data::get_move_data;
use crate::player::{BattlerIndex, PlayerAction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Coarse ordering bucket. Lower tiers always act first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionTier {
    Forfeit,
    Move,
}

/// An action with the values it is ordered by, captured at scheduling time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub battler: BattlerIndex,
    pub action: PlayerAction,
    pub tier: ActionTier,
    pub priority: i8,
    pub speed: u16,
}

impl PendingAction {
    pub fn from_submission(
        state: &BattleState,
        battler: BattlerIndex,
        action: PlayerAction,
    ) -> BattleResult<Self> {
        let combatant = state
            .combatant(battler)
            .ok_or(BattleStateError::UnknownBattler(battler))?;
        let speed = effective_speed(combatant);

        let (tier, priority) = match &action {
            PlayerAction::Forfeit => (ActionTier::Forfeit, 0),
            PlayerAction::UseMove { move_index, .. } => {
                let move_used = combatant
                    .move_at(*move_index)
                    .ok_or(ActionError::InvalidMoveIndex {
                        battler,
                        index: *move_index,
                    })?;
                let priority = get_move_data(move_used).map_or(0, |data| data.priority);
                (ActionTier::Move, priority)
            }
        };

        Ok(Self {
            battler,
            action,
            tier,
            priority,
            speed,
        })
    }
}

/// Builds pending actions from the queued actions of standing combatants.
pub fn collect_pending(state: &BattleState) -> BattleResult<Vec<PendingAction>> {
    state
        .action_queue
        .iter()
        .filter(|(battler, _)| state.combatant(**battler).is_some_and(|c| !c.is_fainted()))
        .map(|(battler, action)| PendingAction::from_submission(state, *battler, action.clone()))
        .collect()
}

/// Checks that `order` names every acting battler exactly once and nothing else.
pub fn validate_forced_order(
    order: &[BattlerIndex],
    acting: &[BattlerIndex],
) -> Result<(), TurnOrderError> {
    let mut seen = BTreeSet::new();
    for battler in order {
        if !seen.insert(*battler) {
            return Err(TurnOrderError::Duplicate(*battler));
        }
        if !acting.contains(battler) {
            return Err(TurnOrderError::NotActing(*battler));
        }
    }
    match acting.iter().find(|battler| !seen.contains(battler)) {
        Some(missing) => Err(TurnOrderError::Missing(*missing)),
        None => Ok(()),
    }
}

/// Orders the round's actions.
///
/// A forced order replaces the computed one entirely. Otherwise actions sort by
/// tier, then move priority (high first), then effective speed (fast first),
/// with exact ties broken by `tie_break`.
pub fn schedule(
    mut pending: Vec<PendingAction>,
    forced_order: Option<&[BattlerIndex]>,
    tie_break: TieBreak,
    turn_number: u32,
) -> Result<Vec<PendingAction>, TurnOrderError> {
    if let Some(order) = forced_order {
        let acting: Vec<_> = pending.iter().map(|p| p.battler).collect();
        validate_forced_order(order, &acting)?;
        pending.sort_by_key(|p| order.iter().position(|b| *b == p.battler));
        return Ok(pending);
    }

    // Base order for ties: player side first, lower slot first.
    pending.sort_by_key(|p| p.battler);

    let tie_keys: Vec<u64> = match tie_break {
        TieBreak::SlotOrder => (0..pending.len() as u64).collect(),
        TieBreak::Seeded(seed) => {
            let mut rng = StdRng::seed_from_u64(seed ^ u64::from(turn_number));
            pending.iter().map(|_| rng.random()).collect()
        }
    };

    let mut keyed: Vec<(u64, PendingAction)> = tie_keys.into_iter().zip(pending).collect();
    keyed.sort_by(|(key_a, a), (key_b, b)| {
        a.tier
            .cmp(&b.tier)
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| b.speed.cmp(&a.speed))
            .then_with(|| key_a.cmp(key_b))
            .then_with(|| a.battler.cmp(&b.battler))
    });
    Ok(keyed.into_iter().map(|(_, action)| action).collect())
}
