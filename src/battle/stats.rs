use crate::combatant::Combatant;
use crate::move_data::MoveData;
use schema::{MoveCategory, StatType, StatusType};

/// Attacking stat for a move, after stat stages. Status moves have none.
pub fn effective_attack(attacker: &Combatant, move_data: &MoveData) -> u16 {
    let stat = match move_data.category {
        MoveCategory::Physical => StatType::Attack,
        MoveCategory::Special => StatType::SpecialAttack,
        MoveCategory::Status => return 0,
    };
    apply_stat_stage_multiplier(attacker.stats.get(stat), attacker.stat_stages.get(stat))
}

/// Defending stat against a move, after stat stages. Never below 1.
pub fn effective_defense(defender: &Combatant, move_data: &MoveData) -> u16 {
    let stat = match move_data.category {
        MoveCategory::Physical => StatType::Defense,
        MoveCategory::Special => StatType::SpecialDefense,
        MoveCategory::Status => return 1,
    };
    apply_stat_stage_multiplier(defender.stats.get(stat), defender.stat_stages.get(stat)).max(1)
}

/// Speed used for turn ordering: stat stages, then paralysis halves it.
pub fn effective_speed(combatant: &Combatant) -> u16 {
    let speed = apply_stat_stage_multiplier(
        combatant.stats.speed,
        combatant.stat_stages.get(StatType::Speed),
    );
    if combatant.status == Some(StatusType::Paralysis) {
        speed / 2
    } else {
        speed
    }
}

/// Apply stat stage multipliers according to Pokemon formula
/// Stages range from -6 to +6
/// Negative stages: (2 / (2 + |stage|))
/// Positive stages: ((2 + stage) / 2)
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let clamped_stage = stage.clamp(-6, 6);

    if clamped_stage == 0 {
        return base_stat;
    }

    let multiplier = if clamped_stage < 0 {
        2.0 / (2.0 + (-clamped_stage) as f64)
    } else {
        (2.0 + clamped_stage as f64) / 2.0
    };

    ((base_stat as f64) * multiplier).round() as u16
}
