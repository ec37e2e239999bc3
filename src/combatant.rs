use crate::player::BattlerIndex;
use schema::{Ability, BaseStats, Move, Species, StatType, StatusType, TypeSet};
use serde::{Deserialize, Serialize};

// Stat formula constants. Combatants are built with perfect IVs and no EVs.
const DEFAULT_IV: u16 = 31;
const MAX_STAT_STAGE: i8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl Stats {
    /// Calculate stats from base stats and level.
    /// Uses the Gen 3+ formula without natures or EVs.
    pub fn calculate(base_stats: &BaseStats, level: u8, fixed_one_hp: bool) -> Self {
        let level = level as u16;
        // Other Stat = floor(0.01 * (2 * Base + IV) * Level) + 5
        let other = |base: u8| (2 * base as u16 + DEFAULT_IV) * level / 100 + 5;
        // HP = floor(0.01 * (2 * Base + IV) * Level) + Level + 10
        let hp = if fixed_one_hp {
            1
        } else {
            (2 * base_stats.hp as u16 + DEFAULT_IV) * level / 100 + level + 10
        };

        Self {
            hp,
            attack: other(base_stats.attack),
            defense: other(base_stats.defense),
            sp_attack: other(base_stats.sp_attack),
            sp_defense: other(base_stats.sp_defense),
            speed: other(base_stats.speed),
        }
    }

    pub fn get(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.sp_attack,
            StatType::SpecialDefense => self.sp_defense,
            StatType::Speed => self.speed,
        }
    }
}

/// Stat stages in -6..=+6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub sp_attack: i8,
    pub sp_defense: i8,
    pub speed: i8,
}

impl StatStages {
    fn stage_mut(&mut self, stat: StatType) -> &mut i8 {
        match stat {
            StatType::Attack => &mut self.attack,
            StatType::Defense => &mut self.defense,
            StatType::SpecialAttack => &mut self.sp_attack,
            StatType::SpecialDefense => &mut self.sp_defense,
            StatType::Speed => &mut self.speed,
        }
    }

    pub fn get(&self, stat: StatType) -> i8 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.sp_attack,
            StatType::SpecialDefense => self.sp_defense,
            StatType::Speed => self.speed,
        }
    }

    /// Applies a delta and returns the new, clamped stage.
    pub fn change(&mut self, stat: StatType, delta: i8) -> i8 {
        let stage = self.stage_mut(stat);
        *stage = stage.saturating_add(delta).clamp(-MAX_STAT_STAGE, MAX_STAT_STAGE);
        *stage
    }

    /// The same stages with every value clamped to -6..=+6.
    pub fn clamped(self) -> Self {
        let clamp = |stage: i8| stage.clamp(-MAX_STAT_STAGE, MAX_STAT_STAGE);
        Self {
            attack: clamp(self.attack),
            defense: clamp(self.defense),
            sp_attack: clamp(self.sp_attack),
            sp_defense: clamp(self.sp_defense),
            speed: clamp(self.speed),
        }
    }
}

/// Flags that alter how damage is calculated against a combatant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantFlags {
    /// Chart immunities do not protect this combatant (Foresight-style).
    #[serde(default)]
    pub ignore_type_immunity: bool,
    /// Every hit against this combatant is negated.
    #[serde(default)]
    pub negate_all_damage: bool,
}

/// Battle-start description of a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub species: Species,
    pub level: u8,
    pub moves: Vec<Move>,
    /// Overrides the species' ability.
    #[serde(default)]
    pub ability: Option<Ability>,
    /// Overrides the species' types.
    #[serde(default)]
    pub types: Option<TypeSet>,
    #[serde(default)]
    pub status: Option<StatusType>,
    /// Starting HP; defaults to max.
    #[serde(default)]
    pub hp: Option<u16>,
    /// Stat stages in effect when the battle starts.
    #[serde(default)]
    pub stat_stages: StatStages,
    #[serde(default)]
    pub flags: CombatantFlags,
}

impl CombatantTemplate {
    pub fn new(species: Species, level: u8, moves: Vec<Move>) -> Self {
        Self {
            species,
            level,
            moves,
            ability: None,
            types: None,
            status: None,
            hp: None,
            stat_stages: StatStages::default(),
            flags: CombatantFlags::default(),
        }
    }
}

/// Mutable per-combatant battle record.
///
/// `current_hp` is private so every mutation goes through the clamping
/// helpers below; a combatant at 0 HP is fainted but stays on the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combatant {
    pub battler: BattlerIndex,
    pub species: Species,
    pub level: u8,
    /// Current types. This is what effectiveness reads.
    pub types: TypeSet,
    /// The species' original types, kept for display.
    pub species_types: TypeSet,
    pub ability: Ability,
    pub stats: Stats,
    pub stat_stages: StatStages,
    current_hp: u16,
    pub status: Option<StatusType>,
    pub flags: CombatantFlags,
    pub moves: Vec<Move>,
    /// Multiplier of the most recent hit taken by this combatant.
    pub last_effectiveness: Option<f64>,
}

impl Combatant {
    pub fn from_template(battler: BattlerIndex, template: &CombatantTemplate) -> Self {
        let species_data = template.species.data();
        let stats = Stats::calculate(
            &species_data.base_stats,
            template.level,
            species_data.fixed_one_hp,
        );
        let species_types = species_data.type_set();
        let mut combatant = Combatant {
            battler,
            species: template.species,
            level: template.level,
            types: template.types.unwrap_or(species_types),
            species_types,
            ability: template.ability.unwrap_or(species_data.ability),
            stats,
            stat_stages: template.stat_stages.clamped(),
            current_hp: stats.hp,
            status: template.status,
            flags: template.flags,
            moves: template.moves.clone(),
            last_effectiveness: None,
        };
        if let Some(hp) = template.hp {
            combatant.set_hp(hp);
        }
        combatant
    }

    pub fn name(&self) -> &'static str {
        self.species.name()
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Sets HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    /// Removes up to `amount` HP and returns how much was actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    pub fn move_at(&self, move_index: usize) -> Option<Move> {
        self.moves.get(move_index).copied()
    }
}
