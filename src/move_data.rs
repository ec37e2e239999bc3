use crate::errors::ConfigResult;
use schema::{Move, MoveCategory, MoveEffect, MoveFlag, PokemonType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

const MOVE_CATALOG_RON: &str = include_str!("../data/moves.ron");

// Global move data storage - parsed once from the bundled catalog
static MOVE_DATA: LazyLock<HashMap<Move, MoveData>> = LazyLock::new(|| {
    MoveData::parse_catalog(MOVE_CATALOG_RON)
        .unwrap_or_else(|err| panic!("bundled move catalog is malformed: {}", err))
});

/// Get move data for a specific move from the global store
pub fn get_move_data(move_: Move) -> Option<&'static MoveData> {
    MOVE_DATA.get(&move_)
}

fn single_hit() -> u8 {
    1
}

/// Immutable catalog entry for a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: Option<u16>,
    #[serde(default)]
    pub priority: i8,
    #[serde(default = "single_hit")]
    pub hits: u8,
    #[serde(default)]
    pub flags: Vec<MoveFlag>,
    #[serde(default)]
    pub effect: Option<MoveEffect>,
}

impl MoveData {
    /// Parses a RON map of `Move -> MoveData`.
    pub fn parse_catalog(source: &str) -> ConfigResult<HashMap<Move, MoveData>> {
        Ok(ron::from_str(source)?)
    }

    pub fn has_flag(&self, flag: MoveFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// The defending type this move is forced to hit super-effectively, if any.
    pub fn forced_effectiveness_against(&self) -> Option<PokemonType> {
        self.flags.iter().find_map(|flag| match flag {
            MoveFlag::ForcedEffectiveness(designated) => Some(*designated),
            _ => None,
        })
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power.is_some_and(|power| power > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_catalog_covers_every_move() {
        for move_ in Move::iter() {
            assert!(
                get_move_data(move_).is_some(),
                "{} is missing from data/moves.ron",
                move_
            );
        }
    }

    #[test]
    fn test_catalog_defaults_are_applied() {
        let tackle = get_move_data(Move::Tackle).unwrap();
        assert_eq!(tackle.priority, 0);
        assert_eq!(tackle.hits, 1);
        assert_eq!(tackle.effect, None);
        assert!(tackle.is_damaging());

        let splash = get_move_data(Move::Splash).unwrap();
        assert!(!splash.is_damaging());
        assert!(splash.flags.is_empty());
    }

    #[test]
    fn test_freeze_dry_carries_forced_effectiveness() {
        let freeze_dry = get_move_data(Move::FreezeDry).unwrap();
        assert_eq!(freeze_dry.move_type, PokemonType::Ice);
        assert_eq!(
            freeze_dry.forced_effectiveness_against(),
            Some(PokemonType::Water)
        );
        assert_eq!(get_move_data(Move::IceBeam).unwrap().forced_effectiveness_against(), None);
    }

    #[test]
    fn test_parse_catalog_rejects_malformed_input() {
        assert!(MoveData::parse_catalog("{ Tackle: (move_type: Normal) }").is_err());
    }
}
