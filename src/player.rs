use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Enemy => "enemy",
        }
    }
}

/// Identity of a combatant: its side and field slot.
///
/// Ordering is player side first, then lower slot first. The turn scheduler
/// uses this ordering as its default speed tie-break.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BattlerIndex {
    pub side: Side,
    pub slot: u8,
}

impl BattlerIndex {
    pub const PLAYER: BattlerIndex = BattlerIndex::new(Side::Player, 0);
    pub const PLAYER_2: BattlerIndex = BattlerIndex::new(Side::Player, 1);
    pub const ENEMY: BattlerIndex = BattlerIndex::new(Side::Enemy, 0);
    pub const ENEMY_2: BattlerIndex = BattlerIndex::new(Side::Enemy, 1);

    pub const fn new(side: Side, slot: u8) -> Self {
        Self { side, slot }
    }
}

impl fmt::Display for BattlerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.side.label(), self.slot)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // The index refers to the move's position in the combatant's move list.
    // Without a target the move aims at the first standing opponent.
    UseMove {
        move_index: usize,
        #[serde(default)]
        target: Option<BattlerIndex>,
    },

    // Concedes the battle for the whole side.
    Forfeit,
}

impl PlayerAction {
    pub fn use_move(move_index: usize) -> Self {
        PlayerAction::UseMove {
            move_index,
            target: None,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::UseMove {
                move_index,
                target: Some(target),
            } => write!(f, "use move {} on {}", move_index, target),
            PlayerAction::UseMove { move_index, .. } => write!(f, "use move {}", move_index),
            PlayerAction::Forfeit => write!(f, "forfeit"),
        }
    }
}
