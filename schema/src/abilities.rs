use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Ability {
    /// No battle effect.
    BallFetch,
    /// Only super-effective moves can hit.
    WonderGuard,
    Levitate,
    WaterAbsorb,
    StormDrain,
    VoltAbsorb,
    LightningRod,
    MotorDrive,
    FlashFire,
    SapSipper,
    /// Every move the user makes becomes Normal type.
    Normalize,
    Refrigerate,
    Pixilate,
    Aerilate,
    Galvanize,
    /// Normal and Fighting moves hit Ghost types.
    Scrappy,
}

impl Ability {
    /// The attacking type this ability makes its holder immune to, if any.
    pub fn immune_to(self) -> Option<PokemonType> {
        match self {
            Ability::Levitate => Some(PokemonType::Ground),
            Ability::WaterAbsorb | Ability::StormDrain => Some(PokemonType::Water),
            Ability::VoltAbsorb | Ability::LightningRod | Ability::MotorDrive => {
                Some(PokemonType::Electric)
            }
            Ability::FlashFire => Some(PokemonType::Fire),
            Ability::SapSipper => Some(PokemonType::Grass),
            _ => None,
        }
    }

    /// The type a Normal move is converted to by this ability ("-ate" abilities).
    pub fn converts_normal_moves_to(self) -> Option<PokemonType> {
        match self {
            Ability::Refrigerate => Some(PokemonType::Ice),
            Ability::Pixilate => Some(PokemonType::Fairy),
            Ability::Aerilate => Some(PokemonType::Flying),
            Ability::Galvanize => Some(PokemonType::Electric),
            _ => None,
        }
    }
}
