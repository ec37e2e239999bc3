use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[strum(ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl PokemonType {
    /// Dense index of this type, used to address the type chart table.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// An ordered set of one or two distinct elemental types.
///
/// The first entry is the primary type. A combatant's current types live in
/// one of these and may be replaced mid-battle (e.g. by Soak).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PokemonType>", into = "Vec<PokemonType>")]
pub struct TypeSet {
    primary: PokemonType,
    secondary: Option<PokemonType>,
}

impl TypeSet {
    pub fn single(pokemon_type: PokemonType) -> Self {
        Self {
            primary: pokemon_type,
            secondary: None,
        }
    }

    /// Builds a dual-type set. A repeated type collapses into a single-type set.
    pub fn dual(primary: PokemonType, secondary: PokemonType) -> Self {
        Self {
            primary,
            secondary: (secondary != primary).then_some(secondary),
        }
    }

    /// Builds a set from a slice of 1-2 types. Returns `None` for an empty or
    /// oversized slice.
    pub fn from_slice(types: &[PokemonType]) -> Option<Self> {
        match types {
            [only] => Some(Self::single(*only)),
            [primary, secondary] => Some(Self::dual(*primary, *secondary)),
            _ => None,
        }
    }

    pub fn primary(&self) -> PokemonType {
        self.primary
    }

    pub fn secondary(&self) -> Option<PokemonType> {
        self.secondary
    }

    pub fn contains(&self, pokemon_type: PokemonType) -> bool {
        self.primary == pokemon_type || self.secondary == Some(pokemon_type)
    }

    pub fn is_pure(&self, pokemon_type: PokemonType) -> bool {
        self.primary == pokemon_type && self.secondary.is_none()
    }

    pub fn len(&self) -> usize {
        if self.secondary.is_some() {
            2
        } else {
            1
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PokemonType> + '_ {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

impl TryFrom<Vec<PokemonType>> for TypeSet {
    type Error = String;

    fn try_from(types: Vec<PokemonType>) -> Result<Self, Self::Error> {
        Self::from_slice(&types)
            .ok_or_else(|| format!("expected 1 or 2 types, found {}", types.len()))
    }
}

impl From<TypeSet> for Vec<PokemonType> {
    fn from(types: TypeSet) -> Self {
        types.iter().collect()
    }
}

impl std::fmt::Display for TypeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.secondary {
            Some(secondary) => write!(f, "{}/{}", self.primary, secondary),
            None => write!(f, "{}", self.primary),
        }
    }
}
