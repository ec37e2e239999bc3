// Pokemon Arena Schema - Shared type definitions
// This crate contains the static enums and data tables shared by the battle
// engine: elemental types and their chart, abilities, the move catalog keys
// and species templates.

// Re-export the main types
pub use abilities::*;
pub use move_types::*;
pub use moves::*;
pub use pokemon_types::*;
pub use species_data::*;
pub use type_chart::*;

pub mod abilities;
pub mod move_types;
pub mod moves;
pub mod pokemon_types;
pub mod species_data;
pub mod type_chart;
