pub mod calculators;
pub mod commands;
pub mod effectiveness;
pub mod phases;
pub mod pipeline;
pub mod state;
pub mod stats;
pub mod turn_order;

#[cfg(test)]
mod tests;
