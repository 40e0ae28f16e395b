// src/simulation/mod.rs

pub mod load_parameters;
pub mod framework;
pub mod state_table;

pub use state_table::StateTable;
