// src/math/mod.rs

pub mod integrator;
pub mod interpreter;
pub mod tmal;
pub mod error;

pub use integrator::integrate;
pub use integrator::integrate_with_scratch;
pub use integrator::Rk2Scratch;
pub use interpreter::evaluate_derivatives;
pub use tmal::{decode_tmal, Instruction, Opcode};
pub use error::IntegrationError;
