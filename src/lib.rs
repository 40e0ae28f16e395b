// src/lib.rs

//! TMAL 命令表で微分値を組み立て、固定刻みの RK2 法で予測変数を積分するライブラリ

pub mod config;
pub mod math;
pub mod simulation;

pub use config::{IntegratorParameters, ValidationMode};
pub use math::{
    decode_tmal, integrate, integrate_with_scratch, Instruction, IntegrationError, Opcode,
    Rk2Scratch,
};
pub use simulation::framework::{calc_model, execute_model};
pub use simulation::load_parameters::{load_integrator_parameters, parse_integrator_parameters};
pub use simulation::StateTable;
