// src/simulation/load_parameters.rs

use std::error::Error;
use std::fs::File;
use serde_yaml::{from_reader, from_str};

use crate::config::parameters::IntegratorParameters;

/// 積分器パラメータの読み込み
pub fn load_integrator_parameters(path: &str) -> Result<IntegratorParameters, Box<dyn Error>> {
    let file = File::open(path)?;
    let params: IntegratorParameters = from_reader(file)?;
    Ok(params)
}

/// YAML文字列から積分器パラメータを読み込む
pub fn parse_integrator_parameters(yaml: &str) -> Result<IntegratorParameters, Box<dyn Error>> {
    let params: IntegratorParameters = from_str(yaml)?;
    Ok(params)
}
