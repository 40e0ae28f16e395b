// src/config/parameters.rs

use serde::Deserialize;

/// 命令の検証モード
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// 範囲外の対象は無視し、非有限値もそのまま伝播させる
    #[default]
    Permissive,
    /// 範囲外の対象、非有限・ゼロのパラメータ、非有限の微分値をエラーとする
    Strict,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IntegratorParameters {
    pub dt: f64, // 時間刻み
    #[serde(default)]
    pub validation: ValidationMode,
    #[serde(default)]
    pub predictor_capacity: Option<usize>, // 予測変数の上限 (未指定なら無制限)
}

impl IntegratorParameters {
    pub fn new(dt: f64) -> Self {
        IntegratorParameters {
            dt,
            validation: ValidationMode::Permissive,
            predictor_capacity: None,
        }
    }

    pub fn strict(mut self) -> Self {
        self.validation = ValidationMode::Strict;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.predictor_capacity = Some(capacity);
        self
    }
}
