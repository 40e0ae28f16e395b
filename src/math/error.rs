// src/math/error.rs

use thiserror::Error;

/// 積分処理で発生するエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("命令 {index} のオペコード {opcode} は未定義です。")]
    UnknownOpcode { index: usize, opcode: i32 },

    #[error("命令 {index} にはパラメータが {expected} 個必要ですが、{found} 個しかありません。")]
    MissingParameter {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("命令 {index} のインデックス {value} が負の値です。")]
    NegativeIndex { index: usize, value: i32 },

    #[error("テーブルの形状が一致しません: {what} = {requested} > {available}")]
    TableShapeMismatch {
        what: &'static str,
        requested: usize,
        available: usize,
    },

    #[error("命令 {index} の参照行 {source_row} は状態テーブルの行数 {rows} の範囲外です。")]
    SourceOutOfRange {
        index: usize,
        source_row: usize,
        rows: usize,
    },

    #[error("予測変数の数 {n_preds} が上限 {capacity} を超えています。")]
    CapacityExceeded { n_preds: usize, capacity: usize },

    #[error("命令 {index} の対象 {target} は予測変数の範囲 (0..{n_preds}) 外です。")]
    TargetOutOfRange {
        index: usize,
        target: usize,
        n_preds: usize,
    },

    #[error("命令 {index} のパラメータ {value} が有限値ではありません。")]
    NonFiniteParameter { index: usize, value: f64 },

    #[error("命令 {index} の時定数がゼロです。")]
    ZeroTimeConstant { index: usize },

    #[error("予測変数 {predictor} の微分値が列 {column} で有限値ではありません。")]
    NonFiniteDerivative { predictor: usize, column: usize },

    #[error("時間刻み {dt} が有限値ではありません。")]
    NonFiniteTimeStep { dt: f64 },

    #[error("予測変数 {predictor} の値が列 {column} で有限値ではありません。")]
    NonFiniteState { predictor: usize, column: usize },

    #[error("セル ({row}, {column}) は状態テーブル ({n_rows} 行 x {n_times} 列) の範囲外です。")]
    CellOutOfRange {
        row: usize,
        column: usize,
        n_rows: usize,
        n_times: usize,
    },
}
