// src/math/integrator.rs

use tracing::{debug, trace, warn};

use crate::config::parameters::{IntegratorParameters, ValidationMode};
use crate::math::error::IntegrationError;
use crate::math::interpreter::evaluate_derivatives;
use crate::math::tmal::Instruction;
use crate::simulation::StateTable;

/// RK2 積分器の作業領域
///
/// 呼び出し間で値は引き継がれず、予測変数の数に合わせて毎回リサイズされる。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rk2Scratch {
    y: Vec<f64>,
    deriv: Vec<f64>,
}

impl Rk2Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, n_preds: usize) {
        self.y.clear();
        self.y.resize(n_preds, 0.0);
        self.deriv.clear();
        self.deriv.resize(n_preds, 0.0);
    }
}

/// 状態テーブル全体を RK2 法で積分する
///
/// 列 0 の予測変数の値を初期値として、マクロステップごとに 2 列ずつ書き込む。
/// 列数が偶数の場合、最後の列は書き込まれない。
///
/// # 引数
/// - `table`: 状態テーブル (行 `0..n_preds` が予測変数)
/// - `n_preds`: 予測変数の数
/// - `instructions`: 微分値を組み立てる命令列
/// - `params`: 時間刻みと検証モード
///
/// # 戻り値
/// - 成功時は`Ok(())`
/// - 形状・参照行の不整合、厳格モードでの検証失敗時はエラー
pub fn integrate(
    table: &mut StateTable,
    n_preds: usize,
    instructions: &[Instruction],
    params: &IntegratorParameters,
) -> Result<(), IntegrationError> {
    let n_times = table.n_times();
    integrate_columns(table, n_times, n_preds, instructions, params, &mut Rk2Scratch::new())
}

/// 作業領域を再利用して積分する
pub fn integrate_with_scratch(
    table: &mut StateTable,
    n_preds: usize,
    instructions: &[Instruction],
    params: &IntegratorParameters,
    scratch: &mut Rk2Scratch,
) -> Result<(), IntegrationError> {
    let n_times = table.n_times();
    integrate_columns(table, n_times, n_preds, instructions, params, scratch)
}

/// 先頭 `n_times` 列だけを積分する
pub(crate) fn integrate_columns(
    table: &mut StateTable,
    n_times: usize,
    n_preds: usize,
    instructions: &[Instruction],
    params: &IntegratorParameters,
    scratch: &mut Rk2Scratch,
) -> Result<(), IntegrationError> {
    if n_times > table.n_times() {
        return Err(IntegrationError::TableShapeMismatch {
            what: "n_times",
            requested: n_times,
            available: table.n_times(),
        });
    }
    if n_preds > table.n_rows() {
        return Err(IntegrationError::TableShapeMismatch {
            what: "n_preds",
            requested: n_preds,
            available: table.n_rows(),
        });
    }
    if let Some(capacity) = params.predictor_capacity {
        if n_preds > capacity {
            return Err(IntegrationError::CapacityExceeded { n_preds, capacity });
        }
    }

    let strict = params.validation == ValidationMode::Strict;
    if strict && !params.dt.is_finite() {
        return Err(IntegrationError::NonFiniteTimeStep { dt: params.dt });
    }
    validate_instructions(instructions, n_preds, table.n_rows(), strict)?;

    debug!(
        n_times,
        n_preds,
        n_tmals = instructions.len(),
        dt = params.dt,
        validation = ?params.validation,
        "RK2 積分を開始"
    );

    let dt = params.dt;
    scratch.reset(n_preds);
    let Rk2Scratch { y, deriv } = scratch;

    let mut j0 = 0;
    while j0 + 2 < n_times {
        for rki in 0..2 {
            let column = if rki == 0 { j0 } else { j0 + 1 };

            for (i, (yi, di)) in y.iter_mut().zip(deriv.iter_mut()).enumerate() {
                *yi = if rki == 0 {
                    table.get(i, column)
                } else {
                    // 前のサブステップの微分値で半ステップ進める
                    *yi + dt * *di / 2.0
                };
                *di = 0.0;
            }

            evaluate_derivatives(y.as_slice(), column, instructions, table, deriv.as_mut_slice());

            if strict {
                if let Some(predictor) = deriv.iter().position(|d| !d.is_finite()) {
                    return Err(IntegrationError::NonFiniteDerivative { predictor, column });
                }
            }
        }

        // 中点の微分値のみで更新する
        for (i, (&yi, &di)) in y.iter().zip(deriv.iter()).enumerate() {
            let k2 = dt * di;
            let mid = yi + k2 / 2.0;
            let next = yi + k2;
            if strict {
                if !mid.is_finite() {
                    return Err(IntegrationError::NonFiniteState { predictor: i, column: j0 + 1 });
                }
                if !next.is_finite() {
                    return Err(IntegrationError::NonFiniteState { predictor: i, column: j0 + 2 });
                }
            }
            table.set(i, j0 + 1, mid);
            table.set(i, j0 + 2, next);
        }

        trace!(j0, "マクロステップ完了");
        j0 += 2;
    }

    debug!(last_column = j0, "RK2 積分を終了");
    Ok(())
}

/// 積分前に命令列を検査する
///
/// 参照行がテーブル外の命令はモードに関係なくエラーとする。
/// 寛容モードでは対象が範囲外の命令を数えて警告するだけで、参照行は読まれないので検査しない。
fn validate_instructions(
    instructions: &[Instruction],
    n_preds: usize,
    n_rows: usize,
    strict: bool,
) -> Result<(), IntegrationError> {
    let mut ignored = 0usize;

    for (index, instruction) in instructions.iter().enumerate() {
        let target = instruction.target();
        if target >= n_preds {
            if strict {
                return Err(IntegrationError::TargetOutOfRange {
                    index,
                    target,
                    n_preds,
                });
            }
            ignored += 1;
            continue;
        }

        if let Some(source_row) = instruction.table_source(n_preds) {
            if source_row >= n_rows {
                return Err(IntegrationError::SourceOutOfRange {
                    index,
                    source_row,
                    rows: n_rows,
                });
            }
        }

        if strict {
            if let Some(&value) = instruction.parameters().iter().find(|v| !v.is_finite()) {
                return Err(IntegrationError::NonFiniteParameter { index, value });
            }
            if instruction.time_constant() == Some(0.0) {
                return Err(IntegrationError::ZeroTimeConstant { index });
            }
        }
    }

    if ignored > 0 {
        warn!(ignored, n_preds, "対象が予測変数の範囲外の命令を無視します");
    }
    Ok(())
}
