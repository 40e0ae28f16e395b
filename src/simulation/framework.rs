// src/simulation/framework.rs

use crate::config::parameters::IntegratorParameters;
use crate::math::error::IntegrationError;
use crate::math::integrator::{integrate_columns, Rk2Scratch};
use crate::math::tmal::decode_tmal;
use crate::simulation::StateTable;

/// 生の TMAL 表からモデルを計算する
///
/// # 引数
/// - `n_times`: 積分する列数 (テーブルの列数以下)
/// - `n_preds`: 予測変数の数
/// - `n_tmals`: 使用する命令の数 (`tmal_ints`の先頭から)
/// - `dt`: 時間刻み
/// - `mvals`: 状態テーブル (列 0 は初期値として設定済みであること)
/// - `tmal_ints`: 各命令の (オペコード, 対象, 参照元)
/// - `tmal_floats`: 各命令のパラメータ
///
/// # 戻り値
/// - 成功時は`Ok(())`
/// - 未定義オペコード、パラメータ不足、形状の不整合などはエラー
pub fn calc_model(
    n_times: usize,
    n_preds: usize,
    n_tmals: usize,
    dt: f64,
    mvals: &mut StateTable,
    tmal_ints: &[[i32; 3]],
    tmal_floats: &[Vec<f64>],
) -> Result<(), IntegrationError> {
    execute_model(
        n_times,
        n_preds,
        n_tmals,
        mvals,
        tmal_ints,
        tmal_floats,
        &IntegratorParameters::new(dt),
    )
}

/// 検証モードなどを指定してモデルを計算する
pub fn execute_model(
    n_times: usize,
    n_preds: usize,
    n_tmals: usize,
    mvals: &mut StateTable,
    tmal_ints: &[[i32; 3]],
    tmal_floats: &[Vec<f64>],
    params: &IntegratorParameters,
) -> Result<(), IntegrationError> {
    if n_tmals > tmal_ints.len() {
        return Err(IntegrationError::TableShapeMismatch {
            what: "n_tmals",
            requested: n_tmals,
            available: tmal_ints.len(),
        });
    }

    let instructions = decode_tmal(&tmal_ints[..n_tmals], tmal_floats)?;
    integrate_columns(
        mvals,
        n_times,
        n_preds,
        &instructions,
        params,
        &mut Rk2Scratch::new(),
    )
}
