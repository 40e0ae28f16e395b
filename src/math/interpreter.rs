// src/math/interpreter.rs

use crate::math::tmal::Instruction;
use crate::simulation::StateTable;

/// 命令列を解釈して微分値を加算する
///
/// `deriv` は呼び出し前にゼロで初期化しておくこと。同じ対象への寄与は上書きせず加算する。
/// 対象が予測変数の範囲外 (`target >= y.len()`) の命令は何もしない。
/// 状態テーブルを参照する行はテーブルの範囲内であること (`integrate` で事前に検査される)。
///
/// # 引数
/// - `y`: 現在のサブステップにおける予測変数の値
/// - `column`: 外部行を読み出すマクロ列
/// - `instructions`: 命令列
/// - `table`: 状態テーブル
/// - `deriv`: 微分値の加算先 (長さは`y`と同じ)
pub fn evaluate_derivatives(
    y: &[f64],
    column: usize,
    instructions: &[Instruction],
    table: &StateTable,
    deriv: &mut [f64],
) {
    let n_preds = y.len();

    for instruction in instructions {
        match *instruction {
            Instruction::Coupling { target, source, tau } => {
                if target >= n_preds {
                    continue;
                }
                // 参照元が予測変数ならサブステップの値、そうでなければ外部行の値
                let source_value = if source < n_preds {
                    y[source]
                } else {
                    table.get(source, column)
                };
                deriv[target] += (source_value - y[target]) / tau;
            }
            Instruction::Forcing { target, value, tau } => {
                if target < n_preds {
                    deriv[target] += (value - y[target]) / tau;
                }
            }
            Instruction::ExternalInjection { target, source } => {
                if target < n_preds {
                    deriv[target] += table.get(source, column);
                }
            }
        }
    }
}
