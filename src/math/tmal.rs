// src/math/tmal.rs

use serde::Deserialize;

use crate::math::error::IntegrationError;

/// TMAL 命令のオペコード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Coupling = 0,
    Forcing = 1,
    ExternalInjection = 2,
}

impl Opcode {
    /// オペコードが必要とする浮動小数点パラメータの数
    pub fn parameter_count(self) -> usize {
        match self {
            Opcode::Coupling => 1,
            Opcode::Forcing => 2,
            Opcode::ExternalInjection => 0,
        }
    }
}

impl TryFrom<i32> for Opcode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Coupling),
            1 => Ok(Opcode::Forcing),
            2 => Ok(Opcode::ExternalInjection),
            other => Err(other),
        }
    }
}

/// 微分値へ寄与する命令
///
/// `target` が予測変数の範囲外の場合、寛容モードでは何もしない命令として扱われる。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// `target` を `source` の値へ時定数 `tau` で緩和させる
    Coupling { target: usize, source: usize, tau: f64 },
    /// `target` を固定値 `value` へ時定数 `tau` で緩和させる
    Forcing { target: usize, value: f64, tau: f64 },
    /// 外部行 `source` の値を変化率として `target` に直接加える
    ExternalInjection { target: usize, source: usize },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Coupling { .. } => Opcode::Coupling,
            Instruction::Forcing { .. } => Opcode::Forcing,
            Instruction::ExternalInjection { .. } => Opcode::ExternalInjection,
        }
    }

    pub fn target(&self) -> usize {
        match *self {
            Instruction::Coupling { target, .. }
            | Instruction::Forcing { target, .. }
            | Instruction::ExternalInjection { target, .. } => target,
        }
    }

    /// 状態テーブルから値を読み出す行
    ///
    /// # 引数
    /// - `n_preds`: 予測変数の数
    ///
    /// # 戻り値
    /// - 命令が状態テーブルを参照する場合はその行、予測変数の現在値のみを使う場合は`None`
    pub fn table_source(&self, n_preds: usize) -> Option<usize> {
        match *self {
            Instruction::Coupling { target, source, .. } => {
                if source < n_preds && target < n_preds {
                    None
                } else {
                    Some(source)
                }
            }
            Instruction::Forcing { .. } => None,
            Instruction::ExternalInjection { source, .. } => Some(source),
        }
    }

    /// 命令が持つ浮動小数点パラメータ
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            Instruction::Coupling { tau, .. } => vec![tau],
            Instruction::Forcing { value, tau, .. } => vec![value, tau],
            Instruction::ExternalInjection { .. } => Vec::new(),
        }
    }

    pub fn time_constant(&self) -> Option<f64> {
        match *self {
            Instruction::Coupling { tau, .. } | Instruction::Forcing { tau, .. } => Some(tau),
            Instruction::ExternalInjection { .. } => None,
        }
    }
}

fn to_index(index: usize, value: i32) -> Result<usize, IntegrationError> {
    usize::try_from(value).map_err(|_| IntegrationError::NegativeIndex { index, value })
}

/// 整数表と浮動小数点表から命令列を復元する
///
/// # 引数
/// - `tmal_ints`: 各命令の (オペコード, 対象, 参照元)
/// - `tmal_floats`: 各命令のパラメータ
///
/// # 戻り値
/// - 型付きの命令列
/// - 未定義オペコード、負のインデックス、パラメータ不足の場合はエラー
///
/// 結合と外部注入の負の参照元は、対象が予測変数の範囲外で実際には読まれない命令であっても
/// `NegativeIndex` とする。復元時点では予測変数の数が分からず、負の値はどの行も指さないため。
/// 強制項の参照元は使われないので検査しない。
pub fn decode_tmal(
    tmal_ints: &[[i32; 3]],
    tmal_floats: &[Vec<f64>],
) -> Result<Vec<Instruction>, IntegrationError> {
    if tmal_floats.len() < tmal_ints.len() {
        return Err(IntegrationError::TableShapeMismatch {
            what: "tmal_ints",
            requested: tmal_ints.len(),
            available: tmal_floats.len(),
        });
    }

    tmal_ints
        .iter()
        .zip(tmal_floats.iter())
        .enumerate()
        .map(|(index, (&[opcode, i1, i2], floats))| {
            let opcode = Opcode::try_from(opcode)
                .map_err(|opcode| IntegrationError::UnknownOpcode { index, opcode })?;
            let expected = opcode.parameter_count();
            if floats.len() < expected {
                return Err(IntegrationError::MissingParameter {
                    index,
                    expected,
                    found: floats.len(),
                });
            }

            let target = to_index(index, i1)?;
            let instruction = match opcode {
                Opcode::Coupling => Instruction::Coupling {
                    target,
                    source: to_index(index, i2)?,
                    tau: floats[0],
                },
                // 強制項では参照元を使わない
                Opcode::Forcing => Instruction::Forcing {
                    target,
                    value: floats[0],
                    tau: floats[1],
                },
                Opcode::ExternalInjection => Instruction::ExternalInjection {
                    target,
                    source: to_index(index, i2)?,
                },
            };
            Ok(instruction)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3種類のオペコードがそれぞれの型付き命令に変換されることを確認します。
    #[test]
    fn test_decode_all_opcodes() {
        let ints = [[0, 0, 1], [1, 1, 0], [2, 0, 3]];
        let floats = vec![vec![10.0], vec![25.0, 50.0], vec![]];
        let instructions = decode_tmal(&ints, &floats).unwrap();

        assert_eq!(
            instructions,
            vec![
                Instruction::Coupling { target: 0, source: 1, tau: 10.0 },
                Instruction::Forcing { target: 1, value: 25.0, tau: 50.0 },
                Instruction::ExternalInjection { target: 0, source: 3 },
            ]
        );
    }

    #[test]
    fn test_decode_unknown_opcode() {
        let ints = [[1, 0, 0], [5, 0, 0]];
        let floats = vec![vec![1.0, 2.0], vec![1.0]];
        let result = decode_tmal(&ints, &floats);

        assert_eq!(
            result,
            Err(IntegrationError::UnknownOpcode { index: 1, opcode: 5 })
        );
    }

    #[test]
    fn test_decode_missing_parameter() {
        let ints = [[1, 0, 0]];
        let floats = vec![vec![1.0]];
        let result = decode_tmal(&ints, &floats);

        assert_eq!(
            result,
            Err(IntegrationError::MissingParameter {
                index: 0,
                expected: 2,
                found: 1
            })
        );
    }

    /// 強制項の参照元は使われないため、負の値でも受け付けます。
    #[test]
    fn test_decode_negative_index() {
        let floats = vec![vec![1.0, 1.0]];
        assert_eq!(
            decode_tmal(&[[0, -1, 0]], &floats),
            Err(IntegrationError::NegativeIndex { index: 0, value: -1 })
        );
        assert!(decode_tmal(&[[1, 0, -1]], &floats).is_ok());
    }

    /// 対象が予測変数の範囲外になり得る大きな値でも、負の参照元は拒否します。
    #[test]
    fn test_decode_negative_source_with_far_target() {
        let floats = vec![vec![1.0]];
        assert_eq!(
            decode_tmal(&[[0, 1000, -3]], &floats),
            Err(IntegrationError::NegativeIndex { index: 0, value: -3 })
        );
        assert_eq!(
            decode_tmal(&[[2, 1000, -1]], &floats),
            Err(IntegrationError::NegativeIndex { index: 0, value: -1 })
        );
    }

    #[test]
    fn test_decode_short_float_table() {
        let result = decode_tmal(&[[2, 0, 1], [2, 0, 1]], &[vec![]]);
        assert!(matches!(
            result,
            Err(IntegrationError::TableShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_table_source_selection() {
        let coupling = Instruction::Coupling { target: 0, source: 1, tau: 1.0 };
        assert_eq!(coupling.table_source(2), None);
        // 参照元が予測変数でなければ外部行を読む
        assert_eq!(coupling.table_source(1), Some(1));

        let injection = Instruction::ExternalInjection { target: 0, source: 0 };
        assert_eq!(injection.table_source(3), Some(0));
    }

    #[test]
    fn test_instruction_from_yaml() {
        let yaml = "
- op: coupling
  target: 0
  source: 1
  tau: 20.0
- op: forcing
  target: 1
  value: -5.0
  tau: 100.0
- op: external_injection
  target: 0
  source: 2
";
        let instructions: Vec<Instruction> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[1].opcode(), Opcode::Forcing);
        assert_eq!(instructions[1].parameters(), vec![-5.0, 100.0]);
        assert_eq!(instructions[2].time_constant(), None);
    }
}
