// src/simulation/state_table.rs

use crate::math::error::IntegrationError;

/// 予測変数行と外部行を持つ状態テーブル (行優先)
///
/// 行 `0..n_preds` が積分対象の予測変数、それ以降の行は外部から与えられる駆動値。
#[derive(Debug, Clone, PartialEq)]
pub struct StateTable {
    n_rows: usize,
    n_times: usize,
    values: Vec<f64>,
}

impl StateTable {
    /// ゼロで初期化されたテーブルを作成する
    pub fn new(n_rows: usize, n_times: usize) -> Self {
        StateTable {
            n_rows,
            n_times,
            values: vec![0.0; n_rows * n_times],
        }
    }

    /// 行ごとのベクタからテーブルを作成する
    ///
    /// # 引数
    /// - `rows`: 各行の値 (すべて同じ長さであること)
    ///
    /// # 戻り値
    /// - 作成したテーブル、行の長さが揃っていない場合はエラー
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, IntegrationError> {
        let n_rows = rows.len();
        let n_times = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(n_rows * n_times);
        for row in rows {
            if row.len() != n_times {
                return Err(IntegrationError::TableShapeMismatch {
                    what: "row length",
                    requested: row.len(),
                    available: n_times,
                });
            }
            values.extend(row);
        }
        Ok(StateTable {
            n_rows,
            n_times,
            values,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// セルの値を読む
    ///
    /// 行または列が範囲外の場合はパニックする。
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[self.offset(row, column)]
    }

    /// セルの値を書き込む
    ///
    /// 行または列が範囲外の場合はパニックする。
    #[inline]
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        let offset = self.offset(row, column);
        self.values[offset] = value;
    }

    /// 範囲を検査してセルの値を読む
    pub fn try_get(&self, row: usize, column: usize) -> Result<f64, IntegrationError> {
        self.check_cell(row, column)?;
        Ok(self.get(row, column))
    }

    /// 範囲を検査してセルの値を書き込む
    pub fn try_set(
        &mut self,
        row: usize,
        column: usize,
        value: f64,
    ) -> Result<(), IntegrationError> {
        self.check_cell(row, column)?;
        self.set(row, column, value);
        Ok(())
    }

    fn check_cell(&self, row: usize, column: usize) -> Result<(), IntegrationError> {
        if row < self.n_rows && column < self.n_times {
            Ok(())
        } else {
            Err(IntegrationError::CellOutOfRange {
                row,
                column,
                n_rows: self.n_rows,
                n_times: self.n_times,
            })
        }
    }

    // 平坦化の前に列が行内に収まること
    #[inline]
    fn offset(&self, row: usize, column: usize) -> usize {
        assert!(
            column < self.n_times,
            "列 {column} は列数 {} の範囲外です",
            self.n_times
        );
        row * self.n_times + column
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.n_times;
        &self.values[start..start + self.n_times]
    }

    /// 外部行を一定値で埋める
    pub fn set_row_constant(&mut self, row: usize, value: f64) {
        let start = row * self.n_times;
        self.values[start..start + self.n_times].fill(value);
    }
}
