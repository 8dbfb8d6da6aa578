use std::path::PathBuf;
use thiserror::Error;

/// 実行前に検出されるエラー（実行中のコアは失敗しない）
#[derive(Debug, Error)]
pub enum LifeError {
    #[error("ファイル操作に失敗しました: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("グリッドが空です")]
    EmptyGrid,

    #[error("不正なセル文字 '{ch}' ({line}行目 {column}列目)")]
    InvalidCell { line: usize, column: usize, ch: char },

    #[error("ワーカースレッドを起動できません: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("引数が不正です: {0}")]
    InvalidArgument(String),

    #[error("使い方: gameoflife <入力ファイル> <世代数> [スレッド数] [--spin] [--wrap] [--print] [--results <csv>]")]
    Usage,

    #[error("CSV書き込みエラー: {0}")]
    Csv(#[from] csv::Error),
}
