use crate::domain::benchmark::MatrixError;
use crate::domain::input_source::path_error::PathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// ベンチマーク全体の中止。終了コードは変えずに報告だけ行う。
    #[error("{0}")]
    Benchmark(#[from] MatrixError),
}
