//! アプリケーションのメインワークフローを定義するモジュール。
//!
//! UI層（`cli`）とドメイン層（`domain`）を仲介し、起動時に一度だけ
//! `ProjectLayout` を決定して各処理に引き渡します。

use crate::cli::{Args, BenchArgs, Command, ConvertArgs};
use rt_bench::config::{BenchSettings, ProjectLayout};
use rt_bench::domain::benchmark::{quality_levels, BenchmarkRunner};
use rt_bench::domain::conversion::convert_batch;
use rt_bench::domain::input_source::directory_path::DirectoryPath;
use rt_bench::error::AppError;
use std::fs;
use std::time::Duration;
use tracing::{info, warn};

/// アプリケーションのメインロジックを実行します。
///
/// # 戻り値
/// * `Ok(())`: 処理が最後まで進んだ場合。個々のジョブやファイルの失敗はログに出力済み。
/// * `Err(AppError)`: プロジェクトルートが不正、またはレンダラーを用意できなかった場合。
pub fn run(args: Args) -> Result<(), AppError> {
    // プロジェクトルートは存在するディレクトリでなければならない
    let root = DirectoryPath::new(&args.project_root)?;
    let layout = ProjectLayout::resolve(fs::canonicalize(root.as_path())?);
    info!(root = %layout.project_root.display(), "project layout resolved");

    match args.command {
        Command::Bench(bench) => run_benchmark(&layout, bench),
        Command::Convert(convert) => run_conversion(&layout, convert),
    }
}

// --- private なヘルパー関数 ---

fn run_benchmark(layout: &ProjectLayout, args: BenchArgs) -> Result<(), AppError> {
    let settings = BenchSettings {
        width: args.width,
        height: args.height,
        prefix: args.prefix,
        job_timeout: args.timeout_secs.map(Duration::from_secs),
    };
    let levels = quality_levels(args.samples);

    let runner = BenchmarkRunner::new(layout, &settings);
    let results = runner.run_matrix(&levels, settings.width, settings.height, &settings.prefix)?;
    if results.is_empty() {
        warn!("no render finished successfully");
    }
    Ok(())
}

fn run_conversion(layout: &ProjectLayout, args: ConvertArgs) -> Result<(), AppError> {
    let summary = convert_batch(&args.files, &layout.output_dir, args.output_dir.as_deref());
    if summary.succeeded() < summary.attempted() {
        warn!(
            failed = summary.attempted() - summary.succeeded(),
            "some files could not be converted"
        );
    }
    Ok(())
}
