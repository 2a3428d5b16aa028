//! 品質レベルごとにレンダラーを実行し、所要時間を集計する。
//!
//! 1回の `run_matrix` は次の順に状態が遷移する。
//!
//! `NotBuilt → (Building) → Built → Running[0] → … → Running[n-1] → Summarizing → Done`
//!
//! `Building` は実行ファイルが無かった場合のみ経由し、ビルドの失敗は `Failed` で終端する。
//! 各ジョブの失敗はログに出して読み飛ばし、次の品質レベルへ進む。

use super::job::{RenderJob, RenderResult};
use super::summary::format_summary;
use crate::config::{BenchSettings, ProjectLayout};
use crate::domain::build::{ensure_executable, is_executable, BuildError, BuildPipeline};
use crate::domain::input_source::directory_path::DirectoryPath;
use crate::domain::input_source::path_error::PathError;
use crate::domain::process::{run_to_completion, CancellationToken, JobError, RunLimits};
use chrono::Local;
use std::fmt;
use std::fs;
use std::num::NonZeroU32;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// マトリクス全体を中止させるエラー。この場合ジョブは1つも実行されない。
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("renderer is not available ({0}); build the project before running the benchmark")]
    Build(#[from] BuildError),

    #[error("could not prepare output directory: {0}")]
    OutputDir(#[source] PathError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixPhase {
    NotBuilt,
    Building,
    Built,
    Running(usize),
    Summarizing,
    Done,
    Failed,
}

impl fmt::Display for MatrixPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixPhase::Running(i) => write!(f, "Running[{}]", i),
            other => write!(f, "{:?}", other),
        }
    }
}

/// ベンチマークの実行者。
pub struct BenchmarkRunner<'a> {
    layout: &'a ProjectLayout,
    pipeline: BuildPipeline,
    limits: RunLimits,
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(layout: &'a ProjectLayout, settings: &BenchSettings) -> Self {
        Self {
            layout,
            pipeline: BuildPipeline::default(),
            limits: RunLimits::with_timeout(settings.job_timeout),
        }
    }

    /// 既定の `cmake` / `make` 以外のビルド手順を使う。
    pub fn with_pipeline(mut self, pipeline: BuildPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// 実行中のジョブを外部から打ち切るためのトークン。
    pub fn cancellation_token(&self) -> CancellationToken {
        self.limits.cancel.clone()
    }

    /// 品質レベルの一覧を入力順に実行し、成功したジョブの結果を同じ順序で返します。
    ///
    /// 実行前に `ensure_executable` を呼び出し、失敗した場合はジョブを1つも実行せずに
    /// `MatrixError::Build` を返します。個々のジョブの失敗はログに出力して読み飛ばします。
    /// すべてのジョブの後、結果が1件以上あれば表を標準出力に表示します。
    ///
    /// `width` / `height` は記録のみで、レンダラーには渡されません。
    pub fn run_matrix(
        &self,
        quality_levels: &[NonZeroU32],
        width: u32,
        height: u32,
        prefix: &str,
    ) -> Result<Vec<RenderResult>, MatrixError> {
        self.run_with_phases(quality_levels, width, height, prefix, &mut PhaseLog::default())
    }

    fn run_with_phases(
        &self,
        quality_levels: &[NonZeroU32],
        width: u32,
        height: u32,
        prefix: &str,
        phases: &mut PhaseLog,
    ) -> Result<Vec<RenderResult>, MatrixError> {
        debug!(phase = %phases.current(), width, height, prefix, "starting benchmark matrix");

        let executable = self.layout.executable_path();
        // ビルドが必要な場合は、結果に関わらず先に Building へ入る
        if !is_executable(&executable) {
            phases.transition(MatrixPhase::Building);
        }
        if let Err(e) = ensure_executable(self.layout, &self.pipeline) {
            phases.transition(MatrixPhase::Failed);
            error!(executable = %executable.display(), "could not obtain renderer: {}", e);
            return Err(e.into());
        }
        phases.transition(MatrixPhase::Built);

        let output_dir = DirectoryPath::create(&self.layout.output_dir).map_err(|e| {
            phases.transition(MatrixPhase::Failed);
            MatrixError::OutputDir(e)
        })?;

        let mut results = Vec::with_capacity(quality_levels.len());
        for (i, &level) in quality_levels.iter().enumerate() {
            phases.transition(MatrixPhase::Running(i));
            let job = RenderJob::new(
                level,
                prefix,
                output_dir.as_path(),
                Local::now().naive_local(),
            );
            match self.run_job(&executable, &job) {
                Ok(result) => results.push(result),
                Err(JobError::Cancelled) => {
                    warn!("benchmark cancelled, remaining quality levels are skipped");
                    break;
                }
                Err(e) => {
                    error!(
                        samples = level.get(),
                        output = %job.output_path().display(),
                        "render failed: {}",
                        e
                    );
                }
            }
        }

        phases.transition(MatrixPhase::Summarizing);
        if let Some(table) = format_summary(&results) {
            println!("\nResults summary:");
            println!("{}", table);
        }
        phases.transition(MatrixPhase::Done);
        Ok(results)
    }

    fn run_job(&self, executable: &Path, job: &RenderJob) -> Result<RenderResult, JobError> {
        info!(
            prefix = job.prefix(),
            "Rendering with {} samples per pixel...",
            job.quality_level()
        );
        let mut command = job.to_command(executable);
        command.stdin(Stdio::null());

        let started = Instant::now();
        let status = run_to_completion(&mut command, &self.limits)?;
        let elapsed = started.elapsed();
        if !status.success() {
            return Err(JobError::NonZeroExit(status));
        }

        // 変換側が前提とするため、空でない出力が存在することを確認する
        let written = fs::metadata(job.output_path())
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(JobError::OutputMissing(job.output_path().to_path_buf()));
        }

        info!("Render time: {:.2} seconds", elapsed.as_secs_f64());
        info!("Image saved to: {}", job.output_path().display());
        Ok(RenderResult::new(job.clone(), elapsed))
    }
}

/// 経由した状態を順に記録する。先頭は常に `NotBuilt`。
#[derive(Debug)]
struct PhaseLog {
    history: Vec<MatrixPhase>,
}

impl Default for PhaseLog {
    fn default() -> Self {
        Self {
            history: vec![MatrixPhase::NotBuilt],
        }
    }
}

impl PhaseLog {
    fn current(&self) -> MatrixPhase {
        self.history
            .last()
            .copied()
            .unwrap_or(MatrixPhase::NotBuilt)
    }

    fn transition(&mut self, next: MatrixPhase) {
        debug!(from = %self.current(), to = %next, "benchmark phase");
        self.history.push(next);
    }
}
