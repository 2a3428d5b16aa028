use crate::config::RAW_DUMP_EXTENSION;
use chrono::NaiveDateTime;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// 品質レベルが指定されなかった場合に順に実行する spp の一覧。
pub const DEFAULT_QUALITY_LEVELS: [u32; 4] = [1, 4, 16, 64];

/// 実行する品質レベルの一覧を決定する。
///
/// 単一の値が指定された場合は既定の一覧を完全に置き換える。
pub fn quality_levels(explicit: Option<NonZeroU32>) -> Vec<NonZeroU32> {
    match explicit {
        Some(level) => vec![level],
        None => DEFAULT_QUALITY_LEVELS
            .iter()
            .filter_map(|&n| NonZeroU32::new(n))
            .collect(),
    }
}

/// レンダラーの1回分の実行内容。生成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    quality_level: NonZeroU32,
    output_path: PathBuf,
    prefix: String,
}

impl RenderJob {
    /// 出力先を `<output_dir>/<prefix>_<spp>spp_<YYYYMMDD_HHMMSS>.ppm` として生成する。
    ///
    /// タイムスタンプは秒単位のため、同じ秒・同じ prefix・同じ品質レベルでは
    /// 同一のパスになる。重複回避は行わない。
    pub fn new(
        quality_level: NonZeroU32,
        prefix: &str,
        output_dir: &Path,
        timestamp: NaiveDateTime,
    ) -> Self {
        let file_name = format!(
            "{}_{}spp_{}.{}",
            prefix,
            quality_level,
            timestamp.format("%Y%m%d_%H%M%S"),
            RAW_DUMP_EXTENSION
        );
        Self {
            quality_level,
            output_path: output_dir.join(file_name),
            prefix: prefix.to_string(),
        }
    }

    pub fn quality_level(&self) -> NonZeroU32 {
        self.quality_level
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `executable <output_path> <sample_count>` を組み立てる。
    pub fn to_command(&self, executable: &Path) -> Command {
        let mut command = Command::new(executable);
        command
            .arg(&self.output_path)
            .arg(self.quality_level.to_string());
        command
    }
}

/// 正常に完了したジョブと、その所要時間。
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    job: RenderJob,
    elapsed: Duration,
}

impl RenderResult {
    pub fn new(job: RenderJob, elapsed: Duration) -> Self {
        Self { job, elapsed }
    }

    pub fn quality_level(&self) -> NonZeroU32 {
        self.job.quality_level
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn output_path(&self) -> &Path {
        &self.job.output_path
    }

    /// 出力ファイル名 (ディレクトリ部分を除いたもの)。
    pub fn output_file_name(&self) -> String {
        self.job
            .output_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
