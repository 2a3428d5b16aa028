use super::converter::convert;
use crate::config::RAW_DUMP_EXTENSION;
use crate::domain::input_source::directory_path::DirectoryPath;
use crate::domain::input_source::raw_dump_path::target_path_for;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 変換1件分の入力。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    pub source_path: PathBuf,
    /// `None` なら変換元と同じディレクトリに出力する。
    pub target_dir: Option<PathBuf>,
}

/// 変換1件分の結果。失敗時の `target_path` は書き出す予定だったパス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub success: bool,
}

/// バッチ変換の集計。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub results: Vec<ConversionResult>,
    /// 明示的に指定されたが存在しなかったファイル。
    pub not_found: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}

impl ConversionTask {
    /// 変換を実行する。エラーはログに出力済みなので、ここでは成否のみを残す。
    pub fn run(&self) -> ConversionResult {
        let outcome = convert(&self.source_path, self.target_dir.as_deref());
        let target_path = match &outcome {
            Ok(target) => target.clone(),
            Err(_) => self.planned_target(),
        };
        ConversionResult {
            source_path: self.source_path.clone(),
            target_path,
            success: outcome.is_ok(),
        }
    }

    fn planned_target(&self) -> PathBuf {
        target_path_for(&self.source_path, self.target_dir.as_deref())
    }
}

/// 複数の生ピクセルダンプをまとめて PNG に変換します。
///
/// `explicit_sources` が空でなければ、その中で存在するものだけを変換します。
/// 空であれば `default_dir` 直下の `*.ppm` を探して変換します。見つからなければ何も書き込みません。
/// 出力先はどちらの場合も `target_dir` (省略時は `default_dir`) です。
///
/// 1件の失敗でバッチは止まりません。
pub fn convert_batch(
    explicit_sources: &[PathBuf],
    default_dir: &Path,
    target_dir: Option<&Path>,
) -> BatchSummary {
    let target_dir = target_dir.unwrap_or(default_dir);
    let mut summary = BatchSummary::default();

    let sources = if explicit_sources.is_empty() {
        let found = discover(default_dir);
        if found.is_empty() {
            info!("No PPM files found in {}", default_dir.display());
            return summary;
        }
        println!("Converting {} PPM files...", found.len());
        found
    } else {
        let (existing, missing): (Vec<PathBuf>, Vec<PathBuf>) =
            explicit_sources.iter().cloned().partition(|p| p.exists());
        for path in &missing {
            warn!("File not found: {}", path.display());
        }
        summary.not_found = missing;
        existing
    };
    if sources.is_empty() {
        return summary;
    }

    // 書き込みに失敗した場合は各ファイルの変換エラーとして報告される
    if let Err(e) = DirectoryPath::create(target_dir) {
        error!("could not create {}: {}", target_dir.display(), e);
    }

    for source_path in sources {
        let task = ConversionTask {
            source_path,
            target_dir: Some(target_dir.to_path_buf()),
        };
        summary.results.push(task.run());
    }

    println!(
        "Conversion finished: {} of {} succeeded. PNG files saved in {}",
        summary.succeeded(),
        summary.attempted(),
        target_dir.display()
    );
    summary
}

fn discover(dir: &Path) -> Vec<PathBuf> {
    let Ok(dir) = DirectoryPath::new(dir) else {
        return Vec::new();
    };
    match dir.files_with_extension(RAW_DUMP_EXTENSION) {
        Ok(files) => files,
        Err(e) => {
            error!("could not list {}: {}", dir, e);
            Vec::new()
        }
    }
}
