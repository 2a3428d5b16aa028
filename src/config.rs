//! 起動時に一度だけ解決され、各コンポーネントへ引き回される設定値。

use std::path::{Path, PathBuf};
use std::time::Duration;

/// レンダラーのビルド成果物のファイル名。
pub const EXECUTABLE_NAME: &str = "raytracer";
/// 生ピクセルダンプ (PPM) の拡張子。
pub const RAW_DUMP_EXTENSION: &str = "ppm";
/// 変換後の画像 (PNG) の拡張子。
pub const TARGET_EXTENSION: &str = "png";

/// プロジェクトのディレクトリ構成。
///
/// `build/` と `output/` はいずれもプロジェクトルートからの相対位置で固定されています。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub project_root: PathBuf,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl ProjectLayout {
    /// プロジェクトルートから `build/` と `output/` の位置を決定します。
    pub fn resolve<P: AsRef<Path>>(project_root: P) -> Self {
        let project_root = project_root.as_ref().to_path_buf();
        Self {
            build_dir: project_root.join("build"),
            output_dir: project_root.join("output"),
            project_root,
        }
    }

    /// ビルド後にレンダラーが置かれるはずのパス。
    pub fn executable_path(&self) -> PathBuf {
        self.build_dir.join(EXECUTABLE_NAME)
    }
}

/// ベンチマーク実行時の設定。
#[derive(Debug, Clone, PartialEq)]
pub struct BenchSettings {
    pub width: u32,
    pub height: u32,
    pub prefix: String,
    /// 1ジョブあたりの上限時間。`None` の場合は子プロセスの終了まで待ち続ける。
    pub job_timeout: Option<Duration>,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            prefix: "test".to_string(),
            job_timeout: None,
        }
    }
}
