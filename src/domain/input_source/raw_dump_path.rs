use super::path_error::PathError;
use crate::config::TARGET_EXTENSION;
use std::fmt;
use std::path::{Path, PathBuf};

/// レンダラーが書き出した生ピクセルダンプへのパスを表現し、その存在を保証する構造体。
///
/// 拡張子は検証しない。実際のフォーマットはデコード時にファイル先頭から判定される。
#[derive(Debug, Clone)]
pub struct RawDumpPath(PathBuf);

impl RawDumpPath {
    // --- Public Methods ---

    /// 新しい `RawDumpPath` インスタンスを生成する。
    ///
    /// パスが存在し、かつ通常ファイルであることを検証する。
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PathError::InvalidPath(format!(
                "'{}' does not exist",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(PathError::InvalidPath(format!(
                "'{}' is not a file",
                path.display()
            )));
        }
        Ok(Self(path.to_path_buf()))
    }

    /// 内部の `Path` への参照を返す。
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// 変換後の画像の出力先を決定する。
    ///
    /// `target_dir` が `None` の場合はダンプと同じディレクトリに置く。
    pub fn target_path(&self, target_dir: Option<&Path>) -> PathBuf {
        target_path_for(&self.0, target_dir)
    }
}

/// `source` の最後の拡張子を PNG のものに置き換えたファイル名を `target_dir` 内に作る。
///
/// `source` の存在は問わない。
pub fn target_path_for(source: &Path, target_dir: Option<&Path>) -> PathBuf {
    let dir = match target_dir {
        Some(dir) => dir.to_path_buf(),
        // 相対パスのファイル名単体なら空パス (カレント) になる
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(TARGET_EXTENSION);
    dir.join(file_name)
}

impl fmt::Display for RawDumpPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
