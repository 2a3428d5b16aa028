use super::path_error::PathError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// 存在が確認済みのディレクトリ
#[derive(Debug)]
pub struct DirectoryPath {
    pub path: PathBuf,
}

impl DirectoryPath {
    // コンストラクタ: パスが存在し、ディレクトリであることを検証する
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PathError::InvalidPath(format!(
                "'{}' does not exist",
                path.display()
            )));
        }
        if !path.is_dir() {
            return Err(PathError::InvalidPath(format!(
                "'{}' is not a directory",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// ディレクトリが無ければ作成してから検証する。既に存在していても成功する。
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        fs::create_dir_all(path.as_ref()).map_err(PathError::IoError)?;
        Self::new(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// 直下にある、指定拡張子 (大文字小文字を区別しない) のファイルを列挙する。
    ///
    /// サブディレクトリは辿らない。並び順はファイルシステムの列挙順のままで、
    /// 呼び出し側は順序に依存してはならない。
    pub fn files_with_extension(&self, extension: &str) -> Result<Vec<PathBuf>, PathError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| PathError::IoError(e.into()))?;
            let path = entry.path();
            // `file_stem` がないドットファイル (`.ppm` 単体など) は対象外。
            // シンボリックリンクはリンク先が通常ファイルなら含める
            if path.is_file()
                && path.file_stem().is_some()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl fmt::Display for DirectoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
