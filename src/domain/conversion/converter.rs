// use宣言：必要なクレートやモジュールをスコープに取り込む

use crate::domain::input_source::raw_dump_path::RawDumpPath;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// PNG ファイル先頭の8バイト。
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// --- エラー定義 ---

/// 1ファイル分の変換エラー。バッチ全体は中断させない。
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("could not decode {}: {source}", path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("could not encode {}: {source}", path.display())]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("could not write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// --- public な関数 ---

/// 生ピクセルダンプを PNG に変換します。
///
/// フォーマットは拡張子ではなくファイルの内容から判定します。
/// 出力先は `target_dir` (省略時は変換元と同じディレクトリ) に、変換元と同じベース名で作られます。
/// エンコードはメモリ上で完了させてから書き込むため、失敗時に壊れた出力は残りません。
///
/// # 戻り値
/// * `Ok(PathBuf)`: 書き出した PNG のパス。
/// * `Err(ConversionError)`: 失敗した場合。`"Error converting <source>: <details>"` をログに出力済み。
pub fn convert(source: &Path, target_dir: Option<&Path>) -> Result<PathBuf, ConversionError> {
    match convert_file(source, target_dir) {
        Ok(target) => {
            info!("Converted: {} -> {}", source.display(), target.display());
            Ok(target)
        }
        Err(e) => {
            error!("Error converting {}: {}", source.display(), e);
            Err(e)
        }
    }
}

// --- private なヘルパー関数 ---

fn convert_file(source: &Path, target_dir: Option<&Path>) -> Result<PathBuf, ConversionError> {
    let raw = RawDumpPath::new(source)
        .map_err(|_| ConversionError::SourceNotFound(source.to_path_buf()))?;
    let target = raw.target_path(target_dir);

    let image = decode(raw.as_path())?;
    let bytes = encode_png(&image).map_err(|source| ConversionError::EncodeFailed {
        path: target.clone(),
        source,
    })?;

    if let Err(source) = fs::write(&target, &bytes) {
        // 途中まで書かれたファイルを残さない
        let _ = fs::remove_file(&target);
        return Err(ConversionError::WriteFailed {
            path: target,
            source,
        });
    }
    Ok(target)
}

/// ファイル先頭のマジックナンバーからフォーマットを判定してデコードする。
fn decode(path: &Path) -> Result<DynamicImage, ConversionError> {
    let decode_failed = |source: ImageError| ConversionError::DecodeFailed {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_failed(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_failed)
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

// --- テストモジュール ---
