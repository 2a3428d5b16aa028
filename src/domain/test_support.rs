//! テスト用の補助関数。レンダラーやビルドツールの代役となるシェルスクリプトと、
//! 変換元となる小さな PPM を用意する。

use std::fs;
use std::path::{Path, PathBuf};

/// `body` を本文とする実行可能な `/bin/sh` スクリプトを書き出す。
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{}\n", body)).expect("failed to write script");
    let mut perms = fs::metadata(path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("failed to chmod script");
    path.to_path_buf()
}

/// 第1引数のパスに 1x1 の PPM (P3) を書き出す、正常終了するレンダラー。
#[cfg(unix)]
pub const FAKE_RENDERER: &str = "printf 'P3\\n1 1\\n255\\n255 0 0\\n' > \"$1\"";

/// 2x1 の P6 (バイナリ) PPM を書き出す。
pub fn write_ppm(path: &Path) -> PathBuf {
    let mut bytes = b"P6\n2 1\n255\n".to_vec();
    bytes.extend_from_slice(&[255, 0, 0, 0, 0, 255]);
    fs::write(path, bytes).expect("failed to write ppm");
    path.to_path_buf()
}
