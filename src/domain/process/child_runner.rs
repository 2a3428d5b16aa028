//! 外部プロセスを同期的に実行し、終了を待つ。
//!
//! 子プロセスは `try_wait` でポーリングされ、タイムアウトまたはキャンセルが
//! 検出された時点で kill され、回収 (wait) されてから呼び出し元に戻る。

use super::cancellation::CancellationToken;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 1回のジョブ実行で発生しうるエラー。
#[derive(Debug, Error)]
pub enum JobError {
    #[error("executable not found: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    #[error("process exited with {0}")]
    NonZeroExit(ExitStatus),

    #[error("process did not finish within {after:?} and was killed")]
    Timeout { after: Duration },

    #[error("process was cancelled")]
    Cancelled,

    #[error("process succeeded but left no output at {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for process: {0}")]
    Wait(#[source] io::Error),
}

/// 子プロセスの待機条件。
#[derive(Debug, Clone, Default)]
pub struct RunLimits {
    /// 上限時間。`None` なら終了するまで待ち続ける。
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
}

impl RunLimits {
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// `command` を起動し、終了ステータスを返します。
///
/// 終了コードが 0 以外でも `Ok` を返すため、成否の判定は呼び出し側で行います。
///
/// # 戻り値
/// * `Ok(ExitStatus)`: 子プロセスが自ら終了した場合。
/// * `Err(JobError::ExecutableNotFound)`: 実行ファイルが見つからない場合。
/// * `Err(JobError::Timeout)` / `Err(JobError::Cancelled)`: 打ち切った場合。子プロセスは回収済み。
pub fn run_to_completion(command: &mut Command, limits: &RunLimits) -> Result<ExitStatus, JobError> {
    if limits.cancel.is_cancelled() {
        return Err(JobError::Cancelled);
    }

    let program = PathBuf::from(command.get_program());
    debug!(program = %program.display(), "spawning process");
    let mut child = command.spawn().map_err(|source| spawn_error(&program, source))?;

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(JobError::Wait)? {
            return Ok(status);
        }
        if limits.cancel.is_cancelled() {
            warn!(program = %program.display(), "cancelling process");
            terminate(&mut child)?;
            return Err(JobError::Cancelled);
        }
        if let Some(timeout) = limits.timeout {
            if started.elapsed() >= timeout {
                warn!(program = %program.display(), ?timeout, "process timed out");
                terminate(&mut child)?;
                return Err(JobError::Timeout { after: timeout });
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// スクリプトのインタプリタが無い場合も `NotFound` になるため、
/// パス指定のプログラムが実在するなら元の I/O エラーを残す。
fn spawn_error(program: &Path, source: io::Error) -> JobError {
    let is_path = program.components().count() > 1;
    if source.kind() == io::ErrorKind::NotFound && !(is_path && program.exists()) {
        JobError::ExecutableNotFound(program.to_path_buf())
    } else {
        JobError::Spawn {
            program: program.to_path_buf(),
            source,
        }
    }
}

fn terminate(child: &mut Child) -> Result<ExitStatus, JobError> {
    if let Some(status) = child.try_wait().map_err(JobError::Wait)? {
        return Ok(status);
    }
    // 既に終了していれば kill は失敗するが、続く wait で回収できる
    let _ = child.kill();
    child.wait().map_err(JobError::Wait)
}
