use super::pipeline::{BuildPipeline, BuildStage};
use crate::config::ProjectLayout;
use crate::domain::input_source::directory_path::DirectoryPath;
use crate::domain::input_source::path_error::PathError;
use crate::domain::process::{run_to_completion, JobError, RunLimits};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tracing::{error, info};

/// レンダラーのビルドに関するエラー。いずれもベンチマーク全体を中止させる。
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("configure stage failed with {0}")]
    ConfigureFailed(ExitStatus),

    #[error("compile stage failed with {0}")]
    CompileFailed(ExitStatus),

    #[error("build finished but the executable is still missing: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("could not prepare build directory: {0}")]
    CreateBuildDir(#[source] PathError),

    #[error("could not run {stage} command `{program}`: {source}")]
    Spawn {
        stage: BuildStage,
        program: String,
        #[source]
        source: JobError,
    },
}

/// `ensure_executable` がどちらの経路で成功したか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// 既に存在していたため何もしなかった。
    AlreadyPresent,
    /// ビルドを実行して生成した。
    Built,
}

/// レンダラーの実行ファイルが存在することを保証します。
///
/// 存在して実行可能であれば副作用なしで即座に成功します。
/// そうでなければビルドディレクトリを作成し、構成とコンパイルを順に実行した後に再確認します。
/// リトライは行いません。
///
/// # 戻り値
/// * `Ok(BuildOutcome)`: 実行ファイルが利用可能な場合。
/// * `Err(BuildError)`: いずれかの段階が失敗した、またはビルド後も実行ファイルが無い場合。
pub fn ensure_executable(
    layout: &ProjectLayout,
    pipeline: &BuildPipeline,
) -> Result<BuildOutcome, BuildError> {
    let executable = layout.executable_path();
    if is_executable(&executable) {
        return Ok(BuildOutcome::AlreadyPresent);
    }

    info!(executable = %executable.display(), "executable not found, building project");
    let build_dir = DirectoryPath::create(&layout.build_dir).map_err(BuildError::CreateBuildDir)?;

    for stage in [BuildStage::Configure, BuildStage::Compile] {
        let status = run_stage(stage, pipeline, build_dir.as_path())?;
        if !status.success() {
            error!(%stage, %status, "build stage failed");
            return Err(match stage {
                BuildStage::Configure => BuildError::ConfigureFailed(status),
                BuildStage::Compile => BuildError::CompileFailed(status),
            });
        }
    }

    if !is_executable(&executable) {
        error!(executable = %executable.display(), "build did not produce the executable");
        return Err(BuildError::ArtifactMissing(executable));
    }
    info!(executable = %executable.display(), "build finished");
    Ok(BuildOutcome::Built)
}

fn run_stage(
    stage: BuildStage,
    pipeline: &BuildPipeline,
    build_dir: &Path,
) -> Result<ExitStatus, BuildError> {
    let step = pipeline.command_for(stage);
    info!(%stage, program = %step.program, args = ?step.args, "running build stage");

    let mut command = step.to_command(build_dir);
    command.stdin(Stdio::null());
    // ビルドには上限時間を設けない
    run_to_completion(&mut command, &RunLimits::default()).map_err(|source| BuildError::Spawn {
        stage,
        program: step.program.clone(),
        source,
    })
}

/// 通常ファイルであり、かつ (Unix では) 実行権限があるかどうか。
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::build::BuildCommand;
    use crate::domain::test_support::{write_script, FAKE_RENDERER};
    use std::fs;
    use tempfile::tempdir;

    fn pipeline(configure: &str, compile: &[&str]) -> BuildPipeline {
        BuildPipeline {
            configure: BuildCommand::new(configure, &[]),
            compile: BuildCommand::new(compile[0], &compile[1..]),
        }
    }

    #[test]
    fn present_executable_skips_build() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());
        fs::create_dir_all(&layout.build_dir).unwrap();
        write_script(&layout.executable_path(), FAKE_RENDERER);

        // 失敗するビルド手順を渡しても実行されないこと
        let outcome = ensure_executable(&layout, &pipeline("false", &["false"])).unwrap();
        assert_eq!(outcome, BuildOutcome::AlreadyPresent);
    }

    #[test]
    fn configure_failure_stops_before_compile() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());
        let marker = root.path().join("compiled");
        let compile = format!("touch {}", marker.display());

        let err = ensure_executable(&layout, &pipeline("false", &["sh", "-c", &compile]))
            .unwrap_err();

        assert!(matches!(err, BuildError::ConfigureFailed(status) if !status.success()));
        assert!(layout.build_dir.is_dir(), "build dir should be created");
        assert!(!marker.exists(), "compile stage must not run");
    }

    #[test]
    fn compile_failure_is_reported() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());

        let err = ensure_executable(&layout, &pipeline("true", &["false"])).unwrap_err();
        assert!(matches!(err, BuildError::CompileFailed(status) if status.code() == Some(1)));
    }

    #[test]
    fn successful_stages_without_artifact_are_a_hard_failure() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());

        let err = ensure_executable(&layout, &pipeline("true", &["true"])).unwrap_err();
        match err {
            BuildError::ArtifactMissing(path) => assert_eq!(path, layout.executable_path()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn non_executable_file_triggers_build() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());
        fs::create_dir_all(&layout.build_dir).unwrap();
        fs::write(layout.executable_path(), "not runnable").unwrap();

        let err = ensure_executable(&layout, &pipeline("true", &["true"])).unwrap_err();
        assert!(matches!(err, BuildError::ArtifactMissing(_)));
    }

    #[test]
    fn compile_stage_producing_artifact_succeeds() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());
        // コンパイル段階はビルドディレクトリで実行されるため相対パスで書き出せる
        let compile = "printf '#!/bin/sh\\n' > raytracer && chmod +x raytracer";

        let outcome = ensure_executable(&layout, &pipeline("true", &["sh", "-c", compile])).unwrap();

        assert_eq!(outcome, BuildOutcome::Built);
        assert!(is_executable(&layout.executable_path()));
    }

    #[test]
    fn unrunnable_build_tool_message_names_the_cause() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());
        let not_a_program = root.path().to_str().unwrap();

        let err = ensure_executable(&layout, &pipeline(not_a_program, &["true"])).unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("could not run configure command"), "{}", message);
        assert!(message.contains("Permission denied"), "{}", message);
    }

    #[test]
    fn missing_build_tool_is_a_spawn_error() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::resolve(root.path());

        let err = ensure_executable(&layout, &pipeline("/no/such/cmake", &["true"])).unwrap_err();
        match err {
            BuildError::Spawn { stage, source, .. } => {
                assert_eq!(stage, BuildStage::Configure);
                assert!(matches!(source, JobError::ExecutableNotFound(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
