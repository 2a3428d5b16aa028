use std::fmt;
use std::path::Path;
use std::process::Command;

/// ビルドの段階。エラー報告とログで使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Configure,
    Compile,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStage::Configure => write!(f, "configure"),
            BuildStage::Compile => write!(f, "compile"),
        }
    }
}

/// ビルドディレクトリ内で実行する外部コマンド1つ分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `working_dir` をカレントにした `Command` を組み立てる。
    pub fn to_command(&self, working_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(working_dir);
        command
    }
}

/// 構成 → コンパイルの2段階からなる外部ビルド手順。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPipeline {
    pub configure: BuildCommand,
    pub compile: BuildCommand,
}

impl BuildPipeline {
    pub fn command_for(&self, stage: BuildStage) -> &BuildCommand {
        match stage {
            BuildStage::Configure => &self.configure,
            BuildStage::Compile => &self.compile,
        }
    }
}

impl Default for BuildPipeline {
    /// `cmake ..` の後に `make`。どちらもビルドディレクトリで実行される。
    fn default() -> Self {
        Self {
            configure: BuildCommand::new("cmake", &[".."]),
            compile: BuildCommand::new("make", &[]),
        }
    }
}
