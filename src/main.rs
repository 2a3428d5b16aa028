mod cli;
mod workflow;

use clap::Parser;
use std::io::IsTerminal;
use rt_bench::error::AppError;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    // コマンドライン引数を解析します
    let args = cli::Args::parse();
    init_tracing(args.verbose);

    match workflow::run(args) {
        // ビルドできなかった場合も終了コードは変えず、報告だけ行う
        Err(AppError::Benchmark(e)) => {
            error!("{}", e);
            Ok(())
        }
        other => other,
    }
}

/// `RUST_LOG` が設定されていればそれを優先する。
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "rt_bench=debug"
    } else {
        "rt_bench=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
