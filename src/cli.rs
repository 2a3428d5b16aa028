use clap::{Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// build/ と output/ を含むプロジェクトのルート
    #[arg(long, global = true, env = "RT_BENCH_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// デバッグログを出力する
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// レンダラーを品質レベルごとに実行し、所要時間を表示する
    Bench(BenchArgs),
    /// 生ピクセルダンプ (PPM) を PNG に変換する
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
pub struct BenchArgs {
    /// 実行する品質レベル (spp)。省略時は 1, 4, 16, 64 を順に実行する
    pub samples: Option<NonZeroU32>,

    /// 1回のレンダリングの上限秒数 (オプション: デフォルトは無制限)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// 出力ファイル名の接頭辞
    #[arg(long, default_value = "test")]
    pub prefix: String,

    /// 画像の幅。ログに記録するのみで、レンダラーには渡されない
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// 画像の高さ。ログに記録するのみで、レンダラーには渡されない
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// 変換するファイル (オプション: 省略時は output/ 内のすべての .ppm)
    pub files: Vec<PathBuf>,

    /// PNGの出力先フォルダ (オプション: デフォルトは output/)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
