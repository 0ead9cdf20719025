use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-critique")]
#[command(about = "写真AI講評ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (openai/claude)
    #[arg(long, default_value = "openai", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真（またはフォルダ内の写真）を講評
    Review {
        /// 写真ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 同じ写真の履歴があっても講評を作り直す
        #[arg(long)]
        regenerate: bool,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// モデル出力テキストをパース（ファイル省略時は標準入力）
    Parse {
        /// モデル出力のテキストファイル
        input: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 送信されるプロンプトを表示
    Prompt {
        /// EXIFを読み取る写真
        photo: Option<PathBuf>,

        /// EXIFサマリのJSONファイル（写真より優先）
        #[arg(long)]
        exif: Option<PathBuf>,
    },

    /// 講評履歴を表示/管理
    History {
        /// 指定IDの講評を表示（先頭一致）
        #[arg(long)]
        show: Option<String>,

        /// 表示件数（省略時は設定値）
        #[arg(short, long)]
        limit: Option<usize>,

        /// 保持期間を過ぎた履歴を削除
        #[arg(long)]
        prune: bool,

        /// 保持日数（省略時は設定値）
        #[arg(long, requires = "prune")]
        days: Option<u64>,

        /// 履歴をすべて削除
        #[arg(long)]
        clear: bool,

        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
