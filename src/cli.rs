use clap::{Parser, Subcommand};
use crate::ocr_provider::OcrProvider;
use receipt_claim_common::AmountPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "receipt-claim")]
#[command(about = "領収書OCR・予算項目照合・出来高請求ドラフト作成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 予算カタログ（json/csv/xlsx、省略時は組み込み）
    #[arg(short, long, global = true)]
    pub catalogue: Option<PathBuf>,
}

impl Cli {
    /// `--verbose` に応じたログフィルタ
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 領収書フォルダをOCR・照合してJSONを出力
    Analyze {
        /// 領収書フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/claims.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OCRプロバイダ（省略時は設定値）
        #[arg(long)]
        ocr_provider: Option<OcrProvider>,

        /// 金額の選び方 (first/largest)
        #[arg(long)]
        amount_policy: Option<AmountPolicy>,

        /// キャッシュを使用（再OCRをスキップ）
        #[arg(long)]
        use_cache: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// テキストを直接照合（OCRなし）
    Match {
        /// OCRテキスト
        text: Option<String>,

        /// テキストファイルから読み込み
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// 金額の選び方 (first/largest)
        #[arg(long)]
        amount_policy: Option<AmountPolicy>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 照合結果を対話的にレビュー
    Review {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 請求ドラフトを保存エンドポイントへ送信
    Submit {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 保存エンドポイント（省略時は設定値）
        #[arg(long)]
        endpoint: Option<String>,

        /// 未レビューの推薦も送信する
        #[arg(long)]
        all: bool,

        /// 送信せずにJSONを表示
        #[arg(long)]
        dry_run: bool,
    },

    /// 請求台帳をExcelで出力
    Export {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "claims-register")]
        title: String,
    },

    /// 予算カタログを表示・検証
    Catalogue {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 保存エンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// APIトークンを設定
        #[arg(long)]
        set_api_token: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// OCRキャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
