use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use receipt_claim_common::{detect_milestones, extract_amount, BudgetMatcher};
use receipt_claim_rust::{analyzer, catalogue, cli, config, error, export, ocr, review, scanner, submit};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 診断ログは標準エラーへ（RUST_LOG があればそちらを優先）
fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_directive());
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { folder, output, ocr_provider, amount_policy, use_cache, recursive } => {
            println!("🧾 receipt-claim - 領収書解析\n");

            let catalogue = catalogue::load_catalogue(cli.catalogue.as_deref())?;
            let matcher = BudgetMatcher::new(config.match_rules());

            // 1. スキャン
            println!("[1/3] 領収書をスキャン中...");
            let receipts = scanner::scan_folder(&folder, recursive)?;
            println!("✔ {}件の領収書を検出\n", receipts.len());

            if receipts.is_empty() {
                return Err(error::ReceiptClaimError::NoReceiptsFound(folder.display().to_string()));
            }

            // 2. OCR
            let options = ocr::OcrOptions {
                provider: ocr_provider.unwrap_or(config.ocr_provider),
                language: config.ocr_language.clone(),
                timeout: Duration::from_secs(config.ocr_timeout_seconds.max(1)),
            };
            println!(
                "[2/3] OCR中 ({})...{}",
                options.provider,
                if use_cache { " (キャッシュ有効)" } else { "" }
            );

            let progress = if cli.verbose {
                ProgressBar::hidden()
            } else {
                let pb = ProgressBar::new(receipts.len() as u64);
                if let Ok(style) = ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}") {
                    pb.set_style(style);
                }
                pb
            };

            let mut cache = use_cache.then(|| ocr::cache::OcrCache::load(&folder));
            let outcomes = ocr::extract_texts(&receipts, &options, cache.as_mut(), &progress).await;
            progress.finish_and_clear();

            if let Some(cache) = &cache {
                cache.save(&folder)?;
            }

            let failed = outcomes.iter().filter(|o| o.text.is_err()).count();
            let cached = outcomes.iter().filter(|o| o.cached).count();
            println!("✔ OCR完了 (失敗 {}件, キャッシュ {}件)\n", failed, cached);

            // 3. 照合
            println!("[3/3] 予算項目照合中...");
            let ctx = analyzer::AnalysisContext {
                catalogue: &catalogue,
                matcher: &matcher,
                amount_policy: amount_policy.unwrap_or(config.amount_policy),
            };
            let analyses = analyzer::analyze_outcomes(&outcomes, &ctx);
            let matched = analyses.iter().filter(|a| a.is_matched()).count();
            println!("✔ {}件中{}件に推薦あり\n", analyses.len(), matched);

            let output = output.unwrap_or_else(|| folder.join("claims.json"));
            analyzer::save_analyses(&output, &analyses)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 解析完了");
        }

        Commands::Match { text, file, amount_policy, json } => {
            let text = match (text, file) {
                (Some(t), _) => t,
                (None, Some(path)) => std::fs::read_to_string(&path)?,
                (None, None) => {
                    return Err(error::ReceiptClaimError::CliExecution(
                        "テキストまたは --file を指定してください".into(),
                    ))
                }
            };

            let catalogue = catalogue::load_catalogue(cli.catalogue.as_deref())?;
            let matcher = BudgetMatcher::new(config.match_rules());
            let ctx = analyzer::AnalysisContext {
                catalogue: &catalogue,
                matcher: &matcher,
                amount_policy: amount_policy.unwrap_or(config.amount_policy),
            };
            let analysis = analyzer::analyze_text("<input>", &text, &ctx);

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                match &analysis.line_name {
                    Some(name) => println!("推薦: {} (スコア {})", name, analysis.confidence),
                    None => println!("推薦: なし"),
                }
                for alt in &analysis.alternatives {
                    println!("  候補: {} (スコア {})", alt.line_name, alt.score);
                }
                match extract_amount(&text, ctx.amount_policy) {
                    Some(amount) => println!("金額: ${:.2} ({})", amount, ctx.amount_policy),
                    None => println!("金額: なし"),
                }
                for m in detect_milestones(&text) {
                    println!("工程: {} ({}%)", m.milestone, m.confidence);
                }
            }
        }

        Commands::Review { input, output } => {
            println!("🔍 receipt-claim - レビュー\n");
            let catalogue = catalogue::load_catalogue(cli.catalogue.as_deref())?;
            review::run_interactive_review(&input, output.as_deref(), &catalogue)?;
        }

        Commands::Submit { input, endpoint, all, dry_run } => {
            println!("📤 receipt-claim - ドラフト送信\n");

            let catalogue = catalogue::load_catalogue(cli.catalogue.as_deref())?;
            let analyses = analyzer::load_analyses(&input)?;
            let drafts = submit::build_drafts(&analyses, &catalogue, all);

            if drafts.is_empty() {
                println!("送信対象のドラフトがありません（--all で未レビューも対象）");
                return Ok(());
            }

            let missing_amount = drafts.iter().filter(|d| d.draft.needs_amount()).count();
            if missing_amount > 0 {
                println!("⚠ 金額未入力のドラフト: {}件（0として送信）", missing_amount);
            }

            if dry_run {
                for d in &drafts {
                    println!("# {}", d.file_name);
                    println!("{}", serde_json::to_string_pretty(&d.draft)?);
                }
                println!("\n(dry-run) {}件", drafts.len());
                return Ok(());
            }

            let endpoint = match endpoint {
                Some(e) => e,
                None => config.endpoint()?.to_string(),
            };
            let submitter = submit::DraftSubmitter::new(
                &endpoint,
                config.api_token(),
                Duration::from_secs(config.timeout_seconds),
            )?;

            let summary = submitter.submit_all(&drafts).await;
            println!("✔ 保存: {}件", summary.saved.len());
            for (file_name, e) in &summary.failed {
                println!("✘ {}: {}", file_name, e);
            }

            if summary.failed.is_empty() {
                println!("\n✅ 送信完了");
            } else {
                return Err(error::ReceiptClaimError::SaveFailed(format!(
                    "{}件の保存に失敗しました",
                    summary.failed.len()
                )));
            }
        }

        Commands::Export { input, output, title } => {
            println!("📄 receipt-claim - エクスポート\n");

            let catalogue = catalogue::load_catalogue(cli.catalogue.as_deref())?;
            let analyses = analyzer::load_analyses(&input)?;
            let output_dir = output.unwrap_or_else(|| {
                input.parent().map(|p| p.to_path_buf()).unwrap_or_else(|| std::path::PathBuf::from("."))
            });
            export::export_register(&analyses, &catalogue, &output_dir, &title)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Catalogue { json } => {
            let catalogue = catalogue::load_catalogue(cli.catalogue.as_deref())?;
            if json {
                println!("{}", catalogue.to_json()?);
            } else {
                println!("予算カタログ: {}件", catalogue.len());
                for line in catalogue.lines() {
                    println!(
                        "  {:>4}  {:<28} {:<12} {:<10} ${:>10.2} / ${:>10.2}",
                        line.id, line.name, line.keyword, line.category, line.remaining, line.amount
                    );
                }
            }
        }

        Commands::Config { set_endpoint, set_api_token, show } => {
            let mut config = config;

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ 保存エンドポイントを設定しました");
            }

            if let Some(token) = set_api_token {
                config.set_api_token(token)?;
                println!("✔ APIトークンを設定しました");
            }

            if show {
                println!("設定:");
                println!("  保存エンドポイント: {}", config.save_endpoint.as_deref().unwrap_or("未設定"));
                println!("  APIトークン: {}", if config.api_token().is_some() { "設定済み" } else { "未設定" });
                println!("  OCR: {} ({})", config.ocr_provider, config.ocr_language);
                println!("  金額の選び方: {}", config.amount_policy);
                println!("  タイムアウト: HTTP {}秒 / OCR {}秒", config.timeout_seconds, config.ocr_timeout_seconds);
                println!("  追加ブースト: {}件", config.extra_boosts.len());
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = ocr::cache::OcrCache::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = ocr::cache::OcrCache::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match ocr::cache::OcrCache::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
