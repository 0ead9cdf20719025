use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use photo_critique::ai_provider::AiProvider;
use photo_critique::{cli, config, error, history, render, reviewer, scanner};
use photo_critique_common::{build_review_prompt, parse_review, split_title, ExifSummary};
use cli::{Cli, Commands};
use config::Config;
use history::{compute_file_hash, ReviewEntry, ReviewHistory};
use reviewer::Reviewer;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,photo_critique=debug,photo_critique_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("設定の読み込みに失敗しました")?;
    let provider = cli.ai_provider;

    match cli.command {
        Commands::Review { path, regenerate, json } => {
            run_review(provider, &config, &path, regenerate, json).await?;
        }

        Commands::Parse { input, json } => {
            let raw = read_input(input.as_deref())?;
            let split = split_title(&raw);
            let parsed = parse_review(&split.body);

            if json {
                let value = serde_json::json!({ "title": split.title, "review": parsed });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                if let Some(title) = &split.title {
                    println!("{}\n", title);
                }
                println!("{}", render::render_review(&parsed));
            }
        }

        Commands::Prompt { photo, exif } => {
            let summary: Option<ExifSummary> = match (exif, photo) {
                (Some(exif_path), _) => ExifSummary::load(&exif_path)
                    .with_context(|| format!("EXIFファイルを読めません: {}", exif_path.display()))?
                    .non_empty(),
                (None, Some(photo_path)) => scanner::inspect_photo(&photo_path)?.exif,
                (None, None) => None,
            };
            println!("{}", build_review_prompt(summary.as_ref()));
        }

        Commands::History { show, limit, prune, days, clear, yes } => {
            let history_path = ReviewHistory::default_path()?;
            run_history(&config, &history_path, show, limit, prune, days, clear, yes)?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  最大画像サイズ: {}MB", config.max_image_mb);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  temperature: {}", config.temperature);
                println!("  履歴表示件数: {}", config.history_limit);
                println!("  履歴保持日数: {}", config.retention_days);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

/// 写真1枚を講評（履歴にあれば再利用）
async fn review_one(
    info: &scanner::PhotoInfo,
    provider: AiProvider,
    config: &Config,
    history: &mut ReviewHistory,
    history_path: &Path,
    reviewer: &mut Option<Reviewer>,
    regenerate: bool,
) -> error::Result<ReviewEntry> {
    let photo = scanner::load_photo(info, config.max_image_bytes())?;
    let file_hash = compute_file_hash(&photo.bytes);

    if !regenerate {
        if let Some(entry) = history.find_by_hash(&file_hash) {
            tracing::info!(file = %info.file_name, id = %entry.id, "履歴の講評を使用");
            return Ok(entry.clone());
        }
    }

    // APIキーは実際に呼び出すときだけ要求する
    if reviewer.is_none() {
        *reviewer = Some(Reviewer::new(provider, config)?);
    }
    let client = reviewer.as_ref().ok_or(error::PhotoCritiqueError::MissingApiKey)?;
    let outcome = client.review(&photo).await?;

    let now = Utc::now();
    let entry = match history.find_by_hash_mut(&file_hash) {
        Some(existing) => {
            existing.apply_outcome(outcome, now);
            existing.clone()
        }
        None => {
            let entry = ReviewEntry::new(&photo, file_hash, outcome, now);
            history.insert(entry.clone());
            entry
        }
    };
    history.save(history_path)?;
    Ok(entry)
}

async fn run_review(
    provider: AiProvider,
    config: &Config,
    path: &Path,
    regenerate: bool,
    json: bool,
) -> anyhow::Result<()> {
    let photos = scanner::collect_photos(path)?;
    if photos.is_empty() {
        return Err(error::PhotoCritiqueError::NoImagesFound(path.display().to_string()).into());
    }

    let history_path = ReviewHistory::default_path()?;
    let mut history = ReviewHistory::load(&history_path);
    let mut reviewer: Option<Reviewer> = None;
    let mut failures: Vec<(PathBuf, String)> = Vec::new();
    let mut reports = Vec::new();

    let progress = if photos.len() > 1 && !json {
        println!("📸 {}枚の写真を講評します\n", photos.len());
        let pb = ProgressBar::new(photos.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    } else {
        None
    };

    for info in &photos {
        if let Some(pb) = &progress {
            pb.set_message(info.file_name.clone());
        }

        let result = review_one(
            info,
            provider,
            config,
            &mut history,
            &history_path,
            &mut reviewer,
            regenerate,
        )
        .await;

        match result {
            Ok(entry) => {
                if json {
                    reports.push(render::entry_json(&entry));
                } else {
                    let text = render::render_entry(&entry);
                    match &progress {
                        Some(pb) => pb.println(format!("{}\n", text)),
                        None => println!("{}", text),
                    }
                }
            }
            Err(e) if photos.len() > 1 => {
                tracing::warn!(file = %info.file_name, error = %e, "講評に失敗");
                failures.push((info.path.clone(), e.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if json {
        let value = if reports.len() == 1 && path.is_file() {
            reports.remove(0)
        } else {
            serde_json::Value::Array(reports)
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    if !failures.is_empty() {
        eprintln!("\n⚠ {}枚の講評に失敗しました:", failures.len());
        for (path, message) in &failures {
            eprintln!("  {}: {}", path.display(), message);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_history(
    config: &Config,
    history_path: &Path,
    show: Option<String>,
    limit: Option<usize>,
    prune: bool,
    days: Option<u64>,
    clear: bool,
    yes: bool,
) -> anyhow::Result<()> {
    if clear {
        let confirmed = yes
            || Confirm::new()
                .with_prompt("講評履歴をすべて削除しますか？")
                .default(false)
                .interact()?;
        if confirmed {
            match ReviewHistory::clear(history_path)? {
                true => println!("✔ 履歴を削除しました: {}", history_path.display()),
                false => println!("履歴ファイルが存在しません"),
            }
        }
        return Ok(());
    }

    let mut history = ReviewHistory::load(history_path);

    if prune {
        let days = days.unwrap_or(config.retention_days);
        let removed = history.prune_older_than(days, Utc::now());
        if removed > 0 {
            history.save(history_path)?;
        }
        println!("✔ {}日より古い履歴を{}件削除しました", days, removed);
        return Ok(());
    }

    if let Some(id) = show {
        let entry = history
            .get(&id)
            .ok_or_else(|| error::PhotoCritiqueError::ReviewNotFound(id.clone()))?;
        println!("{}", render::render_entry(entry));
        return Ok(());
    }

    if history.is_empty() {
        println!("講評履歴はありません");
        return Ok(());
    }

    let limit = limit.unwrap_or(config.history_limit);
    println!("講評履歴（{}件中 最新{}件）:", history.len(), limit.min(history.len()));
    for entry in history.recent(limit) {
        println!("  {}", render::render_entry_line(entry));
    }

    Ok(())
}

/// ファイルまたは標準入力から読み込む
fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("ファイルを読めません: {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
