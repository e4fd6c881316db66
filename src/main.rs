use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use shoseki_ranking::core::ConfigProvider;
use shoseki_ranking::domain::ports::{progress_channel, ProgressReceiver};
use shoseki_ranking::utils::error::ErrorSeverity;
use shoseki_ranking::utils::{logger, validation::Validate};
use shoseki_ranking::{
    AniListLookup, BlogArticleSource, CliConfig, DateInfo, GoogleTranslator, LocalStorage,
    RankingEngine, RankingPipeline, TitleResolver, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting shoseki-ranking CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let settings = match &cli.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let period = cli.period();
    let output_file = cli.output_file();

    // 建立外部服務
    let source = BlogArticleSource::from_config(&settings).context("building blog client")?;
    let lookup = AniListLookup::from_config(&settings).context("building lookup client")?;
    let translator =
        GoogleTranslator::from_config(&settings).context("building translation client")?;
    let resolver = TitleResolver::new(lookup, translator).with_batch_size(settings.batch_size());

    let (progress_tx, progress_rx) = progress_channel();
    let progress_task = tokio::spawn(show_progress(progress_rx));

    let pipeline = RankingPipeline::new(source, resolver).with_progress(progress_tx);
    let storage = LocalStorage::new(settings.output.directory.clone());
    let engine = RankingEngine::new(pipeline, storage);

    let outcome = engine.run(cli.limit, period, &output_file).await;
    // 關閉進度通道
    drop(engine);
    let _ = progress_task.await;

    match outcome {
        Ok((result, path)) => {
            println!("✅ Done! Saved {} entries to {}", result.total_entries, path);
            print_date_summary(&result.date_info);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn show_progress(mut rx: ProgressReceiver) {
    let mut bar: Option<ProgressBar> = None;

    while let Some(event) = rx.recv().await {
        let bar = bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(event.total as u64);
            let style = ProgressStyle::default_bar()
                .template("Processing ranks [{elapsed_precise}] {bar:40} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            bar.set_style(style);
            bar
        });
        bar.set_position(event.current as u64);
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}

fn print_date_summary(info: &DateInfo) {
    let jp_date = info.jp_date.as_deref().unwrap_or("(date not found)");
    println!("JP Date: {}", jp_date);
    println!("EN Date: {}", info.en_date.as_deref().unwrap_or(jp_date));
    println!("Year: {}", info.year.as_deref().unwrap_or("?"));
    println!("Month: {}", info.month.as_deref().unwrap_or("?"));
    println!("Week: {}", info.week.as_deref().unwrap_or("?"));
}
