use anyhow::Context;

use super::token_service;
use crate::cli::PublishArgs;
use crate::config::AppConfig;
use crate::core::content::{ArticleWriter, RandomTopicGenerator, StyledHtmlRenderer};
use crate::core::history::HistoryGuard;
use crate::core::publishing::{
    parse_labels, PublishReport, PublishRequest, PublishService, RunOutcome,
};
use crate::core::tokens::RefreshOutcome;
use crate::infra::ai::GeminiClient;
use crate::infra::google::BloggerClient;
use crate::infra::storage::JsonHistoryStore;

pub async fn run(args: PublishArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Publishing is not configured")?;
    let service = build_service(&config);

    let request = PublishRequest {
        topic: args.topic,
        labels: args.labels.as_deref().map(parse_labels),
        auto_mode: args.auto,
    };

    println!("🚀 Starting blog publish run...");
    match service.run(&request).await? {
        RunOutcome::Published(report) => print_report(&report),
        RunOutcome::Skipped { posts_today } => {
            println!(
                "⏭️  Already published {} post(s) today (limit {}). Nothing to do.",
                posts_today, config.max_posts_per_day
            );
        }
    }

    Ok(())
}

fn build_service(config: &AppConfig) -> PublishService {
    let http = reqwest::Client::new();

    let writer = ArticleWriter::new(GeminiClient::new(
        http.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    let guard = HistoryGuard::new(config.calendar, config.max_posts_per_day)
        .with_retry_delay(config.topic_retry_delay);

    PublishService::new(
        token_service(&config.auth, http.clone()),
        Box::new(JsonHistoryStore::new(&config.history_file)),
        Box::new(writer),
        Box::new(StyledHtmlRenderer),
        Box::new(BloggerClient::new(http, config.blog_id.clone())),
        Box::new(RandomTopicGenerator::new()),
        guard,
    )
}

fn print_report(report: &PublishReport) {
    println!("✅ Published: {}", report.title);
    if let Some(url) = &report.url {
        println!("   🔗 {}", url);
    }
    println!("   🏷️  {}", report.labels.join(", "));

    if !report.selection.is_unique() {
        println!(
            "   ⚠️  No unique topic after {} attempts; it may repeat a recent post.",
            report.selection.attempts()
        );
    }
    if report.used_placeholder {
        println!("   ⚠️  Content generation failed; a placeholder article was posted.");
    }
    if let RefreshOutcome::Failed(reason) = &report.refresh {
        println!("   ⚠️  Token refresh failed ({}); the stored token was used.", reason);
    }
    if !report.history_saved {
        println!("   ⚠️  Post history could not be saved; check the logs.");
    }
}
