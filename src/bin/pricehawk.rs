use clap::{Parser, Subcommand};
use std::sync::Arc;

use pricehawk::{
    star_display, BackendConfig, ComparisonSession, DashboardService, HttpBackend, Marketplace,
    Product, ReviewPaginationState, SessionPhase, StarDisplay,
};

/// PriceHawk Pro — マーケットプレイス商品比較クライアント
#[derive(Parser)]
#[command(name = "pricehawk", version, about = "Marketplace product comparison client")]
struct Cli {
    /// バックエンドのベースURLを上書き
    #[arg(long)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 商品URLを比較する（最大2件、少なくとも1件）
    Compare {
        /// Flipkartの商品ページURL
        #[arg(long, default_value = "")]
        flipkart: String,
        /// Amazonの商品ページURL
        #[arg(long, default_value = "")]
        amazon: String,
    },
    /// ダッシュボード集計を取得する
    Dashboard,
    /// デフォルト設定ファイルを書き出す
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pricehawk::utils::init_logging()?;

    let cli = Cli::parse();
    let mut config = BackendConfig::load();
    if let Some(base_url) = cli.backend {
        config.base_url = base_url;
    }

    match cli.command {
        Command::Compare { flipkart, amazon } => run_compare(&config, &flipkart, &amazon).await,
        Command::Dashboard => run_dashboard(&config).await,
        Command::InitConfig => {
            config.save()?;
            if let Some(path) = BackendConfig::config_path() {
                println!("💾 Wrote config to {}", path.display());
            }
            Ok(())
        }
    }
}

async fn run_compare(config: &BackendConfig, flipkart: &str, amazon: &str) -> anyhow::Result<()> {
    for url in [flipkart, amazon] {
        let trimmed = url.trim();
        if !trimmed.is_empty() && !pricehawk::utils::looks_like_product_url(trimmed) {
            tracing::warn!("⚠️ URL does not look like a known marketplace product page: {}", trimmed);
        }
    }

    let backend = Arc::new(HttpBackend::new(config)?);
    let session = ComparisonSession::new(backend);
    session.submit(flipkart, amazon).await;

    let state = session.state().await;
    match state.phase {
        SessionPhase::Success => {}
        SessionPhase::Error => {
            let message = state
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            anyhow::bail!(message);
        }
        // submit の完了後に Idle/Pending は到達しない
        _ => anyhow::bail!("comparison did not complete"),
    }

    let Some(result) = state.current else {
        anyhow::bail!("comparison succeeded without a result");
    };

    println!("🦅 PriceHawk comparison");
    let pagination = ReviewPaginationState::new();
    for market in [Marketplace::Flipkart, Marketplace::Amazon] {
        if let Some(product) = result.product(market) {
            print_product(market, product, &pagination);
        }
    }

    if let Some(winner) = result.winner {
        match winner.marketplace() {
            Some(market) => println!("\n🏆 Winner : {}", market.label()),
            None => println!("\n🤝 Tie — both products score equally well"),
        }
    }
    if let Some(diff) = &result.price_difference {
        println!(
            "💰 ₹{:.0} cheaper on {} ({}% savings)",
            diff.amount,
            diff.cheaper_on.label(),
            diff.percentage
        );
    }
    Ok(())
}

async fn run_dashboard(config: &BackendConfig) -> anyhow::Result<()> {
    let backend = Arc::new(HttpBackend::new(config)?);
    let service = DashboardService::new(backend);
    let snapshot = service.fetch_snapshot().await;
    if snapshot.is_degraded() {
        println!("📊 Dashboard unavailable — showing degraded snapshot");
    }
    println!("{}", serde_json::to_string_pretty(&snapshot.as_json())?);
    Ok(())
}

fn print_product(market: Marketplace, product: &Product, pagination: &ReviewPaginationState) {
    let icon = match market {
        Marketplace::Flipkart => "🛒",
        Marketplace::Amazon => "📦",
    };
    println!("\n{} {}", icon, market.label());
    if let Some(title) = &product.title {
        println!("  Title    : {}", title);
    }
    println!("  Price    : {}", product.price.as_deref().unwrap_or("N/A"));
    if let (Some(stars), Some(rating)) = (star_display(product.rating), product.rating) {
        println!("  Rating   : {} {}/5", render_stars(&stars), rating);
    }
    if let Some(score) = product.ai_score {
        println!("  AI Score : {}/100", score);
    }
    if let Some(verdict) = &product.ai_verdict {
        println!("  Verdict  : {}", verdict);
    }
    for reason in &product.ai_reasons {
        println!("    ✓ {}", reason);
    }
    if product.specs.present_count() > 0 {
        println!("  Specs    : {}/6 fields extracted", product.specs.present_count());
    }

    let total = product.reviews.len();
    let visible = pagination.visible_count(market, total);
    if total > 0 {
        println!("  Reviews  : {} (showing {})", total, visible);
        for review in product.reviews.iter().take(visible) {
            let preview: String = review.text.chars().take(70).collect();
            println!("    {:.1}/5 — {}", review.rating, preview);
        }
    }
}

fn render_stars(stars: &StarDisplay) -> String {
    let mut rendered = "★".repeat(stars.full as usize);
    if stars.has_half {
        rendered.push('½');
    }
    rendered.push_str(&"☆".repeat(stars.empty as usize));
    rendered
}
