//! Analytics report commands.

use clap::{Args, Subcommand};
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use newsroom_core::error::AppError;
use newsroom_core::types::ReportParams;
use newsroom_service::AnalyticsEngine;

/// Arguments for report commands
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report to run
    #[command(subcommand)]
    pub command: ReportCommand,

    /// Trailing window in days (defaults to analytics.default_window_days)
    #[arg(long, global = true)]
    pub days: Option<u32>,

    /// Maximum rows (newsletter comparison only)
    #[arg(long, global = true)]
    pub limit: Option<u32>,
}

impl ReportArgs {
    /// The window and limit as the engine takes them.
    pub fn params(&self) -> ReportParams {
        ReportParams {
            days: self.days,
            limit: self.limit,
        }
    }
}

/// Report subcommands
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Delivery, open, click-through and bounce rates with a composite score
    Health,
    /// Daily new and unsubscribed counts
    Growth,
    /// Top sources, category clicks and content freshness
    Content,
    /// Most recent sent newsletters side by side
    Newsletters,
    /// Subscriber and article reach with newsletter averages
    Overview,
    /// Country, city, audience and company size rollups
    Audience,
}

#[derive(Debug, Tabled)]
struct GrowthRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "New")]
    new_subscribers: i64,
    #[tabled(rename = "Unsubscribed")]
    unsubscribed: i64,
    #[tabled(rename = "Net")]
    net: i64,
}

#[derive(Debug, Tabled)]
struct SourceRow {
    #[tabled(rename = "Source")]
    name: String,
    #[tabled(rename = "Clicks")]
    clicks: i64,
    #[tabled(rename = "Reliability")]
    reliability: u32,
}

#[derive(Debug, Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Clicks")]
    clicks: i64,
}

#[derive(Debug, Tabled)]
struct NewsletterRow {
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Sent")]
    sent_at: String,
    #[tabled(rename = "Recipients")]
    recipients: i64,
    #[tabled(rename = "Open %")]
    open_rate: f64,
    #[tabled(rename = "Click %")]
    click_rate: f64,
    #[tabled(rename = "Score")]
    score: u32,
}

#[derive(Debug, Tabled)]
struct SegmentRow {
    #[tabled(rename = "Segment")]
    label: String,
    #[tabled(rename = "Subscribers")]
    subscribers: i64,
    #[tabled(rename = "%")]
    percentage: String,
    #[tabled(rename = "Open %")]
    open_rate: String,
    #[tabled(rename = "Click %")]
    click_rate: String,
    #[tabled(rename = "Avg engagement")]
    avg_engagement: String,
}

impl SegmentRow {
    fn new(label: impl Into<String>, subscribers: i64) -> Self {
        Self {
            label: label.into(),
            subscribers,
            percentage: "-".to_string(),
            open_rate: "-".to_string(),
            click_rate: "-".to_string(),
            avg_engagement: "-".to_string(),
        }
    }
}

/// Execute report commands
pub async fn execute(
    args: &ReportArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (pool, engine) = super::create_engine(config_path).await?;
    let result = run(args, &engine, format).await;
    pool.close().await;
    result
}

async fn run(
    args: &ReportArgs,
    engine: &AnalyticsEngine,
    format: OutputFormat,
) -> Result<(), AppError> {
    let params = args.params();

    match &args.command {
        ReportCommand::Health => {
            let window = params.window(engine.config())?;
            let health = engine.health(window).await?;
            if format == OutputFormat::Json {
                return output::print_json(&health);
            }
            output::print_heading(&format!("System health ({} days)", window.len_days()));
            output::print_kv("Score", health.score);
            output::print_kv("Delivery rate", format!("{:.2}%", health.delivery_rate));
            output::print_kv("Open rate", format!("{:.2}%", health.open_rate));
            output::print_kv("Click-through rate", format!("{:.2}%", health.click_through_rate));
            output::print_kv("Bounce rate", format!("{:.2}%", health.bounce_rate));
        }
        ReportCommand::Growth => {
            let window = params.window(engine.config())?;
            let series = engine.growth(window.len_days()).await?;
            if format == OutputFormat::Json {
                return output::print_json(&series);
            }
            let rows: Vec<GrowthRow> = series
                .iter()
                .map(|p| GrowthRow {
                    date: p.date.to_string(),
                    new_subscribers: p.new_subscribers,
                    unsubscribed: p.unsubscribed,
                    net: p.net_growth,
                })
                .collect();
            output::print_table(&rows);
        }
        ReportCommand::Content => {
            let window = params.window(engine.config())?;
            let report = engine.content_intelligence(window).await?;
            if format == OutputFormat::Json {
                return output::print_json(&report);
            }
            output::print_heading("Top sources");
            let sources: Vec<SourceRow> = report
                .top_sources
                .iter()
                .map(|s| SourceRow {
                    name: s.name.clone(),
                    clicks: s.clicks,
                    reliability: s.reliability,
                })
                .collect();
            output::print_table(&sources);
            output::print_heading("Categories");
            print_categories(&report.category_trends);
            output::print_kv("Avg freshness (days)", report.avg_freshness_days);
        }
        ReportCommand::Newsletters => {
            let limit = params.limit(engine.config())?;
            let rows = engine.compare_newsletters(limit).await?;
            if format == OutputFormat::Json {
                return output::print_json(&rows);
            }
            let rows: Vec<NewsletterRow> = rows
                .iter()
                .map(|n| NewsletterRow {
                    subject: n.subject.clone(),
                    sent_at: n
                        .sent_at
                        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    recipients: n.recipients,
                    open_rate: n.open_rate,
                    click_rate: n.click_rate,
                    score: n.engagement_score,
                })
                .collect();
            output::print_table(&rows);
        }
        ReportCommand::Overview => {
            let window = params.window(engine.config())?;
            let overview = engine.overview(window).await?;
            if format == OutputFormat::Json {
                return output::print_json(&overview);
            }
            let subs = &overview.subscribers;
            let articles = &overview.articles;
            output::print_heading(&format!("Overview ({} days)", overview.window_days));
            output::print_kv("Active subscribers", subs.total_active);
            output::print_kv("Opened", format!("{} ({:.2}%)", subs.opened, subs.open_percentage));
            output::print_kv("Clicked", format!("{} ({:.2}%)", subs.clicked, subs.click_percentage));
            output::print_kv("Articles sent", articles.sent);
            output::print_kv(
                "Articles clicked",
                format!("{} ({:.2}%)", articles.clicked, articles.clicked_percentage),
            );
            output::print_kv("Clicks per article", articles.avg_clicks_per_article);
            output::print_kv("Newsletters", overview.newsletters.count);
            output::print_kv("Avg open rate", format!("{:.2}%", overview.newsletters.avg_open_rate));
            output::print_kv("Avg click rate", format!("{:.2}%", overview.newsletters.avg_click_rate));
            output::print_heading("Categories");
            print_categories(&overview.categories);
        }
        ReportCommand::Audience => {
            let window = params.window(engine.config())?;
            let audience = engine.audience(window).await?;
            if format == OutputFormat::Json {
                return output::print_json(&audience);
            }
            output::print_kv("Active subscribers", audience.total_active);

            output::print_heading("Countries");
            let countries: Vec<SegmentRow> = audience
                .countries
                .iter()
                .map(|c| SegmentRow {
                    percentage: format!("{:.2}", c.percentage),
                    open_rate: format!("{:.2}", c.open_rate),
                    click_rate: format!("{:.2}", c.click_rate),
                    ..SegmentRow::new(
                        c.country_name.clone().unwrap_or_else(|| c.country.clone()),
                        c.subscribers,
                    )
                })
                .collect();
            output::print_table(&countries);

            output::print_heading("Cities");
            let cities: Vec<SegmentRow> = audience
                .cities
                .iter()
                .map(|c| SegmentRow {
                    avg_engagement: format!("{:.2}", c.avg_engagement_score),
                    ..SegmentRow::new(c.city.clone(), c.subscribers)
                })
                .collect();
            output::print_table(&cities);

            output::print_heading("Audiences");
            let audiences: Vec<SegmentRow> = audience
                .audiences
                .iter()
                .map(|a| SegmentRow {
                    percentage: format!("{:.2}", a.percentage),
                    avg_engagement: format!("{:.2}", a.avg_engagement_score),
                    ..SegmentRow::new(a.audience.clone(), a.subscribers)
                })
                .collect();
            output::print_table(&audiences);

            output::print_heading("Company sizes");
            let sizes: Vec<SegmentRow> = audience
                .company_sizes
                .iter()
                .map(|s| SegmentRow {
                    percentage: format!("{:.2}", s.percentage),
                    ..SegmentRow::new(s.company_size.clone(), s.subscribers)
                })
                .collect();
            output::print_table(&sizes);
        }
    }

    Ok(())
}

fn print_categories(trends: &[newsroom_service::analytics::CategoryTrend]) {
    let rows: Vec<CategoryRow> = trends
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            clicks: c.clicks,
        })
        .collect();
    output::print_table(&rows);
}
