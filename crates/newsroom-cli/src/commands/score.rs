//! Single-entity scoring commands.

use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use newsroom_core::error::AppError;

/// Arguments for score commands
#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Score subcommand
    #[command(subcommand)]
    pub command: ScoreCommand,
}

/// Score subcommands
#[derive(Debug, Subcommand)]
pub enum ScoreCommand {
    /// Engagement score of one subscriber over the engagement window
    Subscriber {
        /// Subscriber ID
        id: Uuid,
    },
    /// Reliability score of one content source
    Source {
        /// Source ID
        id: Uuid,
    },
}

/// Execute score commands
pub async fn execute(
    args: &ScoreArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (pool, engine) = super::create_engine(config_path).await?;

    let result = match &args.command {
        ScoreCommand::Subscriber { id } => match engine.engagement_breakdown(*id).await {
            Ok(b) if format == OutputFormat::Json => output::print_json(&b),
            Ok(b) => {
                output::print_heading(&format!("Subscriber {}", b.subscriber_id));
                output::print_kv("Window (days)", b.window_days);
                output::print_kv("Opens", b.opens);
                output::print_kv("Clicks", b.total_clicks);
                output::print_kv("Unique items clicked", b.unique_clicks);
                output::print_kv("Repeat clicks", b.repeat_clicks);
                output::print_kv("Engagement score", b.score);
                Ok(())
            }
            Err(e) => Err(e),
        },
        ScoreCommand::Source { id } => match engine.source_reliability_details(*id).await {
            Ok(r) if format == OutputFormat::Json => output::print_json(&r),
            Ok(r) => {
                output::print_heading(&format!(
                    "Source {}",
                    r.name.as_deref().unwrap_or("(unknown)")
                ));
                output::print_kv("Items", r.total_items);
                output::print_kv("Accepted", r.accepted_items);
                output::print_kv("Acceptance rate", format!("{:.2}%", r.acceptance_rate));
                output::print_kv("Clicks per accepted", format!("{:.2}", r.avg_engagement));
                output::print_kv("Reliability score", r.score);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    pool.close().await;
    result
}
