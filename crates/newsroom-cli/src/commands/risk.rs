//! Risk tier maintenance commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use newsroom_core::error::AppError;

/// Arguments for risk commands
#[derive(Debug, Args)]
pub struct RiskArgs {
    /// Risk subcommand
    #[command(subcommand)]
    pub command: RiskCommand,
}

/// Risk subcommands
#[derive(Debug, Subcommand)]
pub enum RiskCommand {
    /// Rescore every active subscriber and store the new tiers
    Recompute,
    /// Show stored tier counts across active subscribers
    Distribution,
}

/// Execute risk commands
pub async fn execute(
    args: &RiskArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (pool, engine) = super::create_engine(config_path).await?;

    let result = match &args.command {
        RiskCommand::Recompute => match engine.recompute_risk().await {
            Ok(summary) if format == OutputFormat::Json => output::print_json(&summary),
            Ok(summary) => {
                output::print_success(&format!(
                    "Recomputed risk for {} subscribers.",
                    summary.processed
                ));
                output::print_kv("Active", summary.active);
                output::print_kv("At risk", summary.at_risk);
                output::print_kv("Churned", summary.churned);
                output::print_kv("Dormant", summary.dormant);
                Ok(())
            }
            Err(e) => Err(e),
        },
        RiskCommand::Distribution => match engine.risk_distribution().await {
            Ok(d) if format == OutputFormat::Json => output::print_json(&d),
            Ok(d) => {
                output::print_kv("Active", d.active);
                output::print_kv("At risk", d.at_risk);
                output::print_kv("Churned", d.churned);
                output::print_kv("Dormant", d.dormant);
                output::print_kv("Unclassified", d.unclassified);
                output::print_kv("Total", d.total());
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    pool.close().await;
    result
}
