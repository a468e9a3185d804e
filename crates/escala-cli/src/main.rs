mod display;
mod quiz;

use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use escala_attribution::AttributionParams;
use escala_core::{
    ConversionTier, DerivedResults, PracticeArea, RevenueBand, cost_per_lead, estimate,
    parse_currency_input,
};
use escala_sync::{DEFAULT_WEBHOOK_URL, WebhookClient, WebhookPayload};
use escala_wizard::{LoadingConfig, Wizard};
use tracing::{info, warn};
use url::Url;

use crate::quiz::{Outcome, Terminal};

#[derive(Parser, Debug)]
#[command(name = "escala")]
#[command(about = "Scale diagnostic quiz for law firms")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the quiz interactively and post the submission to the webhook
    Quiz(QuizArgs),
    /// Compute the estimate for a single set of answers
    Estimate(EstimateArgs),
}

#[derive(Args, Debug)]
struct QuizArgs {
    /// Address the quiz is served from; its query string supplies attribution
    #[arg(long, env = "ESCALA_PAGE_URL", default_value = "https://quiz.digge.com.br/")]
    page_url: Url,

    /// Webhook endpoint receiving submissions
    #[arg(long, env = "ESCALA_WEBHOOK_URL", default_value = DEFAULT_WEBHOOK_URL)]
    webhook_url: String,

    /// Print the payload instead of sending it
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Loading screen tick interval in milliseconds
    #[arg(long, default_value_t = 150)]
    tick_ms: u64,

    /// Pause after the loading bar fills, in milliseconds
    #[arg(long, default_value_t = 500)]
    settle_ms: u64,

    /// Step index to open on (0 = welcome, 8 = results)
    #[arg(long, default_value_t = 0)]
    start_step: usize,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Practice area label, case-insensitive, e.g. "Previdenciário"
    #[arg(long)]
    area: String,

    /// Monthly ad spend; digits are extracted, so "R$ 3.000" works
    #[arg(long)]
    ad_spend: String,

    /// Average contract value
    #[arg(long)]
    ticket: String,

    /// Conversion tier: Excelente, Boa or Ruim
    #[arg(long, value_parser = parse_tier)]
    conversion: ConversionTier,

    /// Current monthly revenue band value: 10000, 20000, 40000, 60000, 85000 or 120000
    #[arg(long, value_parser = parse_band)]
    revenue: RevenueBand,

    /// Emit JSON instead of a card
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn parse_tier(label: &str) -> Result<ConversionTier, String> {
    ConversionTier::from_label(label)
        .ok_or_else(|| format!("expected Excelente, Boa or Ruim, got {label:?}"))
}

fn parse_band(value: &str) -> Result<RevenueBand, String> {
    let bands = || {
        RevenueBand::ALL
            .iter()
            .map(|b| b.value().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(RevenueBand::from_value)
        .ok_or_else(|| format!("expected one of {}, got {value:?}", bands()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,escala_sync=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Quiz(args) => run_quiz(args).await,
        Command::Estimate(args) => run_estimate(&args),
    }
}

async fn run_quiz(args: QuizArgs) -> anyhow::Result<()> {
    let loading = LoadingConfig {
        tick: Duration::from_millis(args.tick_ms),
        settle: Duration::from_millis(args.settle_ms),
        ..LoadingConfig::default()
    };
    let mut wizard = Wizard::starting_at(args.start_step);

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let outcome = Terminal::new(input, io::stdout().lock())
        .run(&mut wizard, loading)
        .await?;

    let (answers, results, pending) = match outcome {
        Outcome::Submitted(submission) => {
            let attribution = AttributionParams::from_url(&args.page_url);
            info!(
                utm_keys = attribution.len(),
                page = %args.page_url,
                "preparing webhook payload"
            );
            let payload =
                WebhookPayload::new(submission.answers.clone(), attribution, &args.page_url);
            let pending = if args.dry_run {
                println!("{}", serde_json::to_string_pretty(&payload.stamped_now())?);
                None
            } else {
                Some(WebhookClient::new(&args.webhook_url).dispatch(payload))
            };
            (submission.answers, submission.results, pending)
        }
        Outcome::ShowResults => (wizard.answers().clone(), wizard.results(), None),
        Outcome::Abandoned => {
            info!("quiz closed before completion");
            return Ok(());
        }
    };

    let page = display::results_page(&args.page_url, &answers, &results)?;
    print!("{}", display::render_text(&page));

    if let Some(handle) = pending {
        handle.await.context("webhook task failed")?;
    }
    Ok(())
}

fn run_estimate(args: &EstimateArgs) -> anyhow::Result<()> {
    let results = estimate_for(args);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", display::estimate_card(&results));
    }
    Ok(())
}

fn estimate_for(args: &EstimateArgs) -> DerivedResults {
    let area = PracticeArea::from_label(&args.area);
    if area.is_none() {
        warn!(area = %args.area, "unknown practice area, using default cost per lead");
    }
    estimate(
        cost_per_lead(area),
        parse_currency_input(&args.ad_spend),
        args.conversion.rate(),
        parse_currency_input(&args.ticket),
        args.revenue.value(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_estimate() {
        let cli = Cli::try_parse_from([
            "escala",
            "estimate",
            "--area",
            "Previdenciário",
            "--ad-spend",
            "R$ 3.000",
            "--ticket",
            "4500",
            "--conversion",
            "boa",
            "--revenue",
            "20000",
        ])
        .unwrap();
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        assert_eq!(args.conversion, ConversionTier::Boa);
        assert_eq!(args.revenue, RevenueBand::From11kTo30k);

        let results = estimate_for(&args);
        assert_eq!(results.cost_per_lead, 22.06);
        assert_eq!(results.estimated_leads, 136);
        assert_eq!(results.missed_revenue, 128_500);
    }

    #[test]
    fn cli_rejects_revenue_outside_bands() {
        let parse = |revenue: &str| {
            Cli::try_parse_from([
                "escala",
                "estimate",
                "--area",
                "Trabalhista",
                "--ad-spend",
                "1000",
                "--ticket",
                "1000",
                "--conversion",
                "Ruim",
                "--revenue",
                revenue,
            ])
        };
        assert!(parse("12345").is_err());
        assert!(parse("abc").is_err());
        assert!(parse("85000").is_ok());
    }

    #[test]
    fn cli_rejects_unknown_tier() {
        let err = Cli::try_parse_from([
            "escala",
            "estimate",
            "--area",
            "Trabalhista",
            "--ad-spend",
            "1000",
            "--ticket",
            "1000",
            "--conversion",
            "otima",
            "--revenue",
            "10000",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn quiz_defaults() {
        let cli = Cli::try_parse_from(["escala", "quiz"]).unwrap();
        let Command::Quiz(args) = cli.command else {
            panic!("expected quiz");
        };
        assert_eq!(args.tick_ms, 150);
        assert_eq!(args.settle_ms, 500);
        assert_eq!(args.start_step, 0);
        assert!(!args.dry_run);
    }
}
