use std::env;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tripweave_agents::RagPipeline;
use tripweave_core::config::{
    GEMINI_API_KEY_VAR, GEMINI_MODEL_VAR, PLACES_API_KEY_VAR, PLACES_LANGUAGE_VAR,
};
use tripweave_core::{render_context, InterestCatalog, ProviderSettings, TravelStyle, TripRequest};
use tripweave_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "tripweave")]
#[command(about = "Grounded trip itineraries from real places")]
struct Cli {
    #[arg(long, env = PLACES_API_KEY_VAR, hide_env_values = true, global = true)]
    places_api_key: Option<String>,

    #[arg(long, env = GEMINI_API_KEY_VAR, hide_env_values = true, global = true)]
    gemini_api_key: Option<String>,

    #[arg(long, env = GEMINI_MODEL_VAR, global = true)]
    model: Option<String>,

    #[arg(long, env = PLACES_LANGUAGE_VAR, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Retrieve places and generate a day-by-day itinerary.
    Plan {
        #[arg(long)]
        destination: String,
        #[arg(long, default_value_t = 3)]
        days: u32,
        #[arg(long, default_value_t = 1)]
        people: u32,
        #[arg(long = "interest", required = true)]
        interests: Vec<String>,
        #[arg(long, default_value = "")]
        planning_style: String,
        #[arg(long, default_value = "")]
        pace: String,
        #[arg(long, default_value = "")]
        budget: String,
    },
    /// Run retrieval only and show the grounding context.
    Places {
        #[arg(long)]
        destination: String,
        #[arg(long = "interest", required = true)]
        interests: Vec<String>,
    },
    /// List supported interests.
    Interests,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("tripweave_cli");
    let cli = Cli::parse();

    match &cli.command {
        Command::Interests => {
            let catalog = InterestCatalog::standard();
            println!("{}", serde_json::to_string_pretty(catalog.entries())?);
        }
        Command::Places {
            destination,
            interests,
        } => {
            let pipeline = build_pipeline(&cli)?;
            let report = pipeline.retrieve(destination, interests).await;

            println!("{}", serde_json::to_string_pretty(&report)?);
            println!();
            println!("{}", render_context(&report.places()));
        }
        Command::Plan {
            destination,
            days,
            people,
            interests,
            planning_style,
            pace,
            budget,
        } => {
            let pipeline = build_pipeline(&cli)?;
            let request = TripRequest {
                destination: destination.clone(),
                duration: *days,
                person_count: *people,
                travel_style: TravelStyle {
                    planning_style: planning_style.clone(),
                    pace: pace.clone(),
                    interests: interests.clone(),
                    budget: budget.clone(),
                },
            };

            let itinerary = pipeline
                .run(&request)
                .await
                .with_context(|| format!("could not plan a trip to {destination}"))?;

            println!("{}", serde_json::to_string_pretty(&itinerary)?);
        }
    }

    Ok(())
}

fn build_pipeline(cli: &Cli) -> Result<RagPipeline> {
    let settings = ProviderSettings::from_lookup(|key| {
        let flag = match key {
            PLACES_API_KEY_VAR => cli.places_api_key.clone(),
            GEMINI_API_KEY_VAR => cli.gemini_api_key.clone(),
            GEMINI_MODEL_VAR => cli.model.clone(),
            PLACES_LANGUAGE_VAR => cli.language.clone(),
            _ => None,
        };
        flag.or_else(|| env::var(key).ok())
    })
    .context("provider configuration is incomplete")?;

    RagPipeline::from_settings(&settings, AppMetrics::shared())
}
