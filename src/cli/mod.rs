use crate::{GeminiClient, Planner, PlannerConfig};
use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("trip-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate travel itineraries with Gemini, falling back to canned plans")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("Gemini API key (or set GEMINI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Gemini API base URL (or set GEMINI_BASE_URL env var)"),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate an itinerary and print the response envelope as JSON")
                .arg(
                    Arg::new("prompt")
                        .help("Free-text description of the trip")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .value_name("MODEL")
                        .action(ArgAction::Append)
                        .help("Candidate model, tried in the order given (repeatable)"),
                )
                .arg(
                    Arg::new("timeout-ms")
                        .short('t')
                        .long("timeout-ms")
                        .value_name("MILLIS")
                        .value_parser(clap::value_parser!(u64))
                        .help("Per-model timeout in milliseconds"),
                )
                .arg(
                    Arg::new("mock-only")
                        .long("mock-only")
                        .action(ArgAction::SetTrue)
                        .help("Skip the upstream API and use the canned itineraries"),
                ),
        )
        .subcommand(Command::new("health").about("Show how requests would be answered"))
        .subcommand(Command::new("models").about("List upstream models that support generateContent"))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env().context("invalid planner configuration")?;

    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config = config.with_api_key(Some(api_key.clone()));
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }

    Ok(config)
}

/// CLI entry point for the trip-planner tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("generate", sub)) => generate(config, sub).await,
        Some(("health", _)) => health(config),
        Some(("models", _)) => models(config).await,
        _ => unreachable!("clap requires a subcommand"),
    }
}

async fn generate(mut config: PlannerConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(models) = matches.get_many::<String>("model") {
        config = config.with_models(models.cloned());
    }
    if let Some(millis) = matches.get_one::<u64>("timeout-ms") {
        config = config.with_attempt_timeout(Duration::from_millis(*millis));
    }

    let planner = if matches.get_flag("mock-only") {
        Planner::mock_only(config)
    } else {
        Planner::new(config)?
    };

    let prompt = matches
        .get_one::<String>("prompt")
        .context("prompt is required")?;
    info!(live = planner.is_live(), "generating itinerary");

    let envelope = planner.generate(prompt).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if !envelope.success {
        let message = envelope.error_message.unwrap_or_default();
        error!("itinerary generation failed: {}", message);
        bail!(message);
    }
    Ok(())
}

fn health(config: PlannerConfig) -> anyhow::Result<()> {
    let planner = Planner::new(config)?;
    println!("{}", serde_json::to_string_pretty(&planner.health())?);
    Ok(())
}

async fn models(config: PlannerConfig) -> anyhow::Result<()> {
    if !config.has_api_key() {
        let listing = serde_json::json!({
            "error": "API key not configured",
            "suggestion": "Set GEMINI_API_KEY or pass --api-key",
            "availableModels": config.models(),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let client = GeminiClient::from_config(&config)?;
    let models = client
        .generate_content_models()
        .await
        .context("failed to list upstream models")?;

    let listing = serde_json::json!({
        "generateContentModels": models,
        "count": models.len(),
    });
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let matches = command()
            .try_get_matches_from([
                "trip-planner",
                "generate",
                "Beach vacation in Bali",
                "-m",
                "gemini-2.5-pro",
                "--model",
                "gemini-2.0-flash",
                "--timeout-ms",
                "2500",
                "--mock-only",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "generate");
        let models: Vec<&String> = sub.get_many::<String>("model").unwrap().collect();
        assert_eq!(models, ["gemini-2.5-pro", "gemini-2.0-flash"]);
        assert_eq!(sub.get_one::<u64>("timeout-ms"), Some(&2500));
        assert!(sub.get_flag("mock-only"));
    }
}
