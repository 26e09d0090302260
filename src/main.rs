mod commands;
mod logging;
mod provider_builder;

use std::path::PathBuf;

use annadata_advisory::{variants::*, Advisor};
use annadata_core::config;
use clap::{Parser, Subcommand};
use provider_builder::{build_localizer, build_localizer_for, build_provider};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "annadata",
    version,
    about = "Annadata Connect: farm advisories and localized marketplace text"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check provider availability and the active language.
    Status,
    /// Ask the hosted model for advice. Failures fall back to canned advice.
    Advise {
        /// Return upstream errors instead of the fallback payload.
        #[arg(long, global = true)]
        strict: bool,
        #[command(subcommand)]
        kind: AdviseKind,
    },
    /// Look up a dotted translation key, e.g. `dashboard.totalRevenue amount=1,200`.
    Translate {
        key: String,
        /// Placeholder values as name=value.
        args: Vec<String>,
        /// Translate in this language without changing the saved choice.
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Show the active language, or switch to `code`.
    Language {
        code: Option<String>,
        /// Go back to the default language and forget the saved choice.
        #[arg(long, conflicts_with = "code")]
        reset: bool,
    },
    /// Pay for a cart from the wallet and print the localized summary.
    Checkout {
        /// Items as product:price_paise[:quantity].
        #[arg(required = true)]
        items: Vec<String>,
        /// Wallet balance in paise before paying.
        #[arg(short, long, default_value_t = 0)]
        balance: u64,
    },
}

#[derive(Subcommand)]
enum AdviseKind {
    /// Crops suited to a region and its soil.
    Crop {
        #[arg(short, long)]
        region: String,
        #[arg(short, long)]
        soil: String,
    },
    /// A sectioned guide on a farming topic.
    Guide {
        topic: String,
        #[arg(short, long, default_value = "English")]
        language: String,
    },
    /// Turn a recorded voice query into a search query.
    Voice {
        /// Recorded audio file.
        audio: Option<PathBuf>,
        /// MIME type of the audio file.
        #[arg(long, default_value = "audio/webm")]
        mime: String,
        /// A ready `data:audio/...;base64,...` URI instead of a file.
        #[arg(long, conflicts_with = "audio")]
        data_uri: Option<String>,
    },
    /// Weather alerts and tips for a location and forecast.
    Weather {
        #[arg(short, long)]
        location: String,
        #[arg(short, long)]
        forecast: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = logging::init(&cfg.annadata)?;

    match cli.command {
        Commands::Status => {
            let provider = build_provider(&cfg)?;
            let localizer = build_localizer(&cfg.localization).await?;
            println!("{}", commands::status(&cfg, &provider, &localizer).await);
        }
        Commands::Advise { strict, kind } => {
            let provider = build_provider(&cfg)?;
            let advisor = Advisor::from_config(provider, &cfg.advisory);
            info!("advise via {} (strict: {strict})", advisor.provider_name());

            let out = match kind {
                AdviseKind::Crop { region, soil } => {
                    let input = CropAdvisoryInput {
                        region,
                        soil_conditions: soil,
                    };
                    commands::advise::<CropAdvisory>(&advisor, input, strict).await?
                }
                AdviseKind::Guide { topic, language } => {
                    let input = GuideInput { topic, language };
                    commands::advise::<GuideGeneration>(&advisor, input, strict).await?
                }
                AdviseKind::Voice {
                    audio,
                    mime,
                    data_uri,
                } => {
                    let input = commands::voice_input(audio.as_deref(), &mime, data_uri)?;
                    commands::advise::<VoiceSearch>(&advisor, input, strict).await?
                }
                AdviseKind::Weather { location, forecast } => {
                    let input = WeatherAdvisoryInput { location, forecast };
                    commands::advise::<WeatherAdvisory>(&advisor, input, strict).await?
                }
            };
            println!("{out}");
        }
        Commands::Translate { key, args, lang } => {
            let localizer = match lang {
                Some(code) => build_localizer_for(&cfg.localization, &code).await?,
                None => build_localizer(&cfg.localization).await?,
            };
            let args = commands::parse_args(&args)?;
            println!("{}", commands::translate(&localizer, &key, &args));
        }
        Commands::Language { code, reset } => {
            let localizer = build_localizer(&cfg.localization).await?;
            let out = if reset {
                commands::reset_language(&localizer).await?
            } else {
                commands::language(&localizer, code.as_deref()).await?
            };
            println!("{out}");
        }
        Commands::Checkout { items, balance } => {
            let localizer = build_localizer(&cfg.localization).await?;
            println!("{}", commands::checkout(&localizer, &items, balance)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_strict_crop_advice() {
        let cli = Cli::try_parse_from([
            "annadata", "advise", "crop", "--region", "Nashik", "--soil", "black cotton",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Commands::Advise {
                strict,
                kind: AdviseKind::Crop { region, soil },
            } => {
                assert!(strict);
                assert_eq!(region, "Nashik");
                assert_eq!(soil, "black cotton");
            }
            _ => panic!("expected advise crop"),
        }
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_voice_file_and_uri_conflict() {
        let res = Cli::try_parse_from([
            "annadata", "advise", "voice", "clip.webm", "--data-uri", "data:audio/webm;base64,AA==",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_language_reset_conflicts_with_code() {
        let cli = Cli::try_parse_from(["annadata", "language", "--reset"]).unwrap();
        assert!(matches!(cli.command, Commands::Language { code: None, reset: true }));
        assert!(Cli::try_parse_from(["annadata", "language", "hi", "--reset"]).is_err());
    }

    #[test]
    fn test_checkout_requires_items() {
        assert!(Cli::try_parse_from(["annadata", "checkout"]).is_err());
        let cli = Cli::try_parse_from(["annadata", "checkout", "tomato:4000:2", "-b", "10000"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Checkout { balance: 10000, .. }));
    }
}
