use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartflow::backend::{BackendClient, BackendInterface};
use chartflow::config::Config;
use chartflow::entitlement::{Plan, SubscriptionStatus};
use chartflow::render;
use chartflow::request::{AnalysisVariant, ChartImage, ParameterForm};
use chartflow::simulation::BackendSimulator;
use chartflow::workflow::{SubmitOutcome, UploadWorkflow, VariantChoice};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chartflow=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    print_banner(&config);

    let backend: Arc<dyn BackendInterface> = if config.run.simulation_mode {
        // The simulator plays a premium account so every variant is reachable
        Arc::new(BackendSimulator::with_plan(
            Plan::Premium,
            SubscriptionStatus::Active,
        ))
    } else {
        Arc::new(BackendClient::new(&config.backend)?)
    };

    let mut workflow = UploadWorkflow::new(backend, config.session.clone());

    let state = workflow.refresh_entitlement().await?;
    render::print_entitlement(&state);

    let variant: AnalysisVariant = config.run.variant.parse()?;
    match workflow.select_variant(variant) {
        VariantChoice::Accepted { needs_parameters } => {
            if needs_parameters {
                let form = ParameterForm {
                    account_size: config.run.account_size.clone(),
                    risk_percent: config.run.risk_percent.clone(),
                    leverage: config.run.leverage.clone(),
                    order_type: config.run.order_type.clone(),
                };
                if let Err(errors) = workflow.collect_parameters(&form) {
                    for issue in &errors.issues {
                        eprintln!("   • {}: {}", issue.field, issue.message);
                    }
                    bail!("invalid trading parameters");
                }
            }
        }
        VariantChoice::UpgradeRequired => {
            bail!(
                "the {} variant needs a premium subscription",
                variant.as_str()
            );
        }
        VariantChoice::Ignored => bail!("variant selection rejected"),
    }

    let image = load_image(&config)?;
    if !workflow.select_image(image) {
        bail!("chart image rejected");
    }

    match workflow.submit().await {
        SubmitOutcome::Completed(report) => {
            render::print_report(&report);
            if let Some(state) = workflow.entitlement() {
                render::print_entitlement(state);
            }
        }
        SubmitOutcome::UpgradeRequired { server_enforced } => {
            if server_enforced {
                warn!("🔒 The server refused this analysis, an upgrade is required");
            } else {
                warn!("🔒 Plan limits block this analysis, an upgrade is required");
            }
        }
        SubmitOutcome::Failed(message) => bail!("analysis failed: {}", message),
        SubmitOutcome::VariantMissing | SubmitOutcome::NotReady => {
            bail!("workflow was not ready to submit");
        }
    }

    let history = workflow.load_history().await?;
    render::print_history(&history);

    Ok(())
}

fn load_image(config: &Config) -> Result<ChartImage> {
    match &config.run.chart_image {
        Some(path) => ChartImage::from_path(Path::new(path))
            .with_context(|| format!("could not read chart image {}", path)),
        None if config.run.simulation_mode => Ok(ChartImage::placeholder()),
        None => bail!("CHART_IMAGE must point to a chart screenshot for live runs"),
    }
}

fn print_banner(config: &Config) {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║                 ChartFlow Analysis Agent                  ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("🚀 Variant: {}", config.run.variant);
    println!(
        "🌐 Backend: {}",
        if config.run.simulation_mode {
            "SIMULATOR (no account required)"
        } else {
            config.backend.base_url.as_str()
        }
    );
    println!("🗣  Language: {}", config.session.language);
    println!(
        "🖼  Max image size: {:.1} MB",
        config.session.max_image_bytes as f64 / (1024.0 * 1024.0)
    );
    println!();
    println!("═══════════════════════════════════════════════════════════");
    println!();
}
