use anyhow::Context;
use clap::Parser;
use item_autofill::core::{ConfigProvider, FormFields};
use item_autofill::utils::{logger, validation::Validate};
use item_autofill::{
    AutofillHandler, CliConfig, ConsoleNotifier, FieldKey, HandlerOptions, HttpLookupBackend,
    InMemoryForm, LookupOutcome, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting item-autofill ({})", cli.kind);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 有設定檔時以設定檔為準
    let settings: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            validate_or_exit(&config);
            Box::new(config)
        }
        None => {
            validate_or_exit(&cli);
            Box::new(cli.clone())
        }
    };

    let backend = HttpLookupBackend::from_config(settings.as_ref())
        .context("failed to build lookup client")?;
    let form = InMemoryForm::with_values(&cli.item_code, &cli.item_name, &cli.lot_number);
    let options = HandlerOptions::from_config(settings.as_ref());
    let handler = AutofillHandler::with_options(backend, form, ConsoleNotifier, options);

    let exit_code = match handler.lookup(cli.kind).await {
        Ok(outcome) => {
            let code = match &outcome {
                LookupOutcome::Filled { written } => {
                    tracing::info!("✅ Filled {} field(s)", written.len());
                    0
                }
                LookupOutcome::Skipped => {
                    tracing::info!(
                        "{} is empty, nothing to look up",
                        cli.kind.trigger_field()
                    );
                    0
                }
                LookupOutcome::NotFound => 2,
                LookupOutcome::Superseded => 0,
            };
            print_form(handler.form())?;
            code
        }
        Err(e) => {
            tracing::error!("❌ Lookup failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            1
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

fn validate_or_exit<V: Validate>(config: &V) {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
}

fn print_form(form: &InMemoryForm) -> anyhow::Result<()> {
    let snapshot = form.snapshot();
    for field in FieldKey::ALL {
        tracing::debug!("{} = '{}'", field, form.value(field));
    }
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
