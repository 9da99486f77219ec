use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tracing::info;

use stepform::{
    HostParams, SessionOutcome, UiOptions, WizardDefinition, WizardUI,
    form::Payload,
    io::{
        DocumentFormat, OutputDestination, OutputOptions, definition_schema, emit, emit_payload,
        load_definition_path,
    },
    presets, telemetry,
    wizard::{GatewayError, SubmissionGateway},
};

#[derive(Debug, Parser)]
#[command(
    name = "stepform",
    version,
    about = "Run multi-step form wizards in the terminal"
)]
struct Cli {
    /// Built-in widget to run (see --list-presets)
    #[arg(short = 'p', long = "preset", value_name = "NAME", conflicts_with = "definition")]
    preset: Option<String>,

    /// Wizard definition file (JSON, YAML or TOML)
    #[arg(short = 'd', long = "definition", value_name = "PATH")]
    definition: Option<PathBuf>,

    /// Locale tag; falls back to the definition's default locale
    #[arg(short = 'l', long = "locale", value_name = "TAG")]
    locale: Option<String>,

    /// Endpoint recorded in the payload metadata
    #[arg(long = "endpoint", value_name = "URL")]
    endpoint: Option<String>,

    /// Base cost recorded in the payload metadata
    #[arg(long = "base-cost", value_name = "AMOUNT")]
    base_cost: Option<f64>,

    /// Extra host context, parsed as JSON when possible
    #[arg(long = "context", value_name = "KEY=VALUE", action = ArgAction::Append)]
    context: Vec<String>,

    /// Override the session timeout
    #[arg(long = "timeout-secs", value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Write logs here instead of discarding them
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "FILTER", default_value = "info")]
    log_level: String,

    /// Validate the definition and print a summary without starting the UI
    #[arg(long = "check")]
    check: bool,

    /// Print the JSON Schema of definition files and exit
    #[arg(long = "print-schema")]
    print_schema: bool,

    /// List the built-in presets and exit
    #[arg(long = "list-presets")]
    list_presets: bool,
}

/// Writes the submitted payload to file destinations while the UI is up.
struct FileGateway {
    options: OutputOptions,
}

#[async_trait(?Send)]
impl SubmissionGateway for FileGateway {
    async fn submit(&self, payload: &Payload) -> Result<(), GatewayError> {
        emit_payload(payload, &self.options).map_err(GatewayError::Delivery)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.list_presets {
        for name in presets::names() {
            println!("{name}");
        }
        return Ok(());
    }
    if cli.print_schema {
        let options = OutputOptions::new(DocumentFormat::Json).with_pretty(!cli.no_pretty);
        return emit(&definition_schema(), &options).map_err(|err| eyre!("{err:#}"));
    }

    let log_file = cli
        .log_file
        .as_ref()
        .map(|path| {
            File::create(path).wrap_err_with(|| format!("failed to create log file {}", path.display()))
        })
        .transpose()?;
    if let Some(file) = log_file {
        telemetry::init(&cli.log_level, Some(file))?;
    }

    let mut definition = load_definition(&cli)?;
    if let Some(secs) = cli.timeout_secs {
        definition.settings.timeout_secs = secs;
    }
    definition.validate()?;

    if cli.check {
        let fields: usize = definition.steps.iter().map(|step| step.fields.len()).sum();
        let locales: Vec<&str> = definition.locales.keys().map(String::as_str).collect();
        println!(
            "{}: {} steps, {} fields, {} rules, locales: {}",
            definition.id,
            definition.steps.len(),
            fields,
            definition.rules.len(),
            locales.join(", ")
        );
        return Ok(());
    }

    let host = build_host(&cli)?;
    let (file_options, stdout_options) = build_output_options(&cli);
    let gateway = FileGateway {
        options: file_options,
    };

    let outcome = WizardUI::new(definition)
        .with_host(host)
        .with_options(UiOptions::default().with_tick_rate(Duration::from_millis(200)))
        .run(&gateway)
        .map_err(|err| eyre!("{err:#}"))?;

    match outcome {
        SessionOutcome::Submitted(payload) => {
            info!(fields = payload.len(), "payload submitted");
            if let Some(options) = stdout_options {
                emit_payload(&payload, &options).map_err(|err| eyre!("{err:#}"))?;
            }
            Ok(())
        }
        SessionOutcome::Locked => Err(eyre!("the session expired before the form was sent")),
        SessionOutcome::Abandoned => Err(eyre!("wizard closed before submission")),
    }
}

fn load_definition(cli: &Cli) -> Result<WizardDefinition> {
    match (&cli.preset, &cli.definition) {
        (Some(name), _) => presets::by_name(name).ok_or_else(|| {
            eyre!(
                "unknown preset `{name}`; available: {}",
                presets::names().join(", ")
            )
        }),
        (None, Some(path)) => load_definition_path(path).map_err(|err| eyre!("{err:#}")),
        (None, None) => Err(eyre!("provide --preset or --definition")),
    }
}

fn build_host(cli: &Cli) -> Result<HostParams> {
    let mut host = HostParams::new();
    if let Some(locale) = &cli.locale {
        host = host.with_locale(locale.clone());
    }
    if let Some(endpoint) = &cli.endpoint {
        host = host.with_endpoint(endpoint.clone());
    }
    if let Some(cost) = cli.base_cost {
        host = host.with_base_cost(cost);
    }
    for entry in &cli.context {
        let (key, raw) = entry
            .split_once('=')
            .ok_or_else(|| eyre!("context entry `{entry}` must look like KEY=VALUE"))?;
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        host = host.with_context(key.trim(), value);
    }
    Ok(host)
}

/// Splits destinations: files are written by the gateway, stdout only after
/// the terminal has been restored.
fn build_output_options(cli: &Cli) -> (OutputOptions, Option<OutputOptions>) {
    let pretty = !cli.no_pretty;
    let (stdout, files): (Vec<_>, Vec<_>) = cli
        .outputs
        .iter()
        .map(|output| OutputDestination::parse(output))
        .partition(OutputDestination::is_stdout);
    let format = files
        .iter()
        .find_map(OutputDestination::format_hint)
        .unwrap_or_default();
    let to_stdout = cli.outputs.is_empty() || !stdout.is_empty();

    let file_options = OutputOptions::new(format)
        .with_pretty(pretty)
        .with_destinations(files);
    let stdout_options = to_stdout.then(|| OutputOptions::new(format).with_pretty(pretty));
    (file_options, stdout_options)
}
