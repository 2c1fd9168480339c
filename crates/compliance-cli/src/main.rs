// crates/compliance-cli/src/main.rs
// ============================================================================
// Module: Compliance Harness CLI Entry Point
// Description: Command dispatcher for matrix checks and workflow replays.
// Purpose: Load configuration, run the harness, and map results to exit codes.
// Dependencies: clap, compliance-core, compliance-config, compliance-cli, tokio.
// ============================================================================

//! ## Overview
//! `compliance-harness` plans and runs the resource compliance matrix against
//! a target, replays submission workflow scenarios, and validates harness
//! configuration. Configuration layers apply in order: file, environment,
//! command-line flags. Exit codes: `0` pass, `1` failure, `2` inconclusive,
//! `3` usage or configuration error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use compliance_cli::HarnessAuditSink;
use compliance_cli::HarnessRunEvent;
use compliance_cli::HttpTransport;
use compliance_cli::MatrixRunner;
use compliance_cli::OutputFormat;
use compliance_cli::SchemaRegistry;
use compliance_cli::build_audit_sink;
use compliance_cli::render_plan;
use compliance_cli::render_run;
use compliance_cli::run_scenarios;
use compliance_cli::t;
use compliance_config::HarnessConfig;
use compliance_config::HarnessEnvOverrides;
use compliance_core::HarnessSummary;
use compliance_core::ScenarioVerdict;
use compliance_core::Verdict;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code for usage and configuration errors.
const USAGE_EXIT_CODE: u8 = 3;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "compliance-harness",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resource compliance matrix.
    Matrix {
        /// Selected matrix subcommand.
        #[command(subcommand)]
        command: MatrixCommand,
    },
    /// Submission workflow scenarios.
    Workflow {
        /// Selected workflow subcommand.
        #[command(subcommand)]
        command: WorkflowCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Matrix subcommands.
#[derive(Subcommand, Debug)]
enum MatrixCommand {
    /// Print the expected outcome for every (resource, verb) pair.
    Plan(MatrixPlanCommand),
    /// Execute the matrix against the target.
    Run(MatrixRunCommand),
}

/// Workflow subcommands.
#[derive(Subcommand, Debug)]
enum WorkflowCommand {
    /// Replay the built-in and configured scenarios.
    Run(WorkflowRunCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a harness config file.
    Validate(ConfigValidateCommand),
}

/// Shared config selection flag.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to compliance-harness.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `matrix plan`.
#[derive(Args, Debug)]
struct MatrixPlanCommand {
    /// Config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `matrix run`.
#[derive(Args, Debug)]
struct MatrixRunCommand {
    /// Config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Target base URL (overrides config and environment).
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `workflow run`.
#[derive(Args, Debug)]
struct WorkflowRunCommand {
    /// Config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config selection.
    #[command(flatten)]
    config: ConfigArgs,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let usage = err.use_stderr();
            let _ = err.print();
            return Ok(if usage { ExitCode::from(USAGE_EXIT_CODE) } else { ExitCode::SUCCESS });
        }
    };

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Matrix {
            command,
        } => match command {
            MatrixCommand::Plan(command) => command_matrix_plan(&command),
            MatrixCommand::Run(command) => command_matrix_run(&command).await,
        },
        Commands::Workflow {
            command,
        } => match command {
            WorkflowCommand::Run(command) => command_workflow_run(&command),
        },
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
    }
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Loads the config file, then layers environment and flag overrides.
fn load_config(args: &ConfigArgs, base_url: Option<&str>) -> CliResult<HarnessConfig> {
    let mut config = HarnessConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let overrides = HarnessEnvOverrides::load()
        .map_err(|err| CliError::new(t!("config.env_failed", error = err)))?;
    config.apply_env(&overrides);
    if let Some(base_url) = base_url {
        config.target.base_url = base_url.trim().to_string();
    }
    config.validate().map_err(|err| CliError::new(t!("config.override_failed", error = err)))?;
    Ok(config)
}

/// Opens the configured audit sink.
fn open_audit(config: &HarnessConfig) -> CliResult<Arc<dyn HarnessAuditSink>> {
    build_audit_sink(config).map_err(|err| {
        let path = config.audit.path.as_deref().unwrap_or_default();
        CliError::new(t!("audit.open_failed", path = path, error = err))
    })
}

// ============================================================================
// SECTION: Matrix Commands
// ============================================================================

/// Executes `matrix plan`.
fn command_matrix_plan(command: &MatrixPlanCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config, None)?;
    let checks = config.matrix_policy().plan(&config.catalog());
    let output = render_plan(&checks, command.format).map_err(|err| {
        CliError::new(t!("output.render_failed", format = command.format.as_str(), error = err))
    })?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `matrix run`.
async fn command_matrix_run(command: &MatrixRunCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config, command.base_url.as_deref())?;
    let base_url = config
        .target
        .parsed_base_url()
        .map_err(|err| CliError::new(t!("config.override_failed", error = err)))?;
    let transport =
        HttpTransport::new(&base_url, Duration::from_millis(config.target.timeout_ms))
            .map_err(|err| CliError::new(t!("transport.build_failed", error = err)))?;
    let schemas = SchemaRegistry::from_config(&config)
        .map_err(|err| CliError::new(t!("schema.load_failed", error = err)))?;
    let audit = open_audit(&config)?;
    let checks = config.matrix_policy().plan(&config.catalog());
    let runner =
        MatrixRunner::new(transport, schemas, config.target.max_concurrency, Arc::clone(&audit));
    let verdicts = runner.run(&checks).await;
    finish_run("matrix run", &verdicts, &[], audit.as_ref(), command.format)
}

// ============================================================================
// SECTION: Workflow Commands
// ============================================================================

/// Executes `workflow run`.
fn command_workflow_run(command: &WorkflowRunCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config, None)?;
    let audit = open_audit(&config)?;
    let scenarios = run_scenarios(&config.scenarios(), &config.roster(), audit.as_ref());
    finish_run("workflow run", &[], &scenarios, audit.as_ref(), command.format)
}

/// Summarizes, audits, and prints a run, returning its exit code.
fn finish_run(
    label: &'static str,
    verdicts: &[Verdict],
    scenarios: &[ScenarioVerdict],
    audit: &dyn HarnessAuditSink,
    format: OutputFormat,
) -> CliResult<ExitCode> {
    let summary = HarnessSummary::from_results(verdicts, scenarios);
    audit.record_run(&HarnessRunEvent::new(label, summary));
    let output = render_run(verdicts, scenarios, &summary, format).map_err(|err| {
        CliError::new(t!("output.render_failed", format = format.as_str(), error = err))
    })?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::from(summary.status().exit_code()))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config, None)?;
    let catalog = config.catalog();
    let checks = config.matrix_policy().plan(&catalog);
    write_stdout_line(&t!(
        "config.validate.ok",
        resources = catalog.len(),
        checks = checks.len(),
        scenarios = config.scenarios().len()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns the usage exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(USAGE_EXIT_CODE)
}
