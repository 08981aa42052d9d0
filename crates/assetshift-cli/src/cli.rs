//! Argument parsing and command dispatch.

use std::path::PathBuf;

use assetshift_config::FileAction;
use assetshift_fsops::LayoutMode;
use assetshift_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::import::handle_import;
use crate::commands::reorganize::{handle_apply, handle_plan};
use crate::commands::settings::{
    handle_settings_init, handle_settings_reset, handle_settings_show, handle_settings_swap,
};

/// Parses CLI arguments, executes the requested command, and reports
/// failures on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);

    if let Err(err) = install_logging(&cli) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    let result = dispatch(cli).await;
    match result {
        Ok(()) => {
            debug!(command = command_name, "command succeeded");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            debug!(command = command_name, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

fn install_logging(cli: &Cli) -> CliResult<()> {
    let format: LogFormat = cli
        .log_format
        .parse()
        .map_err(|_| CliError::validation(format!("unsupported log format '{}'", cli.log_format)))?;
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: build_sha(),
    })
    .map_err(CliError::failure)
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::new(cli.project, cli.settings, cli.output)?;

    match cli.command {
        Command::Plan(args) => handle_plan(&ctx, &args),
        Command::Apply(args) => handle_apply(&ctx, args).await,
        Command::Settings(settings) => match settings {
            SettingsCommand::Init(args) => handle_settings_init(&ctx, &args),
            SettingsCommand::Show => handle_settings_show(&ctx),
            SettingsCommand::Reset => handle_settings_reset(&ctx),
            SettingsCommand::Swap(args) => handle_settings_swap(&ctx, &args),
        },
        Command::Import => handle_import(&ctx),
    }
}

#[derive(Parser)]
#[command(
    name = "assetshift",
    about = "Reorganize project assets by category or structure"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "ASSETSHIFT_PROJECT",
        default_value = ".",
        help = "Project directory containing the asset root"
    )]
    pub(crate) project: PathBuf,
    #[arg(
        long,
        global = true,
        env = "ASSETSHIFT_SETTINGS",
        help = "Settings file (defaults to <project>/assetshift.settings.json)"
    )]
    pub(crate) settings: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "ASSETSHIFT_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    pub(crate) log_level: String,
    #[arg(
        long,
        global = true,
        env = "ASSETSHIFT_LOG_FORMAT",
        default_value = "auto",
        help = "Log format: json, pretty, or auto"
    )]
    pub(crate) log_format: String,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Resolve an entry point and show the planned actions.
    Plan(PlanArgs),
    /// Plan and commit a reorganization.
    Apply(ApplyArgs),
    /// Manage the settings document.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Write metadata sidecars for assets that lack one.
    Import,
}

#[derive(Subcommand)]
pub(crate) enum SettingsCommand {
    /// Write the default settings document.
    Init(SettingsInitArgs),
    /// Print the effective settings.
    Show,
    /// Restore every setting to its default.
    Reset,
    /// Swap move and copy actions across folder rules and the action table.
    Swap(SettingsSwapArgs),
}

#[derive(Args)]
pub(crate) struct SettingsInitArgs {
    #[arg(long, help = "Overwrite an existing settings file")]
    pub(crate) force: bool,
}

#[derive(Args)]
pub(crate) struct SettingsSwapArgs {
    #[arg(value_enum)]
    pub(crate) direction: SwapDirection,
}

/// Destination layout options shared by `plan` and `apply`.
#[derive(Args, Clone, Default)]
pub(crate) struct LayoutArgs {
    #[arg(long, value_enum, default_value_t = ModeArg::ByCategory)]
    pub(crate) mode: ModeArg,
    #[arg(long, help = "Override the suffix appended to copied file names")]
    pub(crate) copy_suffix: Option<String>,
    #[arg(long, help = "Override the suffix appended to the destination root")]
    pub(crate) folder_suffix: Option<String>,
    #[arg(long, value_enum, help = "Swap planned actions before committing")]
    pub(crate) swap: Option<SwapDirection>,
}

#[derive(Args)]
pub(crate) struct PlanArgs {
    #[arg(help = "Folder or file to reorganize, relative to the project")]
    pub(crate) entry: String,
    #[arg(long, help = "Destination root; when set, destinations are previewed")]
    pub(crate) dest: Option<String>,
    #[command(flatten)]
    pub(crate) layout: LayoutArgs,
}

#[derive(Args)]
pub(crate) struct ApplyArgs {
    #[arg(help = "Folder or file to reorganize, relative to the project")]
    pub(crate) entry: String,
    #[arg(long, help = "Destination root, relative to the project root")]
    pub(crate) dest: String,
    #[command(flatten)]
    pub(crate) layout: LayoutArgs,
    #[arg(long, help = "Keep folders emptied by the run")]
    pub(crate) keep_empty_folders: bool,
    #[arg(long, help = "Suppress per-file progress on stderr")]
    pub(crate) quiet: bool,
    #[arg(long, help = "Print the run's metrics in text exposition format")]
    pub(crate) metrics: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    #[default]
    ByCategory,
    ByStructure,
}

impl From<ModeArg> for LayoutMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::ByCategory => Self::ByCategory,
            ModeArg::ByStructure => Self::ByStructure,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum SwapDirection {
    MoveToCopy,
    CopyToMove,
}

impl SwapDirection {
    pub(crate) const fn actions(self) -> (FileAction, FileAction) {
        match self {
            Self::MoveToCopy => (FileAction::Move, FileAction::Copy),
            Self::CopyToMove => (FileAction::Copy, FileAction::Move),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Plan(_) => "plan",
        Command::Apply(_) => "apply",
        Command::Settings(SettingsCommand::Init(_)) => "settings_init",
        Command::Settings(SettingsCommand::Show) => "settings_show",
        Command::Settings(SettingsCommand::Reset) => "settings_reset",
        Command::Settings(SettingsCommand::Swap(_)) => "settings_swap",
        Command::Import => "import",
    }
}
