//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use talentdesk_api_models::{AppUser, Candidate, Page, Reseller, UploadLog};
use talentdesk_client::{Notice, NoticeKind};
use talentdesk_config::{ENV_API_URL, ENV_CONFIG, ENV_TIMEOUT_SECS};
use talentdesk_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, init_logging};

use crate::client::{AppContext, CliResult, parse_pair};
use crate::commands::list::handle_list;
use crate::commands::mutate::{handle_create, handle_delete, handle_delete_many, handle_update};
use crate::commands::session::{handle_login, handle_logout, handle_whoami};
use crate::commands::upload::handle_upload;

const ENV_LOG_FORMAT: &str = "TALENTDESK_LOG_FORMAT";

/// Run `$handler::<Entity>(args..)` for the entity named by `$kind`.
macro_rules! per_entity {
    ($kind:expr, $handler:ident($($arg:expr),+)) => {
        match $kind {
            EntityKind::Candidates => $handler::<Candidate>($($arg),+).await,
            EntityKind::Resellers => $handler::<Reseller>($($arg),+).await,
            EntityKind::Pages => $handler::<Page>($($arg),+).await,
            EntityKind::UploadLogs => $handler::<UploadLog>($($arg),+).await,
            EntityKind::AppUsers => $handler::<AppUser>($($arg),+).await,
        }
    };
}

/// Parses CLI arguments, executes the requested command, and prints its
/// output and notices. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        format: LogFormat::parse_or_infer(std::env::var(ENV_LOG_FORMAT).ok().as_deref()),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: logging disabled: {err}");
    }
    let _context = GlobalContextGuard::new(command_label(&cli.command));

    let ctx = match AppContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let result = dispatch(&ctx, cli.command).await;
    let report = Report::new(result, ctx.notices.drain());
    for line in &report.stderr {
        eprintln!("{line}");
    }
    if let Some(text) = &report.stdout {
        println!("{text}");
    }
    tracing::debug!(exit_code = report.exit_code, "command finished");
    report.exit_code
}

pub(crate) async fn dispatch(ctx: &AppContext, command: Command) -> CliResult<String> {
    match command {
        Command::Ls(args) => per_entity!(args.entity, handle_list(ctx, args)),
        Command::Update(args) => per_entity!(args.entity, handle_update(ctx, args)),
        Command::Rm(args) => per_entity!(args.entity, handle_delete(ctx, args)),
        Command::RmMany(args) => per_entity!(args.entity, handle_delete_many(ctx, args)),
        Command::Create(args) => per_entity!(args.entity, handle_create(ctx, args)),
        Command::Upload(args) => per_entity!(args.entity, handle_upload(ctx, args)),
        Command::Login(args) => handle_login(ctx, args),
        Command::Logout => handle_logout(ctx),
        Command::Whoami => handle_whoami(ctx),
    }
}

/// What a finished command prints, and its exit code.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Report {
    pub(crate) exit_code: i32,
    pub(crate) stdout: Option<String>,
    pub(crate) stderr: Vec<String>,
}

impl Report {
    /// Combine a command result with the notices it produced.
    ///
    /// On failure the last error notice replaces the bare error text, since
    /// it carries the action context ("Failed to delete candidate: ...").
    pub(crate) fn new(result: CliResult<String>, notices: Vec<Notice>) -> Self {
        match result {
            Ok(text) => Self {
                exit_code: 0,
                stdout: Some(text).filter(|text| !text.is_empty()),
                stderr: notices.iter().map(ToString::to_string).collect(),
            },
            Err(err) => {
                let (errors, others): (Vec<_>, Vec<_>) = notices
                    .into_iter()
                    .partition(|notice| notice.kind == NoticeKind::Error);
                let message = errors
                    .last()
                    .map_or_else(|| err.display_message(), |notice| notice.message.clone());
                let mut stderr = others.iter().map(ToString::to_string).collect::<Vec<_>>();
                stderr.push(format!("error: {message}"));
                Self {
                    exit_code: err.exit_code(),
                    stdout: None,
                    stderr,
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "talentdesk",
    about = "Administrative CLI for the Talentdesk recruiting dashboard"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = ENV_API_URL, help = "API base URL")]
    pub(crate) api_url: Option<String>,
    #[arg(long, global = true, env = ENV_CONFIG, help = "JSON settings file")]
    pub(crate) config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = ENV_TIMEOUT_SECS,
        help = "Per-request timeout in seconds"
    )]
    pub(crate) timeout: Option<u64>,
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
    /// List records with client-side filtering, sorting, and paging.
    Ls(ListArgs),
    /// Merge `key=value` fields into one record.
    Update(UpdateArgs),
    /// Delete one record.
    Rm(DeleteArgs),
    /// Delete several records in one bulk call.
    RmMany(DeleteManyArgs),
    /// Create a record, then refetch the list.
    Create(CreateArgs),
    /// Upload files and report per-file results.
    Upload(UploadArgs),
    /// Store a session token.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Show the stored session.
    Whoami,
}

/// Managed record types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum EntityKind {
    Candidates,
    Resellers,
    Pages,
    UploadLogs,
    AppUsers,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Filters shared by `ls` and `rm-many`.
#[derive(Args, Debug, Default)]
pub(crate) struct QueryArgs {
    #[arg(long, help = "Free-text search over the entity's searchable fields")]
    pub(crate) search: Option<String>,
    #[arg(
        long = "where",
        value_parser = parse_pair,
        help = "Exact match on a field, as key=value (repeatable)"
    )]
    pub(crate) filters: Vec<(String, String)>,
    #[arg(
        long,
        value_parser = parse_pair,
        help = "Inclusive lower date bound, as key=YYYY-MM-DD or RFC 3339"
    )]
    pub(crate) from: Vec<(String, String)>,
    #[arg(
        long,
        value_parser = parse_pair,
        help = "Inclusive upper date bound, as key=YYYY-MM-DD or RFC 3339"
    )]
    pub(crate) to: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[arg(value_enum)]
    pub(crate) entity: EntityKind,
    #[command(flatten)]
    pub(crate) query: QueryArgs,
    #[arg(long, help = "Field key to sort by")]
    pub(crate) sort: Option<String>,
    #[arg(long, requires = "sort", help = "Sort descending")]
    pub(crate) desc: bool,
    #[arg(long, help = "1-based page; out-of-range pages clamp")]
    pub(crate) page: Option<usize>,
    #[arg(long, help = "Rows per page")]
    pub(crate) page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateArgs {
    #[arg(value_enum)]
    pub(crate) entity: EntityKind,
    pub(crate) id: String,
    #[arg(
        long = "set",
        value_parser = parse_pair,
        required = true,
        help = "Field to change, as key=value; values that parse as JSON are sent as JSON"
    )]
    pub(crate) fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub(crate) struct DeleteArgs {
    #[arg(value_enum)]
    pub(crate) entity: EntityKind,
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct DeleteManyArgs {
    #[arg(value_enum)]
    pub(crate) entity: EntityKind,
    #[arg(long = "id", help = "Record to delete (repeatable)")]
    pub(crate) ids: Vec<String>,
    #[command(flatten)]
    pub(crate) query: QueryArgs,
    #[arg(long, help = "Also delete every record matching the filters")]
    pub(crate) all_matching: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CreateArgs {
    #[arg(value_enum)]
    pub(crate) entity: EntityKind,
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub(crate) json: Option<String>,
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct UploadArgs {
    #[arg(help = "Upload endpoint relative to the API base URL")]
    pub(crate) endpoint: String,
    #[arg(long = "file", required = true)]
    pub(crate) files: Vec<PathBuf>,
    #[arg(long)]
    pub(crate) job_id: Option<String>,
    #[arg(long)]
    pub(crate) agency_id: Option<String>,
    #[arg(long)]
    pub(crate) batch_id: Option<String>,
    #[arg(
        long,
        value_enum,
        default_value_t = EntityKind::Candidates,
        help = "List refetched after a successful upload"
    )]
    pub(crate) entity: EntityKind,
}

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "TALENTDESK_TOKEN")]
    pub(crate) token: String,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) role: Option<String>,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Ls(_) => "ls",
        Command::Update(_) => "update",
        Command::Rm(_) => "rm",
        Command::RmMany(_) => "rm_many",
        Command::Create(_) => "create",
        Command::Upload(_) => "upload",
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
    }
}
