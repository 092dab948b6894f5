// src/config.rs
use crate::constants::{DEFAULT_NOTION_VERSION, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::AppError;
use crate::markdown::ConversionContext;
use crate::sync::SyncOperation;
use crate::types::{NotionId, NotionToken, PageTitle};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the integration token.
pub const TOKEN_ENV_VAR: &str = "NOTION_TOKEN";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert Markdown to Notion blocks and upload them to a Notion page",
    after_help = "Environment:\n  NOTION_TOKEN    Notion integration token (required unless --dry-run)\n\n\
                  Examples:\n  md2notion --page-id abc123 document.md\n  cat notes.md | md2notion --page-id abc123\n  \
                  md2notion --create --parent-id xyz789 --title \"My Document\" --md notes.md"
)]
pub struct CommandLineInput {
    /// Markdown file to upload (reads stdin when omitted or "-")
    pub file: Option<String>,

    /// Markdown file to upload; takes precedence over the positional FILE
    #[arg(long = "md", value_name = "FILE")]
    pub markdown_file: Option<String>,

    /// Notion page URL or ID to write to (required unless --create)
    #[arg(long)]
    pub page_id: Option<String>,

    /// Parent page URL or ID for --create
    #[arg(long)]
    pub parent_id: Option<String>,

    /// Title of the page made by --create
    #[arg(long)]
    pub title: Option<String>,

    /// Append blocks to the end of the page (the default mode)
    #[arg(long, default_value_t = true)]
    pub append: bool,

    /// Delete the page's existing blocks before appending
    #[arg(long, default_value_t = false)]
    pub replace: bool,

    /// Create a new child page instead of writing to an existing one
    #[arg(long, default_value_t = false)]
    pub create: bool,

    /// Base URL for relative image paths
    #[arg(long)]
    pub image_base_url: Option<String>,

    /// Print the JSON that would be sent and exit without calling the API
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Notion-Version header to send
    #[arg(long, default_value = DEFAULT_NOTION_VERSION)]
    pub notion_version: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Per-request HTTP timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Where the Markdown comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownSource {
    Stdin,
    File(PathBuf),
}

impl MarkdownSource {
    /// `None` and `-` mean standard input.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("") | Some("-") => Self::Stdin,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    pub fn read(&self) -> Result<Vec<u8>, AppError> {
        match self {
            Self::Stdin => {
                let mut buffer = Vec::new();
                std::io::stdin().read_to_end(&mut buffer)?;
                Ok(buffer)
            }
            Self::File(path) => std::fs::read(path).map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to read {}: {}", path.display(), e),
                ))
            }),
        }
    }
}

/// Resolved run configuration, validated against the chosen mode.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source: MarkdownSource,
    pub operation: SyncOperation,
    /// Absent only for dry runs
    pub token: Option<NotionToken>,
    pub conversion: ConversionContext,
    pub dry_run: bool,
    pub notion_version: String,
    pub timeout: Duration,
    pub verbose: bool,
}

impl SyncConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let token = std::env::var(TOKEN_ENV_VAR).ok();
        Self::from_parts(cli, token)
    }

    /// Validates CLI input together with an optional raw token.
    pub fn from_parts(cli: CommandLineInput, raw_token: Option<String>) -> Result<Self, AppError> {
        let operation = resolve_operation(&cli)?;

        let token = match raw_token.filter(|t| !t.trim().is_empty()) {
            Some(raw) => Some(NotionToken::new(raw)?),
            None if cli.dry_run => None,
            None => {
                return Err(AppError::MissingConfiguration(format!(
                    "{} environment variable is required (get a token from https://www.notion.so/my-integrations)",
                    TOKEN_ENV_VAR
                )))
            }
        };

        if cli.timeout == 0 {
            return Err(AppError::InvalidConfiguration(
                "--timeout must be at least 1 second".to_string(),
            ));
        }

        let image_base_url = cli
            .image_base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let source =
            MarkdownSource::from_arg(cli.markdown_file.as_deref().or(cli.file.as_deref()));

        Ok(SyncConfig {
            source,
            operation,
            token,
            conversion: ConversionContext::new(image_base_url, cli.verbose),
            dry_run: cli.dry_run,
            notion_version: cli.notion_version,
            timeout: Duration::from_secs(cli.timeout),
            verbose: cli.verbose,
        })
    }
}

fn resolve_operation(cli: &CommandLineInput) -> Result<SyncOperation, AppError> {
    if cli.replace && cli.create {
        return Err(AppError::InvalidConfiguration(
            "--replace and --create cannot be used together".to_string(),
        ));
    }

    if cli.create {
        let parent = required(&cli.parent_id, "--parent-id is required when --create is set")?;
        let title = required(&cli.title, "--title is required when --create is set")?;
        return Ok(SyncOperation::Create {
            parent: NotionId::parse(parent)?,
            title: PageTitle::new(title)?,
        });
    }

    let page = NotionId::parse(required(
        &cli.page_id,
        "--page-id is required unless --create is set",
    )?)?;
    if cli.replace {
        Ok(SyncOperation::Replace { page })
    } else {
        Ok(SyncOperation::Append { page })
    }
}

fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidConfiguration(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;

    const PAGE: &str = "0123456789abcdef0123456789abcdef";

    fn cli(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["md2notion"];
        argv.extend_from_slice(args);
        CommandLineInput::try_parse_from(argv).expect("arguments should parse")
    }

    fn token() -> Option<String> {
        Some("secret_test_token".to_string())
    }

    #[test]
    fn defaults_to_append_from_stdin() {
        let config = SyncConfig::from_parts(cli(&["--page-id", PAGE]), token()).unwrap();
        assert_eq!(config.source, MarkdownSource::Stdin);
        assert!(matches!(config.operation, SyncOperation::Append { .. }));
        assert_eq!(config.notion_version, "2022-06-28");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(!config.dry_run);
    }

    #[test]
    fn md_flag_wins_over_positional_file() {
        let config = SyncConfig::from_parts(
            cli(&["--page-id", PAGE, "--md", "a.md", "b.md"]),
            token(),
        )
        .unwrap();
        assert_eq!(config.source, MarkdownSource::File(PathBuf::from("a.md")));

        let config =
            SyncConfig::from_parts(cli(&["--page-id", PAGE, "b.md"]), token()).unwrap();
        assert_eq!(config.source, MarkdownSource::File(PathBuf::from("b.md")));
    }

    #[test]
    fn dash_means_stdin() {
        let config =
            SyncConfig::from_parts(cli(&["--page-id", PAGE, "--md", "-"]), token()).unwrap();
        assert_eq!(config.source, MarkdownSource::Stdin);
    }

    #[test]
    fn page_id_required_unless_create() {
        let err = SyncConfig::from_parts(cli(&[]), token()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: --page-id is required unless --create is set"
        );
    }

    #[test]
    fn create_requires_parent_and_title() {
        let err = SyncConfig::from_parts(cli(&["--create", "--title", "T"]), token()).unwrap_err();
        assert!(err.to_string().contains("--parent-id is required"));

        let err =
            SyncConfig::from_parts(cli(&["--create", "--parent-id", PAGE]), token()).unwrap_err();
        assert!(err.to_string().contains("--title is required"));

        let config = SyncConfig::from_parts(
            cli(&["--create", "--parent-id", PAGE, "--title", "Notes"]),
            token(),
        )
        .unwrap();
        assert!(matches!(config.operation, SyncOperation::Create { .. }));
    }

    #[test]
    fn replace_and_create_conflict() {
        let err = SyncConfig::from_parts(
            cli(&["--replace", "--create", "--parent-id", PAGE, "--title", "x"]),
            token(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot be used together"));
    }

    #[test]
    fn replace_mode_is_selected() {
        let config =
            SyncConfig::from_parts(cli(&["--replace", "--page-id", PAGE]), token()).unwrap();
        assert!(matches!(config.operation, SyncOperation::Replace { .. }));
    }

    #[test]
    fn token_required_unless_dry_run() {
        let err = SyncConfig::from_parts(cli(&["--page-id", PAGE]), None).unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
        assert!(err.to_string().contains("NOTION_TOKEN"));

        let config =
            SyncConfig::from_parts(cli(&["--page-id", PAGE, "--dry-run"]), None).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn page_ids_are_validated() {
        let err = SyncConfig::from_parts(cli(&["--page-id", "nope"]), token()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidId(_))
        ));
    }

    #[test]
    fn page_urls_are_accepted() {
        let url = format!("https://www.notion.so/team/Roadmap-{}", PAGE);
        let config = SyncConfig::from_parts(cli(&["--page-id", &url]), token()).unwrap();
        match config.operation {
            SyncOperation::Append { page } => assert_eq!(page.as_str(), PAGE),
            other => panic!("unexpected operation {other:?}"),
        }
    }

    #[test]
    fn blank_image_base_is_ignored() {
        let config = SyncConfig::from_parts(
            cli(&["--page-id", PAGE, "--image-base-url", "  ", "-v"]),
            token(),
        )
        .unwrap();
        assert_eq!(config.conversion.image_base_url, None);
        assert!(config.conversion.verbose);
    }
}
