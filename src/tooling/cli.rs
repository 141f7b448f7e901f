//! CLI Tooling
//!
//! Command-line interface for every registry, search, session and publish
//! operation. Running without a subcommand opens the interactive menu.

use crate::clipboard::copy_to_clipboard;
use crate::commands::{FileRecordInput, MarketplaceCommandService, RegistryCommandService};
use crate::config::{AppConfig, ConfigLoader};
use crate::error::ApiError;
use crate::marketplace::MarketplaceClient;
use crate::registry::{PromptUpdate, RecordKind, Registries};
use crate::session::{SessionStore, TOKEN_ENV_VAR};
use crate::tooling::block_on;
use crate::tooling::format::{
    format_list_json, format_list_text, format_publish_result, format_search_json,
    format_search_text, format_show_json, format_show_text, format_stats_json, format_stats_text,
    format_whoami, OutputFormat,
};
use crate::tooling::menu::Menu;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Agenco - personal registry of agents, contexts and prompts
#[derive(Parser, Debug)]
#[command(name = "agenco", version)]
#[command(about = "Manage agents, contexts and prompts and publish them to the Agenco marketplace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding agents.json, contexts.json and prompts.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The subcommand to run; no subcommand means the interactive menu.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Menu)
    }

    /// Fold `--log-*` flags into the loaded logging configuration.
    pub fn apply_logging_overrides(&self, config: &mut AppConfig) {
        let logging = &mut config.logging;
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage agents
    Agent {
        #[command(subcommand)]
        command: FileRecordCommands,
    },
    /// Manage contexts
    Context {
        #[command(subcommand)]
        command: FileRecordCommands,
    },
    /// Manage prompts
    Prompt {
        #[command(subcommand)]
        command: PromptCommands,
    },
    /// Search names, descriptions and content of every record
    Search {
        query: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show record counts
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Log in to the marketplace
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Publish to the marketplace
    Publish {
        #[command(subcommand)]
        command: PublishCommands,
    },
    /// Interactive menu (default)
    Menu,
}

/// Subcommands shared by agents and contexts.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FileRecordCommands {
    /// List all records
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one record with its aggregated file content
    Show {
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a record
    Add(FileRecordArgs),
    /// Remove a record
    Remove {
        name: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Copy aggregated content to the clipboard
    Copy { name: String },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FileRecordArgs {
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Referenced file (repeatable); `~` and `$VAR` are expanded when read
    #[arg(long = "file")]
    pub files: Vec<String>,
    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Contexts only, e.g. documentation or code
    #[arg(long)]
    pub content_type: Option<String>,
}

impl From<&FileRecordArgs> for FileRecordInput {
    fn from(args: &FileRecordArgs) -> Self {
        FileRecordInput {
            name: args.name.clone(),
            description: args.description.clone(),
            files: args.files.clone(),
            tags: args.tags.clone(),
            category: args.category.clone(),
            content_type: args.content_type.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PromptCommands {
    /// List all prompts
    List {
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one prompt
    Show {
        name: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a prompt
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Prompt text
        #[arg(long)]
        text: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Change description and/or text
    Update {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Remove a prompt
    Remove {
        name: String,
        #[arg(long)]
        force: bool,
    },
    /// Copy prompt text to the clipboard
    Copy { name: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PublishCommands {
    /// Publish a stored agent
    Agent {
        name: String,
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Publish a stored context
    Context {
        name: String,
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Publish a stored prompt
    Prompt {
        name: String,
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Bundle the files of a directory and publish them as one entry
    Dir {
        /// agent, context or prompt
        kind: String,
        dir: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        api_url: Option<String>,
    },
}

/// Everything a command needs: registries, session and resolved configuration.
pub struct CliContext {
    registries: Registries,
    session: SessionStore,
    config: AppConfig,
    data_dir: PathBuf,
}

impl CliContext {
    /// Load configuration and open the registries.
    pub fn new(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_with(config_path.as_deref())?;
        Self::from_config(config, data_dir)
    }

    /// Build from an already-loaded configuration; `data_dir` overrides the configured one.
    pub fn from_config(config: AppConfig, data_dir: Option<PathBuf>) -> Result<Self, ApiError> {
        config.validate()?;
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config.data_dir()?,
        };
        let session = SessionStore::new(&config.config_dir()?)
            .with_env_token(std::env::var(TOKEN_ENV_VAR).ok());
        Ok(Self::with_parts(config, data_dir, session))
    }

    /// Assemble from explicit parts (tests point the session at a temp dir).
    pub fn with_parts(config: AppConfig, data_dir: PathBuf, session: SessionStore) -> Self {
        tracing::debug!(data_dir = %data_dir.display(), "opening registries");
        Self {
            registries: Registries::open(&data_dir),
            session,
            config,
            data_dir,
        }
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Explicit URL, else the stored session's, else the configured one.
    pub fn resolve_api_url(&self, explicit: Option<&str>) -> String {
        if let Some(url) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        self.session
            .load()
            .ok()
            .flatten()
            .map(|s| s.api_url)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.config.marketplace.api_url.clone())
    }

    pub fn marketplace_client(&self, api_url: Option<&str>) -> MarketplaceClient {
        MarketplaceClient::from_session(&self.session, self.resolve_api_url(api_url))
    }

    /// Execute a CLI command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        tracing::debug!(command = command_name(command), "executing command");
        let result = self.execute_inner(command);
        if let Err(e) = &result {
            tracing::warn!(command = command_name(command), error = %e, "command failed");
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Agent { command } => self.handle_file_record_command(RecordKind::Agent, command),
            Commands::Context { command } => {
                self.handle_file_record_command(RecordKind::Context, command)
            }
            Commands::Prompt { command } => self.handle_prompt_command(command),
            Commands::Search { query, format } => {
                let format = OutputFormat::parse(format)?;
                let results = RegistryCommandService::search(&self.registries, query)?;
                Ok(match format {
                    OutputFormat::Text => format_search_text(query, &results),
                    OutputFormat::Json => format_search_json(query, &results),
                })
            }
            Commands::Stats { format } => {
                let format = OutputFormat::parse(format)?;
                let stats = RegistryCommandService::stats(&self.registries)?;
                Ok(match format {
                    OutputFormat::Text => format_stats_text(&stats),
                    OutputFormat::Json => format_stats_json(&stats),
                })
            }
            Commands::Login {
                email,
                password,
                api_url,
            } => self.handle_login(email.as_deref(), password.as_deref(), api_url.as_deref()),
            Commands::Logout => {
                if MarketplaceCommandService::logout(&self.session)? {
                    Ok("Logged out".to_string())
                } else {
                    Ok("Not logged in".to_string())
                }
            }
            Commands::Whoami => Ok(format_whoami(&MarketplaceCommandService::whoami(
                &self.session,
            )?)),
            Commands::Publish { command } => self.handle_publish_command(command),
            Commands::Menu => {
                Menu::new(self).run()?;
                Ok(String::new())
            }
        }
    }

    fn handle_file_record_command(
        &self,
        kind: RecordKind,
        command: &FileRecordCommands,
    ) -> Result<String, ApiError> {
        match command {
            FileRecordCommands::List { format } => self.handle_list(kind, format),
            FileRecordCommands::Show { name, format } => self.handle_show(kind, name, format),
            FileRecordCommands::Add(args) => {
                if kind == RecordKind::Agent && args.content_type.is_some() {
                    return Err(ApiError::Validation(
                        "--content-type only applies to contexts".to_string(),
                    ));
                }
                let input = FileRecordInput::from(args);
                let result = match kind {
                    RecordKind::Context => RegistryCommandService::add_context(&self.registries, input)?,
                    _ => RegistryCommandService::add_agent(&self.registries, input)?,
                };
                Ok(format!(
                    "Added {} '{}' ({})",
                    result.kind,
                    result.name,
                    result.document.display()
                ))
            }
            FileRecordCommands::Remove { name, force } => self.handle_remove(kind, name, *force),
            FileRecordCommands::Copy { name } => self.handle_copy(kind, name),
        }
    }

    fn handle_prompt_command(&self, command: &PromptCommands) -> Result<String, ApiError> {
        let kind = RecordKind::Prompt;
        match command {
            PromptCommands::List { format } => self.handle_list(kind, format),
            PromptCommands::Show { name, format } => self.handle_show(kind, name, format),
            PromptCommands::Add {
                name,
                description,
                text,
                tags,
                category,
            } => {
                let result = RegistryCommandService::add_prompt(
                    &self.registries,
                    name,
                    description,
                    text,
                    tags.clone(),
                    category.clone(),
                )?;
                Ok(format!(
                    "Added prompt '{}' ({})",
                    result.name,
                    result.document.display()
                ))
            }
            PromptCommands::Update {
                name,
                description,
                text,
            } => {
                let prompt = RegistryCommandService::update_prompt(
                    &self.registries,
                    name,
                    PromptUpdate {
                        description: description.clone(),
                        prompt: text.clone(),
                    },
                )?;
                Ok(format!("Updated prompt '{}'", prompt.name))
            }
            PromptCommands::Remove { name, force } => self.handle_remove(kind, name, *force),
            PromptCommands::Copy { name } => self.handle_copy(kind, name),
        }
    }

    fn handle_list(&self, kind: RecordKind, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let result = RegistryCommandService::list(&self.registries, kind)?;
        Ok(match format {
            OutputFormat::Text => format_list_text(&result),
            OutputFormat::Json => format_list_json(&result),
        })
    }

    fn handle_show(&self, kind: RecordKind, name: &str, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let result = RegistryCommandService::show(&self.registries, kind, name)?;
        Ok(match format {
            OutputFormat::Text => format_show_text(&result, None),
            OutputFormat::Json => format_show_json(&result),
        })
    }

    fn handle_remove(&self, kind: RecordKind, name: &str, force: bool) -> Result<String, ApiError> {
        if !force {
            // Fail on unknown names before asking.
            RegistryCommandService::show(&self.registries, kind, name)?;
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Remove {} '{}'?", kind, name))
                .default(false)
                .interact()?;
            if !confirmed {
                return Ok("Removal cancelled".to_string());
            }
        }

        let result = RegistryCommandService::remove(&self.registries, kind, name)?;
        Ok(format!("Removed {} '{}'", result.kind, result.name))
    }

    fn handle_copy(&self, kind: RecordKind, name: &str) -> Result<String, ApiError> {
        let result = RegistryCommandService::copy(&self.registries, kind, name, copy_to_clipboard)?;
        if result.copied {
            Ok(format!(
                "Copied {} '{}' to clipboard ({} characters)",
                result.kind, result.name, result.chars
            ))
        } else {
            Err(ApiError::Input(
                "Could not copy to clipboard (is pbcopy, xclip or clip installed?)".to_string(),
            ))
        }
    }

    fn handle_login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        api_url: Option<&str>,
    ) -> Result<String, ApiError> {
        let email = match email {
            Some(email) => email.to_string(),
            None => dialoguer::Input::<String>::new()
                .with_prompt("Email")
                .interact_text()?,
        };
        let password = match password {
            Some(password) => password.to_string(),
            None => dialoguer::Password::new()
                .with_prompt("Password")
                .interact()?,
        };
        let api_url = api_url
            .map(str::to_string)
            .unwrap_or_else(|| self.config.marketplace.api_url.clone());

        let user = block_on(MarketplaceCommandService::login(
            &self.session,
            &email,
            &password,
            &api_url,
            &prompt_one_time_code,
        ))??;
        Ok(format!("Logged in as {} ({})", user.email, api_url))
    }

    fn handle_publish_command(&self, command: &PublishCommands) -> Result<String, ApiError> {
        let (kind, name, api_url) = match command {
            PublishCommands::Agent { name, api_url } => (RecordKind::Agent, name, api_url),
            PublishCommands::Context { name, api_url } => (RecordKind::Context, name, api_url),
            PublishCommands::Prompt { name, api_url } => (RecordKind::Prompt, name, api_url),
            PublishCommands::Dir {
                kind,
                dir,
                name,
                description,
                api_url,
            } => {
                let kind = parse_kind(kind)?;
                let client = self.marketplace_client(api_url.as_deref());
                let result = block_on(MarketplaceCommandService::publish_directory(
                    &client,
                    kind,
                    dir,
                    name,
                    description,
                ))??;
                return Ok(format_publish_result(&result));
            }
        };

        let client = self.marketplace_client(api_url.as_deref());
        let result = block_on(MarketplaceCommandService::publish(
            &self.registries,
            &client,
            kind,
            name,
        ))??;
        Ok(format_publish_result(&result))
    }
}

/// Ask for the one-time code on the terminal.
pub fn prompt_one_time_code() -> Result<String, ApiError> {
    Ok(dialoguer::Input::<String>::new()
        .with_prompt("Verification code")
        .interact_text()?)
}

pub fn parse_kind(kind: &str) -> Result<RecordKind, ApiError> {
    RecordKind::parse(kind).ok_or_else(|| {
        ApiError::Validation(format!(
            "Unknown kind '{}' (expected agent, context or prompt)",
            kind
        ))
    })
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Agent { .. } => "agent",
        Commands::Context { .. } => "context",
        Commands::Prompt { .. } => "prompt",
        Commands::Search { .. } => "search",
        Commands::Stats { .. } => "stats",
        Commands::Login { .. } => "login",
        Commands::Logout => "logout",
        Commands::Whoami => "whoami",
        Commands::Publish { .. } => "publish",
        Commands::Menu => "menu",
    }
}
