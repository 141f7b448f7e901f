//! Interactive terminal menu.

use crate::clipboard::copy_to_clipboard;
use crate::commands::{FileRecordInput, MarketplaceCommandService, RegistryCommandService};
use crate::error::ApiError;
use crate::registry::{PromptUpdate, Record, RecordKind};
use crate::search::SearchResults;
use crate::tooling::block_on;
use crate::tooling::cli::{prompt_one_time_code, CliContext};
use crate::tooling::format::{
    format_publish_result, format_search_text, format_section_heading, format_show_text,
    format_stats_line, format_whoami, record_table,
};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use owo_colors::OwoColorize;

const SHOW_PREVIEW_CHARS: usize = 500;

const MAIN_ITEMS: [&str; 7] = [
    "Agents", "Contexts", "Prompts", "Search", "Publish", "Account", "Exit",
];

/// Split a comma-separated answer into trimmed, non-empty entries.
pub fn parse_comma_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Join lines read until the first empty one. `None` if the first line is empty.
///
/// A read error ends collection and is returned; no partial text is kept.
pub fn collect_until_blank<I>(lines: I) -> Result<Option<String>, ApiError>
where
    I: IntoIterator<Item = Result<String, ApiError>>,
{
    let mut collected = Vec::new();
    for line in lines {
        let line = line?;
        if line.is_empty() {
            break;
        }
        collected.push(line);
    }
    Ok(if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindAction {
    Show,
    Copy,
    Add,
    Update,
    Remove,
    Back,
}

impl KindAction {
    fn label(&self) -> &'static str {
        match self {
            KindAction::Show => "Show details",
            KindAction::Copy => "Copy to clipboard",
            KindAction::Add => "Add",
            KindAction::Update => "Update",
            KindAction::Remove => "Remove",
            KindAction::Back => "Back",
        }
    }

    /// Actions offered for `kind`; only prompts can be updated in place.
    fn for_kind(kind: RecordKind) -> Vec<KindAction> {
        let mut actions = vec![KindAction::Show, KindAction::Copy, KindAction::Add];
        if kind == RecordKind::Prompt {
            actions.push(KindAction::Update);
        }
        actions.extend([KindAction::Remove, KindAction::Back]);
        actions
    }
}

/// Menu session over a [`CliContext`].
pub struct Menu<'a> {
    ctx: &'a CliContext,
    theme: ColorfulTheme,
}

impl<'a> Menu<'a> {
    pub fn new(ctx: &'a CliContext) -> Self {
        Self {
            ctx,
            theme: ColorfulTheme::default(),
        }
    }

    /// Loop until the user picks Exit or presses Escape.
    pub fn run(&self) -> Result<(), ApiError> {
        tracing::info!("menu started");
        loop {
            self.print_header();
            let choice = Select::with_theme(&self.theme)
                .with_prompt("Main menu")
                .items(&MAIN_ITEMS)
                .default(0)
                .interact_opt()?;

            let outcome = match choice {
                Some(0) => self.kind_menu(RecordKind::Agent),
                Some(1) => self.kind_menu(RecordKind::Context),
                Some(2) => self.kind_menu(RecordKind::Prompt),
                Some(3) => self.search_menu(),
                Some(4) => self.publish_menu(),
                Some(5) => self.account_menu(),
                _ => break,
            };
            report(outcome)?;
        }
        tracing::info!("menu closed");
        Ok(())
    }

    fn print_header(&self) {
        println!();
        println!("{}", format_section_heading("Agenco"));
        match RegistryCommandService::stats(self.ctx.registries()) {
            Ok(stats) => println!("{}", format_stats_line(&stats).dimmed()),
            Err(e) => println!("{}", format!("Could not read registries: {}", e).red()),
        }
        println!();
    }

    fn kind_menu(&self, kind: RecordKind) -> Result<(), ApiError> {
        let actions = KindAction::for_kind(kind);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        loop {
            let list = RegistryCommandService::list(self.ctx.registries(), kind)?;
            println!();
            match record_table(kind, &list.items) {
                Some(table) => println!("{}", table),
                None => println!("No {}s yet.", kind),
            }

            let Some(index) = Select::with_theme(&self.theme)
                .with_prompt(kind.label())
                .items(&labels)
                .default(0)
                .interact_opt()?
            else {
                return Ok(());
            };

            let outcome = match actions[index] {
                KindAction::Show => self.show_record(kind),
                KindAction::Copy => self.copy_record(kind),
                KindAction::Add => self.add_record(kind),
                KindAction::Update => self.update_prompt(),
                KindAction::Remove => self.remove_record(kind),
                KindAction::Back => return Ok(()),
            };
            report(outcome)?;
        }
    }

    /// Pick a record name; `None` when the registry is empty or the user backs out.
    fn select_record(&self, kind: RecordKind) -> Result<Option<String>, ApiError> {
        let names = self.ctx.registries().names(kind)?;
        if names.is_empty() {
            println!("No {}s yet.", kind);
            return Ok(None);
        }
        let index = Select::with_theme(&self.theme)
            .with_prompt(format!("Select {}", kind))
            .items(&names)
            .default(0)
            .interact_opt()?;
        Ok(index.map(|i| names[i].clone()))
    }

    fn show_record(&self, kind: RecordKind) -> Result<(), ApiError> {
        let Some(name) = self.select_record(kind)? else {
            return Ok(());
        };
        let shown = RegistryCommandService::show(self.ctx.registries(), kind, &name)?;
        println!("\n{}", format_show_text(&shown, Some(SHOW_PREVIEW_CHARS)));
        Ok(())
    }

    fn copy_record(&self, kind: RecordKind) -> Result<(), ApiError> {
        let Some(name) = self.select_record(kind)? else {
            return Ok(());
        };
        self.copy_named(kind, &name)
    }

    fn copy_named(&self, kind: RecordKind, name: &str) -> Result<(), ApiError> {
        let result =
            RegistryCommandService::copy(self.ctx.registries(), kind, name, copy_to_clipboard)?;
        if result.copied {
            println!("{}", format!("Copied '{}' to clipboard", name).green());
        } else {
            println!("{}", "Clipboard unavailable (install pbcopy, xclip or clip)".yellow());
        }
        Ok(())
    }

    fn ask(&self, prompt: &str, allow_empty: bool) -> Result<String, ApiError> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()?)
    }

    /// Multi-line text, one `>` prompt per line, ended by an empty line.
    fn read_text(&self) -> Result<Option<String>, ApiError> {
        collect_until_blank(std::iter::repeat_with(|| self.ask(">", true)))
    }

    fn add_record(&self, kind: RecordKind) -> Result<(), ApiError> {
        let name = self.ask("Name", false)?;
        let description = self.ask("Description", true)?;

        let result = if kind == RecordKind::Prompt {
            println!("Enter the prompt text; finish with an empty line.");
            let Some(text) = self.read_text()? else {
                println!("{}", "Prompt text cannot be empty".red());
                return Ok(());
            };
            RegistryCommandService::add_prompt(
                self.ctx.registries(),
                &name,
                &description,
                &text,
                Vec::new(),
                None,
            )?
        } else {
            let files = parse_comma_list(&self.ask("Files (comma-separated)", true)?);
            let tags = parse_comma_list(&self.ask("Tags (comma-separated)", true)?);
            let mut input = FileRecordInput {
                name,
                description,
                files,
                tags,
                ..FileRecordInput::default()
            };
            if kind == RecordKind::Context {
                input.content_type = Some(self.ask("Content type (optional)", true)?);
                RegistryCommandService::add_context(self.ctx.registries(), input)?
            } else {
                RegistryCommandService::add_agent(self.ctx.registries(), input)?
            }
        };
        println!("{}", format!("Added {} '{}'", result.kind, result.name).green());
        Ok(())
    }

    fn update_prompt(&self) -> Result<(), ApiError> {
        let Some(name) = self.select_record(RecordKind::Prompt)? else {
            return Ok(());
        };
        let description = self.ask("New description (empty keeps current)", true)?;
        println!("New prompt text; finish with an empty line (empty keeps current).");
        let update = PromptUpdate {
            description: Some(description).filter(|d| !d.is_empty()),
            prompt: self.read_text()?,
        };
        if update.is_empty() {
            println!("Nothing changed.");
            return Ok(());
        }
        let prompt = RegistryCommandService::update_prompt(self.ctx.registries(), &name, update)?;
        println!("{}", format!("Updated prompt '{}'", prompt.name).green());
        Ok(())
    }

    fn remove_record(&self, kind: RecordKind) -> Result<(), ApiError> {
        let Some(name) = self.select_record(kind)? else {
            return Ok(());
        };
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(format!("Remove {} '{}'?", kind, name))
            .default(false)
            .interact()?;
        if confirmed {
            RegistryCommandService::remove(self.ctx.registries(), kind, &name)?;
            println!("{}", format!("Removed {} '{}'", kind, name).green());
        }
        Ok(())
    }

    fn search_menu(&self) -> Result<(), ApiError> {
        let query = self.ask("Search", false)?;
        let results = RegistryCommandService::search(self.ctx.registries(), &query)?;
        println!("\n{}", format_search_text(&query, &results));
        if results.is_empty() {
            return Ok(());
        }

        let choices = search_choices(&results);
        let mut labels: Vec<String> = choices
            .iter()
            .map(|(kind, name)| format!("[{}] {}", kind, name))
            .collect();
        labels.push("Done".to_string());
        let index = Select::with_theme(&self.theme)
            .with_prompt("Copy a result to clipboard")
            .items(&labels)
            .default(labels.len() - 1)
            .interact_opt()?;
        match index.and_then(|i| choices.get(i)) {
            Some((kind, name)) => self.copy_named(*kind, name),
            None => Ok(()),
        }
    }

    fn publish_menu(&self) -> Result<(), ApiError> {
        let kinds = ["Agent", "Context", "Prompt"];
        let Some(index) = Select::with_theme(&self.theme)
            .with_prompt("Publish")
            .items(&kinds)
            .default(0)
            .interact_opt()?
        else {
            return Ok(());
        };
        let kind = RecordKind::ALL[index];
        let Some(name) = self.select_record(kind)? else {
            return Ok(());
        };

        if self.ctx.session().require_token().is_err() {
            println!("{}", "Publishing requires a marketplace login.".yellow());
            let login = Confirm::with_theme(&self.theme)
                .with_prompt("Log in now?")
                .default(true)
                .interact()?;
            if !login {
                return Ok(());
            }
            self.login()?;
        }

        let mut api_url = self.ctx.resolve_api_url(None);
        let custom = Confirm::with_theme(&self.theme)
            .with_prompt(format!("Use a custom API URL? (current: {})", api_url))
            .default(false)
            .interact()?;
        if custom {
            api_url = Input::<String>::with_theme(&self.theme)
                .with_prompt("API URL")
                .default(api_url)
                .interact_text()?;
        }

        println!("Publishing {} '{}'...", kind, name);
        let client = self.ctx.marketplace_client(Some(&api_url));
        let result = block_on(MarketplaceCommandService::publish(
            self.ctx.registries(),
            &client,
            kind,
            &name,
        ))??;
        println!("{}", format_publish_result(&result).green());
        Ok(())
    }

    fn account_menu(&self) -> Result<(), ApiError> {
        let items = ["Login", "Logout", "Who am I", "Back"];
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Account")
            .items(&items)
            .default(0)
            .interact_opt()?;
        match choice {
            Some(0) => self.login(),
            Some(1) => {
                if MarketplaceCommandService::logout(self.ctx.session())? {
                    println!("Logged out");
                } else {
                    println!("Not logged in");
                }
                Ok(())
            }
            Some(2) => {
                let whoami = MarketplaceCommandService::whoami(self.ctx.session())?;
                println!("{}", format_whoami(&whoami));
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn login(&self) -> Result<(), ApiError> {
        let email = self.ask("Email", false)?;
        let password = Password::with_theme(&self.theme)
            .with_prompt("Password")
            .interact()?;
        let api_url = self.ctx.config().marketplace.api_url.clone();
        let user = block_on(MarketplaceCommandService::login(
            self.ctx.session(),
            &email,
            &password,
            &api_url,
            &prompt_one_time_code,
        ))??;
        println!("{}", format!("Logged in as {}", user.email).green());
        Ok(())
    }
}

fn search_choices(results: &SearchResults) -> Vec<(RecordKind, String)> {
    let agents = results
        .agents
        .iter()
        .map(|r| (RecordKind::Agent, r.name().to_string()));
    let contexts = results
        .contexts
        .iter()
        .map(|r| (RecordKind::Context, r.name().to_string()));
    let prompts = results
        .prompts
        .iter()
        .map(|r| (RecordKind::Prompt, r.name().to_string()));
    agents.chain(contexts).chain(prompts).collect()
}

/// Print a failed action and keep the menu running. Terminal I/O failures end the menu.
fn report(outcome: Result<(), ApiError>) -> Result<(), ApiError> {
    match outcome {
        Err(e @ ApiError::Input(_)) => Err(e),
        Err(e) => {
            println!("{}", format!("Error: {}", e).red());
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}
