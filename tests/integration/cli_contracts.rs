use agenco::tooling::cli::{Commands, FileRecordArgs, FileRecordCommands, PromptCommands};
use agenco::ApiError;
use tempfile::TempDir;

use crate::integration::support::{cli_context, run, write_file};

fn add_agent(name: &str, files: Vec<String>) -> Commands {
    Commands::Agent {
        command: FileRecordCommands::Add(FileRecordArgs {
            name: name.to_string(),
            description: "CI helper".to_string(),
            files,
            tags: vec!["ci".to_string()],
            category: None,
            content_type: None,
        }),
    }
}

#[test]
fn agent_list_json_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    let file = write_file(&temp, "a.md", "hello");
    run(&ctx, add_agent("deploy", vec![file]));

    let output = run(
        &ctx,
        Commands::Agent {
            command: FileRecordCommands::List {
                format: "json".to_string(),
            },
        },
    );
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.get("total").and_then(|v| v.as_u64()), Some(1));
    let entry = &parsed["agents"][0];
    assert_eq!(entry["name"], "deploy");
    assert_eq!(entry["description"], "CI helper");
    assert_eq!(entry["detail"], "1 file");
    assert_eq!(entry["tags"][0], "ci");
}

#[test]
fn agent_show_json_contract_includes_content() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    let file = write_file(&temp, "a.md", "hello");
    run(&ctx, add_agent("deploy", vec![file.clone()]));

    let output = run(
        &ctx,
        Commands::Agent {
            command: FileRecordCommands::Show {
                name: "deploy".to_string(),
                format: "json".to_string(),
            },
        },
    );
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["kind"], "agent");
    assert_eq!(parsed["files"][0], file.as_str());
    assert_eq!(
        parsed["content"].as_str().unwrap(),
        format!("# File: {}\n\nhello", file)
    );
}

#[test]
fn duplicate_add_surfaces_error_message() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    run(&ctx, add_agent("deploy", vec![]));

    let err = ctx.execute(&add_agent("deploy", vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Agent 'deploy' already exists");
}

#[test]
fn content_type_rejected_for_agents() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    let err = ctx
        .execute(&Commands::Agent {
            command: FileRecordCommands::Add(FileRecordArgs {
                name: "deploy".to_string(),
                description: String::new(),
                files: vec![],
                tags: vec![],
                category: None,
                content_type: Some("code".to_string()),
            }),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn forced_remove_and_missing_record() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    run(
        &ctx,
        Commands::Prompt {
            command: PromptCommands::Add {
                name: "greet".to_string(),
                description: String::new(),
                text: "Hi there".to_string(),
                tags: vec![],
                category: None,
            },
        },
    );

    let remove = Commands::Prompt {
        command: PromptCommands::Remove {
            name: "greet".to_string(),
            force: true,
        },
    };
    assert_eq!(run(&ctx, remove.clone()), "Removed prompt 'greet'");
    let err = ctx.execute(&remove).unwrap_err();
    assert_eq!(err.to_string(), "Prompt 'greet' not found");
}

#[test]
fn prompt_update_keeps_unspecified_fields() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    run(
        &ctx,
        Commands::Prompt {
            command: PromptCommands::Add {
                name: "greet".to_string(),
                description: String::new(),
                text: "Hi there".to_string(),
                tags: vec![],
                category: None,
            },
        },
    );
    run(
        &ctx,
        Commands::Prompt {
            command: PromptCommands::Update {
                name: "greet".to_string(),
                description: Some("Greeting".to_string()),
                text: None,
            },
        },
    );

    let prompt = ctx.registries().prompts.get("greet").unwrap().unwrap();
    assert_eq!(prompt.description, "Greeting");
    assert_eq!(prompt.prompt, "Hi there");
}

#[test]
fn search_json_contract_groups_by_kind() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    let file = write_file(&temp, "a.md", "hello world");
    run(&ctx, add_agent("deploy", vec![file]));

    let output = run(
        &ctx,
        Commands::Search {
            query: "HELLO".to_string(),
            format: "json".to_string(),
        },
    );
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["query"], "HELLO");
    assert_eq!(parsed["total"], 1);
    assert_eq!(parsed["agents"][0]["name"], "deploy");
    assert!(parsed["contexts"].as_array().unwrap().is_empty());
    assert!(parsed["prompts"].as_array().unwrap().is_empty());
}

#[test]
fn stats_json_counts_every_kind() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    run(&ctx, add_agent("a", vec![]));
    run(&ctx, add_agent("b", vec![]));

    let output = run(
        &ctx,
        Commands::Stats {
            format: "json".to_string(),
        },
    );
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["agents"], 2);
    assert_eq!(parsed["contexts"], 0);
    assert_eq!(parsed["prompts"], 0);
    assert_eq!(parsed["total"], 2);
}

#[test]
fn invalid_format_is_rejected() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    let err = ctx
        .execute(&Commands::Stats {
            format: "xml".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
}

#[test]
fn logout_and_whoami_without_session() {
    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    assert_eq!(run(&ctx, Commands::Logout), "Not logged in");
    assert_eq!(run(&ctx, Commands::Whoami), "Not logged in");
}
