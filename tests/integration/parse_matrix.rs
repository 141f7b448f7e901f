use agenco::tooling::cli::{Cli, Commands, FileRecordCommands, PromptCommands, PublishCommands};
use clap::{CommandFactory, Parser};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["agenco"],
        vec!["agenco", "menu"],
        vec!["agenco", "agent", "list"],
        vec!["agenco", "agent", "list", "--format", "json"],
        vec!["agenco", "agent", "show", "deploy"],
        vec![
            "agenco", "agent", "add", "deploy", "--description", "CI", "--file", "a.md", "--file",
            "~/b.md", "--tag", "ci",
        ],
        vec!["agenco", "agent", "remove", "deploy", "--force"],
        vec!["agenco", "agent", "copy", "deploy"],
        vec!["agenco", "context", "add", "docs", "--content-type", "documentation"],
        vec!["agenco", "prompt", "add", "greet", "--text", "Hi there"],
        vec!["agenco", "prompt", "update", "greet", "--description", "Greeting"],
        vec!["agenco", "search", "hello", "--format", "json"],
        vec!["agenco", "stats"],
        vec!["agenco", "login", "--email", "dev@example.com"],
        vec!["agenco", "logout"],
        vec!["agenco", "whoami"],
        vec!["agenco", "publish", "prompt", "greet", "--api-url", "http://localhost:8080"],
        vec!["agenco", "publish", "dir", "agent", "./bundle", "--name", "bundle"],
        vec!["agenco", "--data-dir", "/tmp/agenco", "--log-output", "stderr", "stats"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_incomplete_commands() {
    let invalid: Vec<Vec<&str>> = vec![
        vec!["agenco", "prompt", "add", "greet"],
        vec!["agenco", "agent", "show"],
        vec!["agenco", "publish", "dir", "agent", "./bundle"],
        vec!["agenco", "search"],
        vec!["agenco", "widget", "list"],
    ];
    for args in invalid {
        assert!(
            Cli::try_parse_from(args.clone()).is_err(),
            "expected parse failure for args: {args:?}"
        );
    }
}

#[test]
fn parsed_values_reach_the_command() {
    let cli = Cli::try_parse_from([
        "agenco", "agent", "add", "deploy", "--file", "a.md", "--file", "b.md",
    ])
    .unwrap();
    match cli.command() {
        Commands::Agent {
            command: FileRecordCommands::Add(args),
        } => {
            assert_eq!(args.name, "deploy");
            assert_eq!(args.files, vec!["a.md", "b.md"]);
            assert_eq!(args.description, "");
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["agenco", "prompt", "update", "greet", "--text", "Yo"]).unwrap();
    assert_eq!(
        cli.command(),
        Commands::Prompt {
            command: PromptCommands::Update {
                name: "greet".to_string(),
                description: None,
                text: Some("Yo".to_string()),
            }
        }
    );

    let cli = Cli::try_parse_from(["agenco", "publish", "context", "docs"]).unwrap();
    assert_eq!(
        cli.command(),
        Commands::Publish {
            command: PublishCommands::Context {
                name: "docs".to_string(),
                api_url: None,
            }
        }
    );
}

#[test]
fn command_definition_is_consistent() {
    <Cli as CommandFactory>::command().debug_assert();
}
