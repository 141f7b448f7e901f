use agenco::marketplace::{PUBLISH_AGENT_PATH, PUBLISH_PROMPT_PATH, UPLOAD_ASSET_PATH};
use agenco::session::auth::{LOGIN_PATH, VERIFY_2FA_PATH};
use agenco::session::{Session, SessionStore, UserProfile};
use agenco::tooling::cli::{Commands, PromptCommands, PublishCommands};
use agenco::ApiError;
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

use crate::integration::support::{cli_context, run};

fn store_session(temp: &TempDir, api_url: &str) {
    SessionStore::new(&temp.path().join("config"))
        .save(&Session {
            token: "tok".to_string(),
            user: UserProfile {
                email: "dev@example.com".to_string(),
                name: "Dev".to_string(),
                id: "1".to_string(),
            },
            api_url: api_url.to_string(),
        })
        .unwrap();
}

fn add_prompt() -> Commands {
    Commands::Prompt {
        command: PromptCommands::Add {
            name: "greet".to_string(),
            description: "Greeting".to_string(),
            text: "Hi there".to_string(),
            tags: vec![],
            category: None,
        },
    }
}

#[test]
fn publish_without_login_fails_before_any_request() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let temp = TempDir::new().unwrap();
    let ctx = cli_context(&temp, &server.url());
    run(&ctx, add_prompt());

    let err = ctx
        .execute(&Commands::Publish {
            command: PublishCommands::Prompt {
                name: "greet".to_string(),
                api_url: None,
            },
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotLoggedIn));
    mock.assert();
}

#[test]
fn publish_prompt_with_stored_session() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", PUBLISH_PROMPT_PATH)
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::PartialJson(json!({
            "name": "greet",
            "description": "Greeting",
            "content": "Hi there",
            "is_public": true
        })))
        .with_status(201)
        .with_body(json!({ "id": "p-7", "url": "https://agenco.dev/p/p-7" }).to_string())
        .create();

    let temp = TempDir::new().unwrap();
    store_session(&temp, &server.url());
    let ctx = cli_context(&temp, "http://127.0.0.1:9");
    run(&ctx, add_prompt());

    let output = run(
        &ctx,
        Commands::Publish {
            command: PublishCommands::Prompt {
                name: "greet".to_string(),
                api_url: None,
            },
        },
    );
    assert_eq!(
        output,
        "Published prompt 'greet'\n  ID: p-7\n  URL: https://agenco.dev/p/p-7"
    );
    mock.assert();
}

#[test]
fn publish_rejection_reports_status() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", PUBLISH_PROMPT_PATH)
        .with_status(409)
        .with_body("already published")
        .create();

    let temp = TempDir::new().unwrap();
    store_session(&temp, &server.url());
    let ctx = cli_context(&temp, &server.url());
    run(&ctx, add_prompt());

    let err = ctx
        .execute(&Commands::Publish {
            command: PublishCommands::Prompt {
                name: "greet".to_string(),
                api_url: Some(server.url()),
            },
        })
        .unwrap_err();
    match err {
        ApiError::Remote { status, body } => {
            assert_eq!(status, 409);
            assert_eq!(body, "already published");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[test]
fn publish_directory_skips_failed_asset() {
    let mut server = mockito::Server::new();
    let _upload = server
        .mock("POST", UPLOAD_ASSET_PATH)
        .with_status(503)
        .create();
    let publish = server
        .mock("POST", PUBLISH_AGENT_PATH)
        .match_body(Matcher::PartialJson(json!({
            "name": "bundle",
            "content": "# File: guide.md\n\nsteps"
        })))
        .with_status(200)
        .with_body("{}")
        .create();

    let temp = TempDir::new().unwrap();
    store_session(&temp, &server.url());
    let bundle = temp.path().join("bundle");
    std::fs::create_dir(&bundle).unwrap();
    std::fs::write(bundle.join("guide.md"), "steps").unwrap();
    std::fs::write(bundle.join("logo.png"), [0u8, 1]).unwrap();

    let ctx = cli_context(&temp, &server.url());
    let output = run(
        &ctx,
        Commands::Publish {
            command: PublishCommands::Dir {
                kind: "agent".to_string(),
                dir: bundle,
                name: "bundle".to_string(),
                description: String::new(),
                api_url: None,
            },
        },
    );
    assert_eq!(output, "Published agent 'bundle'");
    publish.assert();
}

#[test]
fn login_with_second_factor_then_logout() {
    let mut server = mockito::Server::new();
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body(json!({ "requires_2fa": true, "temp_token": "tmp" }).to_string())
        .create();
    let _verify = server
        .mock("POST", VERIFY_2FA_PATH)
        .match_body(Matcher::PartialJson(json!({ "code": "123456" })))
        .with_status(200)
        .with_body(
            json!({ "token": "tok-2", "user": { "email": "dev@example.com", "name": "Dev", "id": 5 } })
                .to_string(),
        )
        .create();

    let temp = TempDir::new().unwrap();
    let store = SessionStore::new(&temp.path().join("config"));
    let code = || Ok::<_, ApiError>("123456".to_string());
    let rt = tokio::runtime::Runtime::new().unwrap();
    let session = rt
        .block_on(store.login("dev@example.com", "pw", &server.url(), &code))
        .unwrap();
    assert_eq!(session.token, "tok-2");
    assert_eq!(session.user.id, "5");

    let ctx = cli_context(&temp, &server.url());
    assert_eq!(
        run(&ctx, Commands::Whoami),
        format!("Logged in as dev@example.com (Dev)\nMarketplace: {}", server.url())
    );
    assert_eq!(run(&ctx, Commands::Logout), "Logged out");
    assert_eq!(run(&ctx, Commands::Logout), "Not logged in");
}
