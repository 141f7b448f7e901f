use agenco::content::FILE_NOT_FOUND;
use agenco::{Agent, ApiError, Context, Prompt, PromptUpdate, Registries};
use tempfile::TempDir;

use crate::integration::support::{document, read_json, write_file};

#[test]
fn documents_use_kind_keyed_layout() {
    let temp = TempDir::new().unwrap();
    let registries = Registries::open(temp.path().join("data"));
    registries
        .agents
        .add(Agent::new("deploy", "CI helper", vec!["~/a.md".to_string()]))
        .unwrap();
    registries
        .contexts
        .add(Context::new("docs", "", vec![]))
        .unwrap();
    registries
        .prompts
        .add(Prompt::new("greet", "", "Hi there"))
        .unwrap();

    let agents = read_json(&document(&temp, "agents"));
    assert_eq!(
        agents,
        serde_json::json!({
            "agents": [{ "name": "deploy", "description": "CI helper", "files": ["~/a.md"] }]
        })
    );
    assert_eq!(read_json(&document(&temp, "contexts"))["contexts"][0]["name"], "docs");
    assert_eq!(read_json(&document(&temp, "prompts"))["prompts"][0]["prompt"], "Hi there");
}

#[test]
fn add_remove_lifecycle_across_reopen() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    {
        let registries = Registries::open(&data);
        registries.agents.add(Agent::new("a", "", vec![])).unwrap();
        registries.agents.add(Agent::new("b", "", vec![])).unwrap();
    }

    let registries = Registries::open(&data);
    assert_eq!(registries.agents.names().unwrap(), vec!["a", "b"]);
    assert!(registries.agents.remove("a").unwrap());
    let before = std::fs::read_to_string(document(&temp, "agents")).unwrap();
    assert!(!registries.agents.remove("a").unwrap());
    let after = std::fs::read_to_string(document(&temp, "agents")).unwrap();
    assert_eq!(before, after);
    assert_eq!(registries.agents.names().unwrap(), vec!["b"]);
}

#[test]
fn duplicate_names_rejected_per_kind_only() {
    let temp = TempDir::new().unwrap();
    let registries = Registries::open(temp.path());
    registries.agents.add(Agent::new("shared", "", vec![])).unwrap();

    let err = registries
        .agents
        .add(Agent::new("shared", "different", vec!["x.md".to_string()]))
        .unwrap_err();
    assert!(matches!(err, ApiError::DuplicateName { .. }));

    // Same name in another kind is fine.
    registries
        .prompts
        .add(Prompt::new("shared", "", "text"))
        .unwrap();
}

#[test]
fn aggregation_mixes_real_sections_and_placeholders() {
    let temp = TempDir::new().unwrap();
    let first = write_file(&temp, "one.md", "first body");
    let third = write_file(&temp, "three.md", "third body");
    let missing = temp.path().join("two.md").to_string_lossy().to_string();

    let registries = Registries::open(temp.path().join("data"));
    registries
        .contexts
        .add(Context::new(
            "mixed",
            "",
            vec![first.clone(), missing.clone(), third.clone()],
        ))
        .unwrap();

    let content = registries.contexts.content("mixed").unwrap().unwrap();
    let sections: Vec<&str> = content.split("\n\n---\n\n").collect();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0], format!("# File: {}\n\nfirst body", first));
    assert_eq!(sections[1], format!("# File: {}\n\n{}", missing, FILE_NOT_FOUND));
    assert_eq!(sections[2], format!("# File: {}\n\nthird body", third));

    assert_eq!(registries.contexts.content("absent").unwrap(), None);
}

#[test]
fn prompt_partial_update_persists() {
    let temp = TempDir::new().unwrap();
    let registries = Registries::open(temp.path());
    registries
        .prompts
        .add(Prompt::new("greet", "", "Hi there"))
        .unwrap();

    registries
        .prompts
        .update(
            "greet",
            PromptUpdate {
                description: Some("Greeting".to_string()),
                prompt: None,
            },
        )
        .unwrap()
        .unwrap();

    let reopened = Registries::open(temp.path());
    let prompt = reopened.prompts.get("greet").unwrap().unwrap();
    assert_eq!(prompt.description, "Greeting");
    assert_eq!(prompt.prompt, "Hi there");
}

#[test]
fn malformed_document_is_a_storage_error() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("data")).unwrap();
    std::fs::write(document(&temp, "agents"), "{ not json").unwrap();

    let registries = Registries::open(temp.path().join("data"));
    assert!(matches!(
        registries.agents.list(),
        Err(ApiError::StorageError(_))
    ));
    // Other documents are unaffected.
    assert!(registries.prompts.list().unwrap().is_empty());
}
