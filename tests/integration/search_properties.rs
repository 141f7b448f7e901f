use agenco::search::search;
use agenco::{Agent, Prompt, Registries};
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn search_ignores_query_case(
        text in "[a-zA-Z ]{1,40}",
        query in "[a-zA-Z]{1,4}",
    ) {
        let temp = TempDir::new().unwrap();
        let registries = Registries::open(temp.path());
        registries.prompts.add(Prompt::new("p", "", text.clone())).unwrap();
        registries.agents.add(Agent::new(text.trim().to_string() + "-agent", "", vec![])).unwrap();

        let upper = search(&registries, &query.to_uppercase()).unwrap();
        let lower = search(&registries, &query.to_lowercase()).unwrap();
        prop_assert_eq!(upper, lower);
    }

    #[test]
    fn added_prompt_reads_back_unchanged(
        name in "[a-z][a-z0-9_-]{0,20}",
        description in ".{0,40}",
        text in ".{1,80}",
    ) {
        let temp = TempDir::new().unwrap();
        let registries = Registries::open(temp.path());
        registries
            .prompts
            .add(Prompt::new(name.clone(), description.clone(), text.clone()))
            .unwrap();

        let stored = registries.prompts.get(&name).unwrap().unwrap();
        prop_assert_eq!(stored.description, description);
        prop_assert_eq!(stored.prompt, text);
    }
}

#[test]
fn content_match_found_through_referenced_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.md");
    std::fs::write(&file, "hello").unwrap();

    let registries = Registries::open(temp.path().join("data"));
    registries
        .agents
        .add(Agent::new(
            "deploy",
            "",
            vec![file.to_string_lossy().to_string()],
        ))
        .unwrap();

    let results = search(&registries, "HELLO").unwrap();
    assert_eq!(results.agents.len(), 1);
    assert_eq!(results.agents[0].name, "deploy");
}
