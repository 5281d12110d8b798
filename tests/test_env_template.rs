//! Tests for the committed environment template.

use std::fs;

#[test]
fn env_example_exists() {
    assert!(
        fs::metadata(".env.example").is_ok(),
        ".env.example template missing"
    );
}

#[test]
fn env_example_names_token_key() {
    let text = fs::read_to_string(".env.example").unwrap();
    assert!(
        text.contains("HUGGINGFACEHUB_API_TOKEN="),
        ".env.example should contain the required token key"
    );
}

#[test]
fn env_example_carries_no_token_value() {
    let text = fs::read_to_string(".env.example").unwrap();
    let line = text
        .lines()
        .find(|l| l.starts_with("HUGGINGFACEHUB_API_TOKEN="))
        .unwrap();
    assert_eq!(
        line, "HUGGINGFACEHUB_API_TOKEN=",
        "template must not ship a real token"
    );
}

#[test]
fn env_file_is_gitignored() {
    let text = fs::read_to_string(".gitignore").unwrap();
    assert!(
        text.lines().any(|l| l.trim() == ".env"),
        ".env must stay out of version control"
    );
}
