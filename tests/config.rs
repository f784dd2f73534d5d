use std::path::PathBuf;
use riskdeck::config::{parse_config, resolve_settings, Overrides};
use riskdeck::errors::ReportError;
use tempfile::TempDir;

async fn config_file(dir: &TempDir, yaml: &str) -> riskdeck::config::ReportConfig {
    let path = dir.path().join("riskdeck.yaml");
    std::fs::write(&path, yaml).unwrap();
    parse_config(&path).await.unwrap()
}

#[tokio::test]
async fn test_cli_overrides_file_values() {
    let dir = TempDir::new().unwrap();
    let config = config_file(
        &dir,
        "company:\n  name: File Co\n  logo: file-logo.png\ninput:\n  data_file: file.json\noutput:\n  directory: file-out\nllm:\n  provider: local\n  model: file-model\n",
    )
    .await;

    let cli = Overrides {
        company: Some("Cli Co".into()),
        output: Some(PathBuf::from("cli-out")),
        model: Some("cli-model".into()),
        ..Default::default()
    };
    let settings = resolve_settings(&cli, &config, "2024-01-01").unwrap();
    assert_eq!(settings.company, "Cli Co");
    assert_eq!(settings.output.directory, PathBuf::from("cli-out"));
    assert_eq!(settings.logo, Some(PathBuf::from("file-logo.png")));
    assert_eq!(settings.data_file, PathBuf::from("file.json"));

    let llm = settings.llm.unwrap();
    assert_eq!(llm.provider, "local");
    assert_eq!(llm.model.as_deref(), Some("cli-model"));
}

#[tokio::test]
async fn test_file_key_beats_environment() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("GEMINI_API_KEY", "env-key");
    let config = config_file(&dir, "company:\n  name: Acme\nllm:\n  api_key: file-key\n").await;
    let llm = resolve_settings(&Overrides::default(), &config, "d").unwrap().llm.unwrap();
    assert_eq!(llm.provider, "gemini");
    assert_eq!(llm.api_key, "file-key");

    let bare = config_file(&dir, "company:\n  name: Acme\n").await;
    let llm = resolve_settings(&Overrides::default(), &bare, "d").unwrap().llm.unwrap();
    assert_eq!(llm.api_key, "env-key");
    std::env::remove_var("GEMINI_API_KEY");
}

#[tokio::test]
async fn test_disabled_in_file_wins_over_cli_key() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "company:\n  name: Acme\nllm:\n  enabled: false\n").await;
    let cli = Overrides { api_key: Some("cli-key".into()), ..Default::default() };
    assert!(resolve_settings(&cli, &config, "d").unwrap().llm.is_none());
}

#[tokio::test]
async fn test_dangerous_config_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "company:\n  name: \"<script>x</script>\"\n").unwrap();
    let err = parse_config(&path).await.unwrap_err();
    assert!(matches!(err, ReportError::Config(_)));
    assert_eq!(err.exit_code(), 2);
}
