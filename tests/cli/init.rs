use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Created .i18nizerc.json"));

    let content = test.read_file(".i18nizerc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["sourceLocale"], "en");
    assert_eq!(parsed["targetLocale"], "he");
    assert_eq!(parsed["keyStrategy"], "camelCase");
    assert_eq!(parsed["hookModule"], "react-i18next");
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".i18nizerc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("already exists"));
    assert_eq!(test.read_file(".i18nizerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file(
        "src/App.tsx",
        "export function App() {\n  return <div>Test</div>;\n}\n",
    )?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "extract should work with the initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(test.root().join("en.json").exists());

    Ok(())
}
