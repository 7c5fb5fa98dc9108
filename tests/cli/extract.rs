use anyhow::Result;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

const GREETING: &str = r#"export function Greeting({ name }) {
  return (
    <div>
      <h1>Hello world</h1>
      <p>Welcome, {name}!</p>
    </div>
  );
}
"#;

#[test]
fn test_extract_rewrites_file_and_writes_tables() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.jsx", GREETING)?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rewrote 1 file (2 texts extracted, 1 hook added)"));

    assert_eq!(
        test.read_file("src/Greeting.jsx")?,
        r#"import { useTranslation } from 'react-i18next';
export function Greeting({ name }) {
  const { t } = useTranslation();
  return (
    <div>
      <h1>{t('helloWorld')}</h1>
      <p>{t('welcomeName', { name })}</p>
    </div>
  );
}
"#
    );
    assert_eq!(
        test.read_json("en.json")?,
        json!({ "helloWorld": "Hello world", "welcomeName": "Welcome, {{name}} !" })
    );
    assert_eq!(
        test.read_json("he.json")?,
        json!({ "helloWorld": "", "welcomeName": "" })
    );

    Ok(())
}

#[test]
fn test_existing_translations_are_preserved() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.jsx", GREETING)?;
    test.write_file("he.json", "{\n  \"helloWorld\": \"שלום עולם\"\n}\n")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_json("he.json")?,
        json!({ "helloWorld": "שלום עולם", "welcomeName": "" })
    );

    Ok(())
}

#[test]
fn test_second_run_changes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.jsx", GREETING)?;

    test.extract_command().output()?;
    let source_after_first = test.read_file("src/Greeting.jsx")?;
    let table_after_first = test.read_file("en.json")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Rewrote 0 files"));
    assert_eq!(test.read_file("src/Greeting.jsx")?, source_after_first);
    assert_eq!(test.read_file("en.json")?, table_after_first);

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.jsx", GREETING)?;

    let output = test.extract_command().arg("--dry-run").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Would rewrite 1 file"));

    assert_eq!(test.read_file("src/Greeting.jsx")?, GREETING);
    assert!(!test.root().join("en.json").exists());
    assert!(!test.root().join("he.json").exists());

    Ok(())
}

#[test]
fn test_parse_failure_exits_with_failure() -> Result<()> {
    let test = CliTest::with_file("src/Good.jsx", "const Good = () => <p>Fine</p>;\n")?;
    let broken = "const Broken = () => <p>Oops;\n";
    test.write_file("src/Broken.jsx", broken)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Broken.jsx"));

    // The broken file is left alone, the good one is still processed.
    assert_eq!(test.read_file("src/Broken.jsx")?, broken);
    assert_eq!(test.read_json("en.json")?, json!({ "fine": "Fine" }));

    Ok(())
}

#[test]
fn test_config_controls_locales_and_strategy() -> Result<()> {
    let test = CliTest::with_file(
        ".i18nizerc.json",
        r#"{
  "includes": ["app"],
  "localesRoot": "public/locales",
  "targetLocale": "fr",
  "keyStrategy": "componentSlug",
  "ignoreTexts": ["OK"]
}"#,
    )?;
    test.write_file(
        "app/Dialog.tsx",
        "export const Dialog = () => (\n  <div>\n    <p>Are you sure?</p>\n    <button>OK</button>\n  </div>\n);\n",
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_json("public/locales/en.json")?,
        json!({ "Dialog_are_you_sure": "Are you sure?" })
    );
    assert_eq!(
        test.read_json("public/locales/fr.json")?,
        json!({ "Dialog_are_you_sure": "" })
    );
    assert!(test.read_file("app/Dialog.tsx")?.contains("<button>OK</button>"));

    Ok(())
}

#[test]
fn test_sources_and_overrides_on_command_line() -> Result<()> {
    let test = CliTest::with_file("src/A.tsx", "export const A = () => <p>Alpha</p>;\n")?;
    test.write_file("src/B.tsx", "export const B = () => <p>Beta</p>;\n")?;

    let output = test
        .extract_command()
        .args(["src/A.tsx", "--locales-root", "i18n", "--key-strategy", "component-slug"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(test.read_json("i18n/en.json")?, json!({ "A_alpha": "Alpha" }));
    assert_eq!(
        test.read_file("src/B.tsx")?,
        "export const B = () => <p>Beta</p>;\n"
    );

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".i18nizerc.json", r#"{ "targetLocale": "en" }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("must differ"));

    Ok(())
}

#[test]
fn test_installed_packages_and_build_output_are_left_alone() -> Result<()> {
    const VENDORED: &str = "export const Badge = () => <span>New</span>;\n";
    let test = CliTest::with_file("src/Greeting.jsx", GREETING)?;
    test.write_file("node_modules/ui-kit/Badge.jsx", VENDORED)?;
    test.write_file("dist/Badge.jsx", VENDORED)?;

    let output = test.extract_command().arg(".").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rewrote 1 file"));

    assert_eq!(test.read_file("node_modules/ui-kit/Badge.jsx")?, VENDORED);
    assert_eq!(test.read_file("dist/Badge.jsx")?, VENDORED);
    assert!(test.read_json("en.json")?.get("new").is_none());

    Ok(())
}
