use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use jsonkv_sdk::{decode, encode, Record, SdkError, Validator};
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli, config: &CliConfig) -> anyhow::Result<()> {
    let path = cli.file.unwrap_or_else(|| config.data_file.clone());
    let format = cli.format;
    match cli.command {
        Command::Show => cmd_show(&path, format),
        Command::Get(args) => cmd_get(&path, args, format),
        Command::Set(args) => cmd_set(&path, args, config.pretty),
        Command::Remove(args) => cmd_remove(&path, args, config.pretty),
        Command::Validate(args) => cmd_validate(&path, args, format),
        Command::Encode(args) => cmd_encode(args),
        Command::Decode(args) => cmd_decode(args, format),
    }
}

// ---- File I/O ----

/// Load a record from a flat store file. A missing file is an empty record.
pub fn load_record(path: &Path) -> anyhow::Result<Record> {
    if !path.exists() {
        debug!(path = %path.display(), "flat store file missing; starting empty");
        return Ok(Record::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON object of strings", path.display()))
}

pub fn save_record(path: &Path, record: &Record, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    std::fs::write(path, text + "\n").with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), entries = record.flat_store().len(), "flat store saved");
    Ok(())
}

/// Parse command-line value text, or take it verbatim as a string.
pub fn parse_value(text: &str, raw: bool) -> anyhow::Result<Value> {
    if raw {
        return Ok(Value::String(text.to_string()));
    }
    serde_json::from_str(text)
        .with_context(|| format!("{text:?} is not JSON; pass --raw to store it as a string"))
}

fn render(value: &Value, format: OutputFormat) -> anyhow::Result<String> {
    match (format, value) {
        (OutputFormat::Text, Value::String(s)) => Ok(s.clone()),
        (OutputFormat::Text, other) => Ok(encode(other)?),
        (OutputFormat::Json, other) => Ok(serde_json::to_string_pretty(other)?),
    }
}

// ---- Commands ----

fn cmd_show(path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let mut record = load_record(path)?;
    let data = record.data();
    match format {
        OutputFormat::Json => {
            let decoded = data.to_decoded()?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        OutputFormat::Text => {
            if data.is_empty() {
                println!("{}", "(empty)".dimmed());
            }
            for (key, value) in data.items() {
                match value {
                    Ok(value) => println!("{} = {}", key.cyan(), encode(&value)?),
                    Err(err) => println!("{} = {} {}", key.cyan(), err.raw().red(), "(invalid)".red()),
                }
            }
        }
    }
    Ok(())
}

fn cmd_get(path: &Path, args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut record = load_record(path)?;
    let data = record.data();
    let value = match args.default {
        Some(default) => data.get_or_default(&args.key, Value::String(default))?,
        None => data.get(&args.key)?,
    };
    println!("{}", render(&value, format)?);
    Ok(())
}

/// Store `value` under `key` and return the stored text.
pub fn set_entry(record: &mut Record, key: &str, value: Value) -> anyhow::Result<String> {
    record.data().set(key, value)?;
    record
        .flat_store()
        .get(key)
        .cloned()
        .with_context(|| format!("{key} missing after write"))
}

fn cmd_set(path: &Path, args: SetArgs, pretty: bool) -> anyhow::Result<()> {
    let value = parse_value(&args.value, args.raw)?;
    let mut record = load_record(path)?;
    let stored = set_entry(&mut record, &args.key, value)?;
    save_record(path, &record, pretty)?;
    println!("{} {} = {}", "✓".green().bold(), args.key.cyan(), stored);
    Ok(())
}

fn cmd_remove(path: &Path, args: RemoveArgs, pretty: bool) -> anyhow::Result<()> {
    let mut record = load_record(path)?;
    let removed = record.data().remove(&args.key)?;
    if !removed {
        println!("{} not present", args.key.yellow());
        return Ok(());
    }
    save_record(path, &record, pretty)?;
    println!("{} removed {}", "✓".green().bold(), args.key.cyan());
    Ok(())
}

fn cmd_validate(path: &Path, args: ValidateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let record = load_record(path)?;

    if args.all {
        let report = Validator::report(record.flat_store());
        if format == OutputFormat::Json {
            let violations: Vec<Value> = report
                .violations
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "key": v.key,
                        "raw_value": v.raw_value,
                        "suggested_encoding": v.suggested_encoding,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "checked": report.checked,
                    "violations": violations,
                }))?
            );
        } else {
            for v in &report.violations {
                println!("{} {}", "✗".red().bold(), v);
            }
        }
        if !report.is_valid() {
            bail!("{} of {} entries are not valid JSON", report.violations.len(), report.checked);
        }
    } else {
        match record.clean() {
            Ok(()) => {}
            Err(SdkError::Validation(v)) => {
                println!("{} {}", "✗".red().bold(), v);
                bail!("entry {:?} is not valid JSON", v.key);
            }
            Err(other) => return Err(other.into()),
        }
    }

    println!(
        "{} {} entries valid",
        "✓".green().bold(),
        record.flat_store().len()
    );
    Ok(())
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let value = parse_value(&args.value, args.raw)?;
    println!("{}", encode(&value)?);
    Ok(())
}

fn cmd_decode(args: DecodeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let value = decode(&args.text)?;
    println!("{}", render(&value, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_file(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("store.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let record = load_record(&dir.path().join("absent.json")).unwrap();
        assert!(record.flat_store().is_empty());
    }

    #[test]
    fn load_reads_flat_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"{"int": "1", "list": "[1, \"two\"]"}"#);
        let mut record = load_record(&path).unwrap();
        assert_eq!(record.data().get("list").unwrap(), json!([1, "two"]));
    }

    #[test]
    fn load_rejects_non_string_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"{"int": 1}"#);
        assert!(load_record(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut record = Record::new();
        set_entry(&mut record, "n", json!(5)).unwrap();

        save_record(&path, &record, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"n\":\"5\"}\n");
        assert_eq!(load_record(&path).unwrap(), record);
    }

    #[test]
    fn set_entry_returns_stored_text() {
        let mut record = Record::new();
        assert_eq!(set_entry(&mut record, "s", json!("foo")).unwrap(), "\"foo\"");
        assert_eq!(set_entry(&mut record, "l", json!([1, "two"])).unwrap(), "[1, \"two\"]");
    }

    #[test]
    fn parse_value_json_and_raw() {
        assert_eq!(parse_value("[1, 2]", false).unwrap(), json!([1, 2]));
        assert_eq!(parse_value("hello", true).unwrap(), json!("hello"));
        assert!(parse_value("hello", false).is_err());
    }

    #[test]
    fn render_text_prints_strings_bare() {
        assert_eq!(render(&json!("foo"), OutputFormat::Text).unwrap(), "foo");
        assert_eq!(render(&json!([1, "a"]), OutputFormat::Text).unwrap(), "[1, \"a\"]");
        assert_eq!(render(&json!("foo"), OutputFormat::Json).unwrap(), "\"foo\"");
    }

    #[test]
    fn set_command_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"{"int": "1"}"#);
        let args = SetArgs {
            key: "int".into(),
            value: "3".into(),
            raw: false,
        };
        cmd_set(&path, args, true).unwrap();
        let record = load_record(&path).unwrap();
        assert_eq!(record.flat_store()["int"], "3");
    }

    #[test]
    fn remove_command_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"{"a": "1", "b": "2"}"#);
        cmd_remove(&path, RemoveArgs { key: "a".into() }, true).unwrap();
        let record = load_record(&path).unwrap();
        assert!(!record.flat_store().contains_key("a"));
        assert_eq!(record.flat_store()["b"], "2");
    }

    #[test]
    fn validate_command_fails_on_bad_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"{"a": "1", "b": "not valid json"}"#);
        assert!(cmd_validate(&path, ValidateArgs { all: false }, OutputFormat::Text).is_err());
        assert!(cmd_validate(&path, ValidateArgs { all: true }, OutputFormat::Json).is_err());
    }

    #[test]
    fn validate_command_passes_clean_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"{"a": "1", "b": "\"ok\""}"#);
        assert!(cmd_validate(&path, ValidateArgs { all: false }, OutputFormat::Text).is_ok());
        assert!(cmd_validate(&path, ValidateArgs { all: true }, OutputFormat::Text).is_ok());
    }

    #[test]
    fn get_command_uses_default_for_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "{}");
        let args = GetArgs {
            key: "missing".into(),
            default: Some("\"x\"".into()),
        };
        assert!(cmd_get(&path, args, OutputFormat::Text).is_ok());

        let args = GetArgs {
            key: "missing".into(),
            default: None,
        };
        assert!(cmd_get(&path, args, OutputFormat::Text).is_err());
    }
}
