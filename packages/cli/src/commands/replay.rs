use crate::config;
use crate::script::{self, Script, StepOutcome};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{Document, DocumentModel, VariantRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document snapshot (JSON)
    pub snapshot: PathBuf,

    /// Session script (JSON)
    pub script: PathBuf,

    /// Write the final snapshot here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop at the first rejected step and fail
    #[arg(short, long)]
    pub strict: bool,
}

pub fn replay(args: ReplayArgs, cwd: &str, config_file: Option<&Path>) -> Result<()> {
    let config = config::resolve(cwd, config_file)?;

    let model: DocumentModel = read_json(&args.snapshot)?;
    let script: Script = read_json(&args.script)?;

    let document = Document::from_model_with(&model, VariantRegistry::builtin(), config)
        .with_context(|| format!("Invalid snapshot {}", args.snapshot.display()))?;

    info!(steps = script.steps.len(), strict = args.strict, "Replaying script");
    let replay = script::replay(document, &script, args.strict);

    eprintln!(
        "{} {} ({} steps)",
        "▶".bright_blue(),
        args.script.display(),
        script.steps.len()
    );
    for (i, (step, outcome)) in script.steps.iter().zip(&replay.outcomes).enumerate() {
        match outcome {
            StepOutcome::Applied { at, len } => eprintln!(
                "  {} {:>3} {} {}",
                "✓".green(),
                i + 1,
                step.label(),
                format!("(at {at}/{len})").dimmed()
            ),
            StepOutcome::Skipped => eprintln!(
                "  {} {:>3} {} {}",
                "-".yellow(),
                i + 1,
                step.label(),
                "(nothing to do)".dimmed()
            ),
            StepOutcome::Rejected(err) => {
                eprintln!("  {} {:>3} {}: {}", "✗".red(), i + 1, step.label(), err)
            }
        }
    }
    if let Some(selection) = &replay.last_selection {
        eprintln!("  selection: {}", serde_json::to_string(selection)?.dimmed());
    }

    let snapshot = serde_json::to_string_pretty(&replay.document.to_model())?;
    match &args.output {
        Some(path) => {
            fs::write(path, snapshot)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{snapshot}"),
    }

    let rejected = replay.rejected();
    if args.strict && rejected > 0 {
        anyhow::bail!("replay stopped at a rejected step");
    }
    if rejected > 0 {
        eprintln!("{} {} step(s) rejected", "⚠️".yellow(), rejected);
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn snapshot() -> serde_json::Value {
        json!({
            "sections": [
                { "name": "s1", "components": [
                    { "name": "c1", "variantKind": "Paragraph", "text": "" }
                ] }
            ]
        })
    }

    fn args(dir: &Path, steps: serde_json::Value, strict: bool) -> ReplayArgs {
        ReplayArgs {
            snapshot: write(dir, "snapshot.json", snapshot()),
            script: write(dir, "script.json", json!({ "steps": steps })),
            output: Some(dir.join("out.json")),
            strict,
        }
    }

    fn insert(component: &str, value: &str) -> serde_json::Value {
        json!({ "transact": [ {
            "do":   { "op": "insertChars", "component": component, "index": 0, "value": value },
            "undo": { "op": "removeChars", "component": component, "index": 0, "count": value.chars().count() }
        } ] })
    }

    #[test]
    fn test_replay_writes_final_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        let steps = json!([insert("c1", "Hello"), insert("c1", "Oh "), "undo"]);

        replay(args(dir.path(), steps, false), cwd, None).unwrap();

        let out: DocumentModel =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
        assert_eq!(out.component("c1").unwrap().fields["text"], "Hello");
    }

    #[test]
    fn test_rejected_step_fails_only_when_strict() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        let steps = json!([insert("ghost", "x"), insert("c1", "ok")]);

        replay(args(dir.path(), steps.clone(), false), cwd, None).unwrap();
        let out: DocumentModel =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
        assert_eq!(out.component("c1").unwrap().fields["text"], "ok");

        assert!(replay(args(dir.path(), steps, true), cwd, None).is_err());
    }

    #[test]
    fn test_malformed_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        let mut args = args(dir.path(), json!([]), false);
        args.script = write(dir.path(), "bad.json", json!({ "steps": ["rewind"] }));

        assert!(replay(args, cwd, None).is_err());
    }
}
