//! Recorded editing session format
//!
//! ```json
//! { "steps": [ { "transact": [ { "do": {...}, "undo": {...} } ] }, "undo", "redo" ] }
//! ```

use folio_editor::{Document, EditSession, EditorError, RecordedSelection, SelectionChange, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Transact(Transaction),
    Undo,
    Redo,
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Step::Transact(tx) => format!("transact ({} operations)", tx.len()),
            Step::Undo => "undo".to_string(),
            Step::Redo => "redo".to_string(),
        }
    }
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Applied { at: usize, len: usize },
    Skipped,
    Rejected(EditorError),
}

#[derive(Debug)]
pub struct Replay {
    pub outcomes: Vec<StepOutcome>,
    pub document: Document,
    pub last_selection: Option<SelectionChange>,
}

impl Replay {
    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, StepOutcome::Rejected(_)))
            .count()
    }
}

/// Replay `script` against `document`
///
/// With `strict`, replay stops at the first rejected step.
pub fn replay(document: Document, script: &Script, strict: bool) -> Replay {
    let mut session = EditSession::new("replay", document, RecordedSelection::new());
    let mut outcomes = Vec::with_capacity(script.steps.len());
    let mut last_selection = None;

    for (i, step) in script.steps.iter().enumerate() {
        let result = match step {
            Step::Transact(tx) => session.transact(tx.clone()).map(|applied| {
                if let Some(change) = applied.selection.last() {
                    last_selection = Some(change.clone());
                }
                true
            }),
            Step::Undo => session.undo(),
            Step::Redo => session.redo(),
        };

        let history = session.document().history();
        let outcome = match result {
            Ok(true) => StepOutcome::Applied {
                at: history.at(),
                len: history.len(),
            },
            Ok(false) => StepOutcome::Skipped,
            Err(err) => {
                warn!(step = i + 1, error = %err, "Step rejected");
                StepOutcome::Rejected(err)
            }
        };
        debug!(step = i + 1, ?outcome, "Replayed step");

        let stop = strict && matches!(outcome, StepOutcome::Rejected(_));
        outcomes.push(outcome);
        if stop {
            break;
        }
    }

    Replay {
        outcomes,
        document: session.into_document(),
        last_selection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::{Operation, Section};

    fn document() -> Document {
        let mut doc = Document::new();
        doc.insert_section(Section::new("s1")).unwrap();
        doc
    }

    #[test]
    fn test_parse_script() {
        let json = r#"{
            "steps": [
                { "transact": [
                    { "do":   { "op": "insertChars", "component": "s1-0", "index": 0, "value": "Hi" },
                      "undo": { "op": "removeChars", "component": "s1-0", "index": 0, "count": 2 } }
                ] },
                "undo",
                "redo"
            ]
        }"#;

        let script: Script = serde_json::from_str(json).unwrap();
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[1], Step::Undo);
        assert_eq!(script.steps[0].label(), "transact (1 operations)");
    }

    #[test]
    fn test_replay_reports_each_step() {
        let script = Script {
            steps: vec![
                Step::Transact(Transaction::single(Operation::insert_chars("s1-0", 0, "Hi"))),
                Step::Undo,
                Step::Undo,
                Step::Redo,
            ],
        };

        let replay = replay(document(), &script, false);
        assert_eq!(
            replay.outcomes,
            vec![
                StepOutcome::Applied { at: 1, len: 1 },
                StepOutcome::Applied { at: 0, len: 1 },
                StepOutcome::Skipped,
                StepOutcome::Applied { at: 1, len: 1 },
            ]
        );
        assert_eq!(
            replay.document.get_component_by_name("s1-0").unwrap().text(),
            Some("Hi")
        );
    }

    #[test]
    fn test_strict_replay_stops_at_rejection() {
        let bad = Step::Transact(Transaction::single(Operation::insert_chars("ghost", 0, "x")));
        let good = Step::Transact(Transaction::single(Operation::insert_chars("s1-0", 0, "x")));
        let script = Script {
            steps: vec![bad, good],
        };

        let lenient = replay(document(), &script, false);
        assert_eq!(lenient.outcomes.len(), 2);
        assert_eq!(lenient.rejected(), 1);

        let strict = replay(document(), &script, true);
        assert_eq!(strict.outcomes.len(), 1);
        assert_eq!(strict.rejected(), 1);
    }
}
