//! Assertion types and builders for verifying step results.

use serde_json::Value as Json;

use crate::error::{FixtureError, FixtureResult};
use crate::fixture::Fixture;

/// What a step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A normalized document, with the result of normalizing it again.
    Normalized {
        input: Json,
        output: Json,
        again: Result<Json, String>,
    },
    /// Entities selected by a predicate, as seed labels in result order.
    Selected(Vec<String>),
}

/// A complete assertion for a step result.
#[derive(Debug, Default)]
pub struct Assertion {
    // Document assertions
    pub document: Option<String>,
    pub json: Option<Json>,
    pub unchanged: bool,
    pub idempotent: bool,

    // Selection assertions
    pub selects: Option<Vec<String>>,
    pub count: Option<usize>,

    // Error assertions
    pub error: Option<String>,
    pub error_pattern: Option<String>,
}

impl Assertion {
    /// Create a new empty assertion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect the output to equal `documents/<name>.json`.
    pub fn canonical(mut self, name: impl Into<String>) -> Self {
        self.document = Some(name.into());
        self
    }

    /// Expect the output to equal a literal document.
    pub fn equals(mut self, json: Json) -> Self {
        self.json = Some(json);
        self
    }

    /// Expect the output to equal the input.
    pub fn unchanged(mut self) -> Self {
        self.unchanged = true;
        self
    }

    /// Expect normalizing the output to give the output back.
    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    /// Expect exactly these entities, in this order.
    pub fn selects(mut self, labels: &[&str]) -> Self {
        self.selects = Some(labels.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Expect nothing to be selected.
    pub fn empty(self) -> Self {
        self.selects(&[])
    }

    pub fn count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    /// Expect failure with a message containing `text`.
    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.error = Some(text.into());
        self
    }

    /// Expect failure with a message matching a regex.
    pub fn error_matching(mut self, pattern: impl Into<String>) -> Self {
        self.error_pattern = Some(pattern.into());
        self
    }

    /// Verify the assertion against a result.
    pub fn verify(
        &self,
        step: &str,
        result: &Result<Outcome, String>,
        fixture: &Fixture,
    ) -> FixtureResult<()> {
        if let Some(ref expected) = self.error {
            return match result {
                Err(msg) if msg.contains(expected.as_str()) => Ok(()),
                Err(msg) => Err(FixtureError::assertion_failed(
                    step,
                    format!("expected error containing '{}', got: {}", expected, msg),
                )),
                Ok(outcome) => Err(FixtureError::assertion_failed(
                    step,
                    format!("expected error containing '{}', got {:?}", expected, outcome),
                )),
            };
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern).map_err(|e| {
                FixtureError::assertion_failed(step, format!("invalid regex pattern: {}", e))
            })?;
            return match result {
                Err(msg) if re.is_match(msg) => Ok(()),
                Err(msg) => Err(FixtureError::assertion_failed(
                    step,
                    format!("expected error matching '{}', got: {}", pattern, msg),
                )),
                Ok(outcome) => Err(FixtureError::assertion_failed(
                    step,
                    format!("expected error matching '{}', got {:?}", pattern, outcome),
                )),
            };
        }

        let outcome = result
            .as_ref()
            .map_err(|msg| FixtureError::assertion_failed(step, format!("step failed: {}", msg)))?;

        match outcome {
            Outcome::Normalized {
                input,
                output,
                again,
            } => self.verify_document(step, input, output, again, fixture),
            Outcome::Selected(labels) => self.verify_selection(step, labels),
        }
    }

    fn verify_document(
        &self,
        step: &str,
        input: &Json,
        output: &Json,
        again: &Result<Json, String>,
        fixture: &Fixture,
    ) -> FixtureResult<()> {
        if let Some(ref name) = self.document {
            let expected = fixture.document(name)?;
            expect_json(step, &expected, output)?;
        }
        if let Some(ref expected) = self.json {
            expect_json(step, expected, output)?;
        }
        if self.unchanged {
            expect_json(step, input, output)?;
        }
        if self.idempotent {
            match again {
                Ok(again) => expect_json(step, output, again)?,
                Err(msg) => {
                    return Err(FixtureError::assertion_failed(
                        step,
                        format!("normalized output was rejected: {}", msg),
                    ))
                }
            }
        }
        if self.selects.is_some() || self.count.is_some() {
            return Err(FixtureError::assertion_failed(
                step,
                "selection assertion on a document step",
            ));
        }
        Ok(())
    }

    fn verify_selection(&self, step: &str, labels: &[String]) -> FixtureResult<()> {
        if let Some(ref expected) = self.selects {
            if labels != expected.as_slice() {
                return Err(FixtureError::assertion_failed(
                    step,
                    format!("expected {:?}, selected {:?}", expected, labels),
                ));
            }
        }
        if let Some(expected) = self.count {
            if labels.len() != expected {
                return Err(FixtureError::assertion_failed(
                    step,
                    format!("expected {} entities, selected {}", expected, labels.len()),
                ));
            }
        }
        Ok(())
    }
}

fn expect_json(step: &str, expected: &Json, actual: &Json) -> FixtureResult<()> {
    if expected == actual {
        return Ok(());
    }
    let pretty = |json: &Json| serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());
    Err(FixtureError::assertion_failed(
        step,
        format!("expected\n{}\ngot\n{}", pretty(expected), pretty(actual)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Fixture {
        Fixture::from_sources(r#"{ "entities": {} }"#, None).unwrap()
    }

    #[test]
    fn test_selection_order_matters() {
        let a = Assertion::new().selects(&["a", "b"]);
        let result = Ok(Outcome::Selected(vec!["b".into(), "a".into()]));

        assert!(a.verify("s", &result, &fixture()).is_err());
    }

    #[test]
    fn test_error_expectation() {
        let a = Assertion::new().error("no match predicate");

        assert!(a
            .verify("s", &Err("$.addresses: no match predicate reachable".into()), &fixture())
            .is_ok());
        assert!(a.verify("s", &Ok(Outcome::Selected(vec![])), &fixture()).is_err());
    }

    #[test]
    fn test_error_pattern() {
        let a = Assertion::new().error_matching(r"^\$\.orders\[\d+\]");

        assert!(a
            .verify("s", &Err("$.orders[1]: boom".into()), &fixture())
            .is_ok());
    }

    #[test]
    fn test_unchanged_document() {
        let doc = json!({"a": 1});
        let result = Ok(Outcome::Normalized {
            input: doc.clone(),
            output: doc.clone(),
            again: Ok(doc),
        });

        assert!(Assertion::new()
            .unchanged()
            .idempotent()
            .verify("s", &result, &fixture())
            .is_ok());
    }
}
