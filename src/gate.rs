// The name gate on the intro page: a literal comparison against the secret.

use crate::effects::{DomOp, Effects, ElementRole};
use crate::types::{GateMessage, GateSettings};

/// Result of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Correct,
    Empty,
    Incorrect,
}

/// Classify an input value. Surrounding whitespace is ignored; the rest must
/// match the secret exactly.
pub fn evaluate(input: &str, secret: &str) -> GateOutcome {
    let input = input.trim();
    if input == secret {
        GateOutcome::Correct
    } else if input.is_empty() {
        GateOutcome::Empty
    } else {
        GateOutcome::Incorrect
    }
}

/// Gate state: locked until the right name is given once.
#[derive(Debug)]
pub struct Gate {
    settings: GateSettings,
    opened: bool,
}

impl Gate {
    pub fn new(settings: GateSettings) -> Self {
        Gate {
            settings,
            opened: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn next_page(&self) -> &str {
        &self.settings.next_page
    }

    /// Show the message for `input`. On success the input and button are
    /// disabled and the caller schedules the redirect. Submissions after
    /// success are ignored and yield `None`.
    pub fn submit(&mut self, input: &str, effects: &mut Effects) -> Option<GateOutcome> {
        if self.opened {
            return None;
        }
        let outcome = evaluate(input, &self.settings.secret);
        let message = self.message(outcome).clone();

        effects.set_style(ElementRole::Message, "color", message.color);
        effects.push(DomOp::SetText {
            target: ElementRole::Message,
            text: message.text,
        });
        effects.add_class(ElementRole::Message, "show");

        if outcome == GateOutcome::Correct {
            self.opened = true;
            for target in [ElementRole::PasswordInput, ElementRole::SubmitButton] {
                effects.push(DomOp::SetDisabled {
                    target,
                    disabled: true,
                });
            }
        }
        Some(outcome)
    }

    fn message(&self, outcome: GateOutcome) -> &GateMessage {
        match outcome {
            GateOutcome::Correct => &self.settings.correct,
            GateOutcome::Empty => &self.settings.empty,
            GateOutcome::Incorrect => &self.settings.incorrect,
        }
    }
}
