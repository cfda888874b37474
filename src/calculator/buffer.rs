//! Expression buffer for one calculator session

use serde::Serialize;

/// Value the buffer collapses to when cleared or fully backspaced
pub const DEFAULT_EXPRESSION: &str = "0";

/// The digits and operators typed so far.
///
/// Never empty: every operation that would leave it empty resets it to
/// [`DEFAULT_EXPRESSION`]. Operator adjacency and parenthesis balance are
/// not checked here; the evaluator rejects malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpressionBuffer {
    text: String,
}

impl Default for ExpressionBuffer {
    fn default() -> Self {
        Self {
            text: DEFAULT_EXPRESSION.to_string(),
        }
    }
}

impl ExpressionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token. A digit typed over the bare default replaces it, so
    /// the first `5` yields `5` rather than `05`.
    pub fn append(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }
        if self.text == DEFAULT_EXPRESSION && is_digits(token) {
            token.clone_into(&mut self.text);
        } else {
            self.text.push_str(token);
        }
    }

    /// Remove the last character, settling at the default when nothing is left.
    pub fn backspace(&mut self) {
        self.text.pop();
        if self.text.is_empty() {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        DEFAULT_EXPRESSION.clone_into(&mut self.text);
    }

    /// Replace the whole buffer, e.g. with an evaluation result.
    pub fn replace(&mut self, value: impl Into<String>) {
        self.text = value.into();
        if self.text.is_empty() {
            self.clear();
        }
    }

    pub fn current_value(&self) -> &str {
        &self.text
    }
}

fn is_digits(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit())
}
