//! Calculator core: expression buffer, evaluator, button table and renderer
//!
//! Everything here is pure and synchronous. Session state and timing live in
//! `state_machine`; delivery to the chat surface lives in `runtime`.

pub mod buffer;
pub mod buttons;
pub mod eval;
pub mod render;

#[cfg(test)]
mod proptests;

pub use buffer::ExpressionBuffer;
pub use buttons::{resolve, ButtonSpec, Operation, Operator, LAYOUT};
pub use eval::{evaluate, EvalError, ERROR_DISPLAY};
pub use render::{render, ButtonView, DisplayPayload};

use serde::Serialize;

/// Whether a session still accepts input. Only ever moves Active -> Expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Expired,
}

/// Apply one operation to a buffer. Returns the evaluation error, if any,
/// after writing the error marker into the buffer.
pub fn apply(buffer: &mut ExpressionBuffer, operation: Operation) -> Option<EvalError> {
    match operation {
        Operation::AppendDigit(d) => {
            let mut tmp = [0u8; 4];
            buffer.append(d.encode_utf8(&mut tmp));
        }
        Operation::AppendOperator(op) => buffer.append(op.token()),
        Operation::AppendDecimal => buffer.append("."),
        Operation::ClearAll | Operation::ClearLast => buffer.clear(),
        Operation::Backspace => buffer.backspace(),
        Operation::Evaluate => match evaluate(buffer.current_value()) {
            Ok(result) => buffer.replace(result),
            Err(e) => {
                buffer.replace(ERROR_DISPLAY);
                return Some(e);
            }
        },
        Operation::Noop => {}
    }
    None
}
