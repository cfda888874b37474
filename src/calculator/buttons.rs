//! Static button layout and label resolution
//!
//! Every button maps to one [`Operation`] tag through a fixed table; there are
//! no per-button callbacks.

/// Label shown on inert layout spacers (zero-width space)
pub const SPACER_LABEL: &str = "\u{200b}";

/// Operator tokens a button can append to the expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    OpenParen,
    CloseParen,
}

impl Operator {
    /// Token written into the expression buffer
    pub fn token(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
            Operator::OpenParen => "(",
            Operator::CloseParen => ")",
        }
    }
}

/// Closed set of operations a button can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AppendDigit(char),
    AppendOperator(Operator),
    AppendDecimal,
    ClearAll,
    /// Same effect as `ClearAll`; kept as a separate tag for its own button
    ClearLast,
    Backspace,
    Evaluate,
    Noop,
}

impl Operation {
    pub fn is_noop(self) -> bool {
        matches!(self, Operation::Noop)
    }
}

/// One button on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonSpec {
    pub label: &'static str,
    pub operation: Operation,
    pub row: u8,
    pub column: u8,
}

const fn button(label: &'static str, operation: Operation, row: u8, column: u8) -> ButtonSpec {
    ButtonSpec {
        label,
        operation,
        row,
        column,
    }
}

const fn op(operator: Operator) -> Operation {
    Operation::AppendOperator(operator)
}

const fn digit(d: char) -> Operation {
    Operation::AppendDigit(d)
}

/// The calculator grid, in display order
pub const LAYOUT: [ButtonSpec; 25] = [
    button("(", op(Operator::OpenParen), 0, 0),
    button(")", op(Operator::CloseParen), 0, 1),
    button("^", op(Operator::Power), 0, 2),
    button("%", op(Operator::Modulo), 0, 3),
    button("AC", Operation::ClearAll, 0, 4),
    button("7", digit('7'), 1, 0),
    button("8", digit('8'), 1, 1),
    button("9", digit('9'), 1, 2),
    button("÷", op(Operator::Divide), 1, 3),
    button("DC", Operation::ClearLast, 1, 4),
    button("4", digit('4'), 2, 0),
    button("5", digit('5'), 2, 1),
    button("6", digit('6'), 2, 2),
    button("X", op(Operator::Multiply), 2, 3),
    button("⌫", Operation::Backspace, 2, 4),
    button("1", digit('1'), 3, 0),
    button("2", digit('2'), 3, 1),
    button("3", digit('3'), 3, 2),
    button("-", op(Operator::Subtract), 3, 3),
    button(SPACER_LABEL, Operation::Noop, 3, 4),
    button(".", Operation::AppendDecimal, 4, 0),
    button("0", digit('0'), 4, 1),
    button("=", Operation::Evaluate, 4, 2),
    button("+", op(Operator::Add), 4, 3),
    button(SPACER_LABEL, Operation::Noop, 4, 4),
];

/// Resolve a pressed label to its operation. `None` for labels that are not
/// on the grid.
pub fn resolve(label: &str) -> Option<Operation> {
    LAYOUT
        .iter()
        .find(|spec| spec.label == label)
        .map(|spec| spec.operation)
}
