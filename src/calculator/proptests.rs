//! Property-based tests for the calculator core

use super::*;
use proptest::prelude::*;

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop::sample::select(LAYOUT.iter().map(|b| b.operation).collect::<Vec<_>>())
}

fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]".prop_map(String::from),
        Just(".".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("^".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
    ]
}

proptest! {
    #[test]
    fn prop_buffer_never_empty(ops in proptest::collection::vec(arb_operation(), 0..60)) {
        let mut buffer = ExpressionBuffer::new();
        for op in ops {
            apply(&mut buffer, op);
            prop_assert!(!buffer.current_value().is_empty());
        }
    }

    #[test]
    fn prop_clear_always_zero(tokens in proptest::collection::vec(arb_token(), 0..30)) {
        let mut buffer = ExpressionBuffer::new();
        for t in &tokens {
            buffer.append(t);
        }
        buffer.clear();
        prop_assert_eq!(buffer.current_value(), "0");
    }

    #[test]
    fn prop_backspace_settles_at_zero(tokens in proptest::collection::vec(arb_token(), 0..30)) {
        let mut buffer = ExpressionBuffer::new();
        for t in &tokens {
            buffer.append(t);
        }
        let len = buffer.current_value().chars().count();
        for _ in 0..len + 3 {
            buffer.backspace();
        }
        prop_assert_eq!(buffer.current_value(), "0");
    }

    #[test]
    fn prop_no_leading_zero_on_first_digit(d in "[1-9]") {
        let mut buffer = ExpressionBuffer::new();
        buffer.append(&d);
        prop_assert_eq!(buffer.current_value(), d.as_str());
    }

    #[test]
    fn prop_evaluate_never_panics(input in "[0-9+\\-*/%^(). a-z]{0,80}") {
        let _ = evaluate(&input);
    }

    #[test]
    fn prop_evaluate_ok_is_finite_display(tokens in proptest::collection::vec(arb_token(), 1..25)) {
        let expr: String = tokens.concat();
        if let Ok(out) = evaluate(&expr) {
            let parsed: f64 = out.parse().expect("result parses back");
            prop_assert!(parsed.is_finite());
            prop_assert!(!out.ends_with(".0"));
        }
    }

    #[test]
    fn prop_results_evaluate_to_themselves(tokens in proptest::collection::vec(arb_token(), 1..25)) {
        let expr: String = tokens.concat();
        if let Ok(out) = evaluate(&expr) {
            prop_assert_eq!(evaluate(&out), Ok(out.clone()));
        }
    }

    #[test]
    fn prop_integer_sums(a in 0i64..100_000, b in 0i64..100_000) {
        prop_assert_eq!(evaluate(&format!("{a}+{b}")).unwrap(), (a + b).to_string());
        prop_assert_eq!(evaluate(&format!("{a}-{b}")).unwrap(), (a - b).to_string());
        prop_assert_eq!(evaluate(&format!("{a}*{b}")).unwrap(), (a * b).to_string());
    }
}
