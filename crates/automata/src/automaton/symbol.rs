//! Symbol types for automata transitions.

/// An input symbol. Strings are consumed one `char` at a time.
pub type Symbol = char;

/// The label carried by an edge: a symbol, or `None` for an epsilon move.
pub type Label = Option<Symbol>;

/// Label of epsilon (empty) transitions.
pub const EPSILON: Label = None;

/// How epsilon labels are rendered in DOT output and messages.
pub const EPSILON_DISPLAY: &str = "λ";

/// Check if a label is an epsilon transition.
#[inline]
pub fn is_epsilon(label: Label) -> bool {
    label.is_none()
}

/// Render a label for human consumption.
pub fn display_label(label: Label) -> String {
    match label {
        Some(symbol) => symbol.to_string(),
        None => EPSILON_DISPLAY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon() {
        assert!(is_epsilon(EPSILON));
        assert!(!is_epsilon(Some('a')));
        assert!(!is_epsilon(Some('0')));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label(Some('x')), "x");
        assert_eq!(display_label(EPSILON), "λ");
    }
}
