use serde::Deserialize;

/// A numeric form field as sent by the client: a JSON number or the raw text
/// typed into the input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            NumberInput::Text(s) => s.trim().is_empty(),
            NumberInput::Number(_) => false,
        }
    }

    /// The finite value, or `None` when the text is not a number.
    pub fn value(&self) -> Option<f64> {
        let n = match self {
            NumberInput::Number(n) => *n,
            NumberInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }
}

/// `None` for an absent or blank field.
pub fn filled(v: Option<&NumberInput>) -> Option<&NumberInput> {
    v.filter(|n| !n.is_blank())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_as_missing() {
        let blank = NumberInput::Text("  ".into());
        assert!(filled(Some(&blank)).is_none());
        assert!(filled(None).is_none());
        assert!(filled(Some(&NumberInput::Number(0.0))).is_some());
    }

    #[test]
    fn value_parses_trimmed_text() {
        assert_eq!(NumberInput::Text(" 12.5 ".into()).value(), Some(12.5));
        assert_eq!(NumberInput::Text("12g".into()).value(), None);
        assert_eq!(NumberInput::Text("NaN".into()).value(), None);
        assert_eq!(NumberInput::Number(3.0).value(), Some(3.0));
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let parsed: Vec<NumberInput> = serde_json::from_str(r#"[3, "", "4.5"]"#).unwrap();
        assert_eq!(
            parsed,
            [
                NumberInput::Number(3.0),
                NumberInput::Text(String::new()),
                NumberInput::Text("4.5".into()),
            ]
        );
    }
}
