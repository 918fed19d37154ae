//! Action-string grammars: parse one raw model completion into `(action_type, argument)`.
//!
//! Two variants: bracket `Type[arg]` for QA benchmarks and fenced
//! ``Type[```lang ... ```]`` for math/code benchmarks. Both parsers are pure and
//! total: any malformed input yields `("", "")`, never an error.
//!
//! # Main types
//!
//! - **[`GrammarVariant`]**: selects the parser and the scratchpad re-rendering of an action.
//! - **[`QaAction`] / [`MathAction`] / [`CodeAction`]**: typed per-family dispatch,
//!   each with a required `Unrecognized` arm.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(\w+)\[(.+)\]$").expect("bracket grammar regex"));

static FENCED_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(finish|calculate|implement|test)\b").expect("fenced keyword regex"));

/// Parses a bracket-form action: the whole trimmed string must match `Type[arg]`.
///
/// The action type is returned verbatim (case as typed); callers lower-case
/// before dispatch-matching. No match yields `("", "")`.
pub fn parse_bracket(action: &str) -> (String, String) {
    match BRACKET.captures(action.trim()) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), String::new()),
    }
}

/// Parses a fenced-form action: the first known keyword (`Finish`, `Calculate`,
/// `Implement`, `Test`, case-insensitive) followed eventually by a
/// triple-backtick block. The keyword is capitalized in the output and the
/// block content stripped. Keyword without a fence, or no keyword, yields
/// `("", "")`; only the first fenced block is taken.
pub fn parse_fenced(action: &str) -> (String, String) {
    let miss = (String::new(), String::new());
    let Some(keyword) = FENCED_KEYWORD.find(action) else {
        return miss;
    };
    let rest = &action[keyword.end()..];
    let Some(open) = rest.find("```") else {
        return miss;
    };
    let block = &rest[open + 3..];
    let Some(close) = block.find("```") else {
        return miss;
    };
    // The fence header (language tag) runs to the first newline; a fence with
    // no newline before it closes is all body.
    let body = match block[..close].find('\n') {
        Some(nl) => &block[nl + 1..close],
        None => &block[..close],
    };
    (capitalize(keyword.as_str()), body.trim().to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Action syntax variant, fixed per benchmark profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarVariant {
    /// `Type[arg]` over the entire trimmed action string.
    Bracket,
    /// ``Type[```lang ... ```]``; `language` is used when re-rendering.
    Fenced { language: String },
}

impl GrammarVariant {
    pub fn fenced(language: impl Into<String>) -> Self {
        Self::Fenced {
            language: language.into(),
        }
    }

    /// Parses one action completion into `(action_type, argument)`.
    pub fn parse(&self, action: &str) -> (String, String) {
        match self {
            Self::Bracket => parse_bracket(action),
            Self::Fenced { .. } => parse_fenced(action),
        }
    }

    /// Renders a parsed action back into its scratchpad form. The fenced
    /// variant re-wraps the argument in a code fence, so the transcript keeps
    /// the shape the model emitted even though parsing unwrapped it.
    pub fn render(&self, action_type: &str, query: &str) -> String {
        match self {
            Self::Bracket => format!("{action_type}[{query}]"),
            Self::Fenced { language } => format!("{action_type}[```{language}\n{query}\n```]"),
        }
    }
}

/// QA-family actions produced from a parsed `(action_type, argument)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QaAction {
    Search(String),
    Lookup(String),
    Finish(String),
    /// Anything else, including the parser's `("", "")` miss.
    Unrecognized { action_type: String, query: String },
}

impl QaAction {
    /// Dispatch match on the lower-cased action type.
    pub fn classify(action_type: &str, query: &str) -> Self {
        match action_type.to_lowercase().as_str() {
            "search" => Self::Search(query.to_string()),
            "lookup" => Self::Lookup(query.to_string()),
            "finish" => Self::Finish(query.to_string()),
            _ => Self::Unrecognized {
                action_type: action_type.to_string(),
                query: query.to_string(),
            },
        }
    }
}

/// Math-family actions: Calculate / Finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathAction {
    Calculate(String),
    Finish(String),
    Unrecognized { action_type: String, query: String },
}

impl MathAction {
    pub fn classify(action_type: &str, query: &str) -> Self {
        match action_type.to_lowercase().as_str() {
            "calculate" => Self::Calculate(query.to_string()),
            "finish" => Self::Finish(query.to_string()),
            _ => Self::Unrecognized {
                action_type: action_type.to_string(),
                query: query.to_string(),
            },
        }
    }
}

/// Code-family actions: Implement / Test / Finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeAction {
    Implement(String),
    Test(String),
    Finish(String),
    Unrecognized { action_type: String, query: String },
}

impl CodeAction {
    pub fn classify(action_type: &str, query: &str) -> Self {
        match action_type.to_lowercase().as_str() {
            "implement" => Self::Implement(query.to_string()),
            "test" => Self::Test(query.to_string()),
            "finish" => Self::Finish(query.to_string()),
            _ => Self::Unrecognized {
                action_type: action_type.to_string(),
                query: query.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Malformed inputs never panic and yield `("", "")` in both grammars.
    #[test]
    fn parsers_are_total_on_malformed_input() {
        for input in ["", "NoMatch", "Foo[unterminated", "]["] {
            assert_eq!(parse_bracket(input), (String::new(), String::new()), "{input:?}");
            assert_eq!(parse_fenced(input), (String::new(), String::new()), "{input:?}");
        }
    }

    /// **Scenario**: `Type[arg]` round-trips, with the type case preserved verbatim.
    #[test]
    fn bracket_round_trip_preserves_case() {
        assert_eq!(
            parse_bracket("Search[Arthur's Magazine]"),
            ("Search".to_string(), "Arthur's Magazine".to_string())
        );
        assert_eq!(
            parse_bracket("seARch[x]"),
            ("seARch".to_string(), "x".to_string())
        );
    }

    /// **Scenario**: The bracket grammar anchors to the entire trimmed string.
    #[test]
    fn bracket_rejects_surrounding_text() {
        assert_eq!(parse_bracket("I will Search[x]"), (String::new(), String::new()));
        assert_eq!(parse_bracket("Search[x] now"), (String::new(), String::new()));
        assert_eq!(
            parse_bracket("  Finish[Paris]  "),
            ("Finish".to_string(), "Paris".to_string())
        );
    }

    /// **Scenario**: Fenced extraction strips the fence and language tag.
    #[test]
    fn fenced_extracts_code_body() {
        assert_eq!(
            parse_fenced("Finish[```python\nX\n```]"),
            ("Finish".to_string(), "X".to_string())
        );
        assert_eq!(
            parse_fenced("calculate the sum:\n```python\na = 1 + 1\n```"),
            ("Calculate".to_string(), "a = 1 + 1".to_string())
        );
    }

    /// **Scenario**: The keyword is capitalized regardless of input case.
    #[test]
    fn fenced_capitalizes_keyword() {
        assert_eq!(parse_fenced("finish[```\nX\n```]").0, "Finish");
        assert_eq!(parse_fenced("IMPLEMENT[```py\nX\n```]").0, "Implement");
    }

    /// **Scenario**: A keyword with no fenced block after it is a miss.
    #[test]
    fn fenced_requires_a_fence_after_the_keyword() {
        assert_eq!(parse_fenced("Finish[42]"), (String::new(), String::new()));
        assert_eq!(parse_fenced("``` code ``` then Test"), (String::new(), String::new()));
    }

    /// **Scenario**: Only the first fenced block is taken.
    #[test]
    fn fenced_takes_first_block_only() {
        let (kind, body) = parse_fenced("Implement[```python\nfirst\n```] and ```python\nsecond\n```");
        assert_eq!(kind, "Implement");
        assert_eq!(body, "first");
    }

    /// **Scenario**: Re-rendering restores the bracket form and re-wraps the fence.
    #[test]
    fn render_round_trips_scratchpad_form() {
        assert_eq!(GrammarVariant::Bracket.render("Search", "topic"), "Search[topic]");
        let fenced = GrammarVariant::fenced("python");
        assert_eq!(
            fenced.render("Calculate", "a = 1"),
            "Calculate[```python\na = 1\n```]"
        );
        let (kind, body) = fenced.parse(&fenced.render("Calculate", "a = 1"));
        assert_eq!((kind.as_str(), body.as_str()), ("Calculate", "a = 1"));
    }

    /// **Scenario**: Classification lower-cases the type and routes unknowns to Unrecognized.
    #[test]
    fn classify_routes_unknowns_to_unrecognized() {
        assert_eq!(QaAction::classify("FINISH", "x"), QaAction::Finish("x".to_string()));
        assert!(matches!(QaAction::classify("", ""), QaAction::Unrecognized { .. }));
        assert!(matches!(
            MathAction::classify("implement", "x"),
            MathAction::Unrecognized { .. }
        ));
        assert_eq!(
            CodeAction::classify("Test", "assert True"),
            CodeAction::Test("assert True".to_string())
        );
    }
}
