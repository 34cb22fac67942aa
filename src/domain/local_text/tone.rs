use crate::domain::content::Tone;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PERSUASIVE: &[(&str, &str)] = &[
    ("pode", "deve"),
    ("podem", "devem"),
    ("talvez", "certamente"),
    ("ajuda", "garante"),
    ("ajudam", "garantem"),
    ("importante", "indispensável"),
];

static TECHNICAL: &[(&str, &str)] = &[
    ("ótimo", "eficiente"),
    ("ótimos", "eficientes"),
    ("legal", "adequado"),
    ("fácil", "simples"),
    ("rápido", "ágil"),
    ("grande", "significativo"),
    ("grandes", "significativos"),
    ("bom", "satisfatório"),
];

static PERSUASIVE_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(PERSUASIVE));
static TECHNICAL_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(TECHNICAL));

fn word_regex(table: &[(&str, &str)]) -> Regex {
    let alternatives = table
        .iter()
        .map(|(from, _)| regex::escape(from))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({})\b", alternatives)).expect("escaped word table")
}

/// Apply the word-substitution pass for `tone`.
pub fn apply(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Neutral => text.to_string(),
        Tone::Persuasive => substitute(text, &PERSUASIVE_RE, PERSUASIVE),
        Tone::Technical => substitute(text, &TECHNICAL_RE, TECHNICAL),
    }
}

fn substitute(text: &str, re: &Regex, table: &[(&str, &str)]) -> String {
    re.replace_all(text, |caps: &Captures| {
        let found = &caps[1];
        let lower = found.to_lowercase();
        let replacement = table
            .iter()
            .find(|(from, _)| *from == lower)
            .map(|(_, to)| *to)
            .unwrap_or(found);
        match_case(found, replacement)
    })
    .into_owned()
}

fn match_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
