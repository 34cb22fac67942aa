use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote text providers the orchestrator knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Mistral,
    HuggingFace,
}

impl ProviderKind {
    /// Default priority used by `auto` selection.
    pub const PREFERENCE: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Gemini,
        ProviderKind::Mistral,
        ProviderKind::HuggingFace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Mistral => "mistral",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    /// Parse a comma separated priority list, ignoring unknown names.
    pub fn parse_list(raw: &str) -> Vec<ProviderKind> {
        let mut kinds = Vec::new();
        for name in raw.split(',') {
            if let Ok(kind) = name.parse::<ProviderKind>() {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        kinds
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "mistral" => Ok(ProviderKind::Mistral),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Which provider(s) a request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProviderSelector {
    #[default]
    Auto,
    Only(ProviderKind),
}

impl TryFrom<String> for ProviderSelector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("auto") || value.trim().is_empty() {
            return Ok(ProviderSelector::Auto);
        }
        value.parse().map(ProviderSelector::Only)
    }
}

impl From<ProviderSelector> for String {
    fn from(selector: ProviderSelector) -> Self {
        match selector {
            ProviderSelector::Auto => "auto".to_string(),
            ProviderSelector::Only(kind) => kind.as_str().to_string(),
        }
    }
}

/// Requested length of generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum SizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeTier {
    /// Inclusive range of body paragraphs for this tier.
    pub fn paragraph_range(&self) -> (usize, usize) {
        match self {
            SizeTier::Small => (2, 3),
            SizeTier::Medium => (3, 5),
            SizeTier::Large => (5, 8),
        }
    }
}

impl From<String> for SizeTier {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pequeno" | "small" | "curto" => SizeTier::Small,
            "grande" | "large" | "longo" => SizeTier::Large,
            _ => SizeTier::Medium,
        }
    }
}

/// Writing style applied by the local generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Persuasive,
    Technical,
}

impl From<String> for Tone {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "persuasivo" | "persuasive" => Tone::Persuasive,
            "técnico" | "tecnico" | "technical" => Tone::Technical,
            _ => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub theme: String,
    #[serde(default)]
    pub target_audience: Option<String>,
    /// Target video length in seconds.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub provider: ProviderSelector,
    #[serde(default = "default_use_fallback")]
    pub use_fallback: bool,
    #[serde(default, alias = "tamanho")]
    pub size: SizeTier,
}

fn default_use_fallback() -> bool {
    true
}

impl GenerationRequest {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            target_audience: None,
            duration: None,
            tone: None,
            keywords: Vec::new(),
            provider: ProviderSelector::Auto,
            use_fallback: true,
            size: SizeTier::Medium,
        }
    }

    /// Prompt sent to remote providers.
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Escreva um roteiro para um vídeo curto de marketing sobre \"{}\".",
            self.theme.trim()
        );
        if let Some(audience) = self.target_audience.as_deref().filter(|a| !a.trim().is_empty()) {
            prompt.push_str(&format!(" Público-alvo: {}.", audience.trim()));
        }
        if let Some(seconds) = self.duration {
            prompt.push_str(&format!(" Duração aproximada: {} segundos.", seconds));
        }
        if let Some(tone) = self.tone.as_deref().filter(|t| !t.trim().is_empty()) {
            prompt.push_str(&format!(" Tom: {}.", tone.trim()));
        }
        if !self.keywords.is_empty() {
            prompt.push_str(&format!(" Palavras-chave: {}.", self.keywords.join(", ")));
        }
        prompt.push_str(" Responda apenas com o texto da narração.");
        prompt
    }

    /// Rough token budget for the requested size.
    pub fn max_tokens(&self) -> u32 {
        match self.size {
            SizeTier::Small => 300,
            SizeTier::Medium => 600,
            SizeTier::Large => 1200,
        }
    }

    pub fn tone(&self) -> Tone {
        self.tone.clone().map(Tone::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub used_provider: String,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    pub word_count: usize,
    pub reading_minutes: u32,
    pub request_id: String,
}

/// Size heuristics shared by remote and local results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub words: usize,
    pub tokens_estimate: u32,
    pub reading_minutes: u32,
}

impl TextMetrics {
    pub fn of(content: &str) -> Self {
        let words = content.split_whitespace().count();
        let tokens_estimate = (content.chars().count() / 4) as u32;
        let reading_minutes = ((words as f64 / 250.0).ceil() as u32).max(1);
        Self {
            words,
            tokens_estimate,
            reading_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parses_auto_and_names() {
        let auto: ProviderSelector = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(auto, ProviderSelector::Auto);

        let gemini: ProviderSelector = serde_json::from_str("\"Gemini\"").unwrap();
        assert_eq!(gemini, ProviderSelector::Only(ProviderKind::Gemini));

        assert!(serde_json::from_str::<ProviderSelector>("\"claude\"").is_err());
    }

    #[test]
    fn test_request_defaults() {
        let raw = r#"{"theme": "finanças pessoais", "tamanho": "pequeno"}"#;
        let req: GenerationRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.provider, ProviderSelector::Auto);
        assert!(req.use_fallback);
        assert_eq!(req.size, SizeTier::Small);
        assert_eq!(req.tone(), Tone::Neutral);
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let mut req = GenerationRequest::new("tecnologia");
        req.target_audience = Some("gestores".into());
        req.keywords = vec!["nuvem".into(), "IA".into()];
        let prompt = req.prompt();
        assert!(prompt.contains("tecnologia"));
        assert!(prompt.contains("gestores"));
        assert!(prompt.contains("nuvem, IA"));
    }

    #[test]
    fn test_parse_list_skips_unknown_and_duplicates() {
        let kinds = ProviderKind::parse_list("gemini, foo,openai,gemini");
        assert_eq!(kinds, vec![ProviderKind::Gemini, ProviderKind::OpenAi]);
    }

    #[test]
    fn test_metrics() {
        let metrics = TextMetrics::of("um dois três quatro");
        assert_eq!(metrics.words, 4);
        assert_eq!(metrics.tokens_estimate, 19 / 4);
        assert_eq!(metrics.reading_minutes, 1);
    }

    #[test]
    fn test_tone_aliases() {
        assert_eq!(Tone::from("Técnico".to_string()), Tone::Technical);
        assert_eq!(Tone::from("persuasivo".to_string()), Tone::Persuasive);
        assert_eq!(Tone::from("qualquer".to_string()), Tone::Neutral);
    }
}
