//! Domain data model shared between the API client and its frontends.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Assistant configuration assembled by the user before profile generation.
///
/// Starts out with every scalar empty/zero and every tag set empty, and is
/// mutated field by field until it is submitted wholesale to the
/// profile-generation endpoint. The wire form uses the camelCase keys the
/// backend reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantConfig {
    pub base_model: String,
    pub personality: String,
    pub primary_expertise: String,
    /// 0 (concise) to 100 (detailed)
    pub communication_style: u8,
    /// 0 (conservative) to 100 (highly creative)
    pub creativity_level: u8,
    /// 0 (brief) to 100 (comprehensive)
    pub response_length: u8,
    pub memory_modules: BTreeSet<String>,
    pub tool_integrations: BTreeSet<String>,
    pub execute_code: bool,
    pub always_on: bool,
    pub ethical_boundaries: BTreeSet<String>,
    pub language_proficiency: BTreeSet<String>,
    pub voice_interface: bool,
    pub learning_rate: f64,
    pub speech_to_text: bool,
}

impl AssistantConfig {
    /// Toggle a memory module tag: present -> removed, absent -> added.
    pub fn toggle_memory_module(&mut self, tag: &str) {
        toggle(&mut self.memory_modules, tag);
    }

    pub fn toggle_tool_integration(&mut self, tag: &str) {
        toggle(&mut self.tool_integrations, tag);
    }

    pub fn toggle_ethical_boundary(&mut self, tag: &str) {
        toggle(&mut self.ethical_boundaries, tag);
    }

    pub fn toggle_language(&mut self, tag: &str) {
        toggle(&mut self.language_proficiency, tag);
    }
}

fn toggle(set: &mut BTreeSet<String>, tag: &str) {
    if !set.remove(tag) {
        set.insert(tag.to_string());
    }
}

/// Opaque profile/model identifier.
///
/// The backend issues integers today, but the client only ever echoes the
/// value back, so both wire forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileId {
    Int(i64),
    Str(String),
}

impl ProfileId {
    /// Parse user-supplied input into an identifier.
    pub fn parse(input: &str) -> Self {
        input
            .parse::<i64>()
            .map(ProfileId::Int)
            .unwrap_or_else(|_| ProfileId::Str(input.to_string()))
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileId::Int(id) => write!(f, "{id}"),
            ProfileId::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ProfileId {
    fn from(id: i64) -> Self {
        ProfileId::Int(id)
    }
}

/// Server-generated assistant profile.
///
/// Display data only - the client never edits a profile, and fields it does
/// not know about survive a round-trip through `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiProfile {
    pub id: ProfileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_expertise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_on: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stored user preferences, pushed back wholesale on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub personality: String,
    pub tasks: BTreeSet<String>,
    pub use_cases: BTreeSet<String>,
}

impl Preferences {
    pub fn toggle_task(&mut self, tag: &str) {
        toggle(&mut self.tasks, tag);
    }

    pub fn toggle_use_case(&mut self, tag: &str) {
        toggle(&mut self.use_cases, tag);
    }
}

/// Secrets for third-party providers, fetched and overwritten wholesale.
///
/// Never rendered in clear text: `Debug` and [`ApiKeyBundle::masked`] show at
/// most the last four characters of each key.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeyBundle {
    pub openai: String,
    pub anthropic: String,
    pub huggingface: String,
    pub elevenlabs: String,
}

/// Provider slots in a key bundle, in display order.
pub const API_KEY_PROVIDERS: &[&str] = &["openai", "anthropic", "huggingface", "elevenlabs"];

impl ApiKeyBundle {
    /// Masked (provider, key) pairs for display.
    pub fn masked(&self) -> Vec<(&'static str, String)> {
        vec![
            ("openai", mask(&self.openai)),
            ("anthropic", mask(&self.anthropic)),
            ("huggingface", mask(&self.huggingface)),
            ("elevenlabs", mask(&self.elevenlabs)),
        ]
    }

    pub fn get(&self, provider: &str) -> Option<&str> {
        match provider {
            "openai" => Some(&self.openai),
            "anthropic" => Some(&self.anthropic),
            "huggingface" => Some(&self.huggingface),
            "elevenlabs" => Some(&self.elevenlabs),
            _ => None,
        }
    }

    pub fn set(&mut self, provider: &str, key: String) -> bool {
        match provider {
            "openai" => self.openai = key,
            "anthropic" => self.anthropic = key,
            "huggingface" => self.huggingface = key,
            "elevenlabs" => self.elevenlabs = key,
            _ => return false,
        }
        true
    }
}

impl fmt::Debug for ApiKeyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyBundle")
            .field("openai", &mask(&self.openai))
            .field("anthropic", &mask(&self.anthropic))
            .field("huggingface", &mask(&self.huggingface))
            .field("elevenlabs", &mask(&self.elevenlabs))
            .finish()
    }
}

/// Mask a secret for display, keeping at most the last four characters.
pub fn mask(secret: &str) -> String {
    let len = secret.chars().count();
    if len == 0 {
        "(not set)".to_string()
    } else if len <= 4 {
        "****".to_string()
    } else {
        let tail: String = secret.chars().skip(len - 4).collect();
        format!("****{tail}")
    }
}

/// Credential returned by login/registration. The token is the marker the
/// session gate persists; the client never looks inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
}

/// Payload for registration and user creation
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults_are_empty() {
        let config = AssistantConfig::default();

        assert!(config.base_model.is_empty());
        assert!(config.personality.is_empty());
        assert!(config.primary_expertise.is_empty());
        assert_eq!(config.communication_style, 0);
        assert_eq!(config.creativity_level, 0);
        assert_eq!(config.response_length, 0);
        assert!(config.memory_modules.is_empty());
        assert!(config.tool_integrations.is_empty());
        assert!(config.ethical_boundaries.is_empty());
        assert!(config.language_proficiency.is_empty());
        assert!(!config.execute_code);
        assert!(!config.always_on);
        assert!(!config.voice_interface);
        assert!(!config.speech_to_text);
        assert_eq!(config.learning_rate, 0.0);
    }

    #[test]
    fn test_toggle_twice_restores_set() {
        let mut config = AssistantConfig::default();
        config.toggle_memory_module("legal");
        config.toggle_memory_module("regular");
        let snapshot = config.memory_modules.clone();

        config.toggle_memory_module("medical");
        config.toggle_memory_module("medical");
        assert_eq!(config.memory_modules, snapshot);

        // Toggling an existing tag twice also restores the original
        config.toggle_memory_module("legal");
        config.toggle_memory_module("legal");
        assert_eq!(config.memory_modules, snapshot);
    }

    #[test]
    fn test_toggle_deduplicates() {
        let mut config = AssistantConfig::default();
        config.toggle_tool_integration("web-search");
        config.toggle_tool_integration("calculator");
        config.toggle_tool_integration("web-search");
        config.toggle_tool_integration("web-search");

        assert_eq!(config.tool_integrations.len(), 2);
        assert!(config.tool_integrations.contains("web-search"));
    }

    #[test]
    fn test_config_wire_form_is_camel_case() {
        let mut config = AssistantConfig::default();
        config.base_model = "gpt4mini".to_string();
        config.communication_style = 50;
        config.toggle_ethical_boundary("no-harm");
        config.speech_to_text = true;

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["baseModel"], "gpt4mini");
        assert_eq!(value["communicationStyle"], 50);
        assert_eq!(value["ethicalBoundaries"], json!(["no-harm"]));
        assert_eq!(value["speechToText"], true);
        assert!(value.get("base_model").is_none());
    }

    #[test]
    fn test_profile_id_accepts_both_wire_forms() {
        let int_id: ProfileId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(int_id, ProfileId::Int(7));

        let str_id: ProfileId = serde_json::from_value(json!("prof-7")).unwrap();
        assert_eq!(str_id, ProfileId::Str("prof-7".to_string()));

        assert_eq!(ProfileId::parse("7"), ProfileId::Int(7));
        assert_eq!(ProfileId::parse("prof-7"), ProfileId::Str("prof-7".into()));
    }

    #[test]
    fn test_profile_round_trips_unknown_fields() {
        let body = json!({
            "id": 1,
            "base_model": "gpt4mini",
            "always_on": true,
            "communication_style": 50,
            "memory_modules": ["regular"],
        });

        let profile: AiProfile = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(profile.id, ProfileId::Int(1));
        assert_eq!(profile.base_model.as_deref(), Some("gpt4mini"));
        assert_eq!(profile.always_on, Some(true));

        assert_eq!(serde_json::to_value(&profile).unwrap(), body);
    }

    #[test]
    fn test_preferences_wire_keys() {
        let mut prefs = Preferences {
            personality: "friendly".to_string(),
            ..Preferences::default()
        };
        prefs.toggle_task("task1");
        prefs.toggle_use_case("useCase1");

        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(value["personality"], "friendly");
        assert_eq!(value["tasks"], json!(["task1"]));
        assert_eq!(value["useCases"], json!(["useCase1"]));
    }

    #[test]
    fn test_mask_never_reveals_secret() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("abcd"), "****");
        assert_eq!(mask("sk-super-secret-1234"), "****1234");
    }

    #[test]
    fn test_key_bundle_debug_is_masked() {
        let bundle = ApiKeyBundle {
            openai: "sk-super-secret-1234".to_string(),
            ..ApiKeyBundle::default()
        };

        let rendered = format!("{bundle:?}");
        assert!(!rendered.contains("sk-super-secret-1234"));
        assert!(rendered.contains("****1234"));
    }

    #[test]
    fn test_key_bundle_provider_access() {
        let mut bundle = ApiKeyBundle::default();
        assert!(bundle.set("openai", "sk-1".to_string()));
        assert!(!bundle.set("unknown", "x".to_string()));
        assert_eq!(bundle.get("openai"), Some("sk-1"));
        assert_eq!(bundle.get("unknown"), None);

        for &provider in API_KEY_PROVIDERS {
            assert!(bundle.get(provider).is_some());
        }
    }
}
