//! Share-link key exchange
//!
//! Keys travel in the URL fragment so they never hit server logs:
//! `#gkey=<urlencoded>&okey=<urlencoded>`, either or both present. The v1
//! format `#key=<value>` is still accepted and fills the Google slot. When
//! a fragment carries both formats the new one wins.

use std::error::Error;

use crate::core::config::{Config, SettingsStore};
use crate::core::constants::{PROVIDER_GOOGLE, PROVIDER_OPENAI};
use crate::core::registry::provider_display_name;

pub const GOOGLE_PARAM: &str = "gkey";
pub const OPENAI_PARAM: &str = "okey";
const LEGACY_PARAM: &str = "key";

/// Shown before a share link is printed.
pub const SHARE_WARNING: &str = "⚠️  Sharing this link exposes your API keys to anyone who receives it.\n\
Anyone with the link can generate images billed to your account, and the\n\
link may linger in chat logs or browser history. Only share it with people\n\
you trust.";

/// Extract recognized provider keys from a share link or bare fragment.
/// Unrecognized parameters are ignored; values are percent-decoded.
pub fn parse_key_fragment(input: &str) -> Vec<(String, String)> {
    let fragment = match input.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => input,
    };

    let mut google = None;
    let mut legacy = None;
    let mut openai = None;

    for pair in fragment.split('&') {
        let Some((name, raw_value)) = pair.split_once('=') else {
            continue;
        };
        let Ok(value) = urlencoding::decode(raw_value) else {
            continue;
        };
        let value = value.into_owned();
        if value.is_empty() {
            continue;
        }
        match name {
            GOOGLE_PARAM => google = Some(value),
            LEGACY_PARAM => legacy = Some(value),
            OPENAI_PARAM => openai = Some(value),
            _ => {}
        }
    }

    let mut keys = Vec::new();
    if let Some(value) = google.or(legacy) {
        keys.push((PROVIDER_GOOGLE.to_string(), value));
    }
    if let Some(value) = openai {
        keys.push((PROVIDER_OPENAI.to_string(), value));
    }
    keys
}

/// Persist every key found in the link. Returns the display names of the
/// providers whose keys were imported; the secrets themselves are never
/// echoed back.
pub fn import_shared_keys(
    store: &SettingsStore,
    input: &str,
) -> Result<Vec<String>, Box<dyn Error>> {
    let keys = parse_key_fragment(input);
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    store.mutate(|config| {
        let mut imported = Vec::new();
        for (provider, key) in &keys {
            config.set_api_key(provider, key);
            imported.push(provider_display_name(provider).to_string());
        }
        Ok(imported)
    })
}

/// Build a share link carrying the stored keys, or `None` when no key is
/// stored.
pub fn build_share_link(base_url: &str, config: &Config) -> Option<String> {
    let mut params = Vec::new();
    if let Some(key) = config.api_key_for(PROVIDER_GOOGLE) {
        params.push(format!("{GOOGLE_PARAM}={}", urlencoding::encode(key)));
    }
    if let Some(key) = config.api_key_for(PROVIDER_OPENAI) {
        params.push(format!("{OPENAI_PARAM}={}", urlencoding::encode(key)));
    }

    if params.is_empty() {
        None
    } else {
        Some(format!("{}#{}", base_url.trim_end_matches('#'), params.join("&")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::temp_store;

    #[test]
    fn gkey_fragment_fills_the_google_slot() {
        let keys = parse_key_fragment("#gkey=XYZ");
        assert_eq!(keys, vec![("google".to_string(), "XYZ".to_string())]);
    }

    #[test]
    fn legacy_fragment_also_fills_the_google_slot() {
        let keys = parse_key_fragment("#key=OLD");
        assert_eq!(keys, vec![("google".to_string(), "OLD".to_string())]);
    }

    #[test]
    fn new_format_wins_over_legacy_in_one_fragment() {
        for input in ["#key=OLD&gkey=NEW", "#gkey=NEW&key=OLD"] {
            let keys = parse_key_fragment(input);
            assert_eq!(keys, vec![("google".to_string(), "NEW".to_string())]);
        }
    }

    #[test]
    fn both_providers_can_travel_in_one_link() {
        let keys = parse_key_fragment("https://example.test/app#gkey=G%2B1&okey=sk-test");
        assert_eq!(
            keys,
            vec![
                ("google".to_string(), "G+1".to_string()),
                ("openai".to_string(), "sk-test".to_string()),
            ]
        );
    }

    #[test]
    fn unrecognized_params_and_empty_values_are_ignored() {
        assert!(parse_key_fragment("#foo=bar&gkey=").is_empty());
        assert!(parse_key_fragment("no fragment here").is_empty());
    }

    #[test]
    fn import_persists_and_names_providers_without_echoing_secrets() {
        let (store, _dir) = temp_store();
        let imported = import_shared_keys(&store, "#gkey=XYZ").expect("import");
        assert_eq!(imported, vec!["Google"]);

        let config = store.load().unwrap();
        assert_eq!(config.api_key_for("google"), Some("XYZ"));
    }

    #[test]
    fn build_and_parse_mirror_each_other() {
        let mut config = Config::default();
        config.set_api_key("google", "g/1+2");
        config.set_api_key("openai", "sk-test");

        let link = build_share_link("https://example.test/app", &config).expect("link");
        let keys = parse_key_fragment(&link);
        assert!(keys.contains(&("google".to_string(), "g/1+2".to_string())));
        assert!(keys.contains(&("openai".to_string(), "sk-test".to_string())));
    }

    #[test]
    fn no_stored_keys_means_no_link() {
        assert!(build_share_link("https://example.test", &Config::default()).is_none());
    }
}
