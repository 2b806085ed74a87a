use anyhow::{anyhow, bail, Context, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Name of the resource file expected in every language directory
pub const RESOURCE_FILE: &str = "main.ftl";

/// Localization manager for the RideShare Bot
///
/// Holds one Fluent bundle per language found under the locales directory
/// (`<dir>/<lang>/main.ftl`). Lookups in an unknown language fall back to
/// the default language.
pub struct LocalizationManager {
    bundles: HashMap<String, Arc<FluentBundle<FluentResource>>>,
    languages: Vec<String>,
    default_language: String,
}

impl LocalizationManager {
    /// Create a manager from `./locales` with English as default
    pub fn new() -> Result<Self> {
        Self::from_dir("./locales", "en")
    }

    /// Load every language directory under `dir`
    pub fn from_dir(dir: impl AsRef<Path>, default_language: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let mut bundles = HashMap::new();

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read locales directory {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if !path.join(RESOURCE_FILE).is_file() {
                continue;
            }
            let Some(tag) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            let tag = tag.to_lowercase();
            let locale: LanguageIdentifier = tag
                .parse()
                .with_context(|| format!("Invalid language directory name: {tag}"))?;
            let bundle = Self::create_bundle(&path, &locale)?;
            debug!(language = %tag, "Loaded localization bundle");
            bundles.insert(tag, Arc::new(bundle));
        }

        let default_language = default_language.to_lowercase();
        if !bundles.contains_key(&default_language) {
            bail!(
                "Default language '{}' has no {} in {}",
                default_language,
                RESOURCE_FILE,
                dir.display()
            );
        }

        let mut languages: Vec<String> = bundles.keys().cloned().collect();
        languages.sort();

        Ok(Self {
            bundles,
            languages,
            default_language,
        })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        language_dir: &Path,
        locale: &LanguageIdentifier,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Channel posts must carry the raw values, without bidi isolation marks
        bundle.set_use_isolating(false);

        let resource_path = language_dir.join(RESOURCE_FILE);
        let content = fs::read_to_string(&resource_path)
            .with_context(|| format!("Failed to read {}", resource_path.display()))?;
        let resource = FluentResource::try_new(content).map_err(|(_, errors)| {
            anyhow!("Failed to parse {}: {:?}", resource_path.display(), errors)
        })?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate messages in {}: {:?}", resource_path.display(), errors))?;

        Ok(bundle)
    }

    /// Languages with a loaded bundle, sorted
    pub fn supported_languages(&self) -> &[String] {
        &self.languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn is_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(&language.to_lowercase())
    }

    /// Map a client language code ("de-AT", "EN") to a supported language
    pub fn detect_language(&self, language_code: Option<&str>) -> String {
        language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(str::to_lowercase)
            .filter(|primary| self.bundles.contains_key(primary))
            .unwrap_or_else(|| self.default_language.clone())
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self.bundles.get(&language.to_lowercase()) {
            Some(bundle) => bundle,
            None => &self.bundles[&self.default_language],
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!(key = %key, language = %language, errors = ?errors, "Errors while formatting message");
        }

        value.into_owned()
    }

    /// Get a localized message without arguments
    pub fn t(&self, key: &str, language: &str) -> String {
        self.get_message_in_language(key, language, None)
    }

    /// Get a localized message with simple string arguments
    pub fn t_args(&self, key: &str, args: &[(&str, &str)], language: &str) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }
}
