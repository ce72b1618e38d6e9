//! Locale strings for catalog titles and subtitles.
//!
//! Two locales are in play at any time: the default one (always English) and the
//! translated one chosen in the config. Built-in tables can be overridden per key.

use std::collections::HashMap;

use serde::Deserialize;

pub const KEY_PREFIX: &str = "scenedeck";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    fn builtin(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::En => CATALOG_EN,
            Self::Fr => CATALOG_FR,
        }
    }
}

/// Title and subtitle keys for the catalog entry `key`.
pub fn title_key(key: &str) -> String {
    format!("{KEY_PREFIX}_{key}_cmd")
}

pub fn subtitle_key(key: &str) -> String {
    format!("{KEY_PREFIX}_{key}")
}

const CATALOG_EN: &[(&str, &str)] = &[
    ("scenedeck_plugin_name", "Scene Deck"),
    ("scenedeck_plugin_description", "Office scenes, presence and leave-the-office shortcuts"),
    ("scenedeck_error_title", "scenedeck error"),
    ("scenedeck_exit_office_cmd", "Exit Office"),
    ("scenedeck_exit_office", "Set Slack away, run the leaving scene and shut down"),
    ("scenedeck_air_purifier_toggle_cmd", "Air Purifier Toggle"),
    ("scenedeck_air_purifier_toggle", "Toggle the office air purifier"),
    ("scenedeck_fan_toggle_cmd", "Fan Toggle"),
    ("scenedeck_fan_toggle", "Toggle the small office fan"),
    ("scenedeck_monitor_lights_off_cmd", "Monitor Lights Off"),
    ("scenedeck_monitor_lights_off", "Turn off the lights behind the monitors"),
    ("scenedeck_nighttime_cmd", "Nighttime"),
    ("scenedeck_nighttime", "Switch the office to its nighttime scene"),
    ("scenedeck_office_cold_cmd", "Office Cold"),
    ("scenedeck_office_cold", "It is cold in here: warm the office up"),
    ("scenedeck_office_hot_cmd", "Office Hot"),
    ("scenedeck_office_hot", "It is hot in here: cool the office down"),
    ("scenedeck_office_lights_daylight_cmd", "Office Lights Daylight"),
    ("scenedeck_office_lights_daylight", "Set the office lights to daylight"),
    ("scenedeck_office_lights_neutral_cmd", "Office Lights Neutral"),
    ("scenedeck_office_lights_neutral", "Set the office lights to neutral white"),
    ("scenedeck_office_lights_warm_cmd", "Office Lights Warm"),
    ("scenedeck_office_lights_warm", "Set the office lights to warm white"),
    ("scenedeck_office_lights_off_cmd", "Office Lights Off"),
    ("scenedeck_office_lights_off", "Turn off the office lights"),
    ("scenedeck_outside_bright_cmd", "Outside Bright"),
    ("scenedeck_outside_bright", "Adjust the office for a bright day outside"),
    ("scenedeck_outside_overcast_cmd", "Outside Overcast"),
    ("scenedeck_outside_overcast", "Adjust the office for an overcast day outside"),
    ("scenedeck_outside_dark_cmd", "Outside Dark"),
    ("scenedeck_outside_dark", "Adjust the office for a dark day outside"),
];

const CATALOG_FR: &[(&str, &str)] = &[
    ("scenedeck_plugin_name", "Scene Deck"),
    ("scenedeck_plugin_description", "Scènes du bureau, présence et départ du bureau"),
    ("scenedeck_error_title", "erreur scenedeck"),
    ("scenedeck_exit_office_cmd", "Sortir du bureau"),
    ("scenedeck_air_purifier_toggle_cmd", "Basculer le purificateur d'air"),
    ("scenedeck_fan_toggle_cmd", "Basculer le ventilateur"),
    ("scenedeck_monitor_lights_off_cmd", "Éteindre les lumières des écrans"),
    ("scenedeck_nighttime_cmd", "Nuit"),
    ("scenedeck_office_cold_cmd", "Bureau froid"),
    ("scenedeck_office_hot_cmd", "Bureau chaud"),
    ("scenedeck_office_lights_daylight_cmd", "Lumières du bureau lumière du jour"),
    ("scenedeck_office_lights_neutral_cmd", "Lumières du bureau neutres"),
    ("scenedeck_office_lights_warm_cmd", "Lumières du bureau chaudes"),
    ("scenedeck_office_lights_off_cmd", "Éteindre les lumières du bureau"),
    ("scenedeck_outside_bright_cmd", "Dehors ensoleillé"),
    ("scenedeck_outside_overcast_cmd", "Dehors nuageux"),
    ("scenedeck_outside_dark_cmd", "Dehors sombre"),
];

/// Read-only string tables for the default and the translated locale.
#[derive(Debug, Clone)]
pub struct Translations {
    translated_locale: Locale,
    default: HashMap<String, String>,
    translated: HashMap<String, String>,
}

impl Translations {
    pub fn new(translated_locale: Locale) -> Self {
        Self {
            translated_locale,
            default: table(Locale::En),
            translated: table(translated_locale),
        }
    }

    /// Applies per-locale overrides from the config on top of the built-in tables.
    /// Tables are keyed by locale name (`en`, `fr`); unknown names are ignored.
    pub fn with_overrides(mut self, overrides: &HashMap<String, HashMap<String, String>>) -> Self {
        if let Some(map) = overrides.get(Locale::En.as_str()) {
            self.default.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(map) = overrides.get(self.translated_locale.as_str()) {
            self.translated.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if self.translated_locale == Locale::En {
            self.translated = self.default.clone();
        }
        self
    }

    pub fn translated_locale(&self) -> Locale {
        self.translated_locale
    }

    pub fn default_text(&self, key: &str) -> Option<&str> {
        self.default.get(key).map(String::as_str)
    }

    /// Text in the translated locale, falling back to the default locale.
    pub fn translated_text(&self, key: &str) -> Option<&str> {
        self.translated
            .get(key)
            .map(String::as_str)
            .or_else(|| self.default_text(key))
    }

    /// Default-locale text, or the key itself when there is none.
    pub fn text_or_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.default_text(key).unwrap_or(key)
    }
}

fn table(locale: Locale) -> HashMap<String, String> {
    locale
        .builtin()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
