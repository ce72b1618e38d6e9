use std::collections::HashSet;
use std::sync::Arc;

use crate::config::Environment;
use crate::i18n::{self, Translations};
use crate::model::{Action, CatalogEntry, Endpoint, ShutdownStep};

pub const LEAVE_KEY: &str = "exit_office";
const LEAVE_SCENE: &str = "script.office_exit";

// (key, service, entity id)
const SCENES: &[(&str, &str, &str)] = &[
    ("air_purifier_toggle", "turn_on", "script.office_air_purifier_toggle"),
    ("fan_toggle", "toggle", "switch.office_small_fan"),
    ("monitor_lights_off", "turn_off", "light.monitor_lights"),
    ("nighttime", "turn_on", "script.office_nighttime"),
    ("office_cold", "turn_on", "script.office_cold"),
    ("office_hot", "turn_on", "script.office_hot"),
    ("office_lights_daylight", "turn_on", "script.office_lights_to_daylight"),
    ("office_lights_neutral", "turn_on", "script.office_lights_to_neutral"),
    ("office_lights_warm", "turn_on", "script.office_lights_to_warm"),
    ("office_lights_off", "turn_on", "script.office_lights_off"),
    ("outside_bright", "turn_on", "script.office_outside_bright"),
    ("outside_overcast", "turn_on", "script.office_outside_overcast"),
    ("outside_dark", "turn_on", "script.office_outside_dark"),
];

/// The fixed, ordered set of actions. Immutable once built.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn build(
        translations: &Translations,
        environment: Environment,
        shutdown_steps: Vec<ShutdownStep>,
    ) -> Self {
        let chat = match environment {
            Environment::Home => Endpoint::ChatHome,
            Environment::Work => Endpoint::ChatWork,
        };

        let leave = Action::Composite(vec![
            Action::ChatPresence {
                endpoint: chat,
                presence: "away".to_string(),
            },
            Action::ChatStatus {
                endpoint: chat,
                emoji: String::new(),
                text: String::new(),
            },
            Action::home_assistant("turn_on", LEAVE_SCENE),
            Action::ProcessSequence(shutdown_steps.into()),
        ]);

        let mut entries = vec![entry(translations, LEAVE_KEY, "images/exit-office.png", leave)];
        for &(key, service, entity_id) in SCENES {
            let icon = format!("images/{key}.png");
            let action = Action::home_assistant(service, entity_id);
            entries.push(entry(translations, key, &icon, action));
        }

        Self::from_entries(entries)
    }

    /// Builds a catalog from ready-made entries, dropping any later duplicate key.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| {
                let fresh = seen.insert(e.key.clone());
                if !fresh {
                    log::warn!("Catalog: duplicate key '{}' ignored", e.key);
                }
                fresh
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn entry(translations: &Translations, key: &str, icon: &str, action: Action) -> CatalogEntry {
    let subtitle_key = i18n::subtitle_key(key);
    CatalogEntry {
        key: key.to_string(),
        title_key: i18n::title_key(key),
        subtitle: translations.text_or_key(&subtitle_key).to_string(),
        icon: icon.to_string(),
        action: Arc::new(action),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Catalog, LEAVE_KEY};
    use crate::config::Environment;
    use crate::diagnostics::CollectingSink;
    use crate::executor::tests::{context, Recorder};
    use crate::i18n::{Locale, Translations};
    use crate::model::{Action, CatalogEntry, Endpoint, ShutdownStep};

    fn build(environment: Environment) -> Catalog {
        let steps = vec![
            ShutdownStep::new("radiocontrol.exe", "bluetooth OFF"),
            ShutdownStep::new("shutdown", "/s /t 0"),
        ];
        Catalog::build(&Translations::new(Locale::Fr), environment, steps)
    }

    #[test]
    fn contains_leave_entry_and_every_scene() {
        let catalog = build(Environment::Home);
        assert_eq!(catalog.len(), 14);
        assert_eq!(catalog.entries()[0].key, LEAVE_KEY);

        let hot = catalog.find("office_hot").unwrap();
        assert_eq!(hot.title_key, "scenedeck_office_hot_cmd");
        assert_eq!(hot.subtitle, "It is hot in here: cool the office down");
        assert_eq!(hot.icon, "images/office_hot.png");
        assert_eq!(*hot.action, Action::home_assistant("turn_on", "script.office_hot"));
    }

    #[test]
    fn chat_account_follows_environment() {
        for (environment, expected) in [
            (Environment::Home, Endpoint::ChatHome),
            (Environment::Work, Endpoint::ChatWork),
        ] {
            let catalog = build(environment);
            let Action::Composite(parts) = catalog.find(LEAVE_KEY).unwrap().action.as_ref() else {
                panic!("leave should be a composite");
            };
            assert!(matches!(parts[0], Action::ChatPresence { endpoint, .. } if endpoint == expected));
        }
    }

    #[test]
    fn leave_runs_presence_status_scene_then_steps() {
        let catalog = build(Environment::Work);
        let recorder = Arc::new(Recorder::default());
        let ctx = context(recorder.clone(), Arc::new(CollectingSink::default()));

        catalog.find(LEAVE_KEY).unwrap().action.run(&ctx).unwrap();

        let calls = recorder.calls();
        assert_eq!(calls.len(), 5);
        assert!(calls[0].contains("users.setPresence?presence=away"));
        assert!(calls[1].contains("users.profile.set"));
        assert!(calls[2].contains("script.office_exit"));
        assert_eq!(calls[3], "exec radiocontrol.exe [bluetooth OFF] hidden=true wait=true");
        assert_eq!(calls[4], "exec shutdown [/s /t 0] hidden=true wait=true");
    }

    #[test]
    fn duplicate_keys_keep_the_first() {
        let make = |subtitle: &str| CatalogEntry {
            key: "dup".to_string(),
            title_key: "t".to_string(),
            subtitle: subtitle.to_string(),
            icon: String::new(),
            action: Arc::new(Action::Composite(Vec::new())),
        };
        let catalog = Catalog::from_entries(vec![make("first"), make("second")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].subtitle, "first");
    }
}
