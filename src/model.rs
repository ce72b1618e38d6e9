use std::ops::Range;
use std::sync::Arc;

/// One external program invocation of the shutdown sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownStep {
    pub program: String,   // Quotes already stripped
    pub arguments: String, // Rest of the line, verbatim
}

impl ShutdownStep {
    pub fn new(program: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arguments: arguments.into(),
        }
    }
}

/// Which bearer-authenticated client an HTTP call goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ChatHome,
    ChatWork,
    HomeAssistant,
}

/// Side effect bound to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    HomeAssistant {
        service: String,
        entity_id: String,
    },
    ChatPresence {
        endpoint: Endpoint,
        presence: String,
    },
    ChatStatus {
        endpoint: Endpoint,
        emoji: String,
        text: String,
    },
    ProcessSequence(Arc<[ShutdownStep]>),
    Composite(Vec<Action>),
}

impl Action {
    pub fn home_assistant(service: &str, entity_id: &str) -> Self {
        Action::HomeAssistant {
            service: service.to_string(),
            entity_id: entity_id.to_string(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Action::HomeAssistant { service, entity_id } => format!("{service} {entity_id}"),
            Action::ChatPresence { presence, .. } => format!("presence {presence}"),
            Action::ChatStatus { text, .. } => format!("status '{text}'"),
            Action::ProcessSequence(steps) => format!("{} process step(s)", steps.len()),
            Action::Composite(parts) => format!("{} action(s)", parts.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub key: String,       // Stable id, e.g. "office_hot"
    pub title_key: String, // Locale key of the title, resolved per query
    pub subtitle: String,  // Default locale only
    pub icon: String,      // Passed through untouched
    pub action: Arc<Action>,
}

/// One admitted entry of a single query evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub entry: usize, // Index into the catalog
    pub title: String,
    pub score: i64,
    pub highlight: Option<Vec<Range<usize>>>, // Char ranges into `title`
}
