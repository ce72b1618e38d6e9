use std::sync::Arc;

use crate::diagnostics::{self, ErrorReport, ErrorSink};
use crate::i18n::Translations;
use crate::matcher::Relevance;
use crate::model::CatalogEntry;

pub const TITLE_NOT_FOUND: &str = "Title Not Found";

/// Picks, per query, which locale variant of an entry's title is shown.
pub struct TitleResolver {
    translations: Arc<Translations>,
    errors: Arc<dyn ErrorSink>,
    error_title: String,
}

impl TitleResolver {
    pub fn new(translations: Arc<Translations>, errors: Arc<dyn ErrorSink>) -> Self {
        let error_title = translations.text_or_key("scenedeck_error_title").to_string();
        Self {
            translations,
            errors,
            error_title,
        }
    }

    /// Returns the default-locale title unless the translated one scores strictly
    /// better against `query`. A missing title yields [`TITLE_NOT_FOUND`].
    pub fn resolve<'a>(
        &'a self,
        query: &str,
        entry: &CatalogEntry,
        relevance: &mut dyn Relevance,
    ) -> &'a str {
        let Some(default) = self.translations.default_text(&entry.title_key) else {
            let message = format!("Dynamic title not found for: {}", entry.key);
            diagnostics::report(
                self.errors.as_ref(),
                &self.error_title,
                ErrorReport::new(&message).logged_from("resolver", "resolve"),
            );
            return TITLE_NOT_FOUND;
        };

        let translated = self.translations.translated_text(&entry.title_key).unwrap_or(default);
        if default == translated {
            return default;
        }

        let default_score = relevance.score(query, default).score;
        let translated_score = relevance.score(query, translated).score;
        if default_score >= translated_score {
            default
        } else {
            translated
        }
    }
}
