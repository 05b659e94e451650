//! Language preference over the `language` metadata key.

use crate::metadata::{incoming_metadata, merge_outgoing, Metadata};
use weft_core::lang::DEFAULT_LANGUAGE;
use weft_core::CallContext;

/// Metadata key carrying language preferences, one value per tag.
pub const METADATA_LANGUAGE: &str = "language";

/// Returns the peer's language preferences from incoming metadata, with
/// [`DEFAULT_LANGUAGE`] appended as the final fallback. Absent metadata
/// yields `[DEFAULT_LANGUAGE]`.
#[must_use]
pub fn languages_from_incoming(ctx: &CallContext) -> Vec<String> {
    let mut langs: Vec<String> = incoming_metadata(ctx)
        .map(|md| md.get_all(METADATA_LANGUAGE).into_iter().map(String::from).collect())
        .unwrap_or_default();
    langs.push(DEFAULT_LANGUAGE.to_string());
    langs
}

/// Derives a context whose outgoing metadata carries `langs`, one entry per
/// tag, merged with anything already attached.
#[must_use]
pub fn set_outgoing_languages(ctx: &CallContext, langs: &[String]) -> CallContext {
    let mut md = Metadata::new();
    for lang in langs {
        md.append(METADATA_LANGUAGE, lang.clone());
    }
    merge_outgoing(ctx, &md)
}
