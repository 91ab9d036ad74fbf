//! `${name}` substitution against the variable store.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::instrument;

use crate::types::VariableStore;

static MARKER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("marker pattern is valid"));

/// Replaces each `${name}` marker with the current value of `name`.
///
/// Markers naming unknown variables are left verbatim. Substituted text is not scanned
/// again, so values containing `${...}` are inserted literally.
#[instrument(level = "trace", skip(store))]
pub fn resolve(text: &str, store: &VariableStore) -> String {
  MARKER
    .replace_all(text, |caps: &Captures<'_>| match store.value(&caps[1]) {
      Some(value) => value.as_text(),
      None => caps[0].to_string(),
    })
    .into_owned()
}
