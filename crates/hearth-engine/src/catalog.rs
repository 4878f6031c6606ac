//! The command catalog: compiled patterns for actions and queries.
//!
//! Loaded once at startup from configuration and immutable thereafter.
//! Lookup is first-match-wins in declared order; configuration order is
//! semantically significant and must be preserved.

use regex::Regex;

use hearth_core::config::{ActionEntry, QueryEntry};
use hearth_core::ServiceCall;

/// A catalog entry whose match triggers a backend service invocation,
/// optionally gated by interactive confirmation.
#[derive(Debug, Clone)]
pub struct ActionDefinition {
    pub id: String,
    pub pattern: Regex,
    pub message: String,
    pub requires_confirm: bool,
    pub on_confirm: ServiceCall,
    pub on_cancel: Option<ServiceCall>,
}

/// A catalog entry whose match triggers a read-only state fetch.
#[derive(Debug, Clone)]
pub struct QueryDefinition {
    pub id: String,
    pub pattern: Regex,
    pub entity: String,
}

/// Result of a catalog lookup.
#[derive(Debug)]
pub enum Command<'a> {
    Action(&'a ActionDefinition),
    Query(&'a QueryDefinition),
}

/// Catalog construction errors. All of these are startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid pattern for '{id}': {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },
    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),
}

impl From<CatalogError> for hearth_core::HearthError {
    fn from(err: CatalogError) -> Self {
        hearth_core::HearthError::Catalog(err.to_string())
    }
}

/// The static mapping from mention text to commands.
#[derive(Debug)]
pub struct CommandCatalog {
    actions: Vec<ActionDefinition>,
    queries: Vec<QueryDefinition>,
}

impl CommandCatalog {
    /// Compile all configured patterns, rejecting duplicate ids and
    /// unparseable patterns.
    pub fn from_config(
        actions: &[ActionEntry],
        queries: &[QueryEntry],
    ) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();

        let mut compiled_actions = Vec::with_capacity(actions.len());
        for entry in actions {
            if !seen.insert(entry.id.clone()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            let pattern = Regex::new(&entry.pattern).map_err(|source| {
                CatalogError::InvalidPattern {
                    id: entry.id.clone(),
                    source,
                }
            })?;
            compiled_actions.push(ActionDefinition {
                id: entry.id.clone(),
                pattern,
                message: entry.message.clone(),
                requires_confirm: entry.requires_confirm,
                on_confirm: entry.on_confirm.clone(),
                on_cancel: entry.on_cancel.clone(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        let mut compiled_queries = Vec::with_capacity(queries.len());
        for entry in queries {
            if !seen.insert(entry.id.clone()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            let pattern = Regex::new(&entry.pattern).map_err(|source| {
                CatalogError::InvalidPattern {
                    id: entry.id.clone(),
                    source,
                }
            })?;
            compiled_queries.push(QueryDefinition {
                id: entry.id.clone(),
                pattern,
                entity: entry.entity.clone(),
            });
        }

        Ok(Self {
            actions: compiled_actions,
            queries: compiled_queries,
        })
    }

    /// Match the incoming text against all patterns.
    ///
    /// Actions are tried first, then queries, each in declared order; the
    /// first matching pattern wins.
    pub fn lookup(&self, text: &str) -> Option<Command<'_>> {
        for action in &self.actions {
            if action.pattern.is_match(text) {
                return Some(Command::Action(action));
            }
        }
        for query in &self.queries {
            if query.pattern.is_match(text) {
                return Some(Command::Query(query));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(id: &str, pattern: &str) -> ActionEntry {
        ActionEntry {
            id: id.to_string(),
            pattern: pattern.to_string(),
            message: format!("runs {}", id),
            requires_confirm: false,
            on_confirm: ServiceCall::new("test", id),
            on_cancel: None,
        }
    }

    fn query(id: &str, pattern: &str, entity: &str) -> QueryEntry {
        QueryEntry {
            id: id.to_string(),
            pattern: pattern.to_string(),
            entity: entity.to_string(),
        }
    }

    #[test]
    fn test_lookup_matches_action() {
        let catalog = CommandCatalog::from_config(
            &[action("vacuum", "(?i)vacuum")],
            &[query("lights", "(?i)lights", "group.all_lights")],
        )
        .unwrap();

        match catalog.lookup("please run the Vacuum") {
            Some(Command::Action(a)) => assert_eq!(a.id, "vacuum"),
            other => panic!("expected action match, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_matches_query() {
        let catalog = CommandCatalog::from_config(
            &[action("vacuum", "(?i)vacuum")],
            &[query("lights", "(?i)lights", "group.all_lights")],
        )
        .unwrap();

        match catalog.lookup("how are the lights doing") {
            Some(Command::Query(q)) => assert_eq!(q.entity, "group.all_lights"),
            other => panic!("expected query match, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_no_match() {
        let catalog =
            CommandCatalog::from_config(&[action("vacuum", "(?i)vacuum")], &[]).unwrap();
        assert!(catalog.lookup("what is the meaning of life").is_none());
    }

    #[test]
    fn test_first_match_wins_within_actions() {
        // Both patterns match the same input; the earlier-declared entry
        // must be selected.
        let catalog = CommandCatalog::from_config(
            &[
                action("first", "(?i)turn on"),
                action("second", "(?i)turn on the lights"),
            ],
            &[],
        )
        .unwrap();

        match catalog.lookup("turn on the lights") {
            Some(Command::Action(a)) => assert_eq!(a.id, "first"),
            other => panic!("expected action match, got {:?}", other),
        }
    }

    #[test]
    fn test_actions_take_precedence_over_queries() {
        let catalog = CommandCatalog::from_config(
            &[action("lights_on", "(?i)lights")],
            &[query("lights", "(?i)lights", "group.all_lights")],
        )
        .unwrap();

        assert!(matches!(
            catalog.lookup("lights please"),
            Some(Command::Action(_))
        ));
    }

    #[test]
    fn test_duplicate_action_id_is_error() {
        let err = CommandCatalog::from_config(
            &[action("vacuum", "a"), action("vacuum", "b")],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "vacuum"));
    }

    #[test]
    fn test_duplicate_query_id_is_error() {
        let err = CommandCatalog::from_config(
            &[],
            &[query("lights", "a", "e1"), query("lights", "b", "e2")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "lights"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let err =
            CommandCatalog::from_config(&[action("broken", "(unclosed")], &[]).unwrap_err();
        match err {
            CatalogError::InvalidPattern { id, .. } => assert_eq!(id, "broken"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_error_into_hearth_error() {
        let err: hearth_core::HearthError = CatalogError::DuplicateId("x".to_string()).into();
        assert!(matches!(err, hearth_core::HearthError::Catalog(_)));
    }

    #[test]
    fn test_empty_catalog_matches_nothing() {
        let catalog = CommandCatalog::from_config(&[], &[]).unwrap();
        assert!(catalog.lookup("anything at all").is_none());
    }
}
