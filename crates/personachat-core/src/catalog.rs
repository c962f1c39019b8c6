//! Process-wide immutable persona registry.
//!
//! Built exactly once at startup and injected into the orchestrator (never
//! accessed as ambient global state, so tests can run with fake catalogs).

use std::collections::HashMap;

use personachat_types::error::{CatalogError, ChatError};
use personachat_types::persona::Persona;

/// Immutable registry of persona definitions.
///
/// `list()` preserves definition order; `get()` is O(1) via an index keyed
/// by persona key.
#[derive(Debug)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
    index: HashMap<String, usize>,
}

impl PersonaCatalog {
    /// Build a catalog, validating every definition.
    ///
    /// Any invalid persona (empty key or prompt, temperature outside [0,1])
    /// or duplicate key is fatal here, not deferred to request time.
    pub fn new(personas: Vec<Persona>) -> Result<Self, CatalogError> {
        if personas.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(personas.len());
        for (i, persona) in personas.iter().enumerate() {
            persona.validate().map_err(CatalogError::InvalidPersona)?;
            if index.insert(persona.key.clone(), i).is_some() {
                return Err(CatalogError::DuplicateKey(persona.key.clone()));
            }
        }

        Ok(Self { personas, index })
    }

    /// All personas in definition order. Side-effect free.
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    /// Look up a persona by key.
    pub fn get(&self, key: &str) -> Result<&Persona, ChatError> {
        self.index
            .get(key)
            .map(|&i| &self.personas[i])
            .ok_or_else(|| ChatError::PersonaNotFound(key.to_string()))
    }

    /// Number of personas in the catalog.
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(key: &str, temperature: f64) -> Persona {
        Persona {
            key: key.to_string(),
            name: format!("{key} persona"),
            system_prompt: format!("You are {key}."),
            temperature,
            top_p: 0.9,
            top_k: 40,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 1_024,
            history_window: None,
        }
    }

    #[test]
    fn test_list_preserves_definition_order() {
        let catalog =
            PersonaCatalog::new(vec![persona("analyst", 0.3), persona("storyteller", 0.9)])
                .unwrap();
        let keys: Vec<&str> = catalog.list().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["analyst", "storyteller"]);
    }

    #[test]
    fn test_get_returns_matching_persona() {
        let catalog =
            PersonaCatalog::new(vec![persona("analyst", 0.3), persona("coder", 0.2)]).unwrap();
        let p = catalog.get("coder").unwrap();
        assert_eq!(p.key, "coder");
        // Each listed persona is retrievable exactly once under its own key.
        for listed in catalog.list() {
            assert_eq!(catalog.get(&listed.key).unwrap().key, listed.key);
        }
    }

    #[test]
    fn test_get_unknown_key_fails() {
        let catalog = PersonaCatalog::new(vec![persona("analyst", 0.3)]).unwrap();
        let err = catalog.get("poet").unwrap_err();
        assert!(matches!(err, ChatError::PersonaNotFound(ref k) if k == "poet"));
    }

    #[test]
    fn test_duplicate_key_is_fatal() {
        let err = PersonaCatalog::new(vec![persona("analyst", 0.3), persona("analyst", 0.5)])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(ref k) if k == "analyst"));
    }

    #[test]
    fn test_invalid_definition_is_fatal() {
        let err = PersonaCatalog::new(vec![persona("analyst", 1.7)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPersona(_)));
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        assert!(matches!(
            PersonaCatalog::new(Vec::new()),
            Err(CatalogError::Empty)
        ));
    }
}
