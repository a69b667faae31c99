//! Personas and the catalog they are loaded from.
//!
//! Persona- and category-specific wording lives entirely in declarative
//! records; the prompt assembler has no per-persona branches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Reading category; also the tag of [`crate::types::DivinationPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Hexagram,
    TimeChart,
    Dream,
    PalmImage,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Hexagram,
        Category::TimeChart,
        Category::Dream,
        Category::PalmImage,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Hexagram => "hexagram",
            Category::TimeChart => "time-chart",
            Category::Dream => "dream",
            Category::PalmImage => "palm-image",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category wording of a persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverride {
    /// Replaces the generic role clause.
    pub role_text: String,
    /// Style and format guidance appended after the base prompt.
    pub style_text: String,
    /// Section headings the reply must use, in order.
    #[serde(default)]
    pub sections: Vec<String>,
    /// Word ceiling for this category, overriding the settings value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// May contain a `{role}` placeholder where the role clause is spliced.
    pub base_prompt: String,
    #[serde(default)]
    pub overrides: BTreeMap<Category, CategoryOverride>,
}

impl Persona {
    /// Placeholder in `base_prompt` that receives the role clause.
    pub const ROLE_PLACEHOLDER: &'static str = "{role}";

    pub fn override_for(&self, category: Category) -> Option<&CategoryOverride> {
        self.overrides.get(&category)
    }

    /// The generic "you are ..." clause used when no override applies.
    pub fn generic_role(&self) -> String {
        if self.description.trim().is_empty() {
            format!("You are {}.", self.display_name.trim())
        } else {
            format!(
                "You are {}, {}.",
                self.display_name.trim(),
                self.description.trim().trim_end_matches('.')
            )
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.id.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "A persona must have an id.".to_string(),
            ));
        }
        if self.display_name.trim().is_empty() {
            return Err(GenerationError::InvalidInput(format!(
                "Persona '{}' has no display name.",
                self.id
            )));
        }
        if self.base_prompt.trim().is_empty() {
            return Err(GenerationError::InvalidInput(format!(
                "Persona '{}' has an empty base prompt.",
                self.id
            )));
        }
        for (category, o) in &self.overrides {
            if o.role_text.trim().is_empty() && o.style_text.trim().is_empty() {
                return Err(GenerationError::InvalidInput(format!(
                    "Persona '{}' has an empty override for {category}.",
                    self.id
                )));
            }
            if o.word_limit == Some(0) {
                return Err(GenerationError::InvalidInput(format!(
                    "Persona '{}' has a zero word limit for {category}.",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    personas: Vec<Persona>,
}

/// Immutable, id-indexed set of personas.
#[derive(Debug, Clone, Default)]
pub struct PersonaCatalog {
    personas: BTreeMap<String, Persona>,
}

impl PersonaCatalog {
    /// Build a catalog, validating every persona and rejecting duplicate ids.
    pub fn new(personas: impl IntoIterator<Item = Persona>) -> Result<Self, GenerationError> {
        let mut map = BTreeMap::new();
        for persona in personas {
            persona.validate()?;
            let id = persona.id.trim().to_string();
            if map.contains_key(&id) {
                return Err(GenerationError::InvalidInput(format!(
                    "Duplicate persona id '{id}'."
                )));
            }
            map.insert(id, persona);
        }
        Ok(Self { personas: map })
    }

    /// Parse a `{"personas": [...]}` document.
    pub fn from_json_str(json: &str) -> Result<Self, GenerationError> {
        let file: CatalogFile = serde_json::from_str(json).map_err(|e| {
            GenerationError::InvalidInput(format!("The persona catalog could not be read: {e}"))
        })?;
        Self::new(file.personas)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, GenerationError> {
        Self::from_json_str(include_str!("../../assets/personas.json"))
    }

    pub fn get(&self, id: &str) -> Result<&Persona, GenerationError> {
        self.personas
            .get(id.trim())
            .ok_or_else(|| GenerationError::InvalidInput(format!("Unknown persona '{id}'.")))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.personas.keys().map(String::as_str)
    }

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
    use crate::error::ErrorKind;

    #[test]
    fn builtin_catalog_loads_and_covers_every_category() {
        let catalog = PersonaCatalog::builtin().expect("builtin catalog");
        assert!(!catalog.is_empty());
        for id in catalog.ids() {
            let persona = catalog.get(id).unwrap();
            for category in Category::ALL {
                assert!(
                    persona.override_for(category).is_some(),
                    "{id} lacks an override for {category}"
                );
            }
        }
    }

    #[test]
    fn category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Category::TimeChart).unwrap(),
            "\"time-chart\""
        );
        let c: Category = serde_json::from_str("\"palm-image\"").unwrap();
        assert_eq!(c, Category::PalmImage);
    }

    #[test]
    fn unknown_persona_is_invalid_input() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let err = catalog.get("nobody").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn rejects_empty_base_prompt_and_duplicates() {
        let json = r#"{"personas":[{"id":"a","displayName":"A","basePrompt":"  "}]}"#;
        assert_eq!(
            PersonaCatalog::from_json_str(json).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );

        let json = r#"{"personas":[
            {"id":"a","displayName":"A","basePrompt":"x"},
            {"id":"a","displayName":"B","basePrompt":"y"}
        ]}"#;
        let err = PersonaCatalog::from_json_str(json).unwrap_err();
        assert!(err.message().contains("Duplicate"));
    }

    #[test]
    fn malformed_catalog_is_invalid_input() {
        let err = PersonaCatalog::from_json_str("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn generic_role_uses_description() {
        let p = Persona {
            id: "sage".into(),
            display_name: "The Sage".into(),
            description: "a patient reader of signs.".into(),
            base_prompt: "{role}".into(),
            overrides: BTreeMap::new(),
        };
        assert_eq!(p.generic_role(), "You are The Sage, a patient reader of signs.");
    }
}
