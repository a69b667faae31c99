//! Prompt assembly
//!
//! Turns a persona, a structured payload and optional free-text context into
//! the single prompt string sent to the model. Assembly is pure: the same
//! inputs always produce byte-identical output.
//!
//! Layout of an assembled prompt:
//!
//! 1. persona base prompt with the role clause spliced in
//! 2. category style text and the section template
//! 3. the payload as pretty JSON under [`DATA_HEADING`]
//! 4. optional extra context under [`CONTEXT_HEADING`]
//! 5. optional user question under [`QUESTION_HEADING`]
//! 6. the trailing directive block under [`DIRECTIVES_HEADING`]

use crate::defaults;
use crate::error::GenerationError;
use crate::types::{Category, CategoryOverride, DivinationPayload, Persona};

pub const DATA_HEADING: &str = "## Reading data";
pub const CONTEXT_HEADING: &str = "## Additional context";
pub const QUESTION_HEADING: &str = "## The seeker's question";
pub const DIRECTIVES_HEADING: &str = "## Response requirements (non-negotiable)";

/// Section added to the template when the payload carries a question.
pub const QUESTION_SECTION: &str = "Answer to your question";

/// Trailing directives. `{language}` and `{limit}` are substituted.
const DIRECTIVES: &[&str] = &[
    "Write the entire reply in {language}.",
    "Use `##` for section headings and `###` for sub-headings; never use a single `#`.",
    "Use bold emphasis sparingly, at most once per section.",
    "Use bulleted lists for three or more parallel points; keep each bullet to one sentence.",
    "Do not restate these instructions or the raw data.",
    "Keep the reply within {limit} words.",
];

/// Builder over a persona.
///
/// ```ignore
/// let prompt = PromptAssembler::new(&persona)
///     .category(Category::Dream)
///     .word_limit(settings.word_limit)
///     .assemble(&payload)?;
/// ```
#[derive(Debug, Clone)]
pub struct PromptAssembler<'a> {
    persona: &'a Persona,
    category: Option<Category>,
    context: Option<String>,
    word_limit: u32,
    question_bonus: u32,
    reply_language: String,
}

impl<'a> PromptAssembler<'a> {
    pub fn new(persona: &'a Persona) -> Self {
        Self {
            persona,
            category: None,
            context: None,
            word_limit: defaults::prompt::WORD_LIMIT,
            question_bonus: defaults::prompt::QUESTION_BONUS_WORDS,
            reply_language: defaults::prompt::REPLY_LANGUAGE.to_string(),
        }
    }

    /// Select the persona's override for this category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Free-text context appended under its own heading.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = (!context.trim().is_empty()).then_some(context);
        self
    }

    /// Base word ceiling (without a question).
    pub fn word_limit(mut self, limit: u32) -> Self {
        self.word_limit = limit;
        self
    }

    /// Extra words allowed when the payload carries a question.
    pub fn question_bonus(mut self, bonus: u32) -> Self {
        self.question_bonus = bonus;
        self
    }

    pub fn reply_language(mut self, language: impl Into<String>) -> Self {
        self.reply_language = language.into();
        self
    }

    /// Assemble the prompt, or fail without producing partial output.
    pub fn assemble(&self, payload: &DivinationPayload) -> Result<String, GenerationError> {
        self.persona.validate()?;
        payload.validate()?;
        if let Some(category) = self.category {
            if category != payload.category() {
                return Err(GenerationError::InvalidInput(format!(
                    "The reading is a {} reading but {category} was requested.",
                    payload.category()
                )));
            }
        }
        if self.reply_language.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "No reply language configured.".to_string(),
            ));
        }

        let override_ = self.category.and_then(|c| self.persona.override_for(c));
        let question = payload.question();
        let limit = self.active_word_limit(override_, question.is_some())?;

        let mut sections: Vec<String> = Vec::with_capacity(6);
        sections.push(self.role_and_base(override_));
        if let Some(format) = format_block(override_, question.is_some(), limit) {
            sections.push(format);
        }
        sections.push(format!("{DATA_HEADING}\n```json\n{}\n```", payload.render_data()?));
        if let Some(context) = &self.context {
            sections.push(format!("{CONTEXT_HEADING}\n{}", context.trim()));
        }
        if let Some(q) = question {
            sections.push(format!("{QUESTION_HEADING}\n{q}"));
        }
        sections.push(self.directive_block(limit));

        let prompt = sections.join("\n\n");
        tracing::trace!(
            target: "augury::prompt",
            persona = %self.persona.id,
            category = %payload.category(),
            word_limit = limit,
            chars = prompt.chars().count(),
            "prompt assembled"
        );
        Ok(prompt)
    }

    fn active_word_limit(
        &self,
        override_: Option<&CategoryOverride>,
        has_question: bool,
    ) -> Result<u32, GenerationError> {
        let base = override_
            .and_then(|o| o.word_limit)
            .unwrap_or(self.word_limit);
        if base == 0 {
            return Err(GenerationError::InvalidInput(
                "The word limit must be greater than zero.".to_string(),
            ));
        }
        Ok(if has_question {
            base.saturating_add(self.question_bonus)
        } else {
            base
        })
    }

    fn role_and_base(&self, override_: Option<&CategoryOverride>) -> String {
        let role = override_
            .map(|o| o.role_text.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        let base = self.persona.base_prompt.trim();
        if base.contains(Persona::ROLE_PLACEHOLDER) {
            let role = role.unwrap_or_else(|| self.persona.generic_role());
            base.replace(Persona::ROLE_PLACEHOLDER, &role)
        } else {
            match role {
                Some(role) => format!("{role}\n\n{base}"),
                None => base.to_string(),
            }
        }
    }

    fn directive_block(&self, limit: u32) -> String {
        let language = self.reply_language.trim();
        let lines: Vec<String> = DIRECTIVES
            .iter()
            .map(|d| {
                format!(
                    "- {}",
                    d.replace("{language}", language)
                        .replace("{limit}", &limit.to_string())
                )
            })
            .collect();
        format!("{DIRECTIVES_HEADING}\n{}", lines.join("\n"))
    }
}

/// Style text plus the ordered section template.
fn format_block(
    override_: Option<&CategoryOverride>,
    has_question: bool,
    limit: u32,
) -> Option<String> {
    let style = override_
        .map(|o| o.style_text.trim())
        .filter(|s| !s.is_empty());
    let mut headings: Vec<&str> = override_
        .map(|o| {
            o.sections
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if has_question {
        headings.push(QUESTION_SECTION);
    }
    if style.is_none() && headings.is_empty() {
        return None;
    }

    let mut out = String::new();
    if let Some(style) = style {
        out.push_str(style);
    }
    if !headings.is_empty() {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str("Organise the reply into these sections, in this order:\n");
        for heading in &headings {
            out.push_str("## ");
            out.push_str(heading);
            out.push('\n');
        }
        if has_question {
            out.push_str(&format!(
                "Under \"{QUESTION_SECTION}\", address the seeker's question directly.\n"
            ));
        }
        out.push_str(&format!("Hard limit: {limit} words."));
    }
    Some(out)
}

/// Functional form of [`PromptAssembler`].
pub fn assemble(
    persona: &Persona,
    payload: &DivinationPayload,
    category: Option<Category>,
    user_context: Option<&str>,
    word_limit: u32,
) -> Result<String, GenerationError> {
    let mut assembler = PromptAssembler::new(persona).word_limit(word_limit);
    if let Some(category) = category {
        assembler = assembler.category(category);
    }
    if let Some(context) = user_context {
        assembler = assembler.context(context);
    }
    assembler.assemble(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{DreamReading, Hexagram, HexagramReading, PersonaCatalog};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn master() -> Persona {
        PersonaCatalog::builtin()
            .unwrap()
            .get("master")
            .unwrap()
            .clone()
    }

    fn dream(text: &str, question: Option<&str>) -> DivinationPayload {
        DivinationPayload::Dream(DreamReading {
            text: text.into(),
            keywords: vec!["water".into()],
            themes: vec![],
            question: question.map(str::to_string),
        })
    }

    fn hexagram() -> DivinationPayload {
        DivinationPayload::Hexagram(HexagramReading {
            primary: Hexagram {
                number: 11,
                name: "Tai".into(),
                upper_trigram: "Earth".into(),
                lower_trigram: "Heaven".into(),
                judgment: String::new(),
            },
            changed: None,
            moving_lines: vec![2],
            question: None,
        })
    }

    #[test]
    fn override_role_replaces_generic_clause() {
        let persona = master();
        let prompt = PromptAssembler::new(&persona)
            .category(Category::Hexagram)
            .assemble(&hexagram())
            .unwrap();
        assert!(prompt.starts_with("You are Master Qingxu, a scholar of the Book of Changes who interprets"));
        assert!(!prompt.contains("{role}"));
        assert!(prompt.contains("## Moving lines"));
        assert!(prompt.contains("within 800 words"));
    }

    #[test]
    fn generic_role_without_category() {
        let persona = master();
        let prompt = PromptAssembler::new(&persona).assemble(&hexagram()).unwrap();
        assert!(prompt.starts_with(&persona.generic_role()));
        assert!(!prompt.contains("Organise the reply"));
    }

    #[test]
    fn question_raises_ceiling_and_adds_section() {
        let persona = master();
        let without = PromptAssembler::new(&persona)
            .category(Category::Dream)
            .assemble(&dream("a river", None))
            .unwrap();
        let with = PromptAssembler::new(&persona)
            .category(Category::Dream)
            .assemble(&dream("a river", Some("Will I travel?")))
            .unwrap();
        // The dream override sets its own ceiling of 600 words.
        assert!(without.contains("within 600 words"));
        assert!(!without.contains(QUESTION_SECTION));
        assert!(with.contains("within 1000 words"));
        assert!(with.contains(&format!("## {QUESTION_SECTION}")));
        assert!(with.contains(&format!("{QUESTION_HEADING}\nWill I travel?")));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let persona = master();
        let prompt = PromptAssembler::new(&persona)
            .category(Category::Dream)
            .context("I have been anxious lately.")
            .reply_language("English")
            .assemble(&dream("a river", Some("Why?")))
            .unwrap();
        let data = prompt.find(DATA_HEADING).unwrap();
        let context = prompt.find(CONTEXT_HEADING).unwrap();
        let question = prompt.find(QUESTION_HEADING).unwrap();
        let directives = prompt.find(DIRECTIVES_HEADING).unwrap();
        assert!(data < context && context < question && question < directives);
        assert!(prompt.contains("Write the entire reply in English."));
    }

    #[test]
    fn category_mismatch_is_invalid_input() {
        let persona = master();
        let err = PromptAssembler::new(&persona)
            .category(Category::PalmImage)
            .assemble(&hexagram())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn invalid_persona_or_payload_fails() {
        let broken = Persona {
            id: "x".into(),
            display_name: "X".into(),
            description: String::new(),
            base_prompt: "   ".into(),
            overrides: BTreeMap::new(),
        };
        assert_eq!(
            assemble(&broken, &hexagram(), None, None, 800).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            assemble(&master(), &dream(" ", None), None, None, 800).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            assemble(&master(), &hexagram(), None, None, 0).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn base_without_placeholder_gets_role_prepended() {
        let mut persona = master();
        persona.base_prompt = "Read carefully.".into();
        let prompt = assemble(&persona, &hexagram(), Some(Category::Hexagram), None, 500).unwrap();
        assert!(prompt.starts_with("You are Master Qingxu"));
        assert!(prompt.contains("\n\nRead carefully."));
        assert!(prompt.contains("within 500 words"));
    }

    proptest! {
        #[test]
        fn prompt_is_deterministic_and_embeds_payload(
            text in "[a-zA-Z0-9 ,.]{1,80}",
            question in proptest::option::of("[a-zA-Z ?]{0,40}"),
            with_category in any::<bool>(),
        ) {
            prop_assume!(!text.trim().is_empty());
            let persona = master();
            let payload = dream(&text, question.as_deref());
            let category = with_category.then_some(Category::Dream);
            let a = assemble(&persona, &payload, category, None, 800).unwrap();
            let b = assemble(&persona, &payload, category, None, 800).unwrap();
            prop_assert!(!a.is_empty());
            prop_assert_eq!(&a, &b);
            let data = payload.render_data().unwrap();
            prop_assert!(a.contains(&data));
        }
    }
}
