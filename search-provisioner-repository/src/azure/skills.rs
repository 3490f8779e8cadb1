//! Enrichment skill library.
//!
//! Six fixed skill definitions over the document projection tree. Which of
//! them end up in the registered skillset is decided by the caller through a
//! list of `SkillKind`s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::SearchServiceError;
use crate::types::{InputFieldMapping, OutputFieldMapping, Skill, SkillsetDefinition};

/// Identifier of a skill in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Ocr,
    Merge,
    LanguageDetection,
    Split,
    EntityRecognition,
    KeyPhraseExtraction,
}

impl SkillKind {
    /// Every skill, in the order they run inside a skillset.
    pub const ALL: [SkillKind; 6] = [
        SkillKind::Ocr,
        SkillKind::Merge,
        SkillKind::LanguageDetection,
        SkillKind::Split,
        SkillKind::EntityRecognition,
        SkillKind::KeyPhraseExtraction,
    ];

    /// Skills registered when nothing else is configured.
    pub const DEFAULT_ENABLED: [SkillKind; 1] = [SkillKind::LanguageDetection];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillKind::Ocr => "ocr",
            SkillKind::Merge => "merge",
            SkillKind::LanguageDetection => "language_detection",
            SkillKind::Split => "split",
            SkillKind::EntityRecognition => "entity_recognition",
            SkillKind::KeyPhraseExtraction => "key_phrase_extraction",
        }
    }

    /// The `@odata.type` of the skill on the search service.
    pub fn odata_type(&self) -> &'static str {
        match self {
            SkillKind::Ocr => "#Microsoft.Skills.Vision.OcrSkill",
            SkillKind::Merge => "#Microsoft.Skills.Text.MergeSkill",
            SkillKind::LanguageDetection => "#Microsoft.Skills.Text.LanguageDetectionSkill",
            SkillKind::Split => "#Microsoft.Skills.Text.SplitSkill",
            SkillKind::EntityRecognition => "#Microsoft.Skills.Text.V3.EntityRecognitionSkill",
            SkillKind::KeyPhraseExtraction => "#Microsoft.Skills.Text.KeyPhraseExtractionSkill",
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillKind {
    type Err = SearchServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        SkillKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SearchServiceError::validation(format!("Unknown skill '{}'", s)))
    }
}

fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Build the fixed definition of one skill.
pub fn build_skill(kind: SkillKind) -> Skill {
    let (description, context, inputs, outputs, extra) = match kind {
        SkillKind::Ocr => (
            "Extract text (plain and structured) from image",
            "/document/normalized_images/*",
            vec![InputFieldMapping::new("image", "/document/normalized_images/*")],
            vec![OutputFieldMapping::new("text", "text")],
            params(json!({ "defaultLanguageCode": "en", "detectOrientation": true })),
        ),
        SkillKind::Merge => (
            "Create merged_text which includes all the textual representation of each image inserted at the right location in the content field",
            "/document",
            vec![
                InputFieldMapping::new("text", "/document/content"),
                InputFieldMapping::new("itemsToInsert", "/document/normalized_images/*/text"),
                InputFieldMapping::new("offsets", "/document/normalized_images/*/contentOffset"),
            ],
            vec![OutputFieldMapping::new("mergedText", "merged_text")],
            params(json!({ "insertPreTag": " ", "insertPostTag": " " })),
        ),
        SkillKind::LanguageDetection => (
            "Detect the language used in the document",
            "/document",
            vec![InputFieldMapping::new("text", "/document/merged_text")],
            vec![OutputFieldMapping::new("languageCode", "languageCode")],
            Map::new(),
        ),
        SkillKind::Split => (
            "Split text into pages for subsequent skill processing",
            "/document",
            vec![
                InputFieldMapping::new("text", "/document/merged_text"),
                InputFieldMapping::new("languageCode", "/document/languageCode"),
            ],
            vec![OutputFieldMapping::new("textItems", "pages")],
            params(json!({
                "textSplitMode": "pages",
                "maximumPageLength": 4000,
                "defaultLanguageCode": "en"
            })),
        ),
        SkillKind::EntityRecognition => (
            "Recognize organizations",
            "/document/pages/*",
            vec![InputFieldMapping::new("text", "/document/pages/*")],
            vec![OutputFieldMapping::new("organizations", "organizations")],
            params(json!({ "categories": ["Organization"] })),
        ),
        SkillKind::KeyPhraseExtraction => (
            "Extract the key phrases",
            "/document/pages/*",
            vec![
                InputFieldMapping::new("text", "/document/pages/*"),
                InputFieldMapping::new("languageCode", "/document/languageCode"),
            ],
            vec![OutputFieldMapping::new("keyPhrases", "keyPhrases")],
            Map::new(),
        ),
    };

    Skill {
        odata_type: kind.odata_type().to_string(),
        name: kind.as_str().to_string(),
        description: Some(description.to_string()),
        context: context.to_string(),
        inputs,
        outputs,
        extra,
    }
}

/// Build the enabled skills in canonical order, ignoring duplicates.
pub fn build_skills(enabled: &[SkillKind]) -> Vec<Skill> {
    SkillKind::ALL
        .into_iter()
        .filter(|kind| enabled.contains(kind))
        .map(build_skill)
        .collect()
}

/// Assemble a skillset containing exactly the enabled skills.
///
/// # Returns
///
/// * `Ok(SkillsetDefinition)` - The skillset to register
/// * `Err(SearchServiceError::ValidationError)` - If no skill is enabled
pub fn skillset_definition(
    name: impl Into<String>,
    enabled: &[SkillKind],
) -> Result<SkillsetDefinition, SearchServiceError> {
    let skills = build_skills(enabled);
    if skills.is_empty() {
        return Err(SearchServiceError::validation(
            "A skillset needs at least one enabled skill",
        ));
    }

    Ok(SkillsetDefinition {
        name: name.into(),
        description: "Extract entities, detect language and extract key-phrases".to_string(),
        skills,
    })
}
