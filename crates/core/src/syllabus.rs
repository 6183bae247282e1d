//! Syllabus Loading and Rendering
//!
//! The syllabus is the fixed set of topics the tutor is allowed to discuss.
//! It is loaded once at startup from a JSON object mapping topic names to
//! subtopic lists, validated, and kept immutable for the process lifetime.

use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A single syllabus topic and its ordered subtopics.
#[derive(Debug, Clone)]
pub struct Topic {
    pub name: String,
    pub subtopics: Vec<String>,
}

/// The full syllabus, in file order.
///
/// Ordering matters: the rendered prompt must be byte-identical across calls,
/// so topics are kept as a vector rather than a map. Parsing relies on
/// `serde_json`'s `preserve_order` feature to keep the file's key order.
#[derive(Debug, Clone)]
pub struct Syllabus {
    topics: Vec<Topic>,
}

impl Syllabus {
    /// Reads and parses a syllabus file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read syllabus file '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid syllabus file '{}'", path.display()))
    }

    /// Parses a syllabus from a JSON object string like
    /// `{"HTML": ["Tags", "Forms"], "CSS": ["Selectors"]}`.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("Syllabus is not valid JSON")?;
        let object = value
            .as_object()
            .context("Syllabus root must be a JSON object mapping topics to subtopic arrays")?;

        let mut topics = Vec::with_capacity(object.len());
        for (name, subtopics_value) in object {
            let entries = subtopics_value
                .as_array()
                .with_context(|| format!("Subtopics for '{}' must be a JSON array", name))?;
            let subtopics = entries
                .iter()
                .map(|entry| {
                    entry
                        .as_str()
                        .map(str::to_string)
                        .with_context(|| format!("Subtopics for '{}' must be strings", name))
                })
                .collect::<Result<Vec<_>>>()?;
            topics.push(Topic {
                name: name.clone(),
                subtopics,
            });
        }

        let syllabus = Self { topics };
        syllabus.validate()?;
        Ok(syllabus)
    }

    /// Checks the structural invariants: at least one topic, no empty labels,
    /// topic names unique across the syllabus, subtopic names unique within
    /// their topic.
    fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            bail!("Syllabus must contain at least one topic");
        }

        let mut seen_topics = HashSet::new();
        for topic in &self.topics {
            if topic.name.trim().is_empty() {
                bail!("Syllabus contains an empty topic name");
            }
            if !seen_topics.insert(topic.name.as_str()) {
                bail!("Duplicate topic '{}' in syllabus", topic.name);
            }

            let mut seen_subtopics = HashSet::new();
            for subtopic in &topic.subtopics {
                if subtopic.trim().is_empty() {
                    bail!("Topic '{}' contains an empty subtopic name", topic.name);
                }
                if !seen_subtopics.insert(subtopic.as_str()) {
                    bail!(
                        "Duplicate subtopic '{}' under topic '{}'",
                        subtopic,
                        topic.name
                    );
                }
            }
        }
        Ok(())
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// All labels the gate scores against: topic names first, then every
    /// subtopic, in syllabus order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.topics
            .iter()
            .map(|topic| topic.name.as_str())
            .chain(
                self.topics
                    .iter()
                    .flat_map(|topic| topic.subtopics.iter().map(String::as_str)),
            )
    }

    /// Renders the syllabus for the system prompt, one line per topic:
    /// `- HTML: Tags, Forms`.
    pub fn render_topic_lines(&self) -> String {
        self.topics
            .iter()
            .map(|topic| format!("- {}: {}", topic.name, topic.subtopics.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
