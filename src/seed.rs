//! Schema-driven synthetic datasets for local testing.
//!
//! A schema is a JSON array of `{ "name": ..., "type": ... }` fields. Each
//! generated record is a JSON object with those fields in schema order.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, VoxaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeTag {
    Uuid,
    FirstName,
    LastName,
    FullName,
    Email,
    Word,
    Sentence,
    Integer,
    Float,
    Boolean,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub tag: TypeTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn parse(json: &str) -> Result<Self> {
        let schema: Self = serde_json::from_str(json)
            .map_err(|e| VoxaError::validation(format!("invalid dataset schema: {e}")))?;
        if schema.fields.is_empty() {
            return Err(VoxaError::validation("dataset schema has no fields"));
        }
        Ok(schema)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::parse(&json)
    }
}

impl Default for Schema {
    fn default() -> Self {
        let field = |name: &str, tag| Field {
            name: name.to_string(),
            tag,
        };
        Self {
            fields: vec![
                field("id", TypeTag::Uuid),
                field("name", TypeTag::FullName),
                field("email", TypeTag::Email),
                field("age", TypeTag::Integer),
                field("active", TypeTag::Boolean),
                field("createdAt", TypeTag::Date),
            ],
        }
    }
}

/// Produces one value for a type tag.
pub trait ValueGenerator {
    fn generate(&mut self, tag: TypeTag) -> Value;
}

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Linus", "Barbara", "Ken", "Margaret", "Dennis", "Radia", "Edsger",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Torvalds", "Liskov", "Thompson", "Hamilton", "Ritchie",
    "Perlman", "Dijkstra",
];
const WORDS: &[&str] = &[
    "sprint", "story", "backlog", "deploy", "review", "merge", "branch", "release", "ticket",
    "estimate", "velocity", "standup",
];
const DOMAINS: &[&str] = &["example.com", "example.org", "test.dev"];

/// [`ValueGenerator`] backed by a seedable RNG.
pub struct RandomGenerator<R> {
    rng: R,
}

impl RandomGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic output for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        options.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn sentence(&mut self) -> String {
        let len = self.rng.gen_range(4..10);
        let words: Vec<&str> = (0..len).map(|_| self.pick(WORDS)).collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }

    /// `YYYY-MM-DD` between 2020 and 2025; days stop at 28 so every month is valid.
    fn date(&mut self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.rng.gen_range(2020..2026),
            self.rng.gen_range(1..=12),
            self.rng.gen_range(1..=28)
        )
    }
}

impl<R: Rng> ValueGenerator for RandomGenerator<R> {
    fn generate(&mut self, tag: TypeTag) -> Value {
        match tag {
            TypeTag::Uuid => {
                let bytes: [u8; 16] = self.rng.gen();
                Value::String(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }
            TypeTag::FirstName => Value::from(self.pick(FIRST_NAMES)),
            TypeTag::LastName => Value::from(self.pick(LAST_NAMES)),
            TypeTag::FullName => {
                Value::String(format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES)))
            }
            TypeTag::Email => Value::String(format!(
                "{}.{}{}@{}",
                self.pick(FIRST_NAMES).to_lowercase(),
                self.pick(LAST_NAMES).to_lowercase(),
                self.rng.gen_range(1..100),
                self.pick(DOMAINS)
            )),
            TypeTag::Word => Value::from(self.pick(WORDS)),
            TypeTag::Sentence => Value::String(self.sentence()),
            TypeTag::Integer => Value::from(self.rng.gen_range(0..100_i64)),
            TypeTag::Float => Value::from((self.rng.gen_range(0.0..1000.0_f64) * 100.0).round() / 100.0),
            TypeTag::Boolean => Value::Bool(self.rng.gen()),
            TypeTag::Date => Value::String(self.date()),
        }
    }
}

/// Build `count` records following `schema`.
pub fn generate(schema: &Schema, count: usize, generator: &mut dyn ValueGenerator) -> Vec<Value> {
    (0..count)
        .map(|_| {
            let record: Map<String, Value> = schema
                .fields
                .iter()
                .map(|field| (field.name.clone(), generator.generate(field.tag)))
                .collect();
            Value::Object(record)
        })
        .collect()
}
