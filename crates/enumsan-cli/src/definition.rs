//! # Definition Files
//!
//! YAML documents declaring enumerations and models for the CLI:
//!
//! ```yaml
//! enums:
//!   - name: Status
//!     members:
//!       - { name: PENDING, value: 1 }
//!       - { name: APPROVED, value: 2 }
//! models:
//!   - name: Item
//!     config: { extra: forbid }
//!     fields:
//!       - { name: status, type: str, enum: Status }
//!       - { name: history, type: "list[str]", enum: Status, default: [] }
//! ```
//!
//! A field's marker shape follows its type (`list[..]` → list, `tuple[..]`
//! → tuple of that arity, anything else → scalar) unless `shape` says
//! otherwise. Enum references must name an enumeration in the same file.
//!
//! A type may also name an enumeration directly (`type: Priority`,
//! `type: "optional[Priority]"`). Such a field accepts a member's integer
//! value and keeps it, where an `enum:` marker on a `str` field stores the
//! member name.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use enumsan_core::{EnumType, FieldValue};
use enumsan_model::{EnumMarker, FieldDescriptor, FieldType, MarkerShape, ModelConfig, ModelSchema};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
    #[serde(default)]
    enums: Vec<EnumType>,
    #[serde(default)]
    models: Vec<ModelDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelDef {
    name: String,
    #[serde(default)]
    config: ModelConfig,
    #[serde(default)]
    fields: Vec<FieldDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDef {
    name: String,
    #[serde(rename = "type", default = "any_type")]
    field_type: String,
    #[serde(rename = "enum")]
    enum_name: Option<String>,
    shape: Option<ShapeDef>,
    #[serde(default, deserialize_with = "present")]
    default: Option<Value>,
    description: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ShapeDef {
    Scalar,
    List,
    Tuple,
}

fn any_type() -> String {
    "any".to_string()
}

/// Keeps an explicit `default: null` apart from an absent default.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Enumerations and built model schemas from one definition file.
#[derive(Debug, Default)]
pub struct Definitions {
    enums: BTreeMap<String, Arc<EnumType>>,
    models: BTreeMap<String, ModelSchema>,
}

impl Definitions {
    pub fn enum_type(&self, name: &str) -> Option<&Arc<EnumType>> {
        self.enums.get(name)
    }

    pub fn model(&self, name: &str) -> Option<&ModelSchema> {
        self.models.get(name)
    }

    pub fn enum_names(&self) -> impl Iterator<Item = &str> {
        self.enums.keys().map(String::as_str)
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Look an enumeration up, failing with the known names.
    pub fn require_enum(&self, name: &str) -> Result<&Arc<EnumType>> {
        match self.enum_type(name) {
            Some(ty) => Ok(ty),
            None => bail!(
                "unknown enum '{name}' (defined: {})",
                self.enum_names().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    /// Look a model up, failing with the known names.
    pub fn require_model(&self, name: &str) -> Result<&ModelSchema> {
        match self.model(name) {
            Some(model) => Ok(model),
            None => bail!(
                "unknown model '{name}' (defined: {})",
                self.model_names().collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

/// Parse and build every definition in `text`.
///
/// # Errors
///
/// Malformed YAML, invalid enumerations, duplicate enum or model names,
/// unparseable field types, and references to undefined enumerations.
pub fn parse_definitions(text: &str) -> Result<Definitions> {
    let file: DefinitionFile =
        serde_yaml::from_str(text).context("failed to parse definition file")?;

    let mut defs = Definitions::default();
    for ty in file.enums {
        let name = ty.name().to_string();
        if defs.enums.insert(name.clone(), Arc::new(ty)).is_some() {
            bail!("duplicate enum definition '{name}'");
        }
    }

    for model in file.models {
        if defs.models.contains_key(&model.name) {
            bail!("duplicate model definition '{}'", model.name);
        }
        let schema = build_model(&defs, &model)
            .with_context(|| format!("invalid model definition '{}'", model.name))?;
        defs.models.insert(model.name, schema);
    }

    tracing::debug!(
        enums = defs.enums.len(),
        models = defs.models.len(),
        "loaded definitions"
    );
    Ok(defs)
}

/// Read and parse a definition file.
///
/// # Errors
///
/// I/O failures plus everything [`parse_definitions`] reports.
pub fn load_definitions(path: &Path) -> Result<Definitions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_definitions(&text).with_context(|| format!("in {}", path.display()))
}

fn build_model(defs: &Definitions, model: &ModelDef) -> Result<ModelSchema> {
    let mut builder = ModelSchema::builder(&model.name).config(model.config.clone());
    for field in &model.fields {
        builder = builder.field(build_field(defs, field)?);
    }
    Ok(builder.build())
}

fn build_field(defs: &Definitions, def: &FieldDef) -> Result<FieldDescriptor> {
    let field_type = FieldType::parse_with(&def.field_type, |name| defs.enum_type(name).cloned())
        .with_context(|| format!("field '{}'", def.name))?;

    let mut field = FieldDescriptor::new(&def.name, field_type.clone());
    if let Some(default) = &def.default {
        field = field.with_default(FieldValue::from(default));
    }
    if let Some(description) = &def.description {
        field = field.with_description(description);
    }
    if let Some(title) = &def.title {
        field = field.with_title(title);
    }

    if let Some(enum_name) = &def.enum_name {
        let Some(ty) = defs.enum_type(enum_name) else {
            bail!("field '{}' references undefined enum '{enum_name}'", def.name);
        };
        let shape = match def.shape {
            None => field_type.marker_shape(),
            Some(ShapeDef::Scalar) => MarkerShape::Scalar,
            Some(ShapeDef::List) => MarkerShape::List,
            Some(ShapeDef::Tuple) => match &field_type {
                FieldType::Tuple(items) => MarkerShape::Tuple(items.len()),
                other => bail!(
                    "field '{}' has shape tuple but type {other} is not a tuple",
                    def.name
                ),
            },
        };
        field = field.marker(EnumMarker::new(Arc::clone(ty), shape));
    } else if def.shape.is_some() {
        bail!("field '{}' sets shape without an enum", def.name);
    }

    Ok(field)
}
