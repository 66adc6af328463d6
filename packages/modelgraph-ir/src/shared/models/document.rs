//! Input documents
//!
//! These are the shapes the (external) parsing layer hands to the linker.
//! Every category may arrive split over several documents; documents naming
//! the same domain are unioned by the registry.
//!
//! All types deserialize with `#[serde(default)]` so a partially written
//! draft still loads.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Domain models
// ═══════════════════════════════════════════════════════════════════════════

/// Validation rule kinds a property may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValidationKind {
    #[default]
    Required,
    Unique,
    MaxLength,
    MinLength,
    Range,
    Pattern,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRule {
    pub kind: ValidationKind,
    /// Other properties of the same model that take part in the rule
    /// (for `Unique`: the composite key members besides the property itself)
    pub related_properties: Vec<String>,
    pub value: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: ValidationKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn unique(related_properties: Vec<String>) -> Self {
        Self {
            kind: ValidationKind::Unique,
            related_properties,
            value: None,
        }
    }
}

/// A domain model property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDef {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
    /// Property holds the key of another model
    pub is_reference: bool,
    /// Target model name when `is_reference` is set
    pub reference_type: Option<String>,
    /// Target domain; the owner's own domain when absent
    pub reference_domain: Option<String>,
    /// Alternative name DTO properties may use for this property
    pub alias: Option<String>,
    /// Reference used only for computation; excluded from reverse-reference accounting
    pub is_processing: bool,
    pub validation_rules: Vec<ValidationRule>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn reference_to(mut self, model: impl Into<String>) -> Self {
        self.is_reference = true;
        self.reference_type = Some(model.into());
        self
    }

    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.reference_domain = Some(domain.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn processing(mut self) -> Self {
        self.is_processing = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Declared reference target, if this property is a usable reference
    pub fn reference_target(&self) -> Option<&str> {
        if !self.is_reference {
            return None;
        }
        self.reference_type
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn unique_rules(&self) -> impl Iterator<Item = &ValidationRule> {
        self.validation_rules
            .iter()
            .filter(|rule| rule.kind == ValidationKind::Unique)
    }

    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.alias.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainModelDef {
    pub name: String,
    /// Defaults to `name` when empty
    pub classification_key: String,
    pub feature_name: Option<String>,
    /// Defaults to the configured identifier type when absent
    pub id_type: Option<String>,
    /// Backing persistence model; defaults to `name`
    pub data_model_name: Option<String>,
    pub is_aggregate: bool,
    pub is_value_object: bool,
    pub tracks_changes: bool,
    /// Child model names, resolved in the model's own domain
    pub children: Vec<String>,
    pub properties: Vec<PropertyDef>,
}

impl DomainModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_classification_key(mut self, key: impl Into<String>) -> Self {
        self.classification_key = key.into();
        self
    }

    pub fn with_feature_name(mut self, feature_name: impl Into<String>) -> Self {
        self.feature_name = Some(feature_name.into());
        self
    }

    pub fn with_id_type(mut self, id_type: impl Into<String>) -> Self {
        self.id_type = Some(id_type.into());
        self
    }

    pub fn with_data_model(mut self, data_model: impl Into<String>) -> Self {
        self.data_model_name = Some(data_model.into());
        self
    }

    pub fn aggregate(mut self) -> Self {
        self.is_aggregate = true;
        self
    }

    pub fn value_object(mut self) -> Self {
        self.is_value_object = true;
        self
    }

    pub fn tracking_changes(mut self) -> Self {
        self.tracks_changes = true;
        self
    }

    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainModelDocument {
    pub domain: String,
    pub models: Vec<DomainModelDef>,
}

impl DomainModelDocument {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            models: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: DomainModelDef) -> Self {
        self.models.push(model);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Persistence models
// ═══════════════════════════════════════════════════════════════════════════

/// Column-level reference to another persistence model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataReference {
    /// Owner's domain when absent
    pub domain: Option<String>,
    pub data_model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPropertyDef {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
    pub reference: Option<DataReference>,
}

impl DataPropertyDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn referencing(mut self, domain: impl Into<String>, data_model: impl Into<String>) -> Self {
        self.reference = Some(DataReference {
            domain: Some(domain.into()),
            data_model: data_model.into(),
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataModelDef {
    pub name: String,
    /// Defaults to `name` when empty
    pub classification_key: String,
    pub properties: Vec<DataPropertyDef>,
}

impl DataModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_classification_key(mut self, key: impl Into<String>) -> Self {
        self.classification_key = key.into();
        self
    }

    pub fn with_property(mut self, property: DataPropertyDef) -> Self {
        self.properties.push(property);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataModelDocument {
    pub domain: String,
    pub data_models: Vec<DataModelDef>,
}

impl DataModelDocument {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            data_models: Vec::new(),
        }
    }

    pub fn with_data_model(mut self, data_model: DataModelDef) -> Self {
        self.data_models.push(data_model);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Enumerations
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumItemDef {
    pub name: String,
    /// Previous ordinal + 1 when absent (first item: 0)
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationDef {
    pub name: String,
    pub items: Vec<EnumItemDef>,
}

impl EnumerationDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, name: impl Into<String>, value: Option<i64>) -> Self {
        self.items.push(EnumItemDef {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationDocument {
    pub domain: String,
    pub enumerations: Vec<EnumerationDef>,
}

impl EnumerationDocument {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            enumerations: Vec::new(),
        }
    }

    pub fn with_enumeration(mut self, enumeration: EnumerationDef) -> Self {
        self.enumerations.push(enumeration);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Use cases and DTOs
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UseCaseKind {
    Read,
    Search,
    SearchCount,
    Create,
    Update,
    Delete,
    Unique,
    Suggestions,
    #[default]
    Custom,
}

impl UseCaseKind {
    /// Create, Update and Delete change state and live under `Commands`
    pub fn is_command(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }

    /// Kinds whose DTOs are backed by persistence read models
    pub fn is_read_side(self) -> bool {
        matches!(
            self,
            Self::Read | Self::Search | Self::SearchCount | Self::Suggestions | Self::Unique
        )
    }

    pub fn namespace_segment(self) -> &'static str {
        if self.is_command() {
            "Commands"
        } else {
            "Queries"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtoPropertyDef {
    pub name: String,
    /// Either a plain type or the logical name of a sibling DTO
    pub type_name: String,
    pub nullable: bool,
    pub is_collection: bool,
}

impl DtoPropertyDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtoDef {
    /// Logical name; the governing model's name when absent
    pub name: Option<String>,
    /// Domain or persistence model this DTO maps to/from
    pub reference_model: Option<String>,
    pub properties: Vec<DtoPropertyDef>,
}

impl DtoDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn referencing(mut self, model: impl Into<String>) -> Self {
        self.reference_model = Some(model.into());
        self
    }

    pub fn with_property(mut self, property: DtoPropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn declared_reference(&self) -> Option<&str> {
        self.reference_model
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UseCaseDef {
    pub name: String,
    pub kind: UseCaseKind,
    pub classification_key: String,
    /// Explicit namespacing key; wins over `classification_key`
    pub namespace_classification_key: Option<String>,
    pub feature_name: Option<String>,
    /// Governing domain model name (Delete, and optional for query kinds)
    pub domain_model: Option<String>,
    /// Logical name of the main DTO
    pub main_dto: Option<String>,
    pub dtos: Vec<DtoDef>,
}

impl UseCaseDef {
    pub fn new(name: impl Into<String>, kind: UseCaseKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_classification_key(mut self, key: impl Into<String>) -> Self {
        self.classification_key = key.into();
        self
    }

    pub fn with_namespace_key(mut self, key: impl Into<String>) -> Self {
        self.namespace_classification_key = Some(key.into());
        self
    }

    pub fn with_feature_name(mut self, feature_name: impl Into<String>) -> Self {
        self.feature_name = Some(feature_name.into());
        self
    }

    pub fn for_model(mut self, model: impl Into<String>) -> Self {
        self.domain_model = Some(model.into());
        self
    }

    pub fn with_main_dto(mut self, dto: impl Into<String>) -> Self {
        self.main_dto = Some(dto.into());
        self
    }

    pub fn with_dto(mut self, dto: DtoDef) -> Self {
        self.dtos.push(dto);
        self
    }

    pub fn declared_model(&self) -> Option<&str> {
        self.domain_model
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Position of the main DTO: the one whose declared name equals the
    /// trimmed main-DTO name, else the first declared one
    pub fn main_dto_index(&self) -> Option<usize> {
        let declared = self
            .main_dto
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        declared
            .and_then(|name| {
                self.dtos
                    .iter()
                    .position(|dto| dto.declared_name() == Some(name))
            })
            .or_else(|| (!self.dtos.is_empty()).then_some(0))
    }

    /// The DTO `main_dto_index` points at
    pub fn main_dto_def(&self) -> Option<&DtoDef> {
        self.main_dto_index().map(|index| &self.dtos[index])
    }

    /// Derive the SearchCount companion of a Search use case.
    ///
    /// Every collection is rebuilt element by element so the two use cases
    /// never share mutable state.
    pub fn count_variant(&self, count_suffix: &str) -> UseCaseDef {
        UseCaseDef {
            name: format!("{}{}", self.name, count_suffix),
            kind: UseCaseKind::SearchCount,
            classification_key: self.classification_key.clone(),
            namespace_classification_key: self.namespace_classification_key.clone(),
            feature_name: self.feature_name.clone(),
            domain_model: self.domain_model.clone(),
            main_dto: self.main_dto.clone(),
            dtos: self
                .dtos
                .iter()
                .map(|dto| DtoDef {
                    name: dto.name.clone(),
                    reference_model: dto.reference_model.clone(),
                    properties: dto
                        .properties
                        .iter()
                        .map(|p| DtoPropertyDef {
                            name: p.name.clone(),
                            type_name: p.type_name.clone(),
                            nullable: p.nullable,
                            is_collection: p.is_collection,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UseCaseDocument {
    pub domain: String,
    pub use_cases: Vec<UseCaseDef>,
}

impl UseCaseDocument {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            use_cases: Vec::new(),
        }
    }

    pub fn with_use_case(mut self, use_case: UseCaseDef) -> Self {
        self.use_cases.push(use_case);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Model set
// ═══════════════════════════════════════════════════════════════════════════

/// Snapshot of every input document for one link run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSet {
    pub domain_models: Vec<DomainModelDocument>,
    pub data_models: Vec<DataModelDocument>,
    pub enumerations: Vec<EnumerationDocument>,
    pub use_cases: Vec<UseCaseDocument>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain_models(mut self, document: DomainModelDocument) -> Self {
        self.domain_models.push(document);
        self
    }

    pub fn with_data_models(mut self, document: DataModelDocument) -> Self {
        self.data_models.push(document);
        self
    }

    pub fn with_enumerations(mut self, document: EnumerationDocument) -> Self {
        self.enumerations.push(document);
        self
    }

    pub fn with_use_cases(mut self, document: UseCaseDocument) -> Self {
        self.use_cases.push(document);
        self
    }

    /// Append every document of `other`
    pub fn merge(&mut self, other: ModelSet) {
        self.domain_models.extend(other.domain_models);
        self.data_models.extend(other.data_models);
        self.enumerations.extend(other.enumerations);
        self.use_cases.extend(other.use_cases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_target_requires_flag_and_name() {
        let plain = PropertyDef::new("CustomerId", "Guid");
        assert_eq!(plain.reference_target(), None);

        let blank = PropertyDef {
            is_reference: true,
            reference_type: Some("  ".to_string()),
            ..PropertyDef::new("CustomerId", "Guid")
        };
        assert_eq!(blank.reference_target(), None);

        let reference = PropertyDef::new("CustomerId", "Guid").reference_to("Customer");
        assert_eq!(reference.reference_target(), Some("Customer"));
    }

    #[test]
    fn test_main_dto_def_falls_back_to_first() {
        let use_case = UseCaseDef::new("Create", UseCaseKind::Create)
            .with_main_dto("Missing")
            .with_dto(DtoDef::named("First"))
            .with_dto(DtoDef::named("Second"));
        assert_eq!(use_case.main_dto_def().and_then(|d| d.declared_name()), Some("First"));

        let explicit = use_case.clone().with_main_dto("Second");
        assert_eq!(explicit.main_dto_def().and_then(|d| d.declared_name()), Some("Second"));

        let padded = use_case.clone().with_main_dto(" Second ");
        assert_eq!(padded.main_dto_index(), Some(1));

        let empty = UseCaseDef::new("Create", UseCaseKind::Create).with_main_dto("First");
        assert_eq!(empty.main_dto_index(), None);
    }

    #[test]
    fn test_count_variant_is_independent() {
        let search = UseCaseDef::new("SearchCustomers", UseCaseKind::Search)
            .with_classification_key("Customer")
            .with_dto(DtoDef::named("Filter").with_property(DtoPropertyDef::new("Name", "string")));

        let mut count = search.count_variant("Count");
        assert_eq!(count.name, "SearchCustomersCount");
        assert_eq!(count.kind, UseCaseKind::SearchCount);
        assert_eq!(count.dtos, search.dtos);

        count.dtos[0].properties.clear();
        count.dtos.push(DtoDef::named("Extra"));
        assert_eq!(search.dtos.len(), 1);
        assert_eq!(search.dtos[0].properties.len(), 1);
    }

    #[test]
    fn test_documents_deserialize_from_partial_json() {
        let json = r#"{
            "domain": "Sales",
            "models": [
                { "name": "Order", "is_aggregate": true, "children": ["OrderLine"] },
                { "name": "OrderLine",
                  "properties": [{ "name": "ProductId", "type_name": "Guid",
                                   "is_reference": true, "reference_type": "Product" }] }
            ]
        }"#;
        let document: DomainModelDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document.models.len(), 2);
        assert!(document.models[0].is_aggregate);
        assert_eq!(
            document.models[1].properties[0].reference_target(),
            Some("Product")
        );
    }
}
