use crate::entity::{EntityView, FieldValue, FieldView};
use crate::error::ResolveError;
use crate::metadata::Metadata;

/// Annotation tokens with reserved meaning; never interpreted as a kind
/// override.
const DIRECTIVES: &[&str] = &["has_parent", "id"];

/// One metadata extraction rule.
///
/// `accept` decides whether the rule applies to a declared field; `extract`
/// writes what it learns into the shared [`Metadata`] accumulator and fails
/// if a required invariant is violated. New structural conventions are new
/// implementations of this trait appended to the [`ExtractorChain`] —
/// the pipeline itself never changes.
pub trait MetadataExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn accept(&self, field: &FieldView<'_>) -> bool;

    fn extract(
        &self,
        entity: &EntityView<'_>,
        field: &FieldView<'_>,
        meta: &mut Metadata,
    ) -> Result<(), ResolveError>;
}

/// Extracts the kind from the marker field's annotation, falling back to
/// the entity's own type name.
///
/// Must run before any rule that reads `Metadata::kind`.
#[derive(Clone, Copy, Debug, Default)]
pub struct KindExtractor;

impl MetadataExtractor for KindExtractor {
    fn name(&self) -> &'static str {
        "kind"
    }

    fn accept(&self, field: &FieldView<'_>) -> bool {
        matches!(field.value, FieldValue::Marker)
    }

    fn extract(
        &self,
        entity: &EntityView<'_>,
        field: &FieldView<'_>,
        meta: &mut Metadata,
    ) -> Result<(), ResolveError> {
        let override_token = field
            .tokens()
            .next()
            .filter(|token| !DIRECTIVES.contains(token));
        // The fallback names the enclosing entity type, not the marker.
        meta.set_kind(override_token.unwrap_or(entity.type_name));
        Ok(())
    }
}

/// Reads the `has_parent` directive and cross-checks it against the entity
/// instance's parent slot.
///
/// The cross-check lives here, not in key assembly, because this is the
/// one place where the directive and the actual entity state meet.
#[derive(Clone, Copy, Debug, Default)]
pub struct HasParentExtractor;

impl MetadataExtractor for HasParentExtractor {
    fn name(&self) -> &'static str {
        "has_parent"
    }

    fn accept(&self, field: &FieldView<'_>) -> bool {
        matches!(field.value, FieldValue::Marker)
    }

    fn extract(
        &self,
        entity: &EntityView<'_>,
        field: &FieldView<'_>,
        meta: &mut Metadata,
    ) -> Result<(), ResolveError> {
        if field.has_token("has_parent") {
            meta.mark_parent_required();
        }
        if meta.has_parent() {
            match entity.parent {
                Some(parent) => meta.set_parent(parent.clone()),
                None => return Err(ResolveError::MissingParentKey),
            }
        }
        Ok(())
    }
}

/// Extracts the identifier from the first `id`-annotated value field.
///
/// Later `id` annotations are ignored silently; that is a deliberate,
/// tested policy rather than an oversight. An empty string or zero integer
/// in the claiming field is a hard failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdExtractor;

impl MetadataExtractor for IdExtractor {
    fn name(&self) -> &'static str {
        "id"
    }

    fn accept(&self, field: &FieldView<'_>) -> bool {
        !matches!(field.value, FieldValue::Marker) && field.has_token("id")
    }

    fn extract(
        &self,
        _entity: &EntityView<'_>,
        field: &FieldView<'_>,
        meta: &mut Metadata,
    ) -> Result<(), ResolveError> {
        if !meta.claim_id_field() {
            return Ok(());
        }
        match field.value {
            FieldValue::Str("") => Err(ResolveError::MissingStringId {
                field: field.name.to_string(),
            }),
            FieldValue::Str(value) => {
                meta.set_string_id(value);
                Ok(())
            }
            FieldValue::Int(0) => Err(ResolveError::MissingIntId {
                field: field.name.to_string(),
            }),
            FieldValue::Int(value) => {
                meta.set_int_id(value);
                Ok(())
            }
            FieldValue::Marker | FieldValue::Opaque => Err(ResolveError::UnsupportedIdField {
                field: field.name.to_string(),
            }),
        }
    }
}

/// Ordered list of extraction rules.
///
/// Every declared field is visited exactly once; for each field every
/// accepting extractor runs in chain order. The first failure aborts the
/// walk — accumulation has no externally visible side effect until key
/// assembly, so nothing needs rolling back.
pub struct ExtractorChain {
    extractors: Vec<Box<dyn MetadataExtractor>>,
}

impl ExtractorChain {
    /// The canonical chain: kind, has_parent, id. The kind rule runs
    /// first because later rules may read `Metadata::kind`.
    pub fn standard() -> Self {
        Self {
            extractors: vec![
                Box::new(KindExtractor),
                Box::new(HasParentExtractor),
                Box::new(IdExtractor),
            ],
        }
    }

    /// An empty chain, for assembling a custom rule set.
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Append a rule; it runs after every existing one.
    pub fn push(&mut self, extractor: Box<dyn MetadataExtractor>) {
        self.extractors.push(extractor);
    }

    /// Rule names in execution order.
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Run the chain over an entity view, writing into `meta`.
    pub fn extract_from(
        &self,
        entity: &EntityView<'_>,
        meta: &mut Metadata,
    ) -> Result<(), ResolveError> {
        for field in &entity.fields {
            for extractor in &self.extractors {
                if extractor.accept(field) {
                    extractor.extract(entity, field, meta)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ExtractorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorChain")
            .field("extractors", &self.extractor_names())
            .finish()
    }
}
