use arbor_types::{Key, Timestamp};

/// Snapshot of one declared field's value, as the extractor chain sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// The schema marker field. Carries no data; its annotation declares
    /// the kind override and schema directives.
    Marker,
    /// A string-typed field.
    Str(&'a str),
    /// An integer-typed field (any width, widened to i64).
    Int(i64),
    /// A field of any other type. Visible to extractors but never usable
    /// as an identifier.
    Opaque,
}

/// One declared field: identity, annotation string, and value snapshot.
///
/// Annotations are comma-separated token lists. On the marker field the
/// first token, when it is not a known directive, overrides the kind;
/// the `has_parent` directive declares the parent requirement. On value
/// fields the `id` token marks the identifier field. Unknown tokens are
/// ignored.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    pub name: &'a str,
    pub annotation: &'a str,
    pub value: FieldValue<'a>,
}

impl<'a> FieldView<'a> {
    /// The annotation's tokens, trimmed, empty tokens dropped.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> {
        self.annotation
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Returns `true` if the annotation contains the given token.
    pub fn has_token(&self, token: &str) -> bool {
        self.tokens().any(|t| t == token)
    }
}

/// Contract every persisted record type implements.
///
/// An entity exposes its declared fields as an ordered descriptor list,
/// plus mutable key and creation-timestamp slots. The mapper writes those
/// slots as a side effect of CRUD calls — the single point of implicit
/// state change in the system: `set_key` on every successful resolve, and
/// `set_created_at` on create (reset to zero if a batched create rolls
/// back).
///
/// `fields()` must return the same descriptors in the same order on every
/// call; extraction determinism depends on it.
pub trait Entity {
    /// The type's own name, used as the kind when the marker annotation
    /// does not override it.
    fn type_name() -> &'static str
    where
        Self: Sized;

    /// Declared fields in declaration order.
    fn fields(&self) -> Vec<FieldView<'_>>;

    /// The resolved storage key, if one has been assigned.
    fn key(&self) -> Option<&Key>;

    fn set_key(&mut self, key: Key);

    /// The owning ancestor's key, if the instance carries one.
    fn parent_key(&self) -> Option<&Key>;

    fn created_at(&self) -> Timestamp;

    fn set_created_at(&mut self, at: Timestamp);
}

/// The abstract descriptor list extractors operate against.
///
/// A view is a read-only snapshot of one entity taken at the start of a
/// resolve call. Extractors never see the concrete entity type, only this.
#[derive(Debug)]
pub struct EntityView<'a> {
    pub type_name: &'a str,
    pub parent: Option<&'a Key>,
    pub fields: Vec<FieldView<'a>>,
}

impl<'a> EntityView<'a> {
    /// Snapshot the given entity.
    pub fn of<E: Entity>(entity: &'a E) -> Self {
        Self {
            type_name: E::type_name(),
            parent: entity.parent_key(),
            fields: entity.fields(),
        }
    }
}
