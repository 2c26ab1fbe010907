//! Fetch specifications: reusable descriptions of a query (entity + filter + ordering) that can
//! be executed against a store, or used to check a single object without re-running the query.

mod relationship;
mod results;

pub use relationship::RelationshipFetchSpecification;
pub use results::FetchResults;

use std::sync::Arc;

use fetchkit_proto::CollectionId;
use fetchql::ast::{OrderByItem, Predicate};
use tracing::debug;

use crate::error::FetchError;
use crate::object::Object;
use crate::schema::EntitySchema;
use crate::selection::filter::{evaluate_predicate, FilterIterator, FilterResult};
use crate::selection::sorting::sort_items_by_order;
use crate::selection::validate::{validate_ordering, validate_predicate};
use crate::storage::ObjectStore;

/// Answers "would a fresh `execute()` include this object right now?"
pub trait Matcher {
    fn matches(&self, object: &Object) -> Result<bool, FetchError>;
}

/// A fetch over every object of one entity.
///
/// The specification borrows its store: the store must stay alive (and, for stores with
/// thread affinity, on the same thread) for as long as the specification is used. Nothing is
/// cached; every `execute()` reads current store state.
pub struct FetchSpecification<'s, S: ObjectStore + ?Sized> {
    store: &'s S,
    schema: Arc<EntitySchema>,
    filter: Predicate,
    ordering: Vec<OrderByItem>,
}

impl<'s, S: ObjectStore + ?Sized> FetchSpecification<'s, S> {
    /// Match-everything, unordered fetch of `entity`. Fails if the store does not know the entity.
    pub fn new(entity: impl Into<CollectionId>, store: &'s S) -> Result<Self, FetchError> {
        let entity = entity.into();
        let schema = store.schema(&entity)?;
        debug!("FetchSpecification::new({}) in store {}", entity, store.name());
        Ok(Self { store, schema, filter: Predicate::True, ordering: Vec::new() })
    }

    pub fn with_filter(entity: impl Into<CollectionId>, store: &'s S, filter: Predicate) -> Result<Self, FetchError> {
        let mut spec = Self::new(entity, store)?;
        spec.set_filter(filter)?;
        Ok(spec)
    }

    pub fn entity_name(&self) -> &CollectionId { self.schema.collection() }

    pub fn store(&self) -> &'s S { self.store }

    pub fn schema(&self) -> &EntitySchema { &self.schema }

    pub fn filter(&self) -> &Predicate { &self.filter }

    /// Replace the filter. Rejected (leaving the old filter in place) if it names unknown fields
    /// or has malformed operands.
    pub fn set_filter(&mut self, filter: Predicate) -> Result<(), FetchError> {
        validate_predicate(self.schema.as_ref(), &filter)?;
        debug!("FetchSpecification({}).set_filter {}", self.entity_name(), filter);
        self.filter = filter;
        Ok(())
    }

    pub fn clear_filter(&mut self) { self.filter = Predicate::True; }

    pub fn ordering(&self) -> &[OrderByItem] { &self.ordering }

    pub fn set_ordering(&mut self, ordering: Vec<OrderByItem>) -> Result<(), FetchError> {
        validate_ordering(self.schema.as_ref(), &ordering)?;
        self.ordering = ordering;
        Ok(())
    }

    pub fn clear_ordering(&mut self) { self.ordering.clear(); }

    /// Filter and order a candidate set with this specification's filter and ordering.
    pub(crate) fn refine(&self, candidates: Vec<Object>) -> Result<Vec<Object>, FetchError> {
        let mut selected = Vec::new();
        for result in FilterIterator::new(candidates.into_iter(), &self.filter) {
            match result {
                FilterResult::Pass(object) => selected.push(object),
                FilterResult::Skip(_) => {}
                FilterResult::Error(object, e) => {
                    debug!("FetchSpecification({}) failed to evaluate {}: {}", self.entity_name(), object, e);
                    return Err(e.into());
                }
            }
        }
        sort_items_by_order(&mut selected, &self.ordering);
        Ok(selected)
    }

    /// Run the fetch against current store state.
    #[cfg_attr(feature = "instrument", tracing::instrument(level = "debug", skip_all, fields(entity = %self.entity_name())))]
    pub fn execute(&self) -> Result<FetchResults, FetchError> {
        let candidates = self.store.resolve_collection(self.entity_name())?;
        let scanned = candidates.len();
        let selected = self.refine(candidates)?;
        debug!("FetchSpecification({}).execute: {} of {} objects match {}", self.entity_name(), selected.len(), scanned, self.filter);
        Ok(FetchResults::new(selected))
    }

    /// Evaluate the filter against `object`'s current field values. Touches no store.
    ///
    /// Fields are first cast to their declared types, as the store would hold them. An object the
    /// store would reject never matches. An object of another entity is a `TypeMismatch` error
    /// rather than a plain `false`.
    pub fn matches(&self, object: &Object) -> Result<bool, FetchError> {
        self.check_type(object)?;
        let Some(conformed) = self.conform(object) else { return Ok(false) };
        Ok(evaluate_predicate(&conformed, &self.filter)?)
    }

    /// `object` with every field cast to the schema's type, or `None` if a field is unknown or
    /// does not cast.
    pub(crate) fn conform(&self, object: &Object) -> Option<Object> {
        let mut conformed = Object::with_id(object.collection(), object.id());
        for (name, value) in object.fields() {
            match self.schema.conform(name, value) {
                Some(Ok(value)) => conformed.set(name.as_str(), value),
                Some(Err(e)) => {
                    debug!("FetchSpecification({}): {}.{} is not storable: {}", self.entity_name(), object, name, e);
                    return None;
                }
                None => {
                    debug!("FetchSpecification({}): {} has unknown field {}", self.entity_name(), object, name);
                    return None;
                }
            }
        }
        Some(conformed)
    }

    pub(crate) fn check_type(&self, object: &Object) -> Result<(), FetchError> {
        if object.collection() != self.entity_name() {
            return Err(FetchError::TypeMismatch { expected: self.entity_name().clone(), actual: object.collection().clone() });
        }
        Ok(())
    }
}

impl<S: ObjectStore + ?Sized> Clone for FetchSpecification<'_, S> {
    fn clone(&self) -> Self { Self { store: self.store, schema: self.schema.clone(), filter: self.filter.clone(), ordering: self.ordering.clone() } }
}

impl<S: ObjectStore + ?Sized> std::fmt::Debug for FetchSpecification<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchSpecification")
            .field("entity", self.entity_name())
            .field("store", &self.store.name())
            .field("filter", &self.filter.to_string())
            .field("ordering", &self.ordering)
            .finish()
    }
}

impl<S: ObjectStore + ?Sized> Matcher for FetchSpecification<'_, S> {
    fn matches(&self, object: &Object) -> Result<bool, FetchError> { FetchSpecification::matches(self, object) }
}

/// Either kind of fetch, for callers that observe a fetch without caring which it is.
pub enum FetchRequest<'s, S: ObjectStore + ?Sized> {
    Entity(FetchSpecification<'s, S>),
    Relationship(RelationshipFetchSpecification<'s, S>),
}

impl<S: ObjectStore + ?Sized> Clone for FetchRequest<'_, S> {
    fn clone(&self) -> Self {
        match self {
            FetchRequest::Entity(spec) => FetchRequest::Entity(spec.clone()),
            FetchRequest::Relationship(spec) => FetchRequest::Relationship(spec.clone()),
        }
    }
}

impl<S: ObjectStore + ?Sized> std::fmt::Debug for FetchRequest<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchRequest::Entity(spec) => f.debug_tuple("Entity").field(spec).finish(),
            FetchRequest::Relationship(spec) => f.debug_tuple("Relationship").field(spec).finish(),
        }
    }
}

impl<'s, S: ObjectStore + ?Sized> FetchRequest<'s, S> {
    fn base(&self) -> &FetchSpecification<'s, S> {
        match self {
            FetchRequest::Entity(spec) => spec,
            FetchRequest::Relationship(spec) => spec.base(),
        }
    }

    fn base_mut(&mut self) -> &mut FetchSpecification<'s, S> {
        match self {
            FetchRequest::Entity(spec) => spec,
            FetchRequest::Relationship(spec) => spec.base_mut(),
        }
    }

    pub fn entity_name(&self) -> &CollectionId { self.base().entity_name() }

    pub fn store(&self) -> &'s S { self.base().store() }

    pub fn filter(&self) -> &Predicate { self.base().filter() }

    pub fn set_filter(&mut self, filter: Predicate) -> Result<(), FetchError> { self.base_mut().set_filter(filter) }

    pub fn clear_filter(&mut self) { self.base_mut().clear_filter() }

    pub fn ordering(&self) -> &[OrderByItem] { self.base().ordering() }

    pub fn set_ordering(&mut self, ordering: Vec<OrderByItem>) -> Result<(), FetchError> { self.base_mut().set_ordering(ordering) }

    pub fn clear_ordering(&mut self) { self.base_mut().clear_ordering() }

    pub fn execute(&self) -> Result<FetchResults, FetchError> {
        match self {
            FetchRequest::Entity(spec) => spec.execute(),
            FetchRequest::Relationship(spec) => spec.execute(),
        }
    }

    pub fn matches(&self, object: &Object) -> Result<bool, FetchError> {
        match self {
            FetchRequest::Entity(spec) => spec.matches(object),
            FetchRequest::Relationship(spec) => spec.matches(object),
        }
    }
}

impl<S: ObjectStore + ?Sized> Matcher for FetchRequest<'_, S> {
    fn matches(&self, object: &Object) -> Result<bool, FetchError> { FetchRequest::matches(self, object) }
}

impl<'s, S: ObjectStore + ?Sized> From<FetchSpecification<'s, S>> for FetchRequest<'s, S> {
    fn from(spec: FetchSpecification<'s, S>) -> Self { FetchRequest::Entity(spec) }
}

impl<'s, S: ObjectStore + ?Sized> From<RelationshipFetchSpecification<'s, S>> for FetchRequest<'s, S> {
    fn from(spec: RelationshipFetchSpecification<'s, S>) -> Self { FetchRequest::Relationship(spec) }
}
