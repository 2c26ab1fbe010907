use fetchkit_proto::{CollectionId, EntityId};
use fetchql::ast::{OrderByItem, Predicate};
use tracing::debug;

use super::{FetchResults, FetchSpecification, Matcher};
use crate::error::{FetchError, SpecificationError, StoreError};
use crate::object::Object;
use crate::selection::filter::evaluate_predicate;
use crate::storage::ObjectStore;

/// A fetch scoped to one collection-valued relationship of one owning object.
///
/// `execute()` walks the relationship directly instead of searching the target entity. Results
/// keep relationship order unless an ordering is set. Membership is by object identity: an object
/// whose fields equal a member's is still not a member.
pub struct RelationshipFetchSpecification<'s, S: ObjectStore + ?Sized> {
    base: FetchSpecification<'s, S>,
    owner_collection: CollectionId,
    owner_id: EntityId,
    relationship: String,
}

impl<'s, S: ObjectStore + ?Sized> RelationshipFetchSpecification<'s, S> {
    /// The entity is the relationship's target type. Fails if `owner` is not in `store`, or if
    /// `relationship` is not a collection-valued field of the owner's entity.
    pub fn new(store: &'s S, owner: &Object, relationship: impl Into<String>) -> Result<Self, FetchError> {
        let relationship = relationship.into();
        let owner_schema = store.schema(owner.collection())?;
        match store.get(owner.collection(), owner.id()) {
            Ok(_) => {}
            Err(StoreError::ObjectNotFound { collection, id }) => {
                return Err(SpecificationError::OwnerNotFound { entity: collection, id }.into());
            }
            Err(e) => return Err(e.into()),
        }
        let target = owner_schema.relationship_target(&relationship)?;
        let base = FetchSpecification::new(target.clone(), store)?;
        debug!("RelationshipFetchSpecification::new({}.{} -> {})", owner, relationship, target);
        Ok(Self { base, owner_collection: owner.collection().clone(), owner_id: owner.id(), relationship })
    }

    pub(crate) fn base(&self) -> &FetchSpecification<'s, S> { &self.base }

    pub(crate) fn base_mut(&mut self) -> &mut FetchSpecification<'s, S> { &mut self.base }

    pub fn owner_id(&self) -> EntityId { self.owner_id }

    pub fn owner_collection(&self) -> &CollectionId { &self.owner_collection }

    pub fn relationship_name(&self) -> &str { &self.relationship }

    pub fn entity_name(&self) -> &CollectionId { self.base.entity_name() }

    pub fn store(&self) -> &'s S { self.base.store() }

    pub fn filter(&self) -> &Predicate { self.base.filter() }

    pub fn set_filter(&mut self, filter: Predicate) -> Result<(), FetchError> { self.base.set_filter(filter) }

    pub fn clear_filter(&mut self) { self.base.clear_filter() }

    pub fn ordering(&self) -> &[OrderByItem] { self.base.ordering() }

    pub fn set_ordering(&mut self, ordering: Vec<OrderByItem>) -> Result<(), FetchError> { self.base.set_ordering(ordering) }

    pub fn clear_ordering(&mut self) { self.base.clear_ordering() }

    /// Current state of the owning object, re-read from the store.
    pub fn owner(&self) -> Result<Object, FetchError> { Ok(self.store().get(&self.owner_collection, self.owner_id)?) }

    /// The relationship's raw contents in relationship order, ignoring filter and ordering.
    pub fn relationship(&self) -> Result<FetchResults, FetchError> {
        let owner = self.owner()?;
        Ok(FetchResults::new(self.store().resolve_relationship(&owner, &self.relationship)?))
    }

    #[cfg_attr(feature = "instrument", tracing::instrument(level = "debug", skip_all, fields(relationship = %self.relationship)))]
    pub fn execute(&self) -> Result<FetchResults, FetchError> {
        let members = self.relationship()?.into_vec();
        let total = members.len();
        let selected = self.base.refine(members)?;
        debug!("RelationshipFetchSpecification({}.{}).execute: {} of {} members", self.owner_collection, self.relationship, selected.len(), total);
        Ok(FetchResults::new(selected))
    }

    /// True iff `object` is currently in the owner's relationship and satisfies the filter.
    /// Reads the owner's current membership from the store.
    pub fn matches(&self, object: &Object) -> Result<bool, FetchError> {
        self.base.check_type(object)?;
        let owner = self.owner()?;
        if !owner.references(&self.relationship).contains(&object.id()) {
            return Ok(false);
        }
        let Some(conformed) = self.base.conform(object) else { return Ok(false) };
        Ok(evaluate_predicate(&conformed, self.filter())?)
    }
}

impl<S: ObjectStore + ?Sized> Clone for RelationshipFetchSpecification<'_, S> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            owner_collection: self.owner_collection.clone(),
            owner_id: self.owner_id,
            relationship: self.relationship.clone(),
        }
    }
}

impl<S: ObjectStore + ?Sized> std::fmt::Debug for RelationshipFetchSpecification<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipFetchSpecification")
            .field("owner", &format_args!("{}/{:#}", self.owner_collection, self.owner_id))
            .field("relationship", &self.relationship)
            .field("base", &self.base)
            .finish()
    }
}

impl<S: ObjectStore + ?Sized> Matcher for RelationshipFetchSpecification<'_, S> {
    fn matches(&self, object: &Object) -> Result<bool, FetchError> { RelationshipFetchSpecification::matches(self, object) }
}
