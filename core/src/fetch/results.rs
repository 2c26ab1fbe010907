use fetchkit_proto::EntityId;

use crate::object::Object;

/// Objects returned by one `execute()` call: a point-in-time snapshot, in fetch order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchResults {
    objects: Vec<Object>,
}

impl FetchResults {
    pub(crate) fn new(objects: Vec<Object>) -> Self { Self { objects } }

    pub fn len(&self) -> usize { self.objects.len() }

    pub fn is_empty(&self) -> bool { self.objects.is_empty() }

    pub fn get(&self, index: usize) -> Option<&Object> { self.objects.get(index) }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> { self.objects.iter() }

    pub fn ids(&self) -> Vec<EntityId> { self.objects.iter().map(|o| o.id()).collect() }

    pub fn contains(&self, id: EntityId) -> bool { self.objects.iter().any(|o| o.id() == id) }

    pub fn into_vec(self) -> Vec<Object> { self.objects }
}

impl IntoIterator for FetchResults {
    type Item = Object;
    type IntoIter = std::vec::IntoIter<Object>;

    fn into_iter(self) -> Self::IntoIter { self.objects.into_iter() }
}

impl<'a> IntoIterator for &'a FetchResults {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter { self.objects.iter() }
}
