use crate::error::FetchError;
use crate::fetch::Matcher;
use crate::object::Object;

/// How an edited object moves relative to a fetch's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Was not a member, now matches
    Add,
    /// Was a member, still matches
    Update,
    /// Was a member, no longer matches
    Remove,
}

/// Classify an edit to `object` given whether it was in the result set before the edit.
///
/// `None` means the object neither was nor is a member. Uses `matches()` only, so a caller can
/// keep a result set current without re-running the fetch.
pub fn classify_change<M: Matcher + ?Sized>(matcher: &M, was_member: bool, object: &Object) -> Result<Option<ChangeKind>, FetchError> {
    let is_member = matcher.matches(object)?;
    Ok(match (was_member, is_member) {
        (false, true) => Some(ChangeKind::Add),
        (true, true) => Some(ChangeKind::Update),
        (true, false) => Some(ChangeKind::Remove),
        (false, false) => None,
    })
}
