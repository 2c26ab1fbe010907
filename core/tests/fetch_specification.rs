mod common;

use anyhow::Result;
use fetchkit_core::fetchql::builder::field;
use fetchkit_core::{FetchError, FetchSpecification, Object, ObjectStore, SpecificationError, StoreError};

use common::*;

#[test]
fn done_tasks_example() -> Result<()> {
    let store = task_store();
    let t1 = store.insert(task("one", true, 1))?;
    let t2 = store.insert(task("two", false, 2))?;

    let spec = FetchSpecification::with_filter("Task", &store, field("done").eq(true))?;
    assert_eq!(spec.execute()?.ids(), vec![t1]);

    let mut second = store.get(&"Task".into(), t2)?;
    assert!(!spec.matches(&second)?);

    second.set("done", true);
    assert!(spec.matches(&second)?);
    Ok(())
}

#[test]
fn new_filter_applies_immediately() -> Result<()> {
    let store = task_store();
    let object = task("write report", false, 3);
    let mut spec = FetchSpecification::with_filter("Task", &store, field("done").eq(false))?;
    assert!(spec.matches(&object)?);

    spec.set_filter(field("priority").gt(5))?;
    assert!(!spec.matches(&object)?);

    spec.clear_filter();
    assert!(spec.matches(&object)?);
    Ok(())
}

#[test]
fn repeated_execute_is_stable() -> Result<()> {
    let store = task_store();
    for (i, title) in ["c", "a", "b", "a", "d"].iter().enumerate() {
        store.insert(task(title, i % 2 == 0, i as i64))?;
    }
    let mut spec = FetchSpecification::new("Task", &store)?;
    assert_eq!(spec.execute()?, spec.execute()?);

    spec.set_ordering(vec![field("title").asc()])?;
    let first = spec.execute()?;
    let second = spec.execute()?;
    assert_eq!(first, second);
    let titles: Vec<_> = first.iter().map(|o| o.get("title").and_then(|v| v.as_str()).unwrap_or_default().to_string()).collect();
    assert_eq!(titles, vec!["a", "a", "b", "c", "d"]);
    Ok(())
}

#[test]
fn descending_order_with_ties_keeps_store_order() -> Result<()> {
    let store = task_store();
    let low = store.insert(task("low", false, 1))?;
    let high_a = store.insert(task("high a", false, 9))?;
    let high_b = store.insert(task("high b", false, 9))?;

    let mut spec = FetchSpecification::new("Task", &store)?;
    spec.set_ordering(vec![field("priority").desc()])?;
    assert_eq!(spec.execute()?.ids(), vec![high_a, high_b, low]);
    Ok(())
}

#[test]
fn unknown_entity_fails_at_construction() {
    let store = task_store();
    let err = FetchSpecification::new("Invoice", &store).unwrap_err();
    assert!(matches!(err, FetchError::InvalidSpecification(SpecificationError::UnknownEntity(_))), "{err}");
}

#[test]
fn invalid_ordering_is_rejected() -> Result<()> {
    let store = task_store();
    let mut spec = FetchSpecification::new("Task", &store)?;
    assert!(spec.set_ordering(vec![field("assignee").asc()]).is_err());
    assert!(spec.ordering().is_empty());
    Ok(())
}

#[test]
fn closed_store_is_unavailable() -> Result<()> {
    let store = task_store();
    store.insert(task("one", true, 1))?;
    let spec = FetchSpecification::new("Task", &store)?;
    store.close();

    let err = spec.execute().unwrap_err();
    assert!(matches!(err, FetchError::StoreUnavailable(StoreError::Closed(_))), "{err}");
    assert!(spec.matches(&Object::new("Task").with("done", true))?);
    Ok(())
}

#[test]
fn mistyped_object_is_an_error() -> Result<()> {
    let store = task_store();
    let spec = FetchSpecification::new("Task", &store)?;
    let project = Object::new("Project").with("name", "p");
    assert!(matches!(spec.matches(&project), Err(FetchError::TypeMismatch { .. })));
    Ok(())
}
