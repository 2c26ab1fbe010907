mod common;

use anyhow::Result;
use fetchkit_core::fetchql::ast::{ComparisonOperator, Expr, Literal, PathExpr, Predicate};
use fetchkit_core::fetchql::builder::field;
use fetchkit_core::{FetchSpecification, Object, ObjectStore, RelationshipFetchSpecification};

use common::*;

fn filters() -> Vec<Predicate> {
    vec![
        Predicate::True,
        Predicate::False,
        field("done").eq(true),
        field("done").ne(true),
        field("priority").gt(2),
        field("priority").ge(2),
        field("priority").lt(2),
        field("priority").le(2),
        field("priority").gt(1.5),
        field("priority").between(1, 3),
        field("priority").is_in(vec![1, 4]),
        field("title").is_in(vec!["walk dog", "pay rent"]),
        field("title").contains("milk"),
        field("title").contains_ci("MILK"),
        field("title").begins_with("pay"),
        field("title").ends_with_ci("DOG"),
        field("estimate").is_null(),
        field("estimate").is_null().not(),
        field("estimate").lt(2.0),
        field("done").eq(false).and(field("priority").ge(3)),
        field("done").eq(true).or(field("title").contains("rent")),
        field("done").eq(true).or(field("priority").lt(2)).not(),
        field("done").eq(false).and(field("estimate").ge(1.0).or(field("title").begins_with("walk"))),
    ]
}

fn populate(store: &fetchkit_core::MemoryStore) -> Result<()> {
    store.insert(task("buy milk", false, 1).with("estimate", 0.5))?;
    store.insert(task("Milk the cow", true, 3))?;
    store.insert(task("walk dog", false, 2).with("estimate", 1.0))?;
    store.insert(task("pay rent", true, 4).with("estimate", 2.5))?;
    store.insert(task("fix the Dog door", false, 5))?;
    store.insert(Object::new("Task").with("title", "untriaged"))?;
    Ok(())
}

#[test]
fn execute_agrees_with_matches_for_every_filter() -> Result<()> {
    let store = task_store();
    populate(&store)?;
    let all = store.resolve_collection(&"Task".into())?;

    for filter in filters() {
        let spec = FetchSpecification::with_filter("Task", &store, filter.clone())?;
        let results = spec.execute()?;
        for object in &all {
            assert_eq!(results.contains(object.id()), spec.matches(object)?, "filter {} disagrees on {:?}", filter, object);
        }
        for object in &results {
            assert!(spec.matches(object)?, "filter {} returned non-matching {}", filter, object);
        }
    }
    Ok(())
}

#[test]
fn relationship_execute_agrees_with_matches() -> Result<()> {
    let store = task_store();
    populate(&store)?;
    let all = store.resolve_collection(&"Task".into())?;
    let members = vec![all[0].id(), all[2].id(), all[3].id(), all[5].id()];
    let project = Object::new("Project").with("name", "chores").with("tasks", members.clone());
    store.insert(project.clone())?;

    for filter in filters() {
        let mut spec = RelationshipFetchSpecification::new(&store, &project, "tasks")?;
        spec.set_filter(filter.clone())?;
        let results = spec.execute()?;
        for object in &all {
            assert_eq!(results.contains(object.id()), spec.matches(object)?, "filter {} disagrees on {:?}", filter, object);
        }
        assert!(results.ids().iter().all(|id| members.contains(id)));
    }
    Ok(())
}

#[test]
fn equivalence_holds_after_mutation() -> Result<()> {
    let store = task_store();
    populate(&store)?;
    let spec = FetchSpecification::with_filter("Task", &store, field("done").eq(false).and(field("priority").ge(2)))?;
    let before = spec.execute()?;

    let walk = store.resolve_collection(&"Task".into())?.into_iter().find(|t| t.get("title").and_then(|v| v.as_str()) == Some("walk dog"));
    let walk = walk.expect("walk dog task");
    assert!(before.contains(walk.id()));

    store.set(&"Task".into(), walk.id(), "done", true)?;
    let updated = store.get(&"Task".into(), walk.id())?;
    assert!(!spec.matches(&updated)?);
    assert!(!spec.execute()?.contains(walk.id()));
    Ok(())
}

#[test]
fn matches_sees_local_edits_as_stored() -> Result<()> {
    let store = task_store();
    let cases = vec![
        (task("fractional", false, 1).with("priority", 2.5), field("priority").gt(2)),
        (Object::new("Task").with("done", "yes"), field("done").eq(true)),
        (Object::new("Task").with("priority", "3"), field("priority").eq(3)),
        (Object::new("Task").with("priority", 4.0), field("priority").ge(4)),
        (Object::new("Task").with("estimate", 2i64), field("estimate").eq(2.0)),
        (Object::new("Task").with("done", 1i64), field("done").eq(true)),
        (Object::new("Task").with("title", 12i64), field("title").begins_with("1")),
        (Object::new("Task").with("assignee", "me"), Predicate::True),
    ];

    for (local, filter) in cases {
        let spec = FetchSpecification::with_filter("Task", &store, filter.clone())?;
        let predicted = spec.matches(&local)?;
        let included = match store.insert(local.clone()) {
            Ok(id) => spec.execute()?.contains(id),
            Err(_) => false,
        };
        assert_eq!(predicted, included, "filter {} disagrees on local {:?}", filter, local);
    }
    Ok(())
}

#[test]
fn unset_relationship_is_null() -> Result<()> {
    let store = task_store();
    let t1 = store.insert(task("a", false, 1))?;
    let with_task = store.insert(Object::new("Project").with("name", "one").with("tasks", vec![t1]))?;
    let unset = store.insert(Object::new("Project").with("name", "two"))?;

    let has_t1 = Predicate::Comparison {
        left: Box::new(Expr::Literal(Literal::EntityId(t1.to_ulid()))),
        operator: ComparisonOperator::In,
        right: Box::new(Expr::Path(PathExpr::simple("tasks"))),
    };
    let filters = vec![has_t1.clone(), has_t1.clone().not(), field("tasks").is_null(), field("tasks").contains(t1.to_ulid())];
    let projects = store.resolve_collection(&"Project".into())?;
    for filter in filters {
        let spec = FetchSpecification::with_filter("Project", &store, filter.clone())?;
        let results = spec.execute()?;
        for project in &projects {
            assert_eq!(results.contains(project.id()), spec.matches(project)?, "filter {} disagrees on {:?}", filter, project);
        }
    }

    let spec = FetchSpecification::with_filter("Project", &store, has_t1)?;
    assert_eq!(spec.execute()?.ids(), vec![with_task]);
    assert!(!spec.matches(&store.get(&"Project".into(), unset)?)?);
    Ok(())
}
