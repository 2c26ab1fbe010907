#![allow(unused)]

use tracing::Level;

use fetchkit_core::{EntitySchema, MemoryStore, Object, ValueType};

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_max_level(Level::DEBUG).with_test_writer().try_init();
}

/// A store with `Task` and `Project` registered, `Project.tasks` relating to `Task`.
pub fn task_store() -> MemoryStore {
    let store = MemoryStore::new("test");
    store
        .register(
            EntitySchema::new("Task")
                .field("title", ValueType::String)
                .field("done", ValueType::Bool)
                .field("priority", ValueType::I64)
                .field("estimate", ValueType::F64),
        )
        .expect("register Task");
    store
        .register(EntitySchema::new("Project").field("name", ValueType::String).relationship("tasks", "Task"))
        .expect("register Project");
    store
}

pub fn task(title: &str, done: bool, priority: i64) -> Object {
    Object::new("Task").with("title", title).with("done", done).with("priority", priority)
}
