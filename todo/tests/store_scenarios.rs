//! End-to-end tests: action creators, dispatcher, store and subscribers.

#![allow(clippy::unwrap_used)]

use nested_todo::{
    ChildItem, ItemAddress, RootItem, StatusFilter, TodoAction, TodoActions, TodoEnvironment, TodoId,
    TodoReducer, TodoState, TodoStore,
};
use nested_todo_runtime::{DispatchError, Dispatcher, StoreError};
use nested_todo_testing::{ChangeCounter, SequentialIdGenerator, init_test_tracing};
use std::sync::{Arc, Mutex};

struct Harness {
    store: TodoStore,
    actions: TodoActions,
    dispatcher: Arc<Dispatcher<TodoAction>>,
    changes: ChangeCounter,
}

fn harness() -> Harness {
    init_test_tracing();

    let dispatcher = Arc::new(Dispatcher::new());
    let env = TodoEnvironment::new(Arc::new(SequentialIdGenerator::new("todo")));
    let store = TodoStore::new(TodoState::new(), TodoReducer::new(), env);
    store.register_with(&dispatcher);

    let changes = ChangeCounter::new();
    store.subscribe(changes.listener());

    Harness {
        store,
        actions: TodoActions::new(Arc::clone(&dispatcher)),
        dispatcher,
        changes,
    }
}

impl Harness {
    fn root(&self, id: &str) -> RootItem {
        self.store
            .state(|s| s.get(&TodoId::new(id)).cloned())
            .unwrap()
    }

    fn snapshot(&self) -> TodoState {
        self.store.state(Clone::clone)
    }
}

#[test]
fn scenario_a_create_root() {
    let h = harness();

    h.actions.create("Buy milk", None).unwrap();

    let state = h.snapshot();
    assert_eq!(state.len(), 1);
    let item = state.items().values().next().unwrap();
    assert_eq!(item.text, "Buy milk");
    assert!(!item.completed);
    assert!(item.children.is_empty());
    assert_eq!(h.changes.count(), 1);
}

#[test]
fn scenario_b_create_child() {
    let h = harness();

    h.actions.create("Groceries", None).unwrap();
    let groceries = h.root("todo-1");
    h.actions.create("Milk", Some(&groceries)).unwrap();

    let groceries = h.root("todo-1");
    assert_eq!(groceries.children.len(), 1);
    let milk = groceries.children.values().next().unwrap();
    assert_eq!(milk.text, "Milk");
    assert_eq!(milk.parent_id, groceries.id);
    assert_eq!(h.changes.count(), 2);
}

#[test]
fn scenario_c_remove_completed_keeps_open_child() {
    let h = harness();

    h.actions.create("Groceries", None).unwrap();
    let groceries = h.root("todo-1");
    for text in ["Milk", "Eggs", "Bread"] {
        h.actions.create(text, Some(&groceries)).unwrap();
    }
    let groceries = h.root("todo-1");
    for child in groceries.children.values().filter(|c| c.text != "Bread") {
        h.actions.toggle_complete(child).unwrap();
    }
    assert!(!h.root("todo-1").completed);

    h.actions.remove_completed().unwrap();

    let groceries = h.root("todo-1");
    assert_eq!(groceries.children.len(), 1);
    let bread = groceries.children.values().next().unwrap();
    assert_eq!(bread.text, "Bread");
    assert!(!bread.completed);
}

#[test]
fn scenario_d_toggle_all_twice() {
    let h = harness();

    h.actions.create("Laundry", None).unwrap();
    h.actions.create("Groceries", None).unwrap();
    h.actions.toggle_complete(&h.root("todo-1")).unwrap();
    let groceries = h.root("todo-2");
    h.actions.create("Milk", Some(&groceries)).unwrap();

    h.actions.toggle_complete_all().unwrap();
    let state = h.snapshot();
    assert!(state.are_all_completed());
    assert_eq!(state.active_count(), 0);

    h.actions.toggle_complete_all().unwrap();
    let state = h.snapshot();
    assert_eq!(state.completed_count(), 0);
    assert!(!state.are_all_completed());
}

#[test]
fn completing_a_root_cascades_and_undo_reverses_it() {
    let h = harness();

    h.actions.create("Groceries", None).unwrap();
    let groceries = h.root("todo-1");
    h.actions.create("Milk", Some(&groceries)).unwrap();
    h.actions.create("Eggs", Some(&groceries)).unwrap();

    h.actions.toggle_complete(&h.root("todo-1")).unwrap();
    let groceries = h.root("todo-1");
    assert!(groceries.completed);
    assert!(groceries.children.values().all(|c| c.completed));

    h.actions.toggle_complete(&groceries).unwrap();
    let groceries = h.root("todo-1");
    assert!(!groceries.completed);
    assert!(groceries.children.values().all(|c| !c.completed));
}

#[test]
fn removing_a_root_leaves_no_trace_of_its_children() {
    let h = harness();

    h.actions.create("Groceries", None).unwrap();
    let groceries = h.root("todo-1");
    h.actions.create("Milk", Some(&groceries)).unwrap();
    h.actions.create("Laundry", None).unwrap();

    h.actions.remove(&h.root("todo-1")).unwrap();

    let json = serde_json::to_string(&h.snapshot()).unwrap();
    assert!(!json.contains("todo-1"));
    assert!(!json.contains("todo-2"));
    assert!(json.contains("todo-3"));
}

#[test]
fn blank_text_changes_nothing_and_notifies_nobody() {
    let h = harness();
    h.actions.create("Groceries", None).unwrap();
    let before = h.snapshot();
    h.changes.reset();

    h.actions.create("  \n ", None).unwrap();
    h.actions.update_text(&h.root("todo-1"), "\t").unwrap();

    assert_eq!(h.snapshot(), before);
    assert_eq!(h.changes.count(), 0);
}

#[test]
fn stale_references_are_silent_no_ops_that_still_notify() {
    let h = harness();
    h.actions.create("Groceries", None).unwrap();
    let groceries = h.root("todo-1");
    h.actions.remove(&groceries).unwrap();
    let before = h.snapshot();
    h.changes.reset();

    h.actions.remove(&groceries).unwrap();
    h.actions.toggle_complete(&groceries).unwrap();

    assert_eq!(h.snapshot(), before);
    assert_eq!(h.changes.count(), 2);
}

#[test]
fn status_filter_is_recorded_not_applied() {
    let h = harness();
    h.actions.create("Groceries", None).unwrap();

    h.actions.set_status_filter(StatusFilter::Completed).unwrap();

    let state = h.snapshot();
    assert_eq!(state.status_filter(), StatusFilter::Completed);
    assert_eq!(state.len(), 1);
}

#[test]
fn dispatch_from_a_listener_is_rejected() {
    let h = harness();
    let nested = Arc::new(Mutex::new(Vec::new()));

    let actions = h.actions.clone();
    let results = Arc::clone(&nested);
    h.store.subscribe(move || {
        results.lock().unwrap().push(actions.remove_all());
    });

    h.actions.create("Groceries", None).unwrap();

    assert_eq!(
        *nested.lock().unwrap(),
        vec![Err(DispatchError::AlreadyDispatching)]
    );
    assert_eq!(h.snapshot().len(), 1);
    assert!(!h.dispatcher.is_dispatching());
}

#[test]
fn direct_send_from_a_listener_is_rejected() {
    let h = harness();
    let nested = Arc::new(Mutex::new(None));

    let store = h.store.clone();
    let result = Arc::clone(&nested);
    h.store.subscribe(move || {
        *result.lock().unwrap() = Some(store.send(TodoAction::RemoveAll));
    });

    h.store.send(TodoAction::create("Groceries", None)).unwrap();

    assert_eq!(*nested.lock().unwrap(), Some(Err(StoreError::ReentrantSend)));
    assert_eq!(h.snapshot().len(), 1);
}

#[test]
fn listeners_can_read_the_store() {
    let h = harness();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let store = h.store.clone();
    let log = Arc::clone(&seen);
    h.store.subscribe(move || {
        log.lock().unwrap().push(store.state(TodoState::total_count));
    });

    h.actions.create("Groceries", None).unwrap();
    h.actions.create("Milk", Some(&h.root("todo-1"))).unwrap();
    h.actions.update_text(&h.root("todo-1"), "Shopping").unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 2]);

    let address = ItemAddress::root(TodoId::new("todo-1"));
    let text = h
        .store
        .state(|s| s.find(&address).map(|item| item.text().to_string()));
    assert_eq!(text.as_deref(), Some("Shopping"));
}

#[test]
fn reloaded_snapshot_keeps_children_addressable() {
    let h = harness();
    h.actions.create("Groceries", None).unwrap();
    h.actions.create("Milk", Some(&h.root("todo-1"))).unwrap();
    let json = serde_json::to_string(&h.snapshot()).unwrap();

    let reloaded: TodoState = serde_json::from_str(&json).unwrap();
    let env = TodoEnvironment::new(Arc::new(SequentialIdGenerator::new("reloaded")));
    let store = TodoStore::new(reloaded, TodoReducer::new(), env);

    let milk = store.state(|s| {
        s.get(&TodoId::new("todo-1"))
            .and_then(|root| root.children.values().next())
            .map(ChildItem::address)
            .unwrap()
    });
    store.send(TodoAction::remove(milk)).unwrap();

    assert!(store.state(|s| s.get(&TodoId::new("todo-1")).unwrap().children.is_empty()));
}

#[test]
fn corrupt_snapshot_is_rejected() {
    let json = r#"{
        "items": {
            "r": {
                "id": "r",
                "text": "  ",
                "completed": false,
                "children": {
                    "c": { "id": "c", "parent_id": "zzz", "text": "Milk", "completed": false }
                }
            }
        },
        "status_filter": "all"
    }"#;

    assert!(serde_json::from_str::<TodoState>(json).is_err());
}
