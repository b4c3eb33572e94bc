//! Domain types for the nested to-do list.
//!
//! The list has exactly two tiers. A [`RootItem`] owns a map of
//! [`ChildItem`]s; a child has no children of its own. Keeping the tiers as
//! separate types means a third level simply cannot be built.
//!
//! Mutations live on [`TodoState`] and are crate-private: the only way to
//! change a state from outside the crate is to send a [`TodoAction`] through
//! the store.

use crate::error::{InvalidStateError, ParseStatusFilterError, TodoError};
use nested_todo_core::environment::IdGenerator;
use nested_todo_macros::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a to-do item
///
/// Opaque string, assigned by the environment's
/// [`IdGenerator`] when the item is created. Unique across roots and
/// children alike.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A top-level to-do item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootItem {
    /// Unique identifier
    pub id: TodoId,
    /// Trimmed, non-empty description
    pub text: String,
    /// Whether the item is done
    pub completed: bool,
    /// Sub-tasks, keyed by their id
    pub children: HashMap<TodoId, ChildItem>,
}

impl RootItem {
    /// Creates an open root with no children
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            children: HashMap::new(),
        }
    }

    /// Sets the flag on this root and every child
    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        for child in self.children.values_mut() {
            child.completed = completed;
        }
    }

    /// Number of completed children
    #[must_use]
    pub fn completed_children(&self) -> usize {
        self.children.values().filter(|c| c.completed).count()
    }

    /// Address of this root
    #[must_use]
    pub fn address(&self) -> ItemAddress {
        ItemAddress::root(self.id.clone())
    }
}

/// A sub-task of a [`RootItem`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildItem {
    /// Unique identifier
    pub id: TodoId,
    /// The root this child belongs to
    pub parent_id: TodoId,
    /// Trimmed, non-empty description
    pub text: String,
    /// Whether the item is done
    pub completed: bool,
}

impl ChildItem {
    /// Creates an open child of `parent_id`
    #[must_use]
    pub fn new(id: TodoId, parent_id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            text: text.into(),
            completed: false,
        }
    }

    /// Address of this child
    #[must_use]
    pub fn address(&self) -> ItemAddress {
        ItemAddress::child(self.id.clone(), self.parent_id.clone())
    }
}

/// Borrowed view of an item of either tier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemRef<'a> {
    /// A top-level item
    Root(&'a RootItem),
    /// A sub-task
    Child(&'a ChildItem),
}

impl<'a> ItemRef<'a> {
    /// The item's id
    #[must_use]
    pub const fn id(&self) -> &'a TodoId {
        match *self {
            Self::Root(root) => &root.id,
            Self::Child(child) => &child.id,
        }
    }

    /// The owning root's id, `None` for roots
    #[must_use]
    pub const fn parent_id(&self) -> Option<&'a TodoId> {
        match *self {
            Self::Root(_) => None,
            Self::Child(child) => Some(&child.parent_id),
        }
    }

    /// The item's text
    #[must_use]
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Root(root) => &root.text,
            Self::Child(child) => &child.text,
        }
    }

    /// Whether the item is done
    #[must_use]
    pub const fn completed(&self) -> bool {
        match *self {
            Self::Root(root) => root.completed,
            Self::Child(child) => child.completed,
        }
    }

    /// Owned address of the item
    #[must_use]
    pub fn address(&self) -> ItemAddress {
        match *self {
            Self::Root(root) => root.address(),
            Self::Child(child) => child.address(),
        }
    }
}

impl<'a> From<&'a RootItem> for ItemRef<'a> {
    fn from(root: &'a RootItem) -> Self {
        Self::Root(root)
    }
}

impl<'a> From<&'a ChildItem> for ItemRef<'a> {
    fn from(child: &'a ChildItem) -> Self {
        Self::Child(child)
    }
}

/// Location of an item: its id plus, for children, the owning root
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemAddress {
    /// The item's id
    pub id: TodoId,
    /// The owning root, `None` when the item is itself a root
    pub parent_id: Option<TodoId>,
}

impl ItemAddress {
    /// Address of a root item
    #[must_use]
    pub const fn root(id: TodoId) -> Self {
        Self {
            id,
            parent_id: None,
        }
    }

    /// Address of a child item
    #[must_use]
    pub const fn child(id: TodoId, parent_id: TodoId) -> Self {
        Self {
            id,
            parent_id: Some(parent_id),
        }
    }

    /// Whether this addresses a root
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for ItemAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent_id {
            Some(parent_id) => write!(f, "{parent_id}/{}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Which items a view should show
///
/// The store only records the current value; views interpret it with
/// [`StatusFilter::matches`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items only
    Completed,
}

impl StatusFilter {
    /// Whether an item with the given flag passes this filter
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// Lowercase name, as used on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusFilterError(s.to_string())),
        }
    }
}

/// State of the to-do list
///
/// Deserializing checks the same invariants the mutations maintain: every
/// item sits under its own id, every child names the root that holds it,
/// and all text is trimmed and non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTodoState")]
pub struct TodoState {
    items: HashMap<TodoId, RootItem>,
    status_filter: StatusFilter,
}

/// Unchecked shape of a serialized [`TodoState`]
#[derive(Deserialize)]
struct RawTodoState {
    #[serde(default)]
    items: HashMap<TodoId, RootItem>,
    #[serde(default)]
    status_filter: StatusFilter,
}

impl TryFrom<RawTodoState> for TodoState {
    type Error = InvalidStateError;

    fn try_from(raw: RawTodoState) -> Result<Self, Self::Error> {
        for (key, root) in &raw.items {
            check_item(key, &root.id, &root.text)?;
            for (child_key, child) in &root.children {
                check_item(child_key, &child.id, &child.text)?;
                if child.parent_id != root.id {
                    return Err(InvalidStateError::ParentMismatch {
                        id: child.id.clone(),
                        parent_id: child.parent_id.clone(),
                        root_id: root.id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            items: raw.items,
            status_filter: raw.status_filter,
        })
    }
}

fn check_item(key: &TodoId, id: &TodoId, text: &str) -> Result<(), InvalidStateError> {
    if key != id {
        return Err(InvalidStateError::KeyMismatch {
            key: key.clone(),
            id: id.clone(),
        });
    }
    if text.is_empty() || text.trim() != text {
        return Err(InvalidStateError::InvalidText { id: id.clone() });
    }
    Ok(())
}

impl TodoState {
    /// Creates an empty list showing every item
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with the given filter
    #[must_use]
    pub fn with_status_filter(status_filter: StatusFilter) -> Self {
        Self {
            items: HashMap::new(),
            status_filter,
        }
    }

    // ========== Reads ==========

    /// All root items, keyed by id
    #[must_use]
    pub const fn items(&self) -> &HashMap<TodoId, RootItem> {
        &self.items
    }

    /// The current status filter
    #[must_use]
    pub const fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    /// Returns a root by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&RootItem> {
        self.items.get(id)
    }

    /// Looks up an item of either tier
    #[must_use]
    pub fn find(&self, address: &ItemAddress) -> Option<ItemRef<'_>> {
        match &address.parent_id {
            Some(parent_id) => self
                .items
                .get(parent_id)
                .and_then(|root| root.children.get(&address.id))
                .map(ItemRef::Child),
            None => self.items.get(&address.id).map(ItemRef::Root),
        }
    }

    /// Number of roots
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no roots
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items across both tiers
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.items.values().map(|root| 1 + root.children.len()).sum()
    }

    /// Number of completed items across both tiers
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items
            .values()
            .map(|root| usize::from(root.completed) + root.completed_children())
            .sum()
    }

    /// Number of open items across both tiers
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.total_count() - self.completed_count()
    }

    /// Whether every root is completed
    ///
    /// Children are not consulted. An empty list counts as all completed.
    #[must_use]
    pub fn are_all_completed(&self) -> bool {
        self.items.values().all(|root| root.completed)
    }

    // ========== Mutations ==========

    /// Adds an item, as a root or under `parent_id`
    pub(crate) fn create(
        &mut self,
        text: &str,
        parent_id: Option<&TodoId>,
        ids: &dyn IdGenerator,
    ) -> Result<TodoId, TodoError> {
        let text = non_empty(text)?;

        match parent_id {
            Some(parent_id) => {
                let root = self
                    .items
                    .get_mut(parent_id)
                    .ok_or_else(|| TodoError::ParentNotFound {
                        parent_id: parent_id.clone(),
                    })?;
                let id = TodoId::new(ids.next_id());
                root.children.insert(
                    id.clone(),
                    ChildItem::new(id.clone(), parent_id.clone(), text),
                );
                Ok(id)
            },
            None => {
                let id = TodoId::new(ids.next_id());
                self.items.insert(id.clone(), RootItem::new(id.clone(), text));
                Ok(id)
            },
        }
    }

    /// Replaces an item's text
    pub(crate) fn update_text(&mut self, address: &ItemAddress, text: &str) -> Result<(), TodoError> {
        let text = non_empty(text)?;
        let slot = match &address.parent_id {
            Some(parent_id) => self
                .items
                .get_mut(parent_id)
                .and_then(|root| root.children.get_mut(&address.id))
                .map(|child| &mut child.text),
            None => self.items.get_mut(&address.id).map(|root| &mut root.text),
        };

        let slot = slot.ok_or_else(|| not_found(address))?;
        *slot = text.to_string();
        Ok(())
    }

    /// Sets an item's completed flag
    ///
    /// On a root the same value is written to every child.
    pub(crate) fn update_completed(
        &mut self,
        address: &ItemAddress,
        completed: bool,
    ) -> Result<(), TodoError> {
        match &address.parent_id {
            Some(parent_id) => {
                let child = self
                    .items
                    .get_mut(parent_id)
                    .and_then(|root| root.children.get_mut(&address.id))
                    .ok_or_else(|| not_found(address))?;
                child.completed = completed;
            },
            None => {
                let root = self
                    .items
                    .get_mut(&address.id)
                    .ok_or_else(|| not_found(address))?;
                root.set_completed(completed);
            },
        }
        Ok(())
    }

    /// Sets every item of both tiers to `completed`
    pub(crate) fn update_completed_all(&mut self, completed: bool) {
        for root in self.items.values_mut() {
            root.set_completed(completed);
        }
    }

    /// Removes an item; a root takes its children with it
    pub(crate) fn remove(&mut self, address: &ItemAddress) -> Result<(), TodoError> {
        let removed = match &address.parent_id {
            Some(parent_id) => self
                .items
                .get_mut(parent_id)
                .and_then(|root| root.children.remove(&address.id))
                .is_some(),
            None => self.items.remove(&address.id).is_some(),
        };

        if removed {
            Ok(())
        } else {
            Err(not_found(address))
        }
    }

    /// Removes every item
    pub(crate) fn remove_all(&mut self) {
        self.items.clear();
    }

    /// Removes completed roots (with their children) and, under open roots,
    /// completed children
    pub(crate) fn remove_completed(&mut self) {
        self.items.retain(|_, root| !root.completed);
        for root in self.items.values_mut() {
            root.children.retain(|_, child| !child.completed);
        }
    }

    /// Derives every root's flag from its children
    ///
    /// A root with children becomes completed exactly when all of them are.
    /// A childless root is left alone.
    pub(crate) fn complete_parents(&mut self) {
        for root in self.items.values_mut() {
            if !root.children.is_empty() {
                root.completed = root.completed_children() == root.children.len();
            }
        }
    }

    /// Replaces the status filter
    pub(crate) const fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }
}

fn non_empty(text: &str) -> Result<&str, TodoError> {
    let text = text.trim();
    if text.is_empty() {
        Err(TodoError::EmptyText)
    } else {
        Ok(text)
    }
}

fn not_found(address: &ItemAddress) -> TodoError {
    TodoError::NotFound {
        address: address.clone(),
    }
}

/// Everything that can happen to the list
///
/// Serialized with a `type` tag holding the wire name reported by
/// [`TodoAction::action_type`].
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Add an item; a child when `parent_id` is set
    Create {
        /// Raw text, trimmed by the reducer
        text: String,
        /// Owning root for a child
        parent_id: Option<TodoId>,
    },

    /// Replace an item's text
    UpdateText {
        /// Item to edit
        id: TodoId,
        /// Owning root for a child
        parent_id: Option<TodoId>,
        /// Raw text, trimmed by the reducer
        text: String,
    },

    /// Mark an item done (a root cascades to its children)
    Complete {
        /// Item to complete
        id: TodoId,
        /// Owning root for a child
        parent_id: Option<TodoId>,
    },

    /// Mark an item open again (a root cascades to its children)
    UndoComplete {
        /// Item to reopen
        id: TodoId,
        /// Owning root for a child
        parent_id: Option<TodoId>,
    },

    /// Complete everything, or reopen everything if all roots are done
    ToggleCompleteAll,

    /// Delete an item (a root takes its children)
    Remove {
        /// Item to delete
        id: TodoId,
        /// Owning root for a child
        parent_id: Option<TodoId>,
    },

    /// Delete every item
    RemoveAll,

    /// Delete completed items
    RemoveCompleted,

    /// Record the view filter
    SetStatusFilter {
        /// New filter
        filter: StatusFilter,
    },
}

impl TodoAction {
    /// `Create` with the given text and optional parent
    #[must_use]
    pub fn create(text: impl Into<String>, parent_id: Option<TodoId>) -> Self {
        Self::Create {
            text: text.into(),
            parent_id,
        }
    }

    /// `UpdateText` for the item at `address`
    #[must_use]
    pub fn update_text(address: ItemAddress, text: impl Into<String>) -> Self {
        Self::UpdateText {
            id: address.id,
            parent_id: address.parent_id,
            text: text.into(),
        }
    }

    /// `Complete` for the item at `address`
    #[must_use]
    pub fn complete(address: ItemAddress) -> Self {
        Self::Complete {
            id: address.id,
            parent_id: address.parent_id,
        }
    }

    /// `UndoComplete` for the item at `address`
    #[must_use]
    pub fn undo_complete(address: ItemAddress) -> Self {
        Self::UndoComplete {
            id: address.id,
            parent_id: address.parent_id,
        }
    }

    /// `Remove` for the item at `address`
    #[must_use]
    pub fn remove(address: ItemAddress) -> Self {
        Self::Remove {
            id: address.id,
            parent_id: address.parent_id,
        }
    }
}
