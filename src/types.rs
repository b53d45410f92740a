// src/types.rs

use std::collections::BTreeMap;

use crate::engine::TaskName;

/// What a task produced when it finished.
///
/// A task may report zero, one or several values. A single value is kept
/// as-is; several values keep the order in which they were reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TaskValue<V> {
    /// The task reported no value.
    #[default]
    Empty,
    Single(V),
    Many(Vec<V>),
}

impl<V> TaskValue<V> {
    /// Returns the single value, if the task reported exactly one.
    pub fn single(&self) -> Option<&V> {
        match self {
            TaskValue::Single(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TaskValue::Empty)
    }

    /// Number of values the task reported.
    pub fn len(&self) -> usize {
        match self {
            TaskValue::Empty => 0,
            TaskValue::Single(_) => 1,
            TaskValue::Many(values) => values.len(),
        }
    }

    /// The reported values as a slice, regardless of arity.
    pub fn as_slice(&self) -> &[V] {
        match self {
            TaskValue::Empty => &[],
            TaskValue::Single(v) => std::slice::from_ref(v),
            TaskValue::Many(values) => values,
        }
    }

    /// Iterate over the reported values in order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.as_slice().iter()
    }

    /// Flatten into a vector, regardless of arity.
    pub fn into_vec(self) -> Vec<V> {
        match self {
            TaskValue::Empty => Vec::new(),
            TaskValue::Single(v) => vec![v],
            TaskValue::Many(values) => values,
        }
    }
}

impl<V> From<Vec<V>> for TaskValue<V> {
    fn from(mut values: Vec<V>) -> Self {
        match values.len() {
            0 => TaskValue::Empty,
            1 => match values.pop() {
                Some(v) => TaskValue::Single(v),
                None => TaskValue::Empty,
            },
            _ => TaskValue::Many(values),
        }
    }
}

impl<V> From<Option<V>> for TaskValue<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => TaskValue::Single(v),
            None => TaskValue::Empty,
        }
    }
}

/// Results of completed tasks, keyed by task name.
pub type Results<V> = BTreeMap<TaskName, TaskValue<V>>;
