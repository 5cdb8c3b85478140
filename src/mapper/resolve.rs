use std::collections::HashMap;

use crate::model::project::Column;

/// Where a task lives inside the project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPos {
    pub column: usize,
    pub task: usize,
}

/// Trello id → position lookups, filled while columns and tasks are
/// appended so later passes never scan the tree.
///
/// Lookups answer the same as a front-to-back scan would: the first column
/// with a given id, and the first task in column order then task order.
#[derive(Debug, Default)]
pub struct Resolver {
    columns: HashMap<String, usize>,
    tasks: HashMap<String, TaskPos>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, trello_id: &str, index: usize) {
        self.columns.entry(trello_id.to_string()).or_insert(index);
    }

    pub fn add_task(&mut self, trello_id: &str, pos: TaskPos) {
        self.tasks
            .entry(trello_id.to_string())
            .and_modify(|existing| {
                // Tasks are appended column by column in card order, so a
                // duplicate only wins when it sits in an earlier column.
                if pos.column < existing.column {
                    *existing = pos;
                }
            })
            .or_insert(pos);
    }

    pub fn column(&self, list_id: &str) -> Option<usize> {
        self.columns.get(list_id).copied()
    }

    pub fn task(&self, card_id: &str) -> Option<TaskPos> {
        self.tasks.get(card_id).copied()
    }
}

/// Linear-scan form of [`Resolver::column`], for callers holding only the
/// columns.
pub fn resolve_column(columns: &[Column], list_id: &str) -> Option<usize> {
    columns.iter().position(|c| c.trello_id == list_id)
}

/// Linear-scan form of [`Resolver::task`].
pub fn resolve_task(columns: &[Column], card_id: &str) -> Option<TaskPos> {
    columns.iter().enumerate().find_map(|(column, c)| {
        c.tasks
            .iter()
            .position(|t| t.trello_id == card_id)
            .map(|task| TaskPos { column, task })
    })
}
