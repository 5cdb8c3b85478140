use serde::{Serialize, Serializer};

/// The kanban project built from an export, ready to be persisted in
/// order: project, columns, tasks, then each task's children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub name: String,
    pub columns: Vec<Column>,
    pub metadata: ProjectMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectMetadata {
    /// Trello ids of archived lists.
    pub closed_columns: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            metadata: ProjectMetadata::default(),
        }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flat_map(|c| c.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    pub fn subtask_count(&self) -> usize {
        self.tasks().map(|t| t.subtasks.len()).sum()
    }

    pub fn comment_count(&self) -> usize {
        self.tasks().map(|t| t.comments.len()).sum()
    }

    pub fn attachment_count(&self) -> usize {
        self.tasks().map(|t| t.attachments.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub trello_id: String,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(name: impl Into<String>, trello_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trello_id: trello_id.into(),
            tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub name: String,
    pub trello_id: String,
    pub date_due: Option<String>,
    pub desc: String,
    #[serde(serialize_with = "as_flag")]
    pub is_active: bool,
    /// Never filled in: an export carries no completion timestamp.
    pub date_completed: Option<String>,
    pub date_creation: Option<String>,
    pub date_modification: Option<String>,
    pub subtasks: Vec<Subtask>,
    pub comments: Vec<Comment>,
    pub attachments: Vec<Attachment>,
    pub metadata: TaskMetadata,
}

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskMetadata {
    pub checklists: Vec<ChecklistMeta>,
}

/// Which checklist the items came from. Subtasks themselves are flat, so
/// this is the only record of the grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistMeta {
    pub name: String,
    /// 1-based order among the card's checklists.
    pub position: usize,
    pub items: Vec<ChecklistItemRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItemRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subtask {
    pub content: String,
    pub status: SubtaskStatus,
    pub trello_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtaskStatus {
    Todo,
    Done,
}

impl SubtaskStatus {
    pub fn code(self) -> u8 {
        match self {
            SubtaskStatus::Todo => 0,
            SubtaskStatus::Done => 2,
        }
    }
}

impl Serialize for SubtaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub content: String,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}
