pub mod dates;
pub mod resolve;

use tracing::{debug, warn};

use crate::error::ImportError;
use crate::model::project::{
    Attachment, ChecklistItemRef, ChecklistMeta, Column, Comment, Project, Subtask, SubtaskStatus,
    Task, TaskMetadata,
};
use crate::model::trello::{Board, Card, Checklist};
use dates::{card_timestamp, Timezone};
use resolve::{Resolver, TaskPos};

#[derive(Debug, Clone, Copy, Default)]
pub struct MapOptions {
    pub timezone: Timezone,
}

/// Records the mapper skipped because their parent could not be found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dropped {
    pub cards: usize,
    pub comments: usize,
    pub checklists: usize,
}

impl Dropped {
    pub fn total(&self) -> usize {
        self.cards + self.comments + self.checklists
    }
}

#[derive(Debug, Clone)]
pub struct Import {
    pub project: Project,
    pub dropped: Dropped,
}

/// Map a board with default options.
pub fn map(board: &Board) -> Result<Project, ImportError> {
    Mapper::default().run(board).map(|import| import.project)
}

/// Rebuilds the nested project tree out of the export's flat collections.
///
/// Passes run in a fixed order because each one resolves ids against what
/// the earlier ones built: columns, then tasks with their attachments and
/// checklist metadata, then comments, then subtasks.
#[derive(Debug, Default)]
pub struct Mapper {
    options: MapOptions,
}

impl Mapper {
    pub fn new(options: MapOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, board: &Board) -> Result<Import, ImportError> {
        let mut build = Build {
            project: Project::new(board.name.clone()),
            resolver: Resolver::new(),
            dropped: Dropped::default(),
        };

        build.columns(board);
        for card in &board.cards {
            build.card(card, &board.checklists, self.options.timezone)?;
        }
        build.comments(board)?;
        build.subtasks(board);

        let Build {
            project, dropped, ..
        } = build;
        if dropped.total() > 0 {
            warn!(
                board = %project.name,
                cards = dropped.cards,
                comments = dropped.comments,
                checklists = dropped.checklists,
                "Skipped records whose parent is missing from the export"
            );
        }
        Ok(Import { project, dropped })
    }
}

struct Build {
    project: Project,
    resolver: Resolver,
    dropped: Dropped,
}

impl Build {
    fn columns(&mut self, board: &Board) {
        for list in &board.lists {
            if list.closed {
                self.project.metadata.closed_columns.push(list.id.clone());
            }
            self.resolver.add_column(&list.id, self.project.columns.len());
            self.project
                .columns
                .push(Column::new(list.name.clone(), list.id.clone()));
        }
    }

    fn card(
        &mut self,
        card: &Card,
        checklists: &[Checklist],
        tz: Timezone,
    ) -> Result<(), ImportError> {
        let date_due = card_timestamp(&card.id, "due", card.due.as_deref(), tz)?;
        // Exports have no creation date; last activity stands in for both.
        let last_activity = card_timestamp(
            &card.id,
            "dateLastActivity",
            card.date_last_activity.as_deref(),
            tz,
        )?;

        let Some(column) = self.resolver.column(&card.id_list) else {
            debug!(card = %card.id, list = %card.id_list, "Dropping card on unknown list");
            self.dropped.cards += 1;
            return Ok(());
        };

        let mut task = Task {
            name: card.name.clone(),
            trello_id: card.id.clone(),
            date_due,
            desc: card.desc.clone(),
            is_active: !card.closed,
            date_completed: None,
            date_creation: last_activity.clone(),
            date_modification: last_activity,
            subtasks: Vec::new(),
            comments: Vec::new(),
            attachments: Vec::new(),
            metadata: TaskMetadata::default(),
        };

        if card.badges.attachments > 0 {
            for att in &card.attachments {
                if att.is_upload {
                    task.attachments.push(Attachment {
                        filename: att.name.clone(),
                        url: att.url.clone(),
                    });
                } else {
                    task.comments.push(Comment::new(format!(
                        "Attachment is just a link: {}",
                        att.url
                    )));
                }
            }
        }

        task.metadata.checklists = checklists
            .iter()
            .filter(|cl| cl.id_card == card.id)
            .enumerate()
            .map(|(i, cl)| ChecklistMeta {
                name: cl.name.clone(),
                position: i + 1,
                items: cl
                    .check_items
                    .iter()
                    .map(|item| ChecklistItemRef {
                        id: item.id.clone(),
                    })
                    .collect(),
            })
            .collect();

        let tasks = &mut self.project.columns[column].tasks;
        self.resolver.add_task(
            &card.id,
            TaskPos {
                column,
                task: tasks.len(),
            },
        );
        tasks.push(task);
        Ok(())
    }

    fn comments(&mut self, board: &Board) -> Result<(), ImportError> {
        for (index, action) in board.actions.iter().enumerate() {
            if !action.is_comment() {
                continue;
            }
            let missing = |field| ImportError::MissingActionField {
                index,
                action_type: action.action_type.clone(),
                field,
            };
            let card_id = &action.data.card.as_ref().ok_or_else(|| missing("card"))?.id;
            let text = action.data.text.as_ref().ok_or_else(|| missing("text"))?;

            match self.resolver.task(card_id) {
                Some(pos) => self.task_mut(pos).comments.push(Comment::new(text.clone())),
                None => {
                    debug!(card = %card_id, action = ?action.id, "Dropping comment on unknown card");
                    self.dropped.comments += 1;
                }
            }
        }
        Ok(())
    }

    fn subtasks(&mut self, board: &Board) {
        for checklist in &board.checklists {
            let Some(pos) = self.resolver.task(&checklist.id_card) else {
                debug!(
                    checklist = %checklist.id,
                    card = %checklist.id_card,
                    "Dropping checklist on unknown card"
                );
                self.dropped.checklists += 1;
                continue;
            };

            let mut items: Vec<_> = checklist.check_items.iter().collect();
            items.sort_by(|a, b| a.pos.total_cmp(&b.pos));

            let subtasks = &mut self.task_mut(pos).subtasks;
            subtasks.extend(items.into_iter().map(|item| Subtask {
                content: item.name.clone(),
                status: if item.is_complete() {
                    SubtaskStatus::Done
                } else {
                    SubtaskStatus::Todo
                },
                trello_id: item.id.clone(),
            }));
        }
    }

    fn task_mut(&mut self, pos: TaskPos) -> &mut Task {
        &mut self.project.columns[pos.column].tasks[pos.task]
    }
}
