use serde::Deserialize;
use serde_json::Value;

use crate::error::ImportError;

/// A board as written by Trello's "Export as JSON" menu entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    pub name: String,
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
    pub checklists: Vec<Checklist>,
    pub actions: Vec<Action>,
}

impl Board {
    pub fn from_json(input: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ImportError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    pub closed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub closed: bool,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub date_last_activity: Option<String>,
    pub id_list: String,
    pub badges: Badges,
    #[serde(default)]
    pub attachments: Vec<CardAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Badges {
    #[serde(default)]
    pub attachments: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAttachment {
    pub name: String,
    pub url: String,
    /// False when the "attachment" is only a pasted link.
    #[serde(default)]
    pub is_upload: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: String,
    pub id_card: String,
    pub name: String,
    pub check_items: Vec<CheckItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckItem {
    pub id: String,
    pub name: String,
    pub state: String,
    pub pos: f64,
}

impl CheckItem {
    pub fn is_complete(&self) -> bool {
        self.state == "complete"
    }
}

pub const COMMENT_ACTION: &str = "commentCard";

#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub data: ActionData,
}

impl Action {
    pub fn is_comment(&self) -> bool {
        self.action_type == COMMENT_ACTION
    }
}

/// Payload of an action. Its shape depends on the action type, so every
/// field is optional here and checked by whoever consumes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionData {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub card: Option<CardRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardRef {
    pub id: String,
}
