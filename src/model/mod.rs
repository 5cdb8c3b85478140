pub mod project;
pub mod trello;
