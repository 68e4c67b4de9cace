//! Notes Types
//!
//! Note and group payloads exchanged with the notes backend, plus the
//! display tree built from the notes list.

use serde::{Deserialize, Deserializer, Serialize};

/// Id of the synthetic root folder in a prepared tree.
pub const ROOT_ID: &str = "-1";

/// The backend emits numeric ids; the tree and UI treat them as strings.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

/// Empty lists may come back as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Note entry inside the tree listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NoteSummary {
    #[serde(deserialize_with = "id_string")]
    pub note_id: String,
    pub note_title: String,
}

/// Group (folder) entry inside the tree listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GroupNode {
    #[serde(deserialize_with = "id_string")]
    pub group_id: String,
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub groups: Vec<GroupNode>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<NoteSummary>,
}

/// Response of GET /getNotesList.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NotesTree {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub groups: Vec<GroupNode>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<NoteSummary>,
}

/// Display node of the folder/note tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub id: String,
    /// Unique across folders and notes, which may share numeric ids.
    pub key: String,
    pub title: String,
    pub is_folder: bool,
    pub is_note: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeItem>>,
}

impl TreeItem {
    fn folder(id: String, title: String, children: Vec<TreeItem>) -> Self {
        Self {
            key: format!("group-{}", id),
            id,
            title,
            is_folder: true,
            is_note: false,
            children: Some(children),
        }
    }

    fn note(note: &NoteSummary) -> Self {
        Self {
            id: note.note_id.clone(),
            key: format!("note-{}", note.note_id),
            title: note.note_title.clone(),
            is_folder: false,
            is_note: true,
            children: None,
        }
    }
}

fn prepare_level(groups: &[GroupNode], notes: &[NoteSummary]) -> Vec<TreeItem> {
    groups
        .iter()
        .map(|group| {
            TreeItem::folder(
                group.group_id.clone(),
                group.group_name.clone(),
                prepare_level(&group.groups, &group.notes),
            )
        })
        .chain(notes.iter().map(TreeItem::note))
        .collect()
}

impl NotesTree {
    /// Build the display tree: a single `Root` folder holding groups first,
    /// then loose notes, recursively.
    pub fn prepare(&self) -> Vec<TreeItem> {
        let mut root = TreeItem::folder(
            ROOT_ID.to_string(),
            "Root".to_string(),
            prepare_level(&self.groups, &self.notes),
        );
        root.key = "root".to_string();
        vec![root]
    }

    /// Total number of notes at any depth.
    pub fn note_count(&self) -> usize {
        fn count(group: &GroupNode) -> usize {
            group.notes.len() + group.groups.iter().map(count).sum::<usize>()
        }
        self.notes.len() + self.groups.iter().map(count).sum::<usize>()
    }
}

/// Response of GET /getNote.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NoteInfo {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub group_id: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_email: String,
}

/// Body of POST /addNote. A `group_id` of `"0"` places the note at the root.
#[derive(Clone, Debug, Serialize)]
pub struct CreateNote {
    pub group_id: String,
    pub title: String,
}

/// Body of PUT /updateNote. Unset fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateNote {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl UpdateNote {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }
}

/// Body of POST /addGroup.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id_group: Option<String>,
}

/// Body of PUT /updateGroup: either a rename or a move.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum UpdateGroup {
    Rename {
        id: String,
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    Move {
        id: String,
        parent_group_id: String,
    },
}
