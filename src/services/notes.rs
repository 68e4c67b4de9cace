//! Notes Service
//!
//! Note and group CRUD against the notes backend.

use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::core::HttpTransport;
use crate::error::ApiError;
use crate::types::{
    ApiRequest, CreateGroup, CreateNote, Endpoints, NoteInfo, NotesTree, UpdateGroup, UpdateNote,
};

/// Notes and groups operations.
pub struct NotesService<'a, T: HttpTransport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: HttpTransport> NotesService<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Fetch the full group/note tree.
    #[instrument(skip(self))]
    pub async fn get_tree(&self) -> Result<NotesTree, ApiError> {
        let tree: NotesTree = self.client.send_json(ApiRequest::get(Endpoints::NOTES_LIST)).await?;
        debug!(groups = tree.groups.len(), notes = tree.note_count(), "notes tree loaded");
        Ok(tree)
    }

    /// Fetch one note with its text.
    #[instrument(skip(self))]
    pub async fn get_note(&self, id: &str) -> Result<NoteInfo, ApiError> {
        self.client
            .send_json(ApiRequest::get(Endpoints::NOTE).query("id", id))
            .await
    }

    #[instrument(skip(self, note), fields(group_id = %note.group_id))]
    pub async fn create_note(&self, note: &CreateNote) -> Result<(), ApiError> {
        self.client
            .send_empty(ApiRequest::post(Endpoints::ADD_NOTE).json(note)?)
            .await
    }

    #[instrument(skip(self, update), fields(id = %update.id))]
    pub async fn update_note(&self, update: &UpdateNote) -> Result<(), ApiError> {
        self.client
            .send_empty(ApiRequest::put(Endpoints::UPDATE_NOTE).json(update)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_note(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .send_empty(ApiRequest::delete(Endpoints::DELETE_NOTE).query("id", id))
            .await
    }

    #[instrument(skip(self, group), fields(name = %group.name))]
    pub async fn create_group(&self, group: &CreateGroup) -> Result<(), ApiError> {
        self.client
            .send_empty(ApiRequest::post(Endpoints::ADD_GROUP).json(group)?)
            .await
    }

    /// Rename or move a group.
    #[instrument(skip(self, update))]
    pub async fn update_group(&self, update: &UpdateGroup) -> Result<(), ApiError> {
        self.client
            .send_empty(ApiRequest::put(Endpoints::UPDATE_GROUP).json(update)?)
            .await
    }

    /// Delete a group. The backend removes its notes and subgroups.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .send_empty(ApiRequest::delete(Endpoints::DELETE_GROUP).query("id", id))
            .await
    }
}
