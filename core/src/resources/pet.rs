use std::path::Path;

use tracing::info;

use crate::client::RequestExecutor;
use crate::error::Result;
use crate::http::Response;
use crate::types::Pet;

const PET_ENDPOINT: &str = "/pet";

/// Operations under `/pet`.
#[derive(Clone, Copy)]
pub struct PetApi<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> PetApi<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    pub fn add_pet(&self, pet: &Pet) -> Result<Response> {
        info!(id = ?pet.id, name = ?pet.name, "adding pet");
        self.executor.post(PET_ENDPOINT, pet)
    }

    pub fn update_pet(&self, pet: &Pet) -> Result<Response> {
        info!(id = ?pet.id, "updating pet");
        self.executor.put(PET_ENDPOINT, pet)
    }

    pub fn get_pet_by_id(&self, pet_id: i64) -> Result<Response> {
        info!(pet_id, "getting pet");
        self.executor.reset_template();
        self.executor.get(&format!("{PET_ENDPOINT}/{pet_id}"))
    }

    pub fn find_pets_by_status(&self, status: &str) -> Result<Response> {
        info!(status, "finding pets by status");
        self.executor.reset_template();
        self.executor
            .get_with_params(&format!("{PET_ENDPOINT}/findByStatus"), &[("status", status)])
    }

    /// Repeats the `tags` parameter once per tag.
    pub fn find_pets_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<Response> {
        let params: Vec<(&str, &str)> = tags.iter().map(|t| ("tags", t.as_ref())).collect();
        info!(?params, "finding pets by tags");
        self.executor.reset_template();
        self.executor.get_with_params(&format!("{PET_ENDPOINT}/findByTags"), &params)
    }

    pub fn delete_pet(&self, pet_id: i64) -> Result<Response> {
        info!(pet_id, "deleting pet");
        self.executor.delete(&format!("{PET_ENDPOINT}/{pet_id}"))
    }

    pub fn upload_pet_image(&self, pet_id: i64, image_path: impl AsRef<Path>) -> Result<Response> {
        let image_path = image_path.as_ref();
        info!(pet_id, path = %image_path.display(), "uploading pet image");
        self.executor.reset_template();
        self.executor.upload_file(&format!("{PET_ENDPOINT}/{pet_id}/uploadImage"), image_path)
    }
}
