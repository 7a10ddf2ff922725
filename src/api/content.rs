use moveminds_dto::{Lesson, LessonDraft, ModuleDraft, ProgramModule, Resource, ResourceType};
use reqwest::Method;
use reqwest::multipart::{Form, Part};

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    pub async fn program_modules(&self, program_id: i64) -> Result<Vec<ProgramModule>> {
        self.get(&format!("/programs/{program_id}/modules"), &Vec::new())
            .await
    }

    pub async fn create_module(&self, draft: &ModuleDraft) -> Result<ProgramModule> {
        self.send_json(Method::POST, "/modules", draft).await
    }

    pub async fn update_module(
        &self,
        module_id: i64,
        draft: &ModuleDraft,
    ) -> Result<ProgramModule> {
        self.send_json(Method::PUT, &format!("/modules/{module_id}"), draft)
            .await
    }

    pub async fn delete_module(&self, module_id: i64) -> Result<()> {
        self.delete(&format!("/modules/{module_id}")).await
    }

    pub async fn create_lesson(&self, draft: &LessonDraft) -> Result<Lesson> {
        self.send_json(Method::POST, "/lessons", draft).await
    }

    pub async fn update_lesson(&self, lesson_id: i64, draft: &LessonDraft) -> Result<Lesson> {
        self.send_json(Method::PUT, &format!("/lessons/{lesson_id}"), draft)
            .await
    }

    pub async fn delete_lesson(&self, lesson_id: i64) -> Result<()> {
        self.delete(&format!("/lessons/{lesson_id}")).await
    }

    pub async fn upload_resource(
        &self,
        lesson_id: i64,
        title: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Resource> {
        let resource_type = ResourceType::from_file_name(file_name);
        let form = Form::new()
            .text("title", title.to_string())
            .text("resourceType", resource_type.as_param())
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        self.upload(&format!("/lessons/{lesson_id}/resources"), form)
            .await
    }

    pub async fn delete_resource(&self, resource_id: i64) -> Result<()> {
        self.delete(&format!("/resources/{resource_id}")).await
    }
}
