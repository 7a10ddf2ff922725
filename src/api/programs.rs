use moveminds_dto::{DifficultyLevel, Page, Program, ProgramDraft};
use reqwest::Method;
use reqwest::multipart::{Form, Part};

use super::{ApiClient, QueryParams, page_params, push_param};
use crate::error::{MoveMindsError, Result};

/// Parameters of the public catalogue listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramQuery {
    pub page: usize,
    pub size: usize,
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
}

impl ProgramQuery {
    pub(crate) fn params(&self) -> QueryParams {
        let mut params = page_params(self.page, self.size);
        push_param(&mut params, "search", self.search.as_deref());
        push_param(&mut params, "category", self.category.as_deref());
        push_param(
            &mut params,
            "difficulty",
            self.difficulty.as_ref().map(DifficultyLevel::as_param),
        );
        params
    }
}

impl ApiClient {
    pub async fn programs(&self, query: &ProgramQuery) -> Result<Page<Program>> {
        let page: Page<Program> = self.get("/programs", &query.params()).await?;
        Ok(page.checked(query.size)?)
    }

    pub async fn program(&self, program_id: i64) -> Result<Program> {
        self.get(&format!("/programs/{program_id}"), &Vec::new())
            .await
    }

    pub async fn create_program(&self, draft: &ProgramDraft) -> Result<Program> {
        self.send_json(Method::POST, "/programs", draft).await
    }

    pub async fn update_program(&self, program_id: i64, draft: &ProgramDraft) -> Result<Program> {
        self.send_json(Method::PUT, &format!("/programs/{program_id}"), draft)
            .await
    }

    pub async fn delete_program(&self, program_id: i64) -> Result<()> {
        self.delete(&format!("/programs/{program_id}")).await
    }

    pub async fn instructor_programs(&self, instructor_id: i64) -> Result<Vec<Program>> {
        self.get(&format!("/programs/instructor/{instructor_id}"), &Vec::new())
            .await
    }

    pub async fn upload_program_image(
        &self,
        program_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Program> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(image_mime(file_name))
            .map_err(|e| MoveMindsError::InvalidArgument(format!("bad image type: {e}")))?;
        let form = Form::new().part("file", part);
        self.upload(&format!("/programs/{program_id}/image"), form)
            .await
    }
}

fn image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_params() {
        let query = ProgramQuery {
            page: 0,
            size: 10,
            search: Some("yoga".to_string()),
            category: None,
            difficulty: Some(DifficultyLevel::Beginner),
        };
        assert_eq!(
            query.params(),
            vec![
                ("page", "0".to_string()),
                ("size", "10".to_string()),
                ("search", "yoga".to_string()),
                ("difficulty", "BEGINNER".to_string()),
            ]
        );
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("cover.PNG"), "image/png");
        assert_eq!(image_mime("photo.jpg"), "image/jpeg");
        assert_eq!(image_mime("weird"), "image/jpeg");
    }
}
