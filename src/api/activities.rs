use moveminds_dto::{Activity, NewActivity, Page};
use reqwest::Method;

use super::{ApiClient, QueryParams, page_params};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityQuery {
    pub page: usize,
    pub size: usize,
}

impl ActivityQuery {
    pub(crate) fn params(&self) -> QueryParams {
        page_params(self.page, self.size)
    }
}

impl ApiClient {
    pub async fn my_activities(&self, query: &ActivityQuery) -> Result<Page<Activity>> {
        let page: Page<Activity> = self.get("/activities/me", &query.params()).await?;
        Ok(page.checked(query.size)?)
    }

    pub async fn log_activity(&self, activity: &NewActivity) -> Result<Activity> {
        self.send_json(Method::POST, "/activities", activity).await
    }

    pub async fn update_activity(
        &self,
        activity_id: i64,
        activity: &NewActivity,
    ) -> Result<Activity> {
        self.send_json(Method::PUT, &format!("/activities/{activity_id}"), activity)
            .await
    }

    pub async fn delete_activity(&self, activity_id: i64) -> Result<()> {
        self.delete(&format!("/activities/{activity_id}")).await
    }
}
