//! Reference data: categories, cities and training locations.

use moveminds_dto::{Category, City, Location};
use reqwest::Method;
use serde_json::json;

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.get("/categories", &Vec::new()).await
    }

    pub async fn create_category(&self, name: &str, description: Option<&str>) -> Result<Category> {
        self.send_json(
            Method::POST,
            "/categories",
            &json!({ "name": name, "description": description }),
        )
        .await
    }

    pub async fn update_category(
        &self,
        category_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category> {
        self.send_json(
            Method::PUT,
            &format!("/categories/{category_id}"),
            &json!({ "name": name, "description": description }),
        )
        .await
    }

    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        self.delete(&format!("/categories/{category_id}")).await
    }

    pub async fn cities(&self) -> Result<Vec<City>> {
        self.get("/cities", &Vec::new()).await
    }

    pub async fn create_city(&self, name: &str) -> Result<City> {
        self.send_json(Method::POST, "/cities", &json!({ "name": name }))
            .await
    }

    pub async fn delete_city(&self, city_id: i64) -> Result<()> {
        self.delete(&format!("/cities/{city_id}")).await
    }

    pub async fn locations(&self) -> Result<Vec<Location>> {
        self.get("/locations", &Vec::new()).await
    }

    pub async fn create_location(
        &self,
        name: &str,
        address: Option<&str>,
        city_id: Option<i64>,
    ) -> Result<Location> {
        self.send_json(
            Method::POST,
            "/locations",
            &json!({ "name": name, "address": address, "cityId": city_id }),
        )
        .await
    }

    pub async fn delete_location(&self, location_id: i64) -> Result<()> {
        self.delete(&format!("/locations/{location_id}")).await
    }
}
