use serde::Serialize;

use crate::models::{Project, ProjectFields};
use crate::remote::{Remote, RemoteError};
use crate::reorder::OrderUpdate;

const TABLE: &str = "projects";

#[derive(Serialize)]
struct InsertProject<'a> {
    #[serde(flatten)]
    fields: &'a ProjectFields,
    sort_order: i32,
}

impl Remote {
    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    /// Fetch all projects, ascending by sort_order.
    pub async fn list_projects(&self) -> Result<Vec<Project>, RemoteError> {
        let response = self
            .http
            .get(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .query(&[("select", "*"), ("order", "sort_order.asc")])
            .send()
            .await?;

        let projects = Self::check(response).await?.json().await?;
        Ok(projects)
    }

    /// Insert a new project at the given sort_order and return the
    /// stored row.
    pub async fn insert_project(
        &self,
        fields: &ProjectFields,
        sort_order: i32,
    ) -> Result<Project, RemoteError> {
        let response = self
            .http
            .post(self.table_url())
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(&[InsertProject { fields, sort_order }])
            .send()
            .await?;

        let mut rows: Vec<Project> = Self::check(response).await?.json().await?;
        rows.pop()
            .ok_or_else(|| RemoteError::Backend("insert returned no row".to_string()))
    }

    pub async fn update_project(
        &self,
        id: i64,
        fields: &ProjectFields,
    ) -> Result<(), RemoteError> {
        let response = self
            .http
            .patch(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .query(&[("id", format!("eq.{}", id))])
            .json(fields)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), RemoteError> {
        let response = self
            .http
            .delete(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Commit a reorder batch. The store applies the whole batch or none
    /// of it; on failure the prior ordering is untouched.
    pub async fn upsert_order(&self, batch: &[OrderUpdate]) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(self.table_url())
            .header("apikey", &self.anon_key)
            .header("Prefer", "resolution=merge-duplicates")
            .bearer_auth(self.bearer())
            .json(batch)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
