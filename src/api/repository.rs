// src/api/repository.rs
//! [`NotionRepository`] over any [`HttpTransport`], with retries.

use super::client::{ApiRequest, HttpTransport};
use super::pagination::{fetch_all_pages, paged_endpoint};
use super::parser::parse_success;
use super::responses::{
    AppendChildrenRequest, CreatePageRequest, CreatedPage, ExistingBlock, PaginatedResponse,
};
use super::retry::{send_with_retry, RetryPolicy};
use super::NotionRepository;
use crate::cancellation::CancellationSignal;
use crate::error::AppError;
use crate::model::Block;
use crate::types::{NotionId, PageTitle};
use serde_json::json;

/// Notion endpoints used by the sync layer.
pub struct NotionApi<T> {
    transport: T,
    policy: RetryPolicy,
    cancel: CancellationSignal,
}

impl<T: HttpTransport> NotionApi<T> {
    pub fn new(transport: T, policy: RetryPolicy, cancel: CancellationSignal) -> Self {
        Self {
            transport,
            policy,
            cancel,
        }
    }

    async fn send(&self, request: ApiRequest) -> Result<String, AppError> {
        let response =
            send_with_retry(&self.transport, &request, &self.policy, &self.cancel).await?;
        log::debug!("{} {} -> {}", request.method, request.endpoint, response.status);
        Ok(response.data)
    }

    async fn send_and_parse<R>(&self, request: ApiRequest) -> Result<R, AppError>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = request.endpoint.clone();
        let body = self.send(request).await?;
        parse_success(&body, &url)
    }
}

#[async_trait::async_trait]
impl<T: HttpTransport> NotionRepository for NotionApi<T> {
    async fn append_children(&self, parent: &NotionId, blocks: &[Block]) -> Result<(), AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let body = serde_json::to_value(AppendChildrenRequest { children: blocks })?;
        self.send(ApiRequest::patch(endpoint, body)).await?;
        Ok(())
    }

    async fn create_page(
        &self,
        parent: &NotionId,
        title: &PageTitle,
        blocks: &[Block],
    ) -> Result<CreatedPage, AppError> {
        let body = serde_json::to_value(CreatePageRequest::new(parent, title, blocks))?;
        self.send_and_parse(ApiRequest::post("pages", body)).await
    }

    async fn list_children(&self, parent: &NotionId) -> Result<Vec<ExistingBlock>, AppError> {
        let base = format!("blocks/{}/children", parent.to_hyphenated());
        fetch_all_pages(|page_size, cursor| {
            let request = ApiRequest::get(paged_endpoint(&base, page_size, cursor.as_deref()));
            async move {
                self.send_and_parse::<PaginatedResponse<ExistingBlock>>(request)
                    .await
            }
        })
        .await
    }

    async fn archive_block(&self, id: &NotionId) -> Result<(), AppError> {
        let endpoint = format!("blocks/{}", id.to_hyphenated());
        self.send(ApiRequest::patch(endpoint, json!({ "archived": true })))
            .await?;
        Ok(())
    }
}
