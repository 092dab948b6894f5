// src/api/responses.rs
//! Request and response bodies exchanged with the Notion API.
//!
//! Only the fields this tool reads are modelled; unknown fields are ignored.

use crate::model::Block;
use crate::types::{NotionId, PageTitle};
use serde::{Deserialize, Serialize};

/// Generic paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// A block that already lives on a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExistingBlock {
    pub id: NotionId,
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub archived: bool,
}

/// The parts of a page-create response the CLI reports back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedPage {
    pub id: NotionId,
    #[serde(default)]
    pub url: Option<String>,
}

/// Error response from Notion API (`{"object":"error","status",...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct NotionErrorBody {
    pub code: String,
    pub message: String,
}

/// Body of `PATCH blocks/{id}/children`.
#[derive(Debug, Serialize)]
pub struct AppendChildrenRequest<'a> {
    pub children: &'a [Block],
}

/// Body of `POST pages` for a child page with a plain title.
#[derive(Debug, Serialize)]
pub struct CreatePageRequest<'a> {
    pub parent: PageParent<'a>,
    pub properties: TitleProperties<'a>,
    #[serde(skip_serializing_if = "<[Block]>::is_empty")]
    pub children: &'a [Block],
}

impl<'a> CreatePageRequest<'a> {
    pub fn new(parent: &'a NotionId, title: &'a PageTitle, children: &'a [Block]) -> Self {
        Self {
            parent: PageParent {
                kind: "page_id",
                page_id: parent,
            },
            properties: TitleProperties {
                title: TitleProperty {
                    title: vec![TitleText {
                        text: TitleContent {
                            content: title.as_str(),
                        },
                    }],
                },
            },
            children,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageParent<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub page_id: &'a NotionId,
}

#[derive(Debug, Serialize)]
pub struct TitleProperties<'a> {
    pub title: TitleProperty<'a>,
}

#[derive(Debug, Serialize)]
pub struct TitleProperty<'a> {
    pub title: Vec<TitleText<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TitleText<'a> {
    pub text: TitleContent<'a>,
}

#[derive(Debug, Serialize)]
pub struct TitleContent<'a> {
    pub content: &'a str,
}
