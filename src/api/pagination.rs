// src/api/pagination.rs
//! Cursor pagination over Notion list endpoints.

use super::responses::PaginatedResponse;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Fetches every page of a list endpoint, following `next_cursor`.
///
/// `fetch_fn` receives the page size and the cursor of the page to load.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_fn: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        let response = fetch_fn(NOTION_API_PAGE_SIZE, cursor).await?;
        pages_fetched += 1;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);

        if !has_more || cursor.is_none() {
            break;
        }
    }

    log::debug!(
        "Fetched {} items over {} pages",
        all_items.len(),
        pages_fetched
    );
    Ok(all_items)
}

/// Endpoint with `page_size` and, when present, `start_cursor` query params.
pub fn paged_endpoint(base: &str, page_size: usize, cursor: Option<&str>) -> String {
    let mut url = format!("{}?page_size={}", base, page_size);
    if let Some(cursor) = cursor {
        url.push_str("&start_cursor=");
        url.extend(url::form_urlencoded::byte_serialize(cursor.as_bytes()));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let mut seen_cursors = Vec::new();
        let items = fetch_all_pages(|page_size, cursor| {
            assert_eq!(page_size, 100);
            seen_cursors.push(cursor.clone());
            let page = match cursor.as_deref() {
                None => PaginatedResponse {
                    object: "list".to_string(),
                    results: vec![1, 2],
                    next_cursor: Some("c2".to_string()),
                    has_more: true,
                },
                Some(_) => PaginatedResponse {
                    object: "list".to_string(),
                    results: vec![3],
                    next_cursor: None,
                    has_more: false,
                },
            };
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(seen_cursors, vec![None, Some("c2".to_string())]);
    }

    #[test]
    fn endpoint_encodes_cursor() {
        assert_eq!(
            paged_endpoint("blocks/x/children", 100, None),
            "blocks/x/children?page_size=100"
        );
        assert_eq!(
            paged_endpoint("blocks/x/children", 100, Some("a b/c")),
            "blocks/x/children?page_size=100&start_cursor=a+b%2Fc"
        );
    }
}
