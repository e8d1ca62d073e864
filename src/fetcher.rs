use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

use crate::review::{FetchRequest, Review};

const BATCH_EXECUTE_URL: &str = "https://play.google.com/_/PlayStoreUi/data/batchexecute";
const REVIEWS_RPC_ID: &str = "UsvDTd";
const RESPONSE_GUARD: &str = ")]}'";

/// Largest page the review RPC reliably serves.
pub const MAX_PAGE_SIZE: u32 = 199;

/// Anything that can produce reviews for a request.
pub trait ReviewSource {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Review>>;
}

/// One page of the review RPC response.
#[derive(Debug, Default)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub next_token: Option<String>,
}

pub struct PlayStoreClient {
    http: Client,
}

impl PlayStoreClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http })
    }

    fn fetch_page(
        &self,
        request: &FetchRequest,
        page_size: u32,
        token: Option<&str>,
    ) -> Result<ReviewPage> {
        let url = Url::parse_with_params(
            BATCH_EXECUTE_URL,
            &[("hl", request.lang.code()), ("gl", request.country.as_str())],
        )?;
        let payload = build_reviews_payload(&request.app_id, request.sort.code(), page_size, token);
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("f.req", &payload)
            .finish();

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded;charset=UTF-8")
            .body(body)
            .send()
            .with_context(|| format!("Request for reviews of '{}' failed", request.app_id))?
            .error_for_status()
            .with_context(|| format!("Play Store rejected review request for '{}'", request.app_id))?;

        let text = response.text().context("Failed to read review response body")?;
        parse_reviews_response(&text)
    }
}

impl ReviewSource for PlayStoreClient {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Review>> {
        collect_pages(request.count as usize, |page_size, token| {
            self.fetch_page(request, page_size, token)
        })
    }
}

/// Pulls pages from `next_page` until `target` reviews are in hand, a page
/// comes back empty or no continuation token is returned.
///
/// `next_page` receives the page size (at most [`MAX_PAGE_SIZE`]) and the
/// token from the previous page.
pub fn collect_pages<F>(target: usize, mut next_page: F) -> Result<Vec<Review>>
where
    F: FnMut(u32, Option<&str>) -> Result<ReviewPage>,
{
    let mut reviews: Vec<Review> = Vec::with_capacity(target);
    let mut token: Option<String> = None;

    while reviews.len() < target {
        let remaining = (target - reviews.len()).min(MAX_PAGE_SIZE as usize) as u32;
        let page = next_page(remaining, token.as_deref())?;

        info!(
            action = "page",
            component = "review_fetch",
            page_reviews = page.reviews.len(),
            total_reviews = reviews.len() + page.reviews.len(),
            has_next = page.next_token.is_some(),
            "Fetched review page"
        );

        if page.reviews.is_empty() {
            break;
        }
        reviews.extend(page.reviews);

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    reviews.truncate(target);
    Ok(reviews)
}

/// Builds the `f.req` value for the review RPC.
pub fn build_reviews_payload(app_id: &str, sort: u8, count: u32, token: Option<&str>) -> String {
    let inner = json!([
        null,
        null,
        [2, sort, [count, null, token], null, []],
        [app_id, 7]
    ]);
    json!([[[REVIEWS_RPC_ID, inner.to_string(), null, "generic"]]]).to_string()
}

fn at<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, &i| v.get(i))
}

fn parse_review(item: &Value) -> Option<Review> {
    let score = at(item, &[2])?.as_u64()?;
    if !(1..=5).contains(&score) {
        return None;
    }
    let seconds = at(item, &[5, 0])?.as_i64()?;
    let at_time = DateTime::from_timestamp(seconds, 0)?;

    Some(Review {
        author: at(item, &[1, 0])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        score: score as u8,
        content: at(item, &[4])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        at: at_time,
    })
}

/// Decodes a batchexecute response body into a page of reviews.
///
/// A missing RPC result means the store had nothing for the request and
/// yields an empty page.
pub fn parse_reviews_response(body: &str) -> Result<ReviewPage> {
    let json_part = body
        .trim_start()
        .strip_prefix(RESPONSE_GUARD)
        .context("Unexpected review response: missing guard prefix")?;

    let envelope: Value =
        serde_json::from_str(json_part.trim_start()).context("Malformed review response envelope")?;

    let Some(rpc_result) = at(&envelope, &[0, 2]).and_then(Value::as_str) else {
        warn!(
            action = "parse",
            component = "review_response",
            "Review response carried no result"
        );
        return Ok(ReviewPage::default());
    };

    let data: Value =
        serde_json::from_str(rpc_result).context("Malformed review payload in response")?;

    let items = at(&data, &[0]).and_then(Value::as_array);
    let mut reviews = Vec::new();
    let mut skipped = 0usize;
    for item in items.into_iter().flatten() {
        match parse_review(item) {
            Some(review) => reviews.push(review),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(
            action = "parse",
            component = "review_response",
            skipped,
            "Skipped reviews without a valid score or timestamp"
        );
    }

    // The continuation token trails one of the sections after the review list
    let next_token = data
        .as_array()
        .into_iter()
        .flat_map(|parts| parts.iter().skip(1).rev())
        .filter_map(Value::as_array)
        .find_map(|section| section.last().and_then(Value::as_str))
        .map(str::to_string);

    Ok(ReviewPage {
        reviews,
        next_token,
    })
}

/// Fetch boundary for a session: validates, fetches and logs.
///
/// Failures come back as `Err` with a readable reason; callers decide how
/// to show them.
pub fn fetch_reviews<S: ReviewSource + ?Sized>(
    source: &S,
    request: &FetchRequest,
) -> Result<Vec<Review>> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "review_fetch",
        app_id = %request.app_id,
        lang = request.lang.code(),
        country = %request.country,
        count = request.count,
        sort = %request.sort,
        "Fetching reviews"
    );

    request.validate()?;
    let reviews = source
        .fetch(request)
        .with_context(|| format!("Could not fetch reviews for '{}'", request.app_id))?;

    info!(
        action = "complete",
        component = "review_fetch",
        review_count = reviews.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Review fetch completed"
    );
    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{Language, SortOrder};

    fn wrap(data: &Value) -> String {
        let envelope = json!([["wrb.fr", REVIEWS_RPC_ID, data.to_string(), null, null, null, "generic"]]);
        format!(")]}}'\n\n{}", envelope)
    }

    fn sample_data(token: Option<&str>) -> Value {
        json!([
            [
                ["gp:1", ["Siti", [null, null, null, [null, 0, "img"]]], 1, null, "Sering error!", [1714550400, 0], 3],
                ["gp:2", ["Andi"], 5, null, null, [1714636800, 0], 0],
                ["gp:3", ["Broken"], 0, null, "no score", [1714636800, 0], 0],
                ["gp:4", ["NoTime"], 4, null, "missing time", null, 0]
            ],
            null,
            [null, token]
        ])
    }

    #[test]
    fn payload_embeds_sort_count_and_token() {
        let first = build_reviews_payload("com.maxstream", 2, 199, None);
        let outer: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(outer[0][0][0], "UsvDTd");
        let inner: Value = serde_json::from_str(outer[0][0][1].as_str().unwrap()).unwrap();
        assert_eq!(inner[2][1], 2);
        assert_eq!(inner[2][2][0], 199);
        assert!(inner[2][2][2].is_null());
        assert_eq!(inner[3][0], "com.maxstream");

        let next = build_reviews_payload("com.maxstream", 1, 50, Some("tok"));
        let outer: Value = serde_json::from_str(&next).unwrap();
        let inner: Value = serde_json::from_str(outer[0][0][1].as_str().unwrap()).unwrap();
        assert_eq!(inner[2][2][2], "tok");
    }

    #[test]
    fn parses_reviews_and_token() {
        let page = parse_reviews_response(&wrap(&sample_data(Some("next-page")))).unwrap();
        assert_eq!(page.reviews.len(), 2);
        assert_eq!(page.reviews[0].author, "Siti");
        assert_eq!(page.reviews[0].score, 1);
        assert_eq!(page.reviews[0].content, "Sering error!");
        assert_eq!(page.reviews[0].at.timestamp(), 1714550400);
        assert_eq!(page.reviews[1].content, "");
        assert_eq!(page.next_token.as_deref(), Some("next-page"));
    }

    #[test]
    fn missing_result_is_an_empty_page() {
        let body = ")]}'\n\n[[\"wrb.fr\",\"UsvDTd\",null,null,null,[5],\"generic\"]]";
        let page = parse_reviews_response(body).unwrap();
        assert!(page.reviews.is_empty());
        assert!(page.next_token.is_none());
    }

    #[test]
    fn garbage_body_is_an_error() {
        assert!(parse_reviews_response("<html>").is_err());
        assert!(parse_reviews_response(")]}'\n\n{not json").is_err());
    }

    fn canned_reviews(n: usize) -> Vec<Review> {
        (0..n)
            .map(|i| Review {
                author: format!("user{i}"),
                score: 1,
                content: String::new(),
                at: DateTime::from_timestamp(1_700_000_000 + i as i64, 0).unwrap(),
            })
            .collect()
    }

    fn full_page(size: u32, token: &str) -> ReviewPage {
        ReviewPage {
            reviews: canned_reviews(size as usize),
            next_token: Some(token.to_string()),
        }
    }

    #[test]
    fn pages_are_capped_and_last_page_asks_for_remainder() {
        let mut calls: Vec<(u32, Option<String>)> = Vec::new();
        let reviews = collect_pages(500, |size, token| {
            calls.push((size, token.map(str::to_string)));
            Ok(full_page(size, &format!("t{}", calls.len())))
        })
        .unwrap();

        assert_eq!(reviews.len(), 500);
        let sizes: Vec<_> = calls.iter().map(|(s, _)| *s).collect();
        assert_eq!(sizes, vec![199, 199, 102]);
        let tokens: Vec<_> = calls.iter().map(|(_, t)| t.as_deref()).collect();
        assert_eq!(tokens, vec![None, Some("t1"), Some("t2")]);
    }

    #[test]
    fn oversized_page_is_truncated_to_target() {
        let mut calls = 0;
        let reviews = collect_pages(10, |_, _| {
            calls += 1;
            Ok(full_page(25, "more"))
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(reviews.len(), 10);
        assert_eq!(reviews[9].author, "user9");
    }

    #[test]
    fn empty_page_stops_paging() {
        let mut calls = 0;
        let reviews = collect_pages(400, |size, _| {
            calls += 1;
            if calls == 1 {
                Ok(full_page(size, "next"))
            } else {
                Ok(ReviewPage {
                    reviews: Vec::new(),
                    next_token: Some("ignored".to_string()),
                })
            }
        })
        .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(reviews.len(), 199);
    }

    #[test]
    fn missing_token_stops_paging() {
        let mut calls = 0;
        let reviews = collect_pages(1000, |_, _| {
            calls += 1;
            Ok(ReviewPage {
                reviews: canned_reviews(50),
                next_token: None,
            })
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(reviews.len(), 50);
    }

    #[test]
    fn page_error_propagates() {
        let result = collect_pages(10, |_, _| anyhow::bail!("timed out"));
        assert!(result.unwrap_err().to_string().contains("timed out"));
    }

    struct Failing;

    impl ReviewSource for Failing {
        fn fetch(&self, _request: &FetchRequest) -> Result<Vec<Review>> {
            anyhow::bail!("connection refused")
        }
    }

    #[test]
    fn boundary_reports_failure_reason() {
        let request = FetchRequest::new("com.maxstream", Language::Indonesian, 10, SortOrder::Newest);
        let err = fetch_reviews(&Failing, &request).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("com.maxstream"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn boundary_rejects_invalid_count_before_fetching() {
        let request = FetchRequest::new("com.maxstream", Language::Indonesian, 0, SortOrder::Newest);
        let err = fetch_reviews(&Failing, &request).unwrap_err();
        assert!(err.to_string().contains("between 1 and 5000"));
    }
}
