//! HTTP implementation of the library client
//!
//! Uses reqwest against the library web application's JSON endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Serialize};

use super::LibraryApi;
use crate::{
    config::{ClientConfig, ServerConfig},
    error::{DeskError, DeskResult},
    models::{
        ActionReply, Book, BookUpdate, IssueLoanForm, Member, MemberUpdate, OverdueTransaction,
    },
};

#[derive(Clone)]
pub struct HttpLibraryClient {
    http: Client,
    base_url: Url,
}

impl HttpLibraryClient {
    pub fn new(server: &ServerConfig, client: &ClientConfig) -> DeskResult<Self> {
        // A trailing slash keeps `join` from dropping the last path segment
        let mut base = server.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| {
            DeskError::Validation(format!("Invalid server URL {}: {}", server.base_url, e))
        })?;

        let mut builder = Client::builder().user_agent(client.user_agent.clone());
        if client.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(client.timeout_secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> DeskResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| DeskError::Validation(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> DeskResult<T> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        parse_json(response).await
    }

    async fn post_form<F: Serialize + ?Sized>(&self, path: &str, form: &F) -> DeskResult<Response> {
        let url = self.url(path)?;
        tracing::debug!("POST {}", url);
        let response = self.http.post(url).form(form).send().await?;
        ensure_success(response).await
    }
}

async fn ensure_success(response: Response) -> DeskResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Server responded with {}: {}", status, body);
    Err(DeskError::HttpStatus { status, body })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> DeskResult<T> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!("Could not parse server response: {}", e);
        DeskError::MalformedResponse(e.to_string())
    })
}

#[async_trait]
impl LibraryApi for HttpLibraryClient {
    async fn search_books(&self, term: &str) -> DeskResult<Vec<Book>> {
        let mut url = self.url("books/search")?;
        url.query_pairs_mut().append_pair("q", term);
        tracing::debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        let books: Vec<Book> = parse_json(response).await?;
        tracing::info!("Search for {:?} returned {} books", term, books.len());
        Ok(books)
    }

    async fn return_loan(&self, transaction_id: i64) -> DeskResult<String> {
        let reply: ActionReply = self
            .get_json(&format!("transactions/return/{}", transaction_id))
            .await?;
        reply.into_result()
    }

    async fn issue_loan(&self, form: &IssueLoanForm) -> DeskResult<String> {
        let response = self.post_form("transactions/issue", form).await?;
        let reply: ActionReply = parse_json(response).await?;
        reply.into_result()
    }

    async fn list_overdue(&self) -> DeskResult<Vec<OverdueTransaction>> {
        self.get_json("transactions/overdue").await
    }

    async fn fetch_book(&self, id: i64) -> DeskResult<Book> {
        self.get_json(&format!("books/{}/json", id)).await
    }

    async fn fetch_member(&self, id: i64) -> DeskResult<Member> {
        self.get_json(&format!("members/{}/json", id)).await
    }

    async fn update_book(&self, id: i64, update: &BookUpdate) -> DeskResult<()> {
        // The server answers with a redirect to the catalog page, followed by reqwest
        self.post_form(&format!("books/update/{}", id), update).await?;
        tracing::info!("Book {} updated", id);
        Ok(())
    }

    async fn update_member(&self, id: i64, update: &MemberUpdate) -> DeskResult<()> {
        self.post_form(&format!("members/update/{}", id), update).await?;
        tracing::info!("Member {} updated", id);
        Ok(())
    }
}
