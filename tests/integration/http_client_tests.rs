//! HTTP client tests against a stub library server

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;

use elidune_desk::{
    client::{HttpLibraryClient, LibraryApi},
    config::{ClientConfig, ServerConfig},
    models::{BookUpdate, IssueLoanForm, MemberStatus, MemberUpdate},
    DeskError,
};

type Posted = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn search(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let books = if params.get("q").map(String::as_str) == Some("science fiction") {
        json!([
            {"id": 1, "title": "Dune", "author": "Frank Herbert", "isbn": "9780441013593",
             "publisher": "Ace", "publication_year": 1965, "category": "Fiction",
             "total_copies": 3, "available_copies": 1},
            {"id": 2, "title": "Solaris", "author": "Stanisław Lem", "isbn": "9780156027601",
             "publisher": null, "publication_year": null, "category": null,
             "total_copies": 1, "available_copies": 0}
        ])
    } else {
        json!([])
    };
    Json(books)
}

async fn return_loan(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 1 {
        Json(json!({"success": true, "message": "Book returned successfully"}))
    } else {
        Json(json!({"success": false, "message": "Transaction not found"}))
    }
}

async fn issue(
    State(posted): State<Posted>,
    Form(fields): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let message = format!(
        "Book {} issued to member {}",
        fields.get("book_id").cloned().unwrap_or_default(),
        fields.get("member_id").cloned().unwrap_or_default()
    );
    posted.lock().unwrap().push(("issue".to_string(), fields));
    Json(json!({"success": true, "message": message}))
}

async fn overdue() -> impl IntoResponse {
    Json(json!([
        {"book_title": "Dune", "due_date": "Thu, 01 Oct 2026 00:00:00 GMT", "days_overdue": 16}
    ]))
}

async fn book(Path(id): Path<i64>) -> axum::response::Response {
    match id {
        404 => (StatusCode::NOT_FOUND, "Book not found").into_response(),
        500 => "<html>Internal error page</html>".into_response(),
        _ => Json(json!({
            "id": id, "title": "Dune", "author": "Frank Herbert", "isbn": "9780441013593",
            "publisher": "Ace", "publication_year": 1965, "category": "Fiction",
            "total_copies": 3, "available_copies": 1
        }))
        .into_response(),
    }
}

async fn member(Path(id): Path<i64>) -> impl IntoResponse {
    Json(json!({
        "id": id, "name": "Ada Lovelace", "email": "ada@example.org", "phone": null,
        "status": "active", "membership_date": "Thu, 01 Feb 2024 00:00:00 GMT"
    }))
}

async fn update_book(
    State(posted): State<Posted>,
    Path(id): Path<i64>,
    Form(fields): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    posted.lock().unwrap().push((format!("book {}", id), fields));
    Redirect::to("/books")
}

async fn update_member(
    State(posted): State<Posted>,
    Path(id): Path<i64>,
    Form(fields): Form<HashMap<String, String>>,
) -> axum::response::Response {
    if id == 13 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    posted.lock().unwrap().push((format!("member {}", id), fields));
    Redirect::to("/members").into_response()
}

async fn start_server() -> (HttpLibraryClient, Posted) {
    let posted: Posted = Arc::default();

    let app = Router::new()
        .route("/books", get(|| async { "<html>Books</html>" }))
        .route("/members", get(|| async { "<html>Members</html>" }))
        .route("/books/search", get(search))
        .route("/books/:id/json", get(book))
        .route("/books/update/:id", post(update_book))
        .route("/members/:id/json", get(member))
        .route("/members/update/:id", post(update_member))
        .route("/transactions/return/:id", get(return_loan))
        .route("/transactions/issue", post(issue))
        .route("/transactions/overdue", get(overdue))
        .with_state(posted.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = HttpLibraryClient::new(
        &ServerConfig {
            base_url: format!("http://{}/", addr),
        },
        &ClientConfig::default(),
    )
    .expect("Failed to create client");

    (client, posted)
}

#[tokio::test]
async fn test_search_encodes_term() {
    let (client, _) = start_server().await;

    let books = client.search_books("science fiction").await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, "Dune");
    assert_eq!(books[1].publisher, None);

    assert!(client.search_books("poetry").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_return_loan_outcomes() {
    let (client, _) = start_server().await;

    assert_eq!(
        client.return_loan(1).await.unwrap(),
        "Book returned successfully"
    );

    match client.return_loan(2).await {
        Err(DeskError::ServerReported(msg)) => assert_eq!(msg, "Transaction not found"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_posts_form_fields() {
    let (client, posted) = start_server().await;

    let form = IssueLoanForm::new("1", "9").with_days(21);
    let message = client.issue_loan(&form).await.unwrap();
    assert_eq!(message, "Book 1 issued to member 9");

    let posted = posted.lock().unwrap();
    let (_, fields) = &posted[0];
    assert_eq!(fields.get("days").map(String::as_str), Some("21"));
    assert!(!fields.contains_key("due_date"));
}

#[tokio::test]
async fn test_overdue_and_records() {
    let (client, _) = start_server().await;

    let overdue = client.list_overdue().await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].days_overdue, 16);
    assert_eq!(
        overdue[0].due_date,
        chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    );

    let book = client.fetch_book(7).await.unwrap();
    assert_eq!(book.id, 7);
    assert_eq!((book.total_copies, book.available_copies), (3, 1));

    let member = client.fetch_member(9).await.unwrap();
    assert_eq!(member.status, MemberStatus::Active);
    assert_eq!(
        member.membership_date,
        chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    );
}

#[tokio::test]
async fn test_failure_kinds_are_distinguished() {
    let (client, _) = start_server().await;

    match client.fetch_book(404).await {
        Err(DeskError::HttpStatus { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "Book not found");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(matches!(
        client.fetch_book(500).await,
        Err(DeskError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_network_failure() {
    // Nothing listens on this port once the listener is dropped
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpLibraryClient::new(
        &ServerConfig {
            base_url: format!("http://{}", addr),
        },
        &ClientConfig::default(),
    )
    .unwrap();

    let err = client.list_overdue().await.unwrap_err();
    assert!(matches!(err, DeskError::Network(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_updates_follow_redirect() {
    let (client, posted) = start_server().await;

    let update = BookUpdate {
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        isbn: "9780441013593".to_string(),
        publisher: "Ace".to_string(),
        publication_year: "1965".to_string(),
        category: String::new(),
        total_copies: 5,
        available_copies: 3,
    };
    client.update_book(7, &update).await.unwrap();

    let member_update = MemberUpdate {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.org".to_string(),
        phone: String::new(),
        status: MemberStatus::Suspended,
    };
    client.update_member(9, &member_update).await.unwrap();

    assert!(matches!(
        client.update_member(13, &member_update).await,
        Err(DeskError::HttpStatus { .. })
    ));

    let posted = posted.lock().unwrap();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].0, "book 7");
    assert_eq!(posted[0].1.get("total_copies").map(String::as_str), Some("5"));
    assert_eq!(posted[0].1.get("available_copies").map(String::as_str), Some("3"));
    assert_eq!(posted[1].1.get("status").map(String::as_str), Some("suspended"));
}
