mod common;

use axum::http::StatusCode;
use common::{app, book, delete, get, json, send};
use serde_json::json;

#[tokio::test]
async fn create_then_get_by_title() {
    let app = app();

    let (status, created) = send(&app, json("POST", "/books", &book("The Dispossessed", 1974))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, book("The Dispossessed", 1974));

    let (status, fetched) = send(&app, get("/books/The%20Dispossessed")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, book("The Dispossessed", 1974));
}

#[tokio::test]
async fn collection_is_served_with_and_without_trailing_slash() {
    let app = app();

    let (status, _) = send(&app, json("POST", "/books/", &book("Always Coming Home", 1985))).await;
    assert_eq!(status, StatusCode::CREATED);

    for uri in ["/books", "/books/"] {
        let (status, books) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "uri {uri}");
        assert_eq!(books, json!([book("Always Coming Home", 1985)]), "uri {uri}");
    }
}

#[tokio::test]
async fn list_returns_everything_in_insertion_order() {
    let app = app();
    for title in ["Lathe", "Earthsea", "Lathe"] {
        send(&app, json("POST", "/books", &book(title, 1971))).await;
    }

    let (status, books) = send(&app, get("/books")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Lathe", "Earthsea", "Lathe"]);
}

#[tokio::test]
async fn invalid_book_is_rejected_and_nothing_is_stored() {
    let app = app();

    let mut bad = book("", 1899);
    bad["rating"] = json!(6);
    let (status, body) = send(&app, json("POST", "/books", &bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let fields: Vec<_> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["published_year", "rating", "title"]);

    let (_, books) = send(&app, get("/books")).await;
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn missing_fields_and_broken_json_are_unprocessable() {
    let app = app();

    let (status, _) = send(&app, json("POST", "/books", &json!({ "title": "Only a title" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut fractional = book("Half", 2001);
    fractional["rating"] = json!(3.5);
    let (status, _) = send(&app, json("POST", "/books", &fractional)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_unknown_title_is_not_found() {
    let app = app();
    send(&app, json("POST", "/books", &book("Known", 2001))).await;

    let (status, body) = send(&app, get("/books/Unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Book not found");
}

#[tokio::test]
async fn get_finds_books_beyond_the_first() {
    let app = app();
    send(&app, json("POST", "/books", &book("First", 2001))).await;
    send(&app, json("POST", "/books", &book("Second", 2002))).await;

    let (status, body) = send(&app, get("/books/Second")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["published_year"], 2002);
}

#[tokio::test]
async fn update_replaces_the_whole_record() {
    let app = app();
    send(&app, json("POST", "/books", &book("First", 2001))).await;
    send(&app, json("POST", "/books", &book("Second", 2002))).await;

    let replacement = json!({
        "title": "Second Edition",
        "author": "Someone Else",
        "description": "Entirely new text.",
        "rating": 2,
        "published_year": 2020,
    });
    let (status, body) = send(&app, json("PUT", "/books/Second", &replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, replacement);

    let (_, books) = send(&app, get("/books")).await;
    assert_eq!(books, json!([book("First", 2001), replacement]));
}

#[tokio::test]
async fn update_unknown_title_changes_nothing() {
    let app = app();
    send(&app, json("POST", "/books", &book("First", 2001))).await;

    let (status, _) = send(&app, json("PUT", "/books/Ghost", &book("Ghost", 2001))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, books) = send(&app, get("/books")).await;
    assert_eq!(books, json!([book("First", 2001)]));
}

#[tokio::test]
async fn update_with_invalid_payload_is_unprocessable() {
    let app = app();
    send(&app, json("POST", "/books", &book("First", 2001))).await;

    let (status, _) = send(&app, json("PUT", "/books/First", &book("First", 2026))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, stored) = send(&app, get("/books/First")).await;
    assert_eq!(stored, book("First", 2001));
}

#[tokio::test]
async fn delete_removes_one_matching_record() {
    let app = app();
    send(&app, json("POST", "/books", &book("Twin", 2001))).await;
    send(&app, json("POST", "/books", &book("Twin", 2002))).await;

    let (status, body) = send(&app, delete("/books/Twin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted successfully" }));

    let (_, books) = send(&app, get("/books")).await;
    assert_eq!(books, json!([book("Twin", 2002)]));
}

#[tokio::test]
async fn delete_unknown_title_keeps_collection() {
    let app = app();
    send(&app, json("POST", "/books", &book("Only", 2001))).await;

    let (status, body) = send(&app, delete("/books/Nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (_, books) = send(&app, get("/books")).await;
    assert_eq!(books.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn filtered_listing_applies_year_and_limit() {
    let app = app();
    for year in [2005, 2012, 2015, 2020] {
        send(&app, json("POST", "/books", &book(&format!("Year {year}"), year))).await;
    }

    let (status, body) = send(&app, get("/?limit=2&published_after=2010")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([book("Year 2012", 2012), book("Year 2015", 2015)]));
}

#[tokio::test]
async fn filtered_listing_defaults_to_books_from_2000() {
    let app = app();
    for year in [1999, 2000, 2001] {
        send(&app, json("POST", "/books", &book(&format!("Year {year}"), year))).await;
    }

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([book("Year 2000", 2000), book("Year 2001", 2001)]));
}

#[tokio::test]
async fn filtered_listing_rejects_out_of_range_query() {
    let app = app();

    for uri in [
        "/?limit=0",
        "/?limit=101",
        "/?published_after=1899",
        "/?published_after=2026",
        "/?limit=ten",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "uri {uri}");
        assert_eq!(body["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app();

    let (status, body) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));

    let (status, spec) = send(&app, get("/docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/books/{title}"]["put"].is_object());
    assert!(spec["paths"]["/login"]["post"].is_object());
    assert!(spec["components"]["schemas"]["Book"].is_object());
}
