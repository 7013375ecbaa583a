//! Static greeting pages.

pub async fn index() -> &'static str {
    "Hello, World!"
}

pub async fn test_page() -> &'static str {
    "Test page"
}
