use poem::{handler, IntoResponse};

const CACHE_CONTROL: &str = "public, max-age=3600";

#[handler]
pub async fn get_graph_js() -> impl IntoResponse {
    include_bytes!("static/graph.js")
        .with_content_type("application/javascript")
        .with_header("Cache-Control", CACHE_CONTROL)
}
