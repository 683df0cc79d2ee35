use api_state::ApiState;
use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use routes::{
    exam::{evaluate_exam, generate_paper},
    liveness::live,
    readiness::ready,
    vectorstore::{
        delete_all_chunks, delete_chunks, get_chunk, get_chunks, search_chunks, vectorize_pdf,
    },
};

pub mod api_state;
pub mod error;
mod routes;

/// Router for API functionality, version 1
pub fn api_routes_v1<S>(_app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Probe endpoints (for k8s/systemd probes)
    let probes = Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live));

    let vectorstore = Router::new()
        .route("/vectorize-pdf", post(vectorize_pdf))
        .route("/get-chunk/{chunk_id}", get(get_chunk))
        .route("/delete-chunks", delete(delete_chunks))
        .route("/delete-all-chunks", delete(delete_all_chunks))
        .route("/chunks", get(get_chunks))
        .route("/search-chunks", post(search_chunks));

    let exam = Router::new()
        .route("/generate-paper", post(generate_paper))
        .route("/evaluate-exam", post(evaluate_exam));

    probes.merge(vectorstore).merge(exam)
}
