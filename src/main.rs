use applicantbuddy::{
    api::{self, AppState},
    config,
    embedding::HashEmbeddingClient,
    llm::{ChatClient, LlmFieldExtractor, LlmSummarizer},
    logging,
    metrics::IntakeMetrics,
    ocr::OcrClient,
    processing::{IndexingService, ResumePipeline},
    queue::ResumeQueue,
    resume::InMemoryResumeStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    config::init_config();
    logging::init_tracing();
    let config = config::get_config();

    let embedding = Box::new(HashEmbeddingClient::new(config.embedding_dimension));
    let index = Arc::new(
        IndexingService::connect(embedding)
            .await
            .expect("Failed to connect to Qdrant"),
    );
    let extractor = Arc::new(OcrClient::from_config().expect("Failed to build OCR client"));
    let summarizer = Arc::new(LlmSummarizer::new(
        ChatClient::from_config().expect("Failed to build chat client"),
    ));
    let fields = Arc::new(LlmFieldExtractor::new(
        ChatClient::from_config().expect("Failed to build chat client"),
    ));
    let store = Arc::new(InMemoryResumeStore::new());
    let metrics = Arc::new(IntakeMetrics::new());

    let pipeline = Arc::new(ResumePipeline::new(
        store.clone(),
        extractor,
        summarizer,
        fields,
        index.clone(),
        metrics.clone(),
    ));
    let queue = Arc::new(ResumeQueue::start(pipeline, config.worker_count));

    let app = api::create_router(AppState {
        store,
        index,
        queue,
        metrics,
        storage_dir: config.storage_dir.clone(),
    });

    let (listener, port) = bind_listener().await.expect("Failed to bind listener");
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.unwrap();
}

async fn bind_listener() -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    let config = config::get_config();
    if let Some(port) = config.server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 8000..=8099;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 8000-8099",
    ))
}
