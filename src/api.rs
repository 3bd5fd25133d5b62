//! # API Server Module
//!
//! ## Purpose
//! REST boundary between the analysis core and the excluded extraction/
//! presentation layer. The extraction layer posts plain text in; structured
//! analysis results come back.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with document text and optional provenance
//! - **Output**: JSON responses with analysis outcomes, summaries, system
//!   status
//! - **Endpoints**: Analyze, summarize, health, stats
//!
//! ## Key Features
//! - CORS support for browser-extension frontends
//! - Structured error responses; a degraded analysis is still a 200 with
//!   its outcome encoded, matching the orchestrator contract
//! - Dictionary statistics for monitoring

use crate::analyzer::{AnalysisOutcome, Trigger};
use crate::errors::{AnalysisError, Result};
use crate::utils::ValidationUtils;
use crate::{Document, TosSummary};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// Application state wrapper for the API server
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Analyze request payload
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub url: Option<String>,
    pub title: Option<String>,
    /// Treat the request as an automatic detection attempt rather than a
    /// user-triggered one
    #[serde(default)]
    pub automatic: bool,
}

/// Analyze response payload
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub outcome: AnalysisOutcome,
    pub elapsed_ms: u64,
}

/// Summarize request payload
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

/// Summarize response payload
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: TosSummary,
    pub elapsed_ms: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub components: HealthComponents,
}

/// Component health status
#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub analyzer: String,
    pub dictionary: String,
}

impl ApiServer {
    /// Create new API server
    pub async fn new(app_state: crate::AppState) -> Result<Self> {
        Ok(Self { app_state })
    }

    /// Run the API server
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;

        tracing::info!("Starting API server on {}", bind_addr);

        let server = HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };
            App::new()
                .wrap(cors)
                .app_data(web::Data::new(self.app_state.clone()))
                .route("/analyze", web::post().to(analyze_handler))
                .route("/summarize", web::post().to(summarize_handler))
                .route("/health", web::get().to(health_handler))
                .route("/stats", web::get().to(stats_handler))
                .route("/", web::get().to(index_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| AnalysisError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?;

        server
            .run()
            .await
            .map_err(|e| AnalysisError::Internal {
                message: format!("Server error: {}", e),
            })?;

        Ok(())
    }
}

/// Analyze endpoint handler
async fn analyze_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<AnalyzeRequest>,
) -> ActixResult<HttpResponse> {
    let start_time = std::time::Instant::now();
    let request = request.into_inner();

    if !ValidationUtils::is_valid_analysis_text(
        &request.text,
        app_state.config.analysis.max_text_length,
    ) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid or empty text provided",
        })));
    }

    let document = Document::with_provenance(request.text, request.url, request.title);
    let trigger = if request.automatic {
        Trigger::Automatic
    } else {
        Trigger::Manual
    };

    match app_state.analyzer.analyze(document, trigger).await {
        Ok(outcome) => {
            let response = AnalyzeResponse {
                outcome,
                elapsed_ms: start_time.elapsed().as_millis() as u64,
            };
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            tracing::error!("Analysis error: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Analysis failed",
                "message": e.to_string(),
            })))
        }
    }
}

/// Summarize endpoint handler
async fn summarize_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<SummarizeRequest>,
) -> ActixResult<HttpResponse> {
    let start_time = std::time::Instant::now();
    let summary = app_state.summarizer.summarize(&request.text);

    Ok(HttpResponse::Ok().json(SummarizeResponse {
        summary,
        elapsed_ms: start_time.elapsed().as_millis() as u64,
    }))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let dictionary_stats = app_state.analyzer.dictionary().stats();
    // The service tolerates absent corpora; surface it so operators notice.
    let dictionary_status =
        if dictionary_stats.courts_glossary_entries + dictionary_stats.legal_dictionary_entries > 0
        {
            "healthy"
        } else {
            "no corpora loaded"
        };

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: HealthComponents {
            analyzer: "healthy".to_string(),
            dictionary: dictionary_status.to_string(),
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let dictionary_stats = app_state.analyzer.dictionary().stats();

    let response = serde_json::json!({
        "dictionary": dictionary_stats,
        "detection": {
            "auto_grade_threshold": app_state.config.detection.auto_grade_threshold,
            "notify_threshold": app_state.config.detection.notify_threshold,
        },
    });

    Ok(HttpResponse::Ok().json(response))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Terms Guardian Analysis Engine</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .header { color: #2c3e50; }
            .endpoint { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1 class="header">Terms Guardian Analysis API</h1>
        <p>Post Terms of Service text and get back a readability grade, a rights-favorability score and uncommon legal terms with definitions. Educational use only; not legal advice.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">POST</span> /analyze
            <p>Analyze document text: readability, rights score, uncommon terms.</p>
        </div>

        <div class="endpoint">
            <span class="method">POST</span> /summarize
            <p>Produce a section-level summary of the document.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /health
            <p>Check the health status of all system components.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /stats
            <p>Get dictionary and gating statistics.</p>
        </div>

        <h2>Example Analyze Request</h2>
        <pre>{
  "text": "These terms of service limit our liability...",
  "url": "https://example.com/terms"
}</pre>
    </body>
    </html>
    "#;

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}
