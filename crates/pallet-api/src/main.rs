use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pallet_core::{PackError, PackRequest, PackResult, Packer};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Pallet Packer API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Pallet Packer API");

    // Build application
    let app = Router::new()
        .route("/", get(serve_ui))
        .route("/api/health", get(health_check))
        .route("/api/pack", post(pack))
        .route("/api/generate/svg", post(generate_svg))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind to port 3000");

    info!("API server listening on http://0.0.0.0:3000");
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app).await.expect("Server error");
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "pallet-packer-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main packing endpoint
async fn pack(Json(request): Json<PackRequest>) -> Result<Json<PackResult>, AppError> {
    info!(
        "Received pack request with {} catalog lines",
        request.items.len()
    );

    let packer = Packer::new(request)?;
    let result = packer.pack()?;

    info!(
        "Packing complete: {} pallets, {} units placed, {} rejected",
        result.summary.total_pallets, result.summary.placed_units, result.summary.rejected_units
    );

    Ok(Json(result))
}

/// Generate SVG visualization
async fn generate_svg(Json(result): Json<PackResult>) -> Result<Response, AppError> {
    info!("Generating SVG for {} pallets", result.layouts.len());

    let svg = generate_svg_content(&result)?;

    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

/// Renders a top-down view of every pallet (x = width, y = depth);
/// stacked units are painted floor first so they overlay correctly.
fn generate_svg_content(result: &PackResult) -> Result<String, AppError> {
    use std::fmt::Write;

    let mut svg = String::new();
    let margin = 20.0;
    let scale = 2.0; // Scale down pallets to fit in SVG
    let pallet_spacing = 40.0;

    let pallet = &result.pallet;
    let total_depth: f64 = result.layouts.len() as f64 * (pallet.depth + pallet_spacing);

    let svg_width = (pallet.width / scale) + (2.0 * margin);
    let svg_height = (total_depth / scale) + (2.0 * margin);

    // SVG header
    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )
    .unwrap();

    // Background
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )
    .unwrap();

    let mut y_offset = margin;

    for layout in &result.layouts {
        let x = margin;
        let pallet_width = pallet.width / scale;
        let pallet_depth = pallet.depth / scale;

        // Draw pallet outline
        writeln!(&mut svg, r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff" stroke="#333" stroke-width="2"/>"##,
                 x, y_offset, pallet_width, pallet_depth).unwrap();

        // Draw pallet label
        writeln!(&mut svg, r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">Pallet #{} ({:.0} kg)</text>"##,
                 x, y_offset - 5.0, layout.pallet_number, layout.placed_weight).unwrap();

        // Draw placements, lowest first
        let mut stacked: Vec<_> = layout.placements.iter().collect();
        stacked.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

        for placement in stacked {
            let px = x + (placement.x / scale);
            let py = y_offset + (placement.z / scale);
            let pw = placement.width / scale;
            let pd = placement.depth / scale;

            // Draw unit rectangle
            writeln!(&mut svg, r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#4CAF50" stroke="#2E7D32" stroke-width="1" opacity="0.7"/>"##,
                     px, py, pw, pd).unwrap();

            // Draw unit label
            writeln!(&mut svg, r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#fff" text-anchor="middle">{}</text>"##,
                     px + pw / 2.0, py + pd / 2.0 + 3.0, placement.item_name).unwrap();
        }

        y_offset += pallet_depth + pallet_spacing;
    }

    // Summary
    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">"##,
        margin,
        svg_height - margin + 15.0
    )
    .unwrap();
    writeln!(
        &mut svg,
        r#"    Pallets: {} | Utilization: {:.1}%"#,
        result.summary.total_pallets, result.summary.volume_utilization_percentage
    )
    .unwrap();
    writeln!(&mut svg, r#"  </text>"#).unwrap();

    writeln!(&mut svg, "</svg>").unwrap();

    Ok(svg)
}

/// Application error type
struct AppError(anyhow::Error);

impl From<PackError> for AppError {
    fn from(err: PackError) -> Self {
        AppError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let status = match self.0.downcast_ref::<PackError>() {
            Some(PackError::EmptyOrder) | Some(PackError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

async fn serve_ui() -> impl IntoResponse {
    // Read the UI file
    match std::fs::read_to_string("web/index.html") {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <title>Pallet Packer</title>
            </head>
            <body>
                <h1>Pallet Packer API</h1>
                <p>Web UI file not found. Please ensure web/index.html exists.</p>
                <h2>API Endpoints:</h2>
                <ul>
                    <li>GET /api/health - Health check</li>
                    <li>POST /api/pack - Pack an order onto pallets</li>
                    <li>POST /api/generate/svg - Generate SVG visualization</li>
                </ul>
            </body>
            </html>
        "#
            .to_string(),
        ),
    }
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
