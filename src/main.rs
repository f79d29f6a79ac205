use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use polymer_select::config::AppConfig;
use polymer_select::error::AppError;
use polymer_select::telemetry;
use polymer_select::workflows::blends::domain::{BlendRecord, OptimizationCategory};
use polymer_select::workflows::blends::{
    blend_insight_request, find_blends, BlendCatalogImporter, InsightRequest,
};
use polymer_select::workflows::feedback::{
    FeedbackSink, FeedbackSubmission, LogFeedbackSink, MaterialFeedback, SessionSurvey,
};
use polymer_select::workflows::selection::domain::MaterialRecord;
use polymer_select::workflows::selection::{
    AttributeRange, ConstraintSet, EvaluationResult, MaterialCatalogImporter, RankingEngine,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    config: Arc<AppConfig>,
    feedback: Arc<dyn FeedbackSink>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Biopolymer Selection Service",
    about = "Rank biopolymer film grades and surface blend insights from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank a material catalog against performance, cost, and sustainability constraints
    Rank(RankArgs),
    /// Look up blend recommendations for a base polymer and optimization category
    Blends(BlendsArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// Material catalog CSV (defaults to the configured path)
    #[arg(long)]
    materials_csv: Option<PathBuf>,
    /// Estimated cost window, USD/kg
    #[arg(long, default_value_t = 1.0)]
    cost_min: f64,
    #[arg(long, default_value_t = 10.0)]
    cost_max: f64,
    /// Tensile strength window, MPa
    #[arg(long, default_value_t = 20.0)]
    tensile_min: f64,
    #[arg(long, default_value_t = 100.0)]
    tensile_max: f64,
    /// Elongation at break window, %
    #[arg(long, default_value_t = 100.0)]
    elongation_min: f64,
    #[arg(long, default_value_t = 600.0)]
    elongation_max: f64,
    /// WVTR window applied at both thickness conditions, g/m²·day
    #[arg(long, default_value_t = 1.0)]
    wvtr_min: f64,
    #[arg(long, default_value_t = 10.0)]
    wvtr_max: f64,
    /// Biobased content window, %
    #[arg(long, default_value_t = 0.0)]
    bbc_min: f64,
    #[arg(long, default_value_t = 100.0)]
    bbc_max: f64,
    /// Required compostability certification (repeatable)
    #[arg(long = "cert")]
    certifications: Vec<String>,
    /// Only pass records marketed for this region
    #[arg(long)]
    region: Option<String>,
    /// Print every criterion check, not just the score line
    #[arg(long)]
    show_checks: bool,
}

#[derive(Args, Debug)]
struct BlendsArgs {
    /// Blend catalog CSV (defaults to the configured path)
    #[arg(long)]
    blends_csv: Option<PathBuf>,
    /// Base polymer to look up, e.g. PLA
    #[arg(long)]
    base_polymer: String,
    /// Optimization category code or name (MECH, THERM, BARRIER, COMPAT, BIO, PROC, COST)
    #[arg(long, value_parser = parse_category)]
    category: OptimizationCategory,
    /// Print the text-completion prompt for each match
    #[arg(long)]
    show_prompts: bool,
}

#[derive(Debug, Deserialize)]
struct RankRequest {
    constraints: ConstraintSet,
    #[serde(default)]
    materials_csv: Option<String>,
}

#[derive(Debug, Serialize)]
struct RankResponse {
    data_source: CatalogSource,
    total: usize,
    results: Vec<EvaluationResult>,
}

#[derive(Debug, Deserialize)]
struct BlendLookupRequest {
    base_polymer: String,
    category: OptimizationCategory,
    #[serde(default)]
    blends_csv: Option<String>,
    #[serde(default)]
    include_insight_prompts: bool,
}

#[derive(Debug, Serialize)]
struct BlendLookupResponse {
    data_source: CatalogSource,
    base_polymer: String,
    category: OptimizationCategory,
    category_label: &'static str,
    total: usize,
    matches: Vec<BlendMatchView>,
}

#[derive(Debug, Serialize)]
struct BlendMatchView {
    #[serde(flatten)]
    record: BlendRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    insight_prompt: Option<InsightRequest>,
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    #[serde(default)]
    user: Option<String>,
    survey: SessionSurvey,
    #[serde(default)]
    material_feedback: Vec<MaterialFeedback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CatalogSource {
    Inline,
    Configured,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Blends(args) => run_blends(args),
    }
}

fn parse_category(raw: &str) -> Result<OptimizationCategory, String> {
    OptimizationCategory::from_code(raw).ok_or_else(|| {
        format!(
            "unknown optimization category '{raw}'; expected one of {}",
            OptimizationCategory::ordered()
                .map(|category| category.code())
                .join(", ")
        )
    })
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        config: Arc::new(config.clone()),
        feedback: Arc::new(LogFeedbackSink),
    };

    let app = build_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "biopolymer selection service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/selection/rank", post(rank_endpoint))
        .route("/api/v1/blends/lookup", post(blend_lookup_endpoint))
        .route("/api/v1/feedback", post(feedback_endpoint))
        .with_state(state)
}

fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let constraints = ConstraintSet {
        cost: AttributeRange::new(args.cost_min, args.cost_max),
        tensile_strength: AttributeRange::new(args.tensile_min, args.tensile_max),
        elongation_at_break: AttributeRange::new(args.elongation_min, args.elongation_max),
        wvtr: AttributeRange::new(args.wvtr_min, args.wvtr_max),
        biobased_content: AttributeRange::new(args.bbc_min, args.bbc_max),
        required_certifications: args.certifications.into_iter().collect::<BTreeSet<_>>(),
        region: args.region,
    };

    let config = AppConfig::load()?;
    let path = args
        .materials_csv
        .unwrap_or(config.catalog.materials_path);
    let catalog = MaterialCatalogImporter::from_path(&path)?;

    let engine = RankingEngine::new(constraints);
    let results = engine.rank(&catalog);
    render_ranking(&results, &path, args.show_checks);

    Ok(())
}

fn run_blends(args: BlendsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.blends_csv.unwrap_or(config.catalog.blends_path);
    let records = BlendCatalogImporter::from_path(&path)?;

    let matches = find_blends(&records, &args.base_polymer, args.category);

    println!(
        "Blend recommendations for {} ({})",
        args.base_polymer,
        args.category.label()
    );

    if matches.is_empty() {
        println!("No blend insights found for this polymer and category.");
        return Ok(());
    }

    for record in matches {
        println!("\n- {} + {}", record.base_polymer, record.ingredient);
        if let Some(effect) = &record.positive_effect {
            println!("  Positive effect: {effect}");
        }
        if let Some(effect) = &record.negative_effect {
            println!("  Negative effect: {effect}");
        }
        if let Some(compatibility) = &record.compatibility_type {
            println!("  Compatibility: {compatibility}");
        }
        if let Some(weight) = &record.recommended_weight_pct {
            println!("  Recommended wt%: {weight}");
        }
        if let Some(reference) = &record.reference {
            println!("  Reference: {reference}");
        }

        if args.show_prompts {
            let request = blend_insight_request(record, args.category);
            println!("  Insight prompt: {}", request.prompt);
        }
    }

    Ok(())
}

fn render_ranking(results: &[EvaluationResult], path: &std::path::Path, show_checks: bool) {
    println!("Ranked materials ({} records from {})", results.len(), path.display());

    if results.is_empty() {
        println!("No records matched the catalog.");
        return;
    }

    for result in results {
        let record: &MaterialRecord = &result.record;
        println!(
            "- {} {} [{}] score {}/{}",
            record.category,
            record.grade,
            record.class.label(),
            result.score,
            result.checks.len()
        );

        if show_checks {
            for check in &result.checks {
                let status = if check.passed { "pass" } else { "fail" };
                println!("    {status} {}: {}", check.criterion.label(), check.notes);
            }
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn rank_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let RankRequest {
        constraints,
        materials_csv,
    } = payload;

    let (catalog, data_source) = match materials_csv {
        Some(csv) => {
            let records = MaterialCatalogImporter::from_reader(Cursor::new(csv.into_bytes()))?;
            (records, CatalogSource::Inline)
        }
        None => {
            let records =
                MaterialCatalogImporter::from_path(&state.config.catalog.materials_path)?;
            (records, CatalogSource::Configured)
        }
    };

    let engine = RankingEngine::new(constraints);
    let results = engine.rank(&catalog);

    Ok(Json(RankResponse {
        data_source,
        total: results.len(),
        results,
    }))
}

async fn blend_lookup_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<BlendLookupRequest>,
) -> Result<Json<BlendLookupResponse>, AppError> {
    let BlendLookupRequest {
        base_polymer,
        category,
        blends_csv,
        include_insight_prompts,
    } = payload;

    let (records, data_source) = match blends_csv {
        Some(csv) => {
            let records = BlendCatalogImporter::from_reader(Cursor::new(csv.into_bytes()))?;
            (records, CatalogSource::Inline)
        }
        None => {
            let records = BlendCatalogImporter::from_path(&state.config.catalog.blends_path)?;
            (records, CatalogSource::Configured)
        }
    };

    let matches: Vec<BlendMatchView> = find_blends(&records, &base_polymer, category)
        .into_iter()
        .map(|record| BlendMatchView {
            insight_prompt: include_insight_prompts
                .then(|| blend_insight_request(record, category)),
            record: record.clone(),
        })
        .collect();

    Ok(Json(BlendLookupResponse {
        data_source,
        base_polymer,
        category,
        category_label: category.label(),
        total: matches.len(),
        matches,
    }))
}

async fn feedback_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let FeedbackRequest {
        user,
        survey,
        material_feedback,
    } = payload;

    let submission = FeedbackSubmission {
        user: user.unwrap_or_else(|| "anonymous".to_string()),
        submitted_at: Local::now().naive_local(),
        survey,
        material_feedback,
    };

    state.feedback.record(&submission)?;

    Ok(Json(json!({ "status": "recorded" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polymer_select::workflows::selection::domain::PolymerClass;
    use std::sync::OnceLock;

    const MATERIALS_CSV: &str = "\
Polymer Category,Polymer Grade,Type of Polymer,Supplier,Continent,Cost (USD/Kg),Tensile Strength (MPa),Elongation at break (%),WVTR 100um (g/m2.day),WVTR 20um (g/m2.day),BBC (%),Compostability
PLA,L175,Biopolymer,Total Corbion,Asia,\"2.4, 2.8\",50,160,4,9,100,\"TUV Home, BPI\"
PBS,FZ91,Biopolymer,PTT MCC,Asia,4.5,35,300,6,12,50,TUV Industrial
LDPE,FT5230,Benchmark,Borealis,Europe,1.2,10,600,1.5,7,0,
";

    const BLENDS_CSV: &str = "\
Base Polymer,Ingredient,Category (Property),Positive Effect,Recommended wt%,Reference
PLA,PBAT,\"MECH, PROC\",Improves flexibility,10-20,https://example.com/pla-pbat
PLA,Chain extender,PROC,Raises melt strength,0.5,
PHA,ATBC,MECH,Plasticizes the matrix,5,
";

    fn test_state() -> AppState {
        static STATE: OnceLock<AppState> = OnceLock::new();
        STATE
            .get_or_init(|| {
                let (_layer, handle) = PrometheusMetricLayer::pair();
                AppState {
                    readiness: Arc::new(AtomicBool::new(true)),
                    metrics: handle,
                    config: Arc::new(AppConfig::load().expect("config loads")),
                    feedback: Arc::new(LogFeedbackSink),
                }
            })
            .clone()
    }

    fn open_constraints() -> ConstraintSet {
        ConstraintSet {
            cost: AttributeRange::new(0.0, 100.0),
            tensile_strength: AttributeRange::new(0.0, 1000.0),
            elongation_at_break: AttributeRange::new(0.0, 1000.0),
            wvtr: AttributeRange::new(0.0, 100.0),
            biobased_content: AttributeRange::new(0.0, 100.0),
            required_certifications: BTreeSet::new(),
            region: None,
        }
    }

    #[tokio::test]
    async fn rank_endpoint_orders_candidates_before_benchmarks() {
        let request = RankRequest {
            constraints: open_constraints(),
            materials_csv: Some(MATERIALS_CSV.to_string()),
        };

        let Json(body) = rank_endpoint(State(test_state()), Json(request))
            .await
            .expect("ranking succeeds");

        assert_eq!(body.data_source, CatalogSource::Inline);
        assert_eq!(body.total, 3);
        assert_eq!(body.results[0].record.class, PolymerClass::Candidate);
        assert_eq!(
            body.results.last().expect("results present").record.class,
            PolymerClass::Benchmark
        );
    }

    #[tokio::test]
    async fn rank_endpoint_rejects_malformed_inline_csv() {
        let request = RankRequest {
            constraints: open_constraints(),
            materials_csv: Some("Polymer Category\nPLA\n".to_string()),
        };

        let error = rank_endpoint(State(test_state()), Json(request))
            .await
            .expect_err("malformed csv rejected");
        assert!(matches!(error, AppError::MaterialCatalog(_)));
    }

    #[tokio::test]
    async fn blend_lookup_endpoint_returns_matches_with_prompts() {
        let request = BlendLookupRequest {
            base_polymer: "pla".to_string(),
            category: OptimizationCategory::Mechanical,
            blends_csv: Some(BLENDS_CSV.to_string()),
            include_insight_prompts: true,
        };

        let Json(body) = blend_lookup_endpoint(State(test_state()), Json(request))
            .await
            .expect("lookup succeeds");

        assert_eq!(body.total, 1);
        assert_eq!(body.category_label, "Mechanical");
        assert_eq!(body.matches[0].record.ingredient, "PBAT");
        let prompt = body.matches[0]
            .insight_prompt
            .as_ref()
            .expect("prompt included");
        assert!(prompt.prompt.contains("https://example.com/pla-pbat"));
    }

    #[tokio::test]
    async fn blend_lookup_endpoint_reports_empty_results() {
        let request = BlendLookupRequest {
            base_polymer: "PLA".to_string(),
            category: OptimizationCategory::Thermal,
            blends_csv: Some(BLENDS_CSV.to_string()),
            include_insight_prompts: false,
        };

        let Json(body) = blend_lookup_endpoint(State(test_state()), Json(request))
            .await
            .expect("lookup succeeds");

        assert_eq!(body.total, 0);
        assert!(body.matches.is_empty());
    }

    #[tokio::test]
    async fn feedback_endpoint_defaults_anonymous_user() {
        let request = FeedbackRequest {
            user: None,
            survey: SessionSurvey {
                recommendation_score: 5,
                ..SessionSurvey::default()
            },
            material_feedback: Vec::new(),
        };

        let Json(body) = feedback_endpoint(State(test_state()), Json(request))
            .await
            .expect("feedback recorded");
        assert_eq!(body["status"], "recorded");
    }

    #[tokio::test]
    async fn router_serves_health_and_ranking() {
        use tower::ServiceExt;

        let app = build_router(test_state());

        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("health responds");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json!({
            "constraints": {
                "cost": { "min": 0.0, "max": 100.0 },
                "tensile_strength": { "min": 0.0, "max": 1000.0 },
                "elongation_at_break": { "min": 0.0, "max": 1000.0 },
                "wvtr": { "min": 0.0, "max": 100.0 },
                "biobased_content": { "min": 0.0, "max": 100.0 }
            },
            "materials_csv": MATERIALS_CSV,
        });

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/v1/selection/rank")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("rank responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
