//! Calificar CLI - student grade prediction server
//!
//! Trains (or reloads) the grade prediction model at startup, then serves
//! predictions over HTTP until the process is stopped.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use calificar::{
    api::{create_router, AppState},
    error::{CalificarError, Result},
    lifecycle::{self, LifecycleConfig, ModelSource},
};

/// Calificar - student grade prediction service
///
/// Loads persisted model artifacts when present, otherwise trains from the
/// dataset, then serves predictions over REST.
#[derive(Parser)]
#[command(name = "calificar")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8081")]
    port: u16,

    /// Semicolon-delimited training dataset
    #[arg(long, default_value = "student-mat.csv")]
    data: PathBuf,

    /// Persisted model artifact
    #[arg(long, default_value = "student_model.bin")]
    model_file: PathBuf,

    /// Persisted scaler artifact
    #[arg(long, default_value = "scaler.bin")]
    scaler_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = LifecycleConfig {
        data_path: cli.data,
        model_path: cli.model_file,
        scaler_path: cli.scaler_file,
    };

    // Startup is fatal on any dataset error: never serve without a model
    let (ctx, source) = lifecycle::obtain(&config)?;
    match source {
        ModelSource::Loaded => log::info!("model ready (loaded from disk)"),
        ModelSource::Trained => log::info!("model ready (trained from dataset)"),
    }

    let app = create_router(AppState::new(ctx));

    let addr: SocketAddr =
        format!("{}:{}", cli.host, cli.port)
            .parse()
            .map_err(|e| CalificarError::Io {
                reason: format!("invalid address: {e}"),
            })?;

    println!("Server listening on http://{addr}");
    println!();
    println!("Endpoints:");
    println!("  GET  /home    - Liveness check");
    println!("  POST /predict - Predict a final grade from a feature record");
    println!();
    println!("Example:");
    println!("  curl -X POST http://{addr}/predict \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"studytime\": 3, \"absences\": 2, \"freetime\": 4, \"Walc\": 1}}'");
    println!();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CalificarError::Io {
            reason: format!("failed to bind {addr}: {e}"),
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| CalificarError::Io {
            reason: format!("server error: {e}"),
        })?;

    Ok(())
}
