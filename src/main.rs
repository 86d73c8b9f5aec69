use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kanji_drill::config::{self, QuizConfig};
use kanji_drill::content::{load_dictionary, DictionaryIndex, IndexProgress};
use kanji_drill::handlers;
use kanji_drill::quiz::planner;
use kanji_drill::state::AppState;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kanji_drill=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let quiz_config = QuizConfig::load();

  let raw = match load_dictionary(&quiz_config.dictionary_path) {
    Ok(raw) => raw,
    Err(e) => {
      tracing::error!("{}", e);
      std::process::exit(1);
    }
  };
  if raw.is_empty() {
    tracing::warn!("Dictionary {} has no records", quiz_config.dictionary_path.display());
  }

  let (index, report) = DictionaryIndex::build_with_progress(&raw, |progress| match progress {
    IndexProgress::Characters { indexed } => tracing::info!("Indexed {} characters", indexed),
    IndexProgress::WordLevel { level, indexed } => {
      tracing::info!("Indexed {} words for {}", indexed, level)
    }
    IndexProgress::FlatWords { indexed } => tracing::info!("Indexed {} levelled words", indexed),
  });
  for err in report.malformed.iter().take(10) {
    tracing::warn!("Skipped record: {}", err);
  }

  let parts = planner::plan_with_progress(&index, &quiz_config, |progress| {
    tracing::info!("{}: {} parts", progress.level.display_name(), progress.parts);
  });

  let state = AppState::with_parts(index, parts, quiz_config);
  let app = handlers::router(state);

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
