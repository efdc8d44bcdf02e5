use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::Mutex;

pub mod cart;
pub mod catalog;
pub mod config;
pub mod customization;
pub mod favorites;
pub mod logic;
pub mod session;

pub use crate::cart::{BucketSummary, Cart, LineItem, QuantityDelta, TaxRate};
pub use crate::catalog::{CatalogRepository, Category, MenuItem, StaticCatalogRepository};
pub use crate::session::{BucketSession, SessionState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

// ログバッファ用グローバルMutex
//
// MAX_LOG_ENTRIESを超えた古いログは自動的に削除される
static LOG_BUFFER: Mutex<Option<VecDeque<LogEntry>>> = Mutex::new(None);
const MAX_LOG_ENTRIES: usize = 1000;

/// ログバッファを初期化
///
/// アプリケーション起動時に一度だけ呼び出してください。
/// 複数回呼び出しても安全ですが、既存のログは破棄されます。
pub fn init_log_buffer() {
    match LOG_BUFFER.lock() {
        Ok(mut buffer) => {
            *buffer = Some(VecDeque::with_capacity(MAX_LOG_ENTRIES));
        }
        Err(e) => {
            // ログ機能は利用できないが、アプリケーションは継続
            eprintln!("Failed to initialize log buffer: {e}");
        }
    }
}

/// ログエントリを追加
///
/// ログバッファが未初期化の場合は何もしない。
pub fn add_log_entry(level: &str, message: &str) {
    match LOG_BUFFER.lock() {
        Ok(mut buffer) => {
            if let Some(ref mut logs) = *buffer {
                logs.push_back(LogEntry {
                    timestamp: chrono::Local::now()
                        .format("%Y-%m-%d %H:%M:%S%.3f")
                        .to_string(),
                    level: level.to_string(),
                    message: message.to_string(),
                });

                if logs.len() > MAX_LOG_ENTRIES {
                    logs.pop_front();
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to lock log buffer for adding entry: {e}");
        }
    }
}

/// ログエントリを取得
///
/// 新しい順（最新が先頭）で返す。`limit` はレベルでのフィルタリング後に適用される。
pub fn get_logs(level_filter: Option<String>, limit: Option<usize>) -> Result<Vec<LogEntry>, String> {
    let buffer = LOG_BUFFER
        .lock()
        .map_err(|e| format!("Failed to lock log buffer: {e}"))?;

    let Some(ref logs) = *buffer else {
        return Ok(Vec::new());
    };

    let mut filtered_logs: Vec<LogEntry> = logs
        .iter()
        .filter(|entry| match level_filter {
            Some(ref filter) => &entry.level == filter,
            None => true,
        })
        .cloned()
        .collect();

    filtered_logs.reverse();

    if let Some(limit) = limit {
        filtered_logs.truncate(limit);
    }

    Ok(filtered_logs)
}

/// ロガーの初期化（コンソールとメモリの両方に出力）
///
/// リリースビルドではWarnレベル以上、デバッグビルドではInfoレベル以上を出力する。
/// 既にロガーが設定済みの場合は何もしない。
pub fn init_logger() {
    init_log_buffer();

    #[cfg(debug_assertions)]
    let default_level = log::LevelFilter::Info;
    #[cfg(not(debug_assertions))]
    let default_level = log::LevelFilter::Warn;

    let result = env_logger::Builder::from_default_env()
        .filter_level(default_level)
        .format(|buf, record| {
            add_log_entry(&record.level().to_string(), &format!("{}", record.args()));

            writeln!(
                buf,
                "[{} {:5} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}

#[cfg(feature = "desktop")]
mod commands {
    use crate::cart::{BucketSummary, QuantityDelta};
    use crate::catalog::StaticCatalogRepository;
    use crate::config::AppConfig;
    use crate::customization::Customization;
    use crate::logic::bucket_logic::{self, BucketView};
    use crate::logic::home_logic::{self, HomeScreen};
    use crate::logic::menu_logic::{self, CustomizationAction, MenuScreen, MiniBucket};
    use crate::session::SessionState;
    use crate::LogEntry;

    type Catalog<'a> = tauri::State<'a, StaticCatalogRepository>;
    type Session<'a> = tauri::State<'a, SessionState>;
    type Config<'a> = tauri::State<'a, AppConfig>;

    #[tauri::command]
    pub async fn get_home_screen(
        catalog: Catalog<'_>,
        session: Session<'_>,
        config: Config<'_>,
    ) -> Result<HomeScreen, String> {
        home_logic::get_home_screen(catalog.inner(), session.inner(), config.inner()).await
    }

    #[tauri::command]
    pub async fn get_menu_screen(
        catalog: Catalog<'_>,
        session: Session<'_>,
        focus: Option<String>,
    ) -> Result<MenuScreen, String> {
        menu_logic::get_menu_screen(catalog.inner(), session.inner(), focus.as_deref()).await
    }

    #[tauri::command]
    pub async fn add_to_bucket(
        catalog: Catalog<'_>,
        session: Session<'_>,
        item_id: String,
    ) -> Result<MiniBucket, String> {
        menu_logic::add_to_bucket(catalog.inner(), session.inner(), &item_id).await
    }

    #[tauri::command]
    pub async fn toggle_favorite(
        catalog: Catalog<'_>,
        session: Session<'_>,
        item_id: String,
    ) -> Result<bool, String> {
        menu_logic::toggle_favorite(catalog.inner(), session.inner(), &item_id).await
    }

    #[tauri::command]
    pub async fn open_customization(
        catalog: Catalog<'_>,
        session: Session<'_>,
        item_id: String,
    ) -> Result<Customization, String> {
        menu_logic::open_customization(catalog.inner(), session.inner(), &item_id).await
    }

    #[tauri::command]
    pub fn update_customization(
        session: Session<'_>,
        action: CustomizationAction,
    ) -> Result<Customization, String> {
        menu_logic::update_customization(session.inner(), action)
    }

    #[tauri::command]
    pub fn commit_customization(session: Session<'_>) -> Result<MiniBucket, String> {
        menu_logic::commit_customization(session.inner())
    }

    #[tauri::command]
    pub fn close_customization(session: Session<'_>) -> Result<(), String> {
        menu_logic::close_customization(session.inner())
    }

    #[tauri::command]
    pub async fn get_bucket(
        catalog: Catalog<'_>,
        session: Session<'_>,
        config: Config<'_>,
    ) -> Result<BucketView, String> {
        bucket_logic::get_bucket_view(catalog.inner(), session.inner(), config.inner()).await
    }

    #[tauri::command]
    pub fn update_quantity(
        session: Session<'_>,
        item_id: String,
        increment: bool,
    ) -> Result<BucketSummary, String> {
        bucket_logic::update_quantity(session.inner(), &item_id, QuantityDelta::from(increment))
    }

    #[tauri::command]
    pub fn remove_from_bucket(
        session: Session<'_>,
        item_id: String,
    ) -> Result<BucketSummary, String> {
        bucket_logic::remove_from_bucket(session.inner(), &item_id)
    }

    #[tauri::command]
    pub async fn add_recommendation(
        catalog: Catalog<'_>,
        session: Session<'_>,
        item_id: String,
    ) -> Result<BucketSummary, String> {
        bucket_logic::add_recommendation(catalog.inner(), session.inner(), &item_id).await
    }

    #[tauri::command]
    pub fn set_delivery_instructions(session: Session<'_>, text: String) -> Result<(), String> {
        bucket_logic::set_delivery_instructions(session.inner(), &text)
    }

    #[tauri::command]
    pub fn set_alternate_phone(session: Session<'_>, phone: String) -> Result<(), String> {
        bucket_logic::set_alternate_phone(session.inner(), &phone)
    }

    #[tauri::command]
    pub fn reset_session(session: Session<'_>) -> Result<String, String> {
        log::info!("Resetting bucket session");
        bucket_logic::reset_session(session.inner())
    }

    #[tauri::command]
    pub fn get_config(config: Config<'_>) -> AppConfig {
        config.inner().clone()
    }

    #[tauri::command]
    pub fn get_logs(
        level_filter: Option<String>,
        limit: Option<usize>,
    ) -> Result<Vec<LogEntry>, String> {
        crate::get_logs(level_filter, limit)
    }
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    tauri::Builder::default()
        .setup(|app| {
            init_logger();

            let config_dir = app.path().app_config_dir()?;
            log::info!("Config dir: {}", config_dir.display());

            let config = config::load(&config_dir)?;
            let tax_rate = config.tax_rate()?;
            log::info!(
                "Pricing: tax {}% ({} bps), currency {}",
                tax_rate.percent(),
                tax_rate.bps(),
                config.pricing.currency_label
            );

            let catalog = StaticCatalogRepository::load(&config_dir)?;

            if let Some(window) = app.get_webview_window("main") {
                let _ = window.set_size(tauri::LogicalSize {
                    width: config.window.width,
                    height: config.window.height,
                });
            }

            app.manage(catalog);
            app.manage(SessionState::new(tax_rate));
            app.manage(config);
            log::info!("Catalog, session and config initialized");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_home_screen,
            commands::get_menu_screen,
            commands::add_to_bucket,
            commands::toggle_favorite,
            commands::open_customization,
            commands::update_customization,
            commands::commit_customization,
            commands::close_customization,
            commands::get_bucket,
            commands::update_quantity,
            commands::remove_from_bucket,
            commands::add_recommendation,
            commands::set_delivery_instructions,
            commands::set_alternate_phone,
            commands::reset_session,
            commands::get_config,
            commands::get_logs,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
