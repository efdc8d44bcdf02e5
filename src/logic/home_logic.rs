//! ホーム画面のビジネスロジック

use crate::catalog::{CatalogRepository, CategoryTile, MenuItem};
use crate::config::AppConfig;
use crate::session::SessionState;
use serde::{Deserialize, Serialize};

/// トップのプロモーションバナー
pub const HERO_BANNER: &str = "assets/images/Main_Promo.jpg";

/// ホーム画面の表示内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeScreen {
    pub pickup_location: String,
    pub currency_label: String,
    pub hero_banner: String,
    /// ヘッダーのバケットバッジ（数量の合計）
    pub bucket_count: i64,
    pub categories: Vec<CategoryTile>,
    pub best_sellers: Vec<MenuItem>,
}

/// ホーム画面の表示内容を組み立てる
pub async fn get_home_screen<R>(
    repo: &R,
    state: &SessionState,
    config: &AppConfig,
) -> Result<HomeScreen, String>
where
    R: CatalogRepository,
{
    let categories = repo.categories().await?;
    let best_sellers = repo.best_sellers().await?;

    Ok(HomeScreen {
        pickup_location: config.store.pickup_location.clone(),
        currency_label: config.pricing.currency_label.clone(),
        hero_banner: HERO_BANNER.to_string(),
        bucket_count: state.read(|s| s.cart.item_count())?,
        categories,
        best_sellers,
    })
}
