//! バケット画面のビジネスロジック

use crate::cart::{BucketSummary, QuantityDelta};
use crate::catalog::{CatalogRepository, MenuItem};
use crate::config::AppConfig;
use crate::session::{CheckoutBar, SessionState};
use serde::{Deserialize, Serialize};

/// バケット画面の1明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketLine {
    pub item: MenuItem,
    pub quantity: i64,
    pub line_total: i64,
}

/// バケット画面の表示内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketView {
    pub session_id: String,
    pub pickup_location: String,
    pub lines: Vec<BucketLine>,
    /// 空のバケットでは None（サマリーを表示しない）
    pub summary: Option<BucketSummary>,
    /// チェックアウトボタンの金額表示（"Rs 1960"）
    pub total_label: Option<String>,
    pub checkout_bar: Option<CheckoutBar>,
    /// 「You may also like」
    pub recommendations: Vec<MenuItem>,
    pub delivery_instructions: String,
    pub alternate_phone: String,
}

/// バケット画面の表示内容を組み立てる
pub async fn get_bucket_view<R>(
    repo: &R,
    state: &SessionState,
    config: &AppConfig,
) -> Result<BucketView, String>
where
    R: CatalogRepository,
{
    let recommendations = repo.recommendations().await?;

    state.read(|s| {
        let summary = (!s.cart.is_empty()).then(|| s.cart.summary());
        BucketView {
            session_id: s.id.to_string(),
            pickup_location: config.store.pickup_location.clone(),
            lines: s
                .cart
                .entries()
                .iter()
                .map(|line| BucketLine {
                    item: line.item.clone(),
                    quantity: line.quantity,
                    line_total: line.line_total(),
                })
                .collect(),
            total_label: summary.as_ref().map(|sum| config.format_price(sum.total)),
            summary,
            checkout_bar: s.checkout_bar(),
            recommendations,
            delivery_instructions: s.delivery_instructions.clone(),
            alternate_phone: s.alternate_phone.clone(),
        }
    })
}

/// 数量を±1する（1未満にはならない、存在しないIDは無視）
pub fn update_quantity(
    state: &SessionState,
    item_id: &str,
    delta: QuantityDelta,
) -> Result<BucketSummary, String> {
    state.update(|s| {
        s.update_quantity(item_id, delta);
        s.cart.summary()
    })
}

/// 明細を削除する（存在しないIDは無視）
pub fn remove_from_bucket(state: &SessionState, item_id: &str) -> Result<BucketSummary, String> {
    state.update(|s| {
        s.remove_item(item_id);
        s.cart.summary()
    })
}

/// 「You may also like」から商品を追加する
pub async fn add_recommendation<R>(
    repo: &R,
    state: &SessionState,
    item_id: &str,
) -> Result<BucketSummary, String>
where
    R: CatalogRepository,
{
    let item = repo
        .recommendations()
        .await?
        .into_iter()
        .find(|item| item.id == item_id)
        .ok_or_else(|| format!("おすすめ商品が見つかりません: {item_id}"))?;

    state.update(|s| {
        s.add_item(&item);
        s.cart.summary()
    })
}

pub fn set_delivery_instructions(state: &SessionState, text: &str) -> Result<(), String> {
    state.update(|s| s.set_delivery_instructions(text))?
}

pub fn set_alternate_phone(state: &SessionState, phone: &str) -> Result<(), String> {
    state.update(|s| s.set_alternate_phone(phone))?
}

/// セッションを破棄して新しい空のバケットを開始する
pub fn reset_session(state: &SessionState) -> Result<String, String> {
    state.update(|s| {
        s.reset();
        s.id.to_string()
    })
}
