//! メニュー画面・カスタマイズモーダルのビジネスロジック

use crate::catalog::{CatalogRepository, Category, MenuItem};
use crate::customization::Customization;
use crate::session::SessionState;
use serde::{Deserialize, Serialize};

/// メニューの1行（商品 + お気に入り状態）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntry {
    pub item: MenuItem,
    pub favorite: bool,
}

/// カテゴリごとのセクション
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSection {
    pub category: Category,
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

/// 画面下部のバケット概要（"N items | Rs X"）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniBucket {
    pub item_count: i64,
    pub subtotal: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuScreen {
    pub sections: Vec<MenuSection>,
    /// ホーム画面から遷移したときにスクロールするカテゴリ
    pub focused_category: Option<Category>,
    /// ホーム画面のBest Sellersから遷移したときに強調する商品
    pub focused_item: Option<String>,
    /// バケットが空の場合は None（概要バーを表示しない）
    pub bucket: Option<MiniBucket>,
}

/// モーダルで受け付ける操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationAction {
    Increment,
    Decrement,
    ToggleDrink,
    ToggleAddOns,
}

fn mini_bucket(state: &SessionState) -> Result<Option<MiniBucket>, String> {
    state.read(|s| {
        if s.cart.is_empty() {
            None
        } else {
            Some(MiniBucket {
                item_count: s.cart.item_count(),
                subtotal: s.cart.subtotal(),
            })
        }
    })
}

async fn require_item<R>(repo: &R, id: &str) -> Result<MenuItem, String>
where
    R: CatalogRepository,
{
    repo.find_item(id)
        .await?
        .ok_or_else(|| format!("商品が見つかりません: {id}"))
}

/// メニュー画面の表示内容を組み立てる
///
/// `focus` はホーム画面で押されたカテゴリタイトル、または商品ID。
/// どちらにも一致しない場合はフォーカスなしで表示する。
pub async fn get_menu_screen<R>(
    repo: &R,
    state: &SessionState,
    focus: Option<&str>,
) -> Result<MenuScreen, String>
where
    R: CatalogRepository,
{
    let mut sections = Vec::with_capacity(Category::MENU_SECTIONS.len());
    for category in Category::MENU_SECTIONS {
        let items = repo.items_in_category(category).await?;
        let entries = state.read(|s| {
            items
                .into_iter()
                .map(|item| MenuEntry {
                    favorite: s.favorites.contains(&item.id),
                    item,
                })
                .collect::<Vec<_>>()
        })?;
        sections.push(MenuSection {
            category,
            label: category.section_label().to_string(),
            entries,
        });
    }

    let (focused_category, focused_item) = match focus {
        Some(label) => match Category::from_label(label) {
            Some(category) => (Some(category), None),
            None => {
                let item = repo.find_item(label).await?;
                (item.as_ref().map(|i| i.category), item.map(|i| i.id))
            }
        },
        None => (None, None),
    };
    // セクションの無いカテゴリ（ホーム画面のみ）はスクロール先にしない
    let focused_category =
        focused_category.filter(|c| Category::MENU_SECTIONS.contains(c));

    Ok(MenuScreen {
        sections,
        focused_category,
        focused_item,
        bucket: mini_bucket(state)?,
    })
}

/// 「ADD TO BUCKET」: 商品を1つバケットへ追加する
pub async fn add_to_bucket<R>(
    repo: &R,
    state: &SessionState,
    item_id: &str,
) -> Result<MiniBucket, String>
where
    R: CatalogRepository,
{
    let item = require_item(repo, item_id).await?;
    state.update(|s| s.add_item(&item))?;
    mini_bucket(state)?.ok_or_else(|| "バケットの更新に失敗しました".to_string())
}

/// お気に入りを切り替え、切り替え後の状態を返す
pub async fn toggle_favorite<R>(
    repo: &R,
    state: &SessionState,
    item_id: &str,
) -> Result<bool, String>
where
    R: CatalogRepository,
{
    let item = require_item(repo, item_id).await?;
    state.update(|s| s.favorites.toggle(&item.id))
}

/// カスタマイズモーダルを開く
pub async fn open_customization<R>(
    repo: &R,
    state: &SessionState,
    item_id: &str,
) -> Result<Customization, String>
where
    R: CatalogRepository,
{
    let item = require_item(repo, item_id).await?;
    state.update(|s| s.open_customization(item).clone())
}

/// 開いているモーダルに操作を適用する
pub fn update_customization(
    state: &SessionState,
    action: CustomizationAction,
) -> Result<Customization, String> {
    state
        .update(|s| {
            s.update_customization(|modal| match action {
                CustomizationAction::Increment => modal.increment(),
                CustomizationAction::Decrement => modal.decrement(),
                CustomizationAction::ToggleDrink => modal.toggle_drink(),
                CustomizationAction::ToggleAddOns => modal.toggle_add_ons(),
            })
            .cloned()
        })?
        .ok_or_else(|| "カスタマイズ中の商品がありません".to_string())
}

/// モーダルの内容をバケットへ追加して閉じる
pub fn commit_customization(state: &SessionState) -> Result<MiniBucket, String> {
    state.update(|s| s.commit_customization())??;
    mini_bucket(state)?.ok_or_else(|| "バケットの更新に失敗しました".to_string())
}

pub fn close_customization(state: &SessionState) -> Result<(), String> {
    state.update(|s| s.close_customization())
}
