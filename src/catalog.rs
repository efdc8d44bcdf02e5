//! メニューカタログ（静的データ）とその取得元の抽象化
//!
//! ホーム画面・メニュー画面・バケット画面が参照する商品データはすべて読み取り専用。
//! 取得元は `CatalogRepository` で抽象化し、テスト時にモック可能にします。

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const CATALOG_FILENAME: &str = "catalog.json";

/// 商品カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    EverydayValue,
    AlaCarteAndCombos,
    Promotion,
    SignatureBoxes,
    Sharing,
}

impl Category {
    /// ホーム画面に並ぶ順序
    pub const ALL: [Category; 5] = [
        Category::EverydayValue,
        Category::AlaCarteAndCombos,
        Category::Promotion,
        Category::SignatureBoxes,
        Category::Sharing,
    ];

    /// メニュー画面にセクションとして表示する順序
    pub const MENU_SECTIONS: [Category; 2] = [Category::EverydayValue, Category::AlaCarteAndCombos];

    /// ホーム画面のカテゴリタイトル
    pub fn title(&self) -> &'static str {
        match self {
            Category::EverydayValue => "Everyday Value",
            Category::AlaCarteAndCombos => "Ala-Carte & Combos",
            Category::Promotion => "Promotion",
            Category::SignatureBoxes => "Signature Boxes",
            Category::Sharing => "Sharing",
        }
    }

    /// メニュー画面のセクション見出し
    pub fn section_label(&self) -> &'static str {
        match self {
            Category::EverydayValue => "EVERYDAY VALUE",
            Category::AlaCarteAndCombos => "ALA-CARTE-&-COMBOS",
            Category::Promotion => "PROMOTION",
            Category::SignatureBoxes => "SIGNATURE BOXES",
            Category::Sharing => "SHARING",
        }
    }

    pub fn image(&self) -> &'static str {
        match self {
            Category::EverydayValue => "assets/images/EveryDay_value.png",
            Category::AlaCarteAndCombos => "assets/images/Ala_Carte_&_Combos.png",
            Category::Promotion => "assets/images/Promotions.png",
            Category::SignatureBoxes => "assets/images/Signature_Boxes.png",
            Category::Sharing => "assets/images/Sharing.png",
        }
    }

    /// タイトルまたはセクション見出しからカテゴリを引く（大文字小文字は区別しない）
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| {
            c.title().eq_ignore_ascii_case(label) || c.section_label().eq_ignore_ascii_case(label)
        })
    }
}

/// 商品（カタログデータ、不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// 商品ID（カタログ内で一意）
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 単価（Rs、整数）
    pub price: i64,
    /// 画像アセットのパス
    pub image: String,
    pub category: Category,
}

impl MenuItem {
    /// カタログに登録できる単価の上限（Rs）
    pub const MAX_PRICE: i64 = 10_000_000;

    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        price: i64,
        image: &str,
        category: Category,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            image: image.to_string(),
            category,
        }
    }
}

/// ホーム画面のカテゴリタイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTile {
    pub category: Category,
    pub title: String,
    pub image: String,
}

impl From<Category> for CategoryTile {
    fn from(category: Category) -> Self {
        Self {
            category,
            title: category.title().to_string(),
            image: category.image().to_string(),
        }
    }
}

/// カタログファイルの内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub items: Vec<MenuItem>,
    /// ホーム画面の「Best Sellers」に並べる商品ID
    #[serde(default)]
    pub best_sellers: Vec<String>,
    /// バケット画面の「You may also like」に並べる商品ID
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl CatalogData {
    /// IDの重複・範囲外の価格・未登録IDへの参照を検出する
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.trim().is_empty() {
                return Err(format!("Catalog item '{}' has an empty id", item.name));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(format!("Duplicate catalog item id: {}", item.id));
            }
            if item.price < 0 {
                return Err(format!(
                    "Catalog item {} has a negative price: {}",
                    item.id, item.price
                ));
            }
            if item.price > MenuItem::MAX_PRICE {
                return Err(format!(
                    "Catalog item {} price {} exceeds the maximum of {}",
                    item.id,
                    item.price,
                    MenuItem::MAX_PRICE
                ));
            }
        }

        for id in self.best_sellers.iter().chain(self.recommendations.iter()) {
            if !seen.contains(id.as_str()) {
                return Err(format!("Unknown catalog item id referenced: {id}"));
            }
        }
        Ok(())
    }

    fn find(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn resolve(&self, ids: &[String]) -> Vec<MenuItem> {
        ids.iter().filter_map(|id| self.find(id).cloned()).collect()
    }
}

/// 組み込みカタログ
pub static STATIC_CATALOG: Lazy<CatalogData> = Lazy::new(|| CatalogData {
    items: vec![
        MenuItem::new(
            "1",
            "Krunch Burger",
            "Krunch fillet, spicy mayo, lettuce, sandwiched between a sesame seed bun",
            310,
            "assets/images/Krunch_Burger.png",
            Category::EverydayValue,
        ),
        MenuItem::new(
            "2",
            "Zinger atha",
            "Tender boneless strips, sliced onions, tangy imli chutney, mint sauce in paratha",
            390,
            "assets/images/Zingeratha.png",
            Category::EverydayValue,
        ),
        MenuItem::new(
            "3",
            "Rice & Spice",
            "Spiced and buttery rice with 6 pcs of Hot Shots topped with special sauce",
            390,
            "assets/images/Riceandspice.png",
            Category::EverydayValue,
        ),
        MenuItem::new(
            "4",
            "Zinger Burger",
            "Our hero- crispy Zinger fillet, signature mayo and lettuce",
            690,
            "assets/images/Zinger_Burger.png",
            Category::AlaCarteAndCombos,
        ),
        MenuItem::new(
            "5",
            "Zinger Stacker",
            "Double krunch fillet, jalapenos, spicy mayo, lettuce and cheese",
            690,
            "assets/images/Zinger_Stacker.png",
            Category::AlaCarteAndCombos,
        ),
        MenuItem::new(
            "6",
            "Kentucky Burger",
            "OG Zinger fillet layered with beef pepperoni, crispy fried onions",
            690,
            "assets/images/Kentucky_Burger.png",
            Category::AlaCarteAndCombos,
        ),
        MenuItem::new(
            "krunch-combo",
            "Krunch Combo",
            "",
            590,
            "assets/images/Krunch_Combo.png",
            Category::Promotion,
        ),
        MenuItem::new(
            "chicken-chips",
            "Chicken & Chips",
            "",
            620,
            "assets/images/Chicken_&_Chips.png",
            Category::Promotion,
        ),
        MenuItem::new(
            "hot-wings",
            "Hot Wings Bucket",
            "",
            670,
            "assets/images/Hot_Wings_Bucket.png",
            Category::Sharing,
        ),
        MenuItem::new(
            "zinger",
            "Zinger Burger",
            "",
            550,
            "assets/images/Zinger_Burger.png",
            Category::Promotion,
        ),
        MenuItem::new(
            "fries",
            "Fries",
            "",
            270,
            "assets/images/Fries.png",
            Category::Sharing,
        ),
    ],
    best_sellers: vec![
        "1".to_string(),
        "krunch-combo".to_string(),
        "chicken-chips".to_string(),
        "hot-wings".to_string(),
    ],
    recommendations: vec![
        "hot-wings".to_string(),
        "zinger".to_string(),
        "fries".to_string(),
    ],
});

/// カタログ取得を抽象化するトレイト
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// 全商品を取得
    async fn all_items(&self) -> Result<Vec<MenuItem>, String>;

    /// IDで商品を取得（存在しない場合は None）
    async fn find_item(&self, id: &str) -> Result<Option<MenuItem>, String>;

    /// カテゴリに属する商品をカタログ順で取得
    async fn items_in_category(&self, category: Category) -> Result<Vec<MenuItem>, String>;

    /// ホーム画面のカテゴリタイル
    async fn categories(&self) -> Result<Vec<CategoryTile>, String>;

    async fn best_sellers(&self) -> Result<Vec<MenuItem>, String>;

    async fn recommendations(&self) -> Result<Vec<MenuItem>, String>;
}

/// `CatalogData` をそのまま返す実装。組み込みカタログとJSONファイルの両方で使う
#[derive(Debug, Clone)]
pub struct StaticCatalogRepository {
    data: CatalogData,
}

impl StaticCatalogRepository {
    /// 組み込みカタログを返すリポジトリ
    pub fn new() -> Self {
        Self {
            data: STATIC_CATALOG.clone(),
        }
    }

    pub fn from_data(data: CatalogData) -> Result<Self, String> {
        data.validate()?;
        Ok(Self { data })
    }

    /// 設定ディレクトリの catalog.json を読み込む。ファイルが存在しない場合は組み込みカタログ。
    pub fn load(config_dir: &Path) -> Result<Self, String> {
        let path = config_dir.join(CATALOG_FILENAME);
        if !path.exists() {
            log::info!("No {CATALOG_FILENAME} found; using built-in catalog");
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read catalog file: {e}"))?;
        let data: CatalogData =
            serde_json::from_str(&contents).map_err(|e| format!("Invalid catalog JSON: {e}"))?;
        let repo = Self::from_data(data)?;
        log::info!(
            "Catalog loaded from {}: {} items",
            path.display(),
            repo.data.items.len()
        );
        Ok(repo)
    }
}

impl Default for StaticCatalogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for StaticCatalogRepository {
    async fn all_items(&self) -> Result<Vec<MenuItem>, String> {
        Ok(self.data.items.clone())
    }

    async fn find_item(&self, id: &str) -> Result<Option<MenuItem>, String> {
        Ok(self.data.find(id).cloned())
    }

    async fn items_in_category(&self, category: Category) -> Result<Vec<MenuItem>, String> {
        Ok(self
            .data
            .items
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<CategoryTile>, String> {
        Ok(Category::ALL.into_iter().map(CategoryTile::from).collect())
    }

    async fn best_sellers(&self) -> Result<Vec<MenuItem>, String> {
        Ok(self.data.resolve(&self.data.best_sellers))
    }

    async fn recommendations(&self) -> Result<Vec<MenuItem>, String> {
        Ok(self.data.resolve(&self.data.recommendations))
    }
}
