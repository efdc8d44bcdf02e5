use bucket_lib::config::{self, AppConfig};
use bucket_lib::logic::bucket_logic;
use bucket_lib::logic::home_logic;
use bucket_lib::logic::menu_logic::{self, CustomizationAction};
use bucket_lib::{Cart, Category, MenuItem, QuantityDelta, SessionState, StaticCatalogRepository, TaxRate};
use tempfile::TempDir;

fn item(id: &str, price: i64) -> MenuItem {
    MenuItem::new(id, id, "", price, "", Category::EverydayValue)
}

// ホーム → メニュー → モーダル → バケットの一連の流れで、同じセッションが更新されること
#[tokio::test]
async fn test_screens_share_one_bucket() {
    let repo = StaticCatalogRepository::new();
    let config = AppConfig::default();
    let state = SessionState::new(config.tax_rate().unwrap());

    let home = home_logic::get_home_screen(&repo, &state, &config)
        .await
        .unwrap();
    assert_eq!(home.bucket_count, 0);
    let best_seller = home.best_sellers[0].id.clone();

    let menu = menu_logic::get_menu_screen(&repo, &state, Some(&best_seller))
        .await
        .unwrap();
    assert_eq!(menu.focused_item.as_deref(), Some("1"));

    menu_logic::add_to_bucket(&repo, &state, "1").await.unwrap();

    menu_logic::open_customization(&repo, &state, "4").await.unwrap();
    menu_logic::update_customization(&state, CustomizationAction::Increment).unwrap();
    menu_logic::commit_customization(&state).unwrap();

    let view = bucket_logic::get_bucket_view(&repo, &state, &config)
        .await
        .unwrap();
    let summary = view.summary.unwrap();
    assert_eq!(summary.subtotal, 1690);
    assert_eq!(summary.tax, 270);
    assert_eq!(summary.total, 1960);

    bucket_logic::update_quantity(&state, "4", QuantityDelta::Decrement).unwrap();
    bucket_logic::update_quantity(&state, "4", QuantityDelta::Decrement).unwrap();
    let summary = bucket_logic::remove_from_bucket(&state, "1").unwrap();
    assert_eq!(summary.subtotal, 690);
    assert_eq!(summary.tax, 110);
    assert_eq!(summary.total, 800);

    let menu = menu_logic::get_menu_screen(&repo, &state, None).await.unwrap();
    let bucket = menu.bucket.unwrap();
    assert_eq!(bucket.item_count, 1);
    assert_eq!(bucket.subtotal, 690);

    let home = home_logic::get_home_screen(&repo, &state, &config)
        .await
        .unwrap();
    assert_eq!(home.bucket_count, 1);
}

// 極端な価格でも計算が panic せず、セッションのロックが使い続けられること
#[test]
fn test_extreme_price_keeps_session_usable() {
    let state = SessionState::new(TaxRate::GST);
    let gold = item("gold", 10_000_000_000_000_000);
    state.update(|s| s.add_item(&gold)).unwrap();

    let summary = bucket_logic::update_quantity(&state, "gold", QuantityDelta::Increment).unwrap();
    assert_eq!(summary.subtotal, 20_000_000_000_000_000);
    // subtotal * bps は i64 を超えるため税額は飽和した値になる
    assert_eq!(summary.tax, i64::MAX / 10_000);
    assert_eq!(summary.total, summary.subtotal + summary.tax);

    let summary = bucket_logic::remove_from_bucket(&state, "gold").unwrap();
    assert_eq!(summary.total, 0);
}

#[tokio::test]
async fn test_config_tax_rate_flows_into_totals() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.pricing.tax_rate_bps = 1700;
    config::save(dir.path(), &config).unwrap();

    let loaded = config::load(dir.path()).unwrap();
    let state = SessionState::new(loaded.tax_rate().unwrap());
    let repo = StaticCatalogRepository::load(dir.path()).unwrap();

    let summary = bucket_logic::add_recommendation(&repo, &state, "hot-wings")
        .await
        .unwrap();
    // 670 * 0.17 = 113.9 -> 114
    assert_eq!(summary.tax, 114);
    assert_eq!(summary.total, 784);
}

#[test]
fn test_add_sequence_invariants() {
    let catalog = [item("a", 100), item("b", 250), item("c", 40)];
    let sequence = [2usize, 0, 0, 1, 2, 0, 1, 1, 1, 2];

    let mut cart = Cart::new(TaxRate::GST);
    for &i in &sequence {
        cart.add(&catalog[i]);
    }

    assert_eq!(cart.len(), 3);
    assert_eq!(cart.item_count(), sequence.len() as i64);
    let ids: Vec<&str> = cart.entries().iter().map(|l| l.item.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_decrement_never_below_one() {
    for start in 1..6 {
        let mut cart = Cart::new(TaxRate::GST);
        cart.add_quantity(&item("a", 100), start);
        for _ in 0..(start + 3) {
            cart.set_quantity("a", QuantityDelta::Decrement);
            assert!(cart.get("a").unwrap().quantity >= 1);
        }
        assert_eq!(cart.get("a").unwrap().quantity, 1);
    }
}

#[test]
fn test_missing_id_operations_leave_cart_unchanged() {
    let mut cart = Cart::new(TaxRate::GST);
    cart.add(&item("a", 100));
    let before = cart.clone();

    cart.set_quantity("missing", QuantityDelta::Increment);
    cart.set_quantity("missing", QuantityDelta::Decrement);
    cart.remove("missing");
    assert_eq!(cart, before);
}
