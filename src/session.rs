//! バケットセッション
//!
//! 画面ごとにカートを持たず、セッションにつき1つの `BucketSession` を
//! `SessionState` 経由で共有する。メニュー画面・モーダル・バケット画面はすべて同じ
//! インスタンスを更新する。セッションは永続化しない。

use crate::cart::{Cart, QuantityDelta, TaxRate};
use crate::catalog::MenuItem;
use crate::customization::Customization;
use crate::favorites::Favorites;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_INSTRUCTIONS_CHARS: usize = 500;

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-]*$").expect(
        "Failed to compile phone regex pattern - this is a static pattern and should never fail",
    )
});

/// 代替電話番号のバリデーション（空は許可）
pub fn validate_alternate_phone(phone: &str) -> Result<(), String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(());
    }
    if !PHONE_REGEX.is_match(phone) {
        return Err("電話番号には数字・スペース・ハイフン・先頭の+のみ使用できます".to_string());
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(format!(
            "電話番号の桁数は{MIN_PHONE_DIGITS}〜{MAX_PHONE_DIGITS}桁である必要があります"
        ));
    }
    Ok(())
}

/// チェックアウトバーの表示内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutBar {
    /// 明細の件数（"N Items"）
    pub item_count: usize,
    /// 先頭明細の画像
    pub first_image: String,
    pub total: i64,
}

/// 1セッション分の状態
#[derive(Debug, Clone, Serialize)]
pub struct BucketSession {
    pub id: Uuid,
    pub cart: Cart,
    pub favorites: Favorites,
    pub customization: Option<Customization>,
    pub delivery_instructions: String,
    pub alternate_phone: String,
}

impl BucketSession {
    pub fn new(tax_rate: TaxRate) -> Self {
        let id = Uuid::new_v4();
        log::info!("Bucket session started: {id}");
        Self {
            id,
            cart: Cart::new(tax_rate),
            favorites: Favorites::new(),
            customization: None,
            delivery_instructions: String::new(),
            alternate_phone: String::new(),
        }
    }

    pub fn add_item(&mut self, item: &MenuItem) {
        self.cart.add(item);
        log::info!(
            "Added to bucket: {} (id={}), lines={}",
            item.name,
            item.id,
            self.cart.len()
        );
    }

    pub fn update_quantity(&mut self, id: &str, delta: QuantityDelta) {
        self.cart.set_quantity(id, delta);
    }

    pub fn remove_item(&mut self, id: &str) {
        self.cart.remove(id);
        log::info!("Removed from bucket: id={id}");
    }

    /// モーダルを開く（既に開いている場合は置き換える）
    pub fn open_customization(&mut self, item: MenuItem) -> &Customization {
        self.customization.insert(Customization::open(item))
    }

    pub fn close_customization(&mut self) {
        self.customization = None;
    }

    /// 開いているモーダルを更新する。モーダルが無い場合は None。
    pub fn update_customization<F>(&mut self, f: F) -> Option<&Customization>
    where
        F: FnOnce(&mut Customization),
    {
        let modal = self.customization.as_mut()?;
        f(modal);
        Some(&*modal)
    }

    /// モーダルの数量をバケットへ追加して閉じる
    pub fn commit_customization(&mut self) -> Result<(), String> {
        let modal = self
            .customization
            .take()
            .ok_or_else(|| "カスタマイズ中の商品がありません".to_string())?;
        modal.commit(&mut self.cart);
        Ok(())
    }

    pub fn set_delivery_instructions(&mut self, text: &str) -> Result<(), String> {
        if text.chars().count() > MAX_INSTRUCTIONS_CHARS {
            return Err(format!(
                "調理・配達の指示は{MAX_INSTRUCTIONS_CHARS}文字以内で入力してください"
            ));
        }
        self.delivery_instructions = text.to_string();
        Ok(())
    }

    pub fn set_alternate_phone(&mut self, phone: &str) -> Result<(), String> {
        validate_alternate_phone(phone)?;
        self.alternate_phone = phone.trim().to_string();
        Ok(())
    }

    /// 空のバケットでは None
    pub fn checkout_bar(&self) -> Option<CheckoutBar> {
        let first = self.cart.entries().first()?;
        Some(CheckoutBar {
            item_count: self.cart.len(),
            first_image: first.item.image.clone(),
            total: self.cart.total(),
        })
    }

    /// 新しいセッションに置き換える（税率は引き継ぐ）
    pub fn reset(&mut self) {
        *self = Self::new(self.cart.tax_rate());
    }
}

impl Default for BucketSession {
    fn default() -> Self {
        Self::new(TaxRate::default())
    }
}

/// Tauriで管理するセッション状態
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<BucketSession>>,
}

impl SessionState {
    pub fn new(tax_rate: TaxRate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BucketSession::new(tax_rate))),
        }
    }

    pub fn read<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&BucketSession) -> T,
    {
        let session = self
            .inner
            .lock()
            .map_err(|e| format!("Failed to lock bucket session: {e}"))?;
        Ok(f(&*session))
    }

    pub fn update<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut BucketSession) -> T,
    {
        let mut session = self
            .inner
            .lock()
            .map_err(|e| format!("Failed to lock bucket session: {e}"))?;
        Ok(f(&mut *session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn krunch() -> MenuItem {
        MenuItem::new(
            "1",
            "Krunch Burger",
            "",
            310,
            "assets/images/Krunch_Burger.png",
            Category::EverydayValue,
        )
    }

    fn fries() -> MenuItem {
        MenuItem::new(
            "fries",
            "Fries",
            "",
            270,
            "assets/images/Fries.png",
            Category::Sharing,
        )
    }

    #[test]
    fn test_validate_alternate_phone() {
        assert!(validate_alternate_phone("").is_ok());
        assert!(validate_alternate_phone("   ").is_ok());
        assert!(validate_alternate_phone("0300-1234567").is_ok());
        assert!(validate_alternate_phone("+92 300 1234567").is_ok());

        assert!(validate_alternate_phone("12345").unwrap_err().contains("桁数"));
        assert!(validate_alternate_phone("1234567890123456")
            .unwrap_err()
            .contains("桁数"));
        assert!(validate_alternate_phone("call me").is_err());
        assert!(validate_alternate_phone("0300+1234567").is_err());
    }

    #[test]
    fn test_checkout_bar_empty_bucket() {
        let session = BucketSession::default();
        assert!(session.checkout_bar().is_none());
    }

    #[test]
    fn test_checkout_bar_uses_first_line() {
        let mut session = BucketSession::default();
        session.add_item(&fries());
        session.add_item(&krunch());
        session.add_item(&krunch());

        let bar = session.checkout_bar().unwrap();
        assert_eq!(bar.item_count, 2);
        assert_eq!(bar.first_image, "assets/images/Fries.png");
        // 270 + 620 = 890, GST 142.4 -> 142
        assert_eq!(bar.total, 1032);
    }

    #[test]
    fn test_commit_customization_adds_and_closes() {
        let mut session = BucketSession::default();
        session.open_customization(krunch());
        session.update_customization(Customization::increment);

        session.commit_customization().unwrap();
        assert!(session.customization.is_none());
        assert_eq!(session.cart.get("1").unwrap().quantity, 2);
    }

    #[test]
    fn test_commit_without_modal_is_error() {
        let mut session = BucketSession::default();
        let result = session.commit_customization();
        assert!(result.is_err());
        assert!(session.cart.is_empty());
    }

    #[test]
    fn test_update_customization_without_modal() {
        let mut session = BucketSession::default();
        assert!(session
            .update_customization(Customization::increment)
            .is_none());
    }

    #[test]
    fn test_set_alternate_phone_keeps_previous_on_error() {
        let mut session = BucketSession::default();
        session.set_alternate_phone(" 03001234567 ").unwrap();
        assert_eq!(session.alternate_phone, "03001234567");

        assert!(session.set_alternate_phone("abc").is_err());
        assert_eq!(session.alternate_phone, "03001234567");
    }

    #[test]
    fn test_set_delivery_instructions_length_limit() {
        let mut session = BucketSession::default();
        assert!(session.set_delivery_instructions("Extra ketchup").is_ok());
        assert_eq!(session.delivery_instructions, "Extra ketchup");

        let long = "a".repeat(MAX_INSTRUCTIONS_CHARS + 1);
        assert!(session.set_delivery_instructions(&long).is_err());
        assert_eq!(session.delivery_instructions, "Extra ketchup");
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut session = BucketSession::new(TaxRate::from_bps(1700).unwrap());
        let old_id = session.id;
        session.add_item(&krunch());
        session.favorites.toggle("1");

        session.reset();
        assert_ne!(session.id, old_id);
        assert!(session.cart.is_empty());
        assert!(session.favorites.ids().is_empty());
        assert_eq!(session.cart.tax_rate().bps(), 1700);
    }

    #[test]
    fn test_session_state_shares_one_instance() {
        let state = SessionState::new(TaxRate::GST);
        let other = state.clone();

        state.update(|s| s.add_item(&krunch())).unwrap();
        let count = other.read(|s| s.cart.item_count()).unwrap();
        assert_eq!(count, 1);
    }
}
