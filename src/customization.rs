//! 商品カスタマイズモーダルの状態
//!
//! 数量は1から始まり、減算は1で止まる。確定するとバケットへ数量分追加する。

use crate::cart::Cart;
use crate::catalog::MenuItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub item: MenuItem,
    pub quantity: i64,
    /// 「Drink (Optional)」セクションの開閉
    pub drink_expanded: bool,
    /// 「Add Ons (Optional)」セクションの開閉
    pub add_ons_expanded: bool,
}

impl Customization {
    pub fn open(item: MenuItem) -> Self {
        Self {
            item,
            quantity: 1,
            drink_expanded: false,
            add_ons_expanded: false,
        }
    }

    pub fn increment(&mut self) {
        self.quantity += 1;
    }

    pub fn decrement(&mut self) {
        self.quantity = (self.quantity - 1).max(1);
    }

    pub fn toggle_drink(&mut self) {
        self.drink_expanded = !self.drink_expanded;
    }

    pub fn toggle_add_ons(&mut self) {
        self.add_ons_expanded = !self.add_ons_expanded;
    }

    /// 「ADD TO BUCKET」ボタンに表示する金額
    pub fn line_price(&self) -> i64 {
        self.item.price * self.quantity
    }

    /// 選択した数量をバケットへ追加する
    pub fn commit(self, cart: &mut Cart) {
        log::debug!(
            "Customization committed: {} x{}",
            self.item.name,
            self.quantity
        );
        cart.add_quantity(&self.item, self.quantity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::TaxRate;
    use crate::catalog::Category;

    fn stacker() -> MenuItem {
        MenuItem::new(
            "5",
            "Zinger Stacker",
            "",
            690,
            "assets/images/Zinger_Stacker.png",
            Category::AlaCarteAndCombos,
        )
    }

    #[test]
    fn test_open_starts_with_quantity_one() {
        let modal = Customization::open(stacker());
        assert_eq!(modal.quantity, 1);
        assert!(!modal.drink_expanded);
        assert!(!modal.add_ons_expanded);
        assert_eq!(modal.line_price(), 690);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut modal = Customization::open(stacker());
        modal.decrement();
        modal.decrement();
        assert_eq!(modal.quantity, 1);

        modal.increment();
        modal.increment();
        assert_eq!(modal.quantity, 3);
        assert_eq!(modal.line_price(), 2070);
    }

    #[test]
    fn test_toggles() {
        let mut modal = Customization::open(stacker());
        modal.toggle_drink();
        assert!(modal.drink_expanded);
        assert!(!modal.add_ons_expanded);

        modal.toggle_add_ons();
        modal.toggle_drink();
        assert!(!modal.drink_expanded);
        assert!(modal.add_ons_expanded);
    }

    #[test]
    fn test_commit_adds_quantity_to_existing_line() {
        let mut cart = Cart::new(TaxRate::GST);
        cart.add(&stacker());

        let mut modal = Customization::open(stacker());
        modal.increment();
        modal.increment();
        modal.commit(&mut cart);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("5").unwrap().quantity, 4);
    }
}
