//! バケット（カート）の明細と金額計算
//!
//! 明細は商品IDで一意。同じ商品を追加すると数量が増える。
//! 数量は常に1以上で、減算は1で止まる（削除は `remove` のみ）。

use crate::catalog::MenuItem;
use serde::{Deserialize, Serialize};

/// 税率（ベーシスポイント、1600 = 16%）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TaxRate(u32);

impl TaxRate {
    pub const MAX_BPS: u32 = 10_000;

    /// GST 16%
    pub const GST: TaxRate = TaxRate(1600);

    pub fn from_bps(bps: u32) -> Result<Self, String> {
        if bps > Self::MAX_BPS {
            return Err(format!(
                "税率は0〜{}ベーシスポイントの範囲である必要があります",
                Self::MAX_BPS
            ));
        }
        Ok(Self(bps))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    /// 表示用のパーセント値（16.0 など）
    pub fn percent(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// 税額を四捨五入（0.5は切り上げ）で求める。
    /// 浮動小数点を使わず整数演算のみで計算する。桁あふれは飽和させる。
    pub fn apply(&self, amount: i64) -> i64 {
        let scaled = amount.saturating_mul(i64::from(self.0));
        if scaled >= 0 {
            scaled.saturating_add(5_000) / 10_000
        } else {
            -(scaled.saturating_neg().saturating_add(5_000) / 10_000)
        }
    }
}

impl TryFrom<u32> for TaxRate {
    type Error = String;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::from_bps(bps)
    }
}

impl From<TaxRate> for u32 {
    fn from(rate: TaxRate) -> Self {
        rate.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::GST
    }
}

/// 数量変更の方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityDelta {
    Increment,
    Decrement,
}

impl QuantityDelta {
    fn step(self) -> i64 {
        match self {
            QuantityDelta::Increment => 1,
            QuantityDelta::Decrement => -1,
        }
    }
}

impl From<bool> for QuantityDelta {
    /// true = 増やす / false = 減らす
    fn from(increment: bool) -> Self {
        if increment {
            QuantityDelta::Increment
        } else {
            QuantityDelta::Decrement
        }
    }
}

/// バケットの明細（商品 + 数量）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item: MenuItem,
    pub quantity: i64,
}

impl LineItem {
    pub fn line_total(&self) -> i64 {
        self.item.price.saturating_mul(self.quantity)
    }
}

/// 金額サマリー（小計・税・合計）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    /// 画面表示用（"GST (16 %)"）
    pub tax_percent: f64,
}

/// バケット本体
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    entries: Vec<LineItem>,
    tax_rate: TaxRate,
}

impl Cart {
    pub fn new(tax_rate: TaxRate) -> Self {
        Self {
            entries: Vec::new(),
            tax_rate,
        }
    }

    /// 商品を1つ追加する。既存の明細があれば数量を+1する。
    pub fn add(&mut self, item: &MenuItem) {
        match self.position(&item.id) {
            Some(index) => {
                let line = &mut self.entries[index];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.entries.push(LineItem {
                item: item.clone(),
                quantity: 1,
            }),
        }
    }

    /// `add` を `count` 回呼ぶのと同じ。0以下なら何もしない。
    pub fn add_quantity(&mut self, item: &MenuItem, count: i64) {
        if count <= 0 {
            return;
        }
        self.add(item);
        if let Some(index) = self.position(&item.id) {
            let line = &mut self.entries[index];
            line.quantity = line.quantity.saturating_add(count - 1);
        }
    }

    /// 数量を±1する。1未満にはならない。IDが存在しなければ何もしない。
    pub fn set_quantity(&mut self, id: &str, delta: QuantityDelta) {
        if let Some(index) = self.position(id) {
            let line = &mut self.entries[index];
            line.quantity = line.quantity.saturating_add(delta.step()).max(1);
        }
    }

    /// 明細を削除する。IDが存在しなければ何もしない。
    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|line| line.item.id != id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn subtotal(&self) -> i64 {
        self.entries
            .iter()
            .map(LineItem::line_total)
            .fold(0, i64::saturating_add)
    }

    pub fn tax(&self) -> i64 {
        self.tax_rate.apply(self.subtotal())
    }

    pub fn total(&self) -> i64 {
        self.subtotal().saturating_add(self.tax())
    }

    pub fn summary(&self) -> BucketSummary {
        let subtotal = self.subtotal();
        let tax = self.tax_rate.apply(subtotal);
        BucketSummary {
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
            tax_percent: self.tax_rate.percent(),
        }
    }

    pub fn entries(&self) -> &[LineItem] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.entries.iter().find(|line| line.item.id == id)
    }

    /// 明細の件数（商品の種類数）
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 数量の合計
    pub fn item_count(&self) -> i64 {
        self.entries
            .iter()
            .map(|line| line.quantity)
            .fold(0, i64::saturating_add)
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|line| line.item.id == id)
    }
}
