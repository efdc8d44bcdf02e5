//! アプリケーション設定ファイルの管理
//!
//! 税率・通貨表記・受け取り店舗などを bucket_config.json で管理する。
//! バケットの中身はセッション内のみで保持し、このファイルには保存しない。

use crate::cart::TaxRate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "bucket_config.json";

/// アプリケーション設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

/// 価格・税の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// 税率（ベーシスポイント、1600 = 16%）
    pub tax_rate_bps: u32,
    /// 金額の表示ラベル（"Rs"）
    pub currency_label: String,
}

/// 受け取り店舗の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub pickup_location: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pickup_location: "Johar town".to_string(),
        }
    }
}

/// ウィンドウ設定（デスクトップ実行時のサイズ）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl WindowConfig {
    const MIN_SIZE: u32 = 200;
    const MAX_SIZE: u32 = 10_000;

    pub fn validate(&self) -> Result<(), String> {
        let range = Self::MIN_SIZE..=Self::MAX_SIZE;
        if !range.contains(&self.width) {
            return Err(format!(
                "ウィンドウの幅は{}〜{}の範囲である必要があります",
                Self::MIN_SIZE,
                Self::MAX_SIZE
            ));
        }
        if !range.contains(&self.height) {
            return Err(format!(
                "ウィンドウの高さは{}〜{}の範囲である必要があります",
                Self::MIN_SIZE,
                Self::MAX_SIZE
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        // モバイル画面相当
        Self {
            width: 390,
            height: 844,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig {
                tax_rate_bps: TaxRate::GST.bps(),
                currency_label: "Rs".to_string(),
            },
            store: StoreConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn tax_rate(&self) -> Result<TaxRate, String> {
        TaxRate::from_bps(self.pricing.tax_rate_bps)
    }

    /// 税率とウィンドウサイズを検証する
    pub fn validate(&self) -> Result<(), String> {
        self.tax_rate()?;
        self.window.validate()
    }

    /// 金額を表示用に整形する（"Rs 1960"）
    pub fn format_price(&self, amount: i64) -> String {
        format!("{} {amount}", self.pricing.currency_label)
    }
}

/// 設定を読み込む。ファイルが存在しない場合はデフォルトを返し、保存する。
pub fn load(config_dir: &Path) -> Result<AppConfig, String> {
    let path = config_dir.join(CONFIG_FILENAME);

    if path.exists() {
        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        let config: AppConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Invalid config JSON: {e}"))?;
        config.validate()?;
        Ok(config)
    } else {
        let config = AppConfig::default();
        save(config_dir, &config)?;
        Ok(config)
    }
}

/// 設定を保存する。
pub fn save(config_dir: &Path, config: &AppConfig) -> Result<(), String> {
    config.validate()?;
    std::fs::create_dir_all(config_dir).map_err(|e| format!("Failed to create config dir: {e}"))?;

    let path = config_dir.join(CONFIG_FILENAME);
    let contents = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {e}"))?;

    fs::write(&path, contents).map_err(|e| format!("Failed to write config file: {e}"))
}
