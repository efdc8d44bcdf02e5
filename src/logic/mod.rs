//! Tauriコマンドから呼び出すビジネスロジック
//!
//! 各関数は `CatalogRepository` と `SessionState` を受け取り、
//! コマンド層はこれらへの薄い委譲だけを行う。

pub mod bucket_logic;
pub mod home_logic;
pub mod menu_logic;
