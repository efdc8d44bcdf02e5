//! メニュー画面のお気に入り（♥）

use serde::{Deserialize, Serialize};

/// お気に入りにした商品IDの集合（追加順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// お気に入りを切り替え、切り替え後の状態を返す
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(index) = self.ids.iter().position(|f| f == id) {
            self.ids.remove(index);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut favorites = Favorites::new();
        assert!(favorites.toggle("1"));
        assert!(favorites.contains("1"));

        assert!(!favorites.toggle("1"));
        assert!(!favorites.contains("1"));
        assert!(favorites.ids().is_empty());
    }

    #[test]
    fn test_ids_keep_insertion_order() {
        let mut favorites = Favorites::new();
        favorites.toggle("4");
        favorites.toggle("1");
        favorites.toggle("6");
        favorites.toggle("1");
        assert_eq!(favorites.ids(), ["4".to_string(), "6".to_string()]);
    }
}
