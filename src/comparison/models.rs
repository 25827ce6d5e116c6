use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 比較対象のマーケットプレイス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    Flipkart,
    Amazon,
}

impl Marketplace {
    /// 表示用ラベルを取得
    pub fn label(&self) -> &'static str {
        match self {
            Marketplace::Flipkart => "Flipkart",
            Marketplace::Amazon => "Amazon",
        }
    }

    /// クエリパラメータ名を取得
    pub fn query_param(&self) -> &'static str {
        match self {
            Marketplace::Flipkart => "flipkart_url",
            Marketplace::Amazon => "amazon_url",
        }
    }
}

/// 比較の勝者（同点を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Flipkart,
    Amazon,
    Tie,
}

impl Winner {
    /// 勝者のマーケットプレイス（同点の場合はNone）
    pub fn marketplace(&self) -> Option<Marketplace> {
        match self {
            Winner::Flipkart => Some(Marketplace::Flipkart),
            Winner::Amazon => Some(Marketplace::Amazon),
            Winner::Tie => None,
        }
    }
}

/// 1件のカスタマーレビュー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// レビュー評価（0〜5）
    #[serde(default)]
    pub rating: f64,
    /// レビュー本文
    #[serde(default)]
    pub text: String,
}

/// 商品スペック（存在するフィールドのみ）
///
/// バックエンドは商品オブジェクト直下にフラットなキーとして返すため、
/// `Product` には serde flatten で埋め込む。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductSpecs {
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub display: Option<String>,
    pub processor: Option<String>,
    pub camera: Option<String>,
    pub battery: Option<String>,
}

impl ProductSpecs {
    /// 抽出できたスペック項目数
    pub fn present_count(&self) -> usize {
        [
            &self.ram,
            &self.storage,
            &self.display,
            &self.processor,
            &self.camera,
            &self.battery,
        ]
        .iter()
        .filter(|field| field.is_some())
        .count()
    }
}

/// AIスコアの内訳（4項目、上限はバックエンド側の配点）
///
/// rating_score ≤ 40 / sentiment_score ≤ 30 / category_score ≤ 20 /
/// specs_score ≤ 10。category と specs は小数になり得る。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiBreakdown {
    #[serde(default)]
    pub rating_score: f64,
    #[serde(default)]
    pub sentiment_score: f64,
    #[serde(default)]
    pub category_score: f64,
    #[serde(default)]
    pub specs_score: f64,
}

/// 価格差情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDifference {
    /// 差額（非負）
    pub amount: f64,
    /// 安い方のマーケットプレイス
    pub cheaper_on: Marketplace,
    /// 高い方に対する割合（%）
    pub percentage: f64,
}

/// 1つのマーケットプレイスから抽出された商品情報
///
/// バックエンドから受信した後は不変として扱う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: Option<String>,
    /// 通貨記号付きの表示用価格文字列
    pub price: Option<String>,
    /// 星評価（0〜5）
    pub rating: Option<f64>,
    /// 商品画像URL
    pub image: Option<String>,
    #[serde(flatten)]
    pub specs: ProductSpecs,
    /// カテゴリ別評価（カテゴリ名 → 0〜5）
    #[serde(default)]
    pub category_ratings: HashMap<String, f64>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// AI総合スコア（0〜100）
    pub ai_score: Option<u32>,
    pub ai_verdict: Option<String>,
    #[serde(default)]
    pub ai_reasons: Vec<String>,
    pub ai_breakdown: Option<AiBreakdown>,
    /// 送信した商品ページURL（バックエンドがエコーする）
    pub url: Option<String>,
}

/// 1回の比較リクエストの結果
///
/// 少なくとも一方の商品スロットが埋まっている状態でのみセッションの
/// Success に到達する（両方欠落は ComparisonFailed として扱う）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub flipkart: Option<Product>,
    pub amazon: Option<Product>,
    pub winner: Option<Winner>,
    pub price_difference: Option<PriceDifference>,
}

impl ComparisonResult {
    /// いずれかの商品スロットが埋まっているか
    pub fn has_any_product(&self) -> bool {
        self.flipkart.is_some() || self.amazon.is_some()
    }

    /// 指定マーケットプレイスの商品を取得
    pub fn product(&self, market: Marketplace) -> Option<&Product> {
        match market {
            Marketplace::Flipkart => self.flipkart.as_ref(),
            Marketplace::Amazon => self.amazon.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_lowercase_wire_format() {
        let winner: Winner = serde_json::from_str("\"flipkart\"").unwrap();
        assert_eq!(winner, Winner::Flipkart);
        let tie: Winner = serde_json::from_str("\"tie\"").unwrap();
        assert_eq!(tie, Winner::Tie);
        assert_eq!(serde_json::to_string(&Winner::Amazon).unwrap(), "\"amazon\"");
    }

    #[test]
    fn test_winner_marketplace_excludes_tie() {
        assert_eq!(Winner::Flipkart.marketplace(), Some(Marketplace::Flipkart));
        assert_eq!(Winner::Amazon.marketplace(), Some(Marketplace::Amazon));
        assert_eq!(Winner::Tie.marketplace(), None);
    }

    #[test]
    fn test_product_parses_flat_spec_keys() {
        let raw = serde_json::json!({
            "title": "Test Phone 5G",
            "price": "₹24,999",
            "rating": 4.3,
            "ram": "8 GB",
            "storage": "128 GB",
            "battery": "5000 mAh",
            "category_ratings": {"Camera": 4.2, "Battery": 4.6},
            "reviews": [{"rating": 5.0, "text": "Great phone"}],
            "ai_score": 78,
            "ai_verdict": "🟢 Recommended",
            "ai_reasons": ["Excellent 4.3/5 customer rating"],
            "ai_breakdown": {
                "rating_score": 33,
                "sentiment_score": 24,
                "category_score": 17.6,
                "specs_score": 5.0
            }
        });
        let product: Product = serde_json::from_value(raw).unwrap();
        assert_eq!(product.specs.ram.as_deref(), Some("8 GB"));
        assert_eq!(product.specs.present_count(), 3);
        assert_eq!(product.ai_score, Some(78));
        let breakdown = product.ai_breakdown.unwrap();
        assert_eq!(breakdown.category_score, 17.6);
    }

    #[test]
    fn test_comparison_result_slot_checks() {
        let raw = serde_json::json!({
            "flipkart": {"title": "Phone", "price": "₹19,999"},
            "amazon": null,
            "winner": "flipkart",
            "price_difference": null
        });
        let result: ComparisonResult = serde_json::from_value(raw).unwrap();
        assert!(result.has_any_product());
        assert!(result.product(Marketplace::Flipkart).is_some());
        assert!(result.product(Marketplace::Amazon).is_none());

        let empty = ComparisonResult {
            flipkart: None,
            amazon: None,
            winner: None,
            price_difference: None,
        };
        assert!(!empty.has_any_product());
    }
}
