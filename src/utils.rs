// セッションコア用ユーティリティ関数

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static FLIPKART_PRODUCT_RE: OnceLock<Regex> = OnceLock::new();
static AMAZON_PRODUCT_RE: OnceLock<Regex> = OnceLock::new();

fn flipkart_product_re() -> &'static Regex {
    FLIPKART_PRODUCT_RE.get_or_init(|| {
        Regex::new(r"^(https://(?:www|m)\.flipkart\.com/[^?#]+/p/[a-zA-Z0-9]+)").unwrap()
    })
}

fn amazon_product_re() -> &'static Regex {
    AMAZON_PRODUCT_RE.get_or_init(|| {
        Regex::new(r"^(https://www\.amazon\.[a-z.]+/[^?#]*/dp/[A-Z0-9]{10})").unwrap()
    })
}

/// 商品URLの正規化
///
/// トラッキング用のクエリパラメータを取り除き、正規の商品ページURLのみを
/// 残す。Flipkartの商品IDは大文字小文字が混在する
/// (itmb07d67f995271 / MOBH4DQ)。どちらのパターンにも一致しないURLは
/// そのまま返す。
pub fn clean_product_url(url: &str) -> String {
    if let Some(captures) = flipkart_product_re().captures(url) {
        return captures[1].to_string();
    }
    if let Some(captures) = amazon_product_re().captures(url) {
        return captures[1].to_string();
    }
    url.to_string()
}

/// 既知のマーケットプレイスの商品URLらしいか
pub fn looks_like_product_url(url: &str) -> bool {
    flipkart_product_re().is_match(url) || amazon_product_re().is_match(url)
}

/// 履歴エントリ用のローカル時刻フォーマット
pub fn format_local_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 強化されたログ初期化
pub fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    subscriber.try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_flipkart_url_strips_tracking() {
        let dirty = "https://www.flipkart.com/some-phone/p/itmb07d67f995271?pid=MOBH4DQ&lid=LST123";
        assert_eq!(
            clean_product_url(dirty),
            "https://www.flipkart.com/some-phone/p/itmb07d67f995271"
        );
    }

    #[test]
    fn test_clean_flipkart_mobile_host() {
        let dirty = "https://m.flipkart.com/some-phone/p/MOBH4DQABC?ref=share";
        assert_eq!(
            clean_product_url(dirty),
            "https://m.flipkart.com/some-phone/p/MOBH4DQABC"
        );
    }

    #[test]
    fn test_clean_amazon_url_strips_suffix() {
        let dirty = "https://www.amazon.in/Some-Phone/dp/B0ABCDEFGH/ref=sr_1_3?keywords=phone";
        assert_eq!(
            clean_product_url(dirty),
            "https://www.amazon.in/Some-Phone/dp/B0ABCDEFGH"
        );
    }

    #[test]
    fn test_unknown_url_passes_through() {
        let other = "https://example.com/product/123";
        assert_eq!(clean_product_url(other), other);
        assert!(!looks_like_product_url(other));
    }

    #[test]
    fn test_looks_like_product_url() {
        assert!(looks_like_product_url(
            "https://www.flipkart.com/x/p/itm123abc"
        ));
        assert!(looks_like_product_url(
            "https://www.amazon.in/x/dp/B012345678"
        ));
    }
}
