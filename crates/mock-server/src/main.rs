//! 開発用モックバックエンド
//!
//! Pythonのスクレイパーバックエンドを立てずにCLIとセッションコアを
//! 動かすための、/api/compare と /api/dashboard の缶詰レスポンス。

use clap::Parser;
use rand::Rng;
use std::collections::HashMap;
use warp::Filter;

#[derive(Parser)]
#[command(name = "mock-server", about = "Canned comparison backend for development")]
struct Args {
    /// 待ち受けポート
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// /api/compare をドメインエラーで応答させる
    #[arg(long)]
    fail_compare: bool,
    /// /api/dashboard を壊れたレスポンスで応答させる
    #[arg(long)]
    fail_dashboard: bool,
}

fn canned_product(market: &str, url: Option<&String>) -> serde_json::Value {
    let mut rng = rand::thread_rng();
    let ai_score: i64 = match market {
        "flipkart" => rng.gen_range(70..90),
        _ => rng.gen_range(60..85),
    };
    serde_json::json!({
        "title": format!("Mock Phone 5G ({market})"),
        "price": if market == "flipkart" { "₹24,999" } else { "₹26,499" },
        "rating": 4.3,
        "image": null,
        "ram": "8 GB",
        "storage": "128 GB",
        "battery": "5000 mAh",
        "category_ratings": {"Camera": 4.2, "Battery": 4.6, "Display": 4.4},
        "reviews": [
            {"rating": 5.0, "text": "Excellent value for money"},
            {"rating": 4.0, "text": "Battery easily lasts a day"},
            {"rating": 4.5, "text": "Camera is great in daylight"},
            {"rating": 3.0, "text": "Heats up while gaming"}
        ],
        "ai_score": ai_score,
        "ai_verdict": "🟢 Recommended",
        "ai_reasons": ["Excellent 4.3/5 customer rating", "75% positive review sentiment"],
        "ai_breakdown": {
            "rating_score": 33,
            "sentiment_score": 24,
            "category_score": 17.6,
            "specs_score": 5.0
        },
        "url": url
    })
}

fn compare_payload(params: &HashMap<String, String>) -> (serde_json::Value, u16) {
    let flipkart_url = params.get("flipkart_url");
    let amazon_url = params.get("amazon_url");
    if flipkart_url.is_none() && amazon_url.is_none() {
        return (
            serde_json::json!({"error": "Please provide at least one product URL"}),
            400,
        );
    }

    let flipkart = flipkart_url.map(|url| canned_product("flipkart", Some(url)));
    let amazon = amazon_url.map(|url| canned_product("amazon", Some(url)));

    let f_score = flipkart.as_ref().and_then(|p| p["ai_score"].as_i64());
    let a_score = amazon.as_ref().and_then(|p| p["ai_score"].as_i64());
    let (winner, price_difference) = match (f_score, a_score) {
        (Some(f), Some(a)) => {
            let winner = if (f - a).abs() < 3 {
                "tie"
            } else if f > a {
                "flipkart"
            } else {
                "amazon"
            };
            let diff = serde_json::json!({
                "amount": 1500.0,
                "cheaper_on": "flipkart",
                "percentage": 5.7,
            });
            (Some(winner), Some(diff))
        }
        (Some(_), None) => (Some("flipkart"), None),
        (None, Some(_)) => (Some("amazon"), None),
        (None, None) => (None, None),
    };

    let payload = serde_json::json!({
        "flipkart": flipkart,
        "amazon": amazon,
        "winner": winner,
        "price_difference": price_difference,
        "status": "success",
    });
    (payload, 200)
}

fn dashboard_payload() -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "count": 2,
        "products": [
            {
                "title": "Mock Phone 5G (flipkart)",
                "price": "₹24,999",
                "ai_score": 82,
                "created_at": chrono::Utc::now().to_rfc3339(),
            },
            {
                "title": "Mock Phone 5G (amazon)",
                "price": "₹26,499",
                "ai_score": 76,
                "created_at": chrono::Utc::now().to_rfc3339(),
            }
        ],
    })
}

fn json_response(payload: serde_json::Value, status: u16) -> warp::http::Response<String> {
    warp::http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(payload.to_string())
        .expect("static response")
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    let fail_compare = args.fail_compare;
    let fail_dashboard = args.fail_dashboard;

    let compare = warp::path!("api" / "compare")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .map(move |params: HashMap<String, String>| {
            log::info!("compare request: {:?}", params.keys().collect::<Vec<_>>());
            if fail_compare {
                return json_response(serde_json::json!({"error": "Invalid URL"}), 200);
            }
            let (payload, status) = compare_payload(&params);
            json_response(payload, status)
        });

    let dashboard = warp::path!("api" / "dashboard")
        .and(warp::get())
        .map(move || {
            log::info!("dashboard request");
            if fail_dashboard {
                // JSONとして壊れたボディを返し、クライアント側の縮退を踏ませる
                warp::http::Response::builder()
                    .status(500)
                    .body("mock backend failure".to_string())
                    .expect("static response")
            } else {
                json_response(dashboard_payload(), 200)
            }
        });

    log::info!("🦅 mock comparison backend on http://127.0.0.1:{}", args.port);
    warp::serve(compare.or(dashboard))
        .run(([127, 0, 0, 1], args.port))
        .await;
}
