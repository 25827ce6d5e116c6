pub mod client; // 比較バックエンドとの境界
