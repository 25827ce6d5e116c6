/// 星評価の表示分解（満星・半星・空星）
///
/// 常に `full + half + empty == 5` が成り立つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarDisplay {
    pub full: u32,
    pub has_half: bool,
    pub empty: u32,
}

impl StarDisplay {
    /// 半星を0/1として取得
    pub fn half(&self) -> u32 {
        u32::from(self.has_half)
    }
}

/// 数値評価を星表示に分解する
///
/// 評価が無い商品は星を表示しない（エラーではなく定義済みの空ケース）。
/// 範囲外の値のクランプは呼び出し側の責務。
pub fn star_display(rating: Option<f64>) -> Option<StarDisplay> {
    let rating = rating?;
    let full = rating.floor() as u32;
    let has_half = rating - rating.floor() >= 0.5;
    let empty = 5 - full - u32::from(has_half);
    Some(StarDisplay {
        full,
        has_half,
        empty,
    })
}
