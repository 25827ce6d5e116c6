use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::comparison::models::ComparisonResult;
use crate::utils;

/// セッション内に保持する比較履歴の上限件数
pub const HISTORY_CAPACITY: usize = 20;

/// 履歴エントリ
///
/// `HistoryCache::record` のみが生成する。生成後は不変で、破棄されるのは
/// 容量超過時の追い出しのときだけ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// セッション内で単調増加するID
    pub id: u64,
    /// コミット時点のローカル時刻文字列
    pub timestamp: String,
    pub result: ComparisonResult,
}

/// 比較履歴の有界キャッシュ（新しい順、FIFO追い出し）
///
/// 容量超過時の追い出しは呼び出し側に通知しない。
#[derive(Debug, Clone, Default)]
pub struct HistoryCache {
    entries: VecDeque<HistoryEntry>,
    next_id: u64,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 比較結果を履歴にコミットする
    ///
    /// 新しいIDとタイムスタンプを割り当てて先頭に挿入し、容量を超えた
    /// 最古のエントリを切り捨てる。
    pub fn record(&mut self, result: ComparisonResult) -> HistoryEntry {
        let entry = HistoryEntry {
            id: self.next_id,
            timestamp: utils::format_local_timestamp(),
            result,
        };
        self.next_id += 1;
        self.entries.push_front(entry.clone());
        self.entries.truncate(HISTORY_CAPACITY);
        entry
    }

    /// 全エントリを新しい順に取得（読み取り専用）
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// 最新のN件のエントリを取得
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().take(n)
    }

    /// 条件を満たすエントリ数を数える
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&HistoryEntry) -> bool,
    {
        self.entries.iter().filter(|entry| predicate(entry)).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
