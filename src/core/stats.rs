//! Leaderboard aggregation over per-user counters.
//!
//! Turns a raw `user id -> count` map into ranked, paginated leaderboard
//! pages. Ordering is count descending with user id ascending as the
//! tie-break, so page contents are stable between renders.

use std::collections::HashMap;

/// Entries shown per leaderboard page.
pub const PAGE_SIZE: usize = 10;

/// Which counter a leaderboard ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Ping button confirmations.
    Button,
    /// Topic requests.
    Topic,
}

impl StatKind {
    /// Stable identifier used in button custom ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Topic => "topic",
        }
    }

    /// Parses the identifier produced by [`Self::as_str`].
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "button" => Some(Self::Button),
            "topic" => Some(Self::Topic),
            _ => None,
        }
    }

    /// Capitalized word used in the embed title.
    #[must_use]
    pub const fn title_word(self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::Topic => "Topic",
        }
    }

    /// Label prefix for each ranked entry.
    #[must_use]
    pub const fn entry_label(self) -> &'static str {
        match self {
            Self::Button => "Button Presses",
            Self::Topic => "Topics Used",
        }
    }
}

/// One ranked row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based rank across the whole leaderboard, not just this page
    pub rank: usize,
    /// The ranked user
    pub user_id: u64,
    /// The user's counter value
    pub count: u64,
}

/// A single rendered-ready leaderboard page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardPage {
    /// Rows on this page, highest count first
    pub entries: Vec<LeaderboardEntry>,
    /// 0-based page index after clamping
    pub page: usize,
    /// Highest valid 0-based page index
    pub max_page: usize,
}

/// Builds the requested leaderboard page from raw counters.
///
/// `page` is clamped into range, so callers can navigate past either end
/// without checking bounds first. An empty map yields a single empty page.
#[must_use]
pub fn build_page(stats: &HashMap<u64, u64>, page: usize) -> LeaderboardPage {
    let mut ranked: Vec<(u64, u64)> = stats.iter().map(|(&user, &count)| (user, count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let max_page = if ranked.is_empty() {
        0
    } else {
        (ranked.len() - 1) / PAGE_SIZE
    };
    let page = page.min(max_page);

    let entries = ranked
        .into_iter()
        .enumerate()
        .skip(page * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|(idx, (user_id, count))| LeaderboardEntry {
            rank: idx + 1,
            user_id,
            count,
        })
        .collect();

    LeaderboardPage {
        entries,
        page,
        max_page,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn stats_of(pairs: &[(u64, u64)]) -> HashMap<u64, u64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_stat_kind_identifiers_round_trip() {
        for kind in [StatKind::Button, StatKind::Topic] {
            assert_eq!(StatKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(StatKind::parse("presses"), None);
    }

    #[test]
    fn test_empty_stats_yield_single_empty_page() {
        let page = build_page(&HashMap::new(), 0);
        assert!(page.entries.is_empty());
        assert_eq!(page.page, 0);
        assert_eq!(page.max_page, 0);
    }

    #[test]
    fn test_sorted_by_count_descending() {
        let stats = stats_of(&[(1, 5), (2, 30), (3, 12)]);
        let page = build_page(&stats, 0);

        let order: Vec<u64> = page.entries.iter().map(|e| e.user_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(page.entries[0].rank, 1);
        assert_eq!(page.entries[2].rank, 3);
    }

    #[test]
    fn test_ties_break_by_user_id_ascending() {
        let stats = stats_of(&[(9, 4), (3, 4), (7, 4)]);
        let page = build_page(&stats, 0);

        let order: Vec<u64> = page.entries.iter().map(|e| e.user_id).collect();
        assert_eq!(order, vec![3, 7, 9]);
    }

    #[test]
    fn test_exactly_one_full_page() {
        let pairs: Vec<(u64, u64)> = (1..=10).map(|i| (i, i)).collect();
        let page = build_page(&stats_of(&pairs), 0);

        assert_eq!(page.entries.len(), PAGE_SIZE);
        assert_eq!(page.max_page, 0);
    }

    #[test]
    fn test_overflow_spills_to_second_page() {
        let pairs: Vec<(u64, u64)> = (1..=11).map(|i| (i, 100 - i)).collect();
        let stats = stats_of(&pairs);

        let first = build_page(&stats, 0);
        assert_eq!(first.entries.len(), PAGE_SIZE);
        assert_eq!(first.max_page, 1);

        let second = build_page(&stats, 1);
        assert_eq!(second.entries.len(), 1);
        // Ranks continue across pages.
        assert_eq!(second.entries[0].rank, 11);
        assert_eq!(second.entries[0].user_id, 11);
    }

    #[test]
    fn test_page_clamped_to_last() {
        let pairs: Vec<(u64, u64)> = (1..=11).map(|i| (i, i)).collect();
        let page = build_page(&stats_of(&pairs), 99);

        assert_eq!(page.page, 1);
        assert_eq!(page.entries.len(), 1);
    }
}
