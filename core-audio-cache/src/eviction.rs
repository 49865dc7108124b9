//! Eviction planning.
//!
//! Two phases: entries idle past `max_age` are always expired, then the
//! least-recently-used quarter of what remains is trimmed repeatedly until
//! the byte and count budgets both hold. Trimming in batches bounds growth
//! under bursty use without evicting one entry per write.

use crate::config::CacheLimits;
use crate::fingerprint::Fingerprint;
use crate::index::CacheEntry;
use chrono::{DateTime, Utc};

// Divisor for the LRU trim batch: each round removes ceil(remaining / 4).
const TRIM_DIVISOR: usize = 4;

/// Select the entries to evict so the cache fits `limits` at `now`.
///
/// Pure: ranking comes entirely from the entries' `last_accessed_at`, so the
/// index stays the single source of truth and planning is trivially testable.
pub fn plan_evictions<'a, I>(entries: I, limits: &CacheLimits, now: DateTime<Utc>) -> Vec<Fingerprint>
where
    I: IntoIterator<Item = &'a CacheEntry>,
{
    let max_age = chrono::Duration::from_std(limits.max_age).unwrap_or(chrono::Duration::MAX);

    // Phase 1: hard-expire on idle age, regardless of the other budgets.
    let mut victims = Vec::new();
    let mut survivors: Vec<&CacheEntry> = Vec::new();
    for entry in entries {
        if now - entry.last_accessed_at > max_age {
            victims.push(entry.fingerprint.clone());
        } else {
            survivors.push(entry);
        }
    }

    // Phase 2: LRU trim in 25% batches until both budgets hold.
    survivors.sort_by_key(|e| e.last_accessed_at);

    let mut total_bytes: u64 = survivors.iter().map(|e| e.size_bytes).sum();
    let mut cut = 0usize;
    while cut < survivors.len()
        && (total_bytes > limits.max_total_bytes || survivors.len() - cut > limits.max_entry_count)
    {
        let remaining = survivors.len() - cut;
        let batch = remaining.div_ceil(TRIM_DIVISOR);
        for entry in &survivors[cut..cut + batch] {
            total_bytes -= entry.size_bytes;
            victims.push(entry.fingerprint.clone());
        }
        cut += batch;
    }

    victims
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::ClipSource;
    use std::time::Duration;

    fn limits(max_total_bytes: u64, max_entry_count: usize, max_age: Duration) -> CacheLimits {
        CacheLimits {
            max_total_bytes,
            max_entry_count,
            max_age,
        }
    }

    fn entry(url: &str, size: u64, last_accessed_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(&ClipSource::new(url), size, last_accessed_at)
    }

    #[test]
    fn test_within_budget_evicts_nothing() {
        let now = Utc::now();
        let entries = vec![
            entry("https://x/a", 10, now),
            entry("https://x/b", 10, now),
        ];

        let plan = plan_evictions(&entries, &limits(100, 10, Duration::from_secs(3600)), now);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_idle_entries_hard_expire_even_under_budget() {
        let now = Utc::now();
        let stale = now - chrono::Duration::hours(2);
        let entries = vec![
            entry("https://x/old", 10, stale),
            entry("https://x/new", 10, now),
        ];

        let plan = plan_evictions(&entries, &limits(100, 10, Duration::from_secs(3600)), now);
        assert_eq!(plan, vec![entries[0].fingerprint.clone()]);
    }

    #[test]
    fn test_recently_used_entries_never_age_out() {
        let now = Utc::now();
        // Created long ago but touched a minute ago.
        let mut e = entry("https://x/a", 10, now - chrono::Duration::minutes(1));
        e.created_at = now - chrono::Duration::days(365);

        let plan = plan_evictions([&e], &limits(100, 10, Duration::from_secs(3600)), now);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_count_budget_trims_least_recently_used() {
        let now = Utc::now();
        let a = entry("https://x/a", 1, now - chrono::Duration::seconds(3));
        let b = entry("https://x/b", 1, now - chrono::Duration::seconds(2));
        let c = entry("https://x/c", 1, now - chrono::Duration::seconds(1));

        let plan = plan_evictions(
            [&a, &b, &c],
            &limits(100, 2, Duration::from_secs(3600)),
            now,
        );
        assert_eq!(plan, vec![a.fingerprint.clone()]);
    }

    #[test]
    fn test_byte_budget_trims_in_quarter_batches() {
        let now = Utc::now();
        let entries: Vec<CacheEntry> = (0..8)
            .map(|i| {
                entry(
                    &format!("https://x/{i}"),
                    10,
                    now - chrono::Duration::seconds(100 - i),
                )
            })
            .collect();

        // 80 bytes held, 45 allowed: first batch of 2 leaves 60, second
        // batch of 2 leaves 40.
        let plan = plan_evictions(&entries, &limits(45, 100, Duration::from_secs(3600)), now);
        assert_eq!(plan.len(), 4);
        let expected: Vec<Fingerprint> =
            entries[..4].iter().map(|e| e.fingerprint.clone()).collect();
        assert_eq!(plan, expected);
    }

    #[test]
    fn test_trim_always_removes_at_least_one() {
        let now = Utc::now();
        let a = entry("https://x/a", 10, now - chrono::Duration::seconds(2));
        let b = entry("https://x/b", 10, now - chrono::Duration::seconds(1));

        // Over budget by one byte: a single eviction must still happen.
        let plan = plan_evictions([&a, &b], &limits(19, 100, Duration::from_secs(3600)), now);
        assert_eq!(plan, vec![a.fingerprint.clone()]);
    }

    #[test]
    fn test_oversized_single_entry_drains_cache() {
        let now = Utc::now();
        let a = entry("https://x/a", 1000, now);

        let plan = plan_evictions([&a], &limits(100, 100, Duration::from_secs(3600)), now);
        assert_eq!(plan, vec![a.fingerprint.clone()]);
    }

    #[test]
    fn test_no_entries_no_plan() {
        let entries: Vec<CacheEntry> = Vec::new();
        let plan = plan_evictions(&entries, &limits(100, 10, Duration::from_secs(3600)), Utc::now());
        assert!(plan.is_empty());
    }
}
