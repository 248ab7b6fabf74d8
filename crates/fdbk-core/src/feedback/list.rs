use std::fmt;
use std::str::FromStr;

use super::FeedbackRecord;

/// Rows per page.
pub const PAGE_SIZE: usize = 5;

/// List ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    RatingDesc,
    RatingAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::DateDesc,
        SortOrder::DateAsc,
        SortOrder::RatingDesc,
        SortOrder::RatingAsc,
    ];

    /// Stable identifier used on the command line.
    pub fn id(self) -> &'static str {
        match self {
            SortOrder::DateDesc => "date-desc",
            SortOrder::DateAsc => "date-asc",
            SortOrder::RatingDesc => "rating-desc",
            SortOrder::RatingAsc => "rating-asc",
        }
    }

    /// Label shown in the order picker.
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::DateDesc => "Data: Mais recentes",
            SortOrder::DateAsc => "Data: Mais antigas",
            SortOrder::RatingDesc => "Nota: Maior para menor",
            SortOrder::RatingAsc => "Nota: Menor para maior",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.id() == s)
            .ok_or_else(|| {
                let known: Vec<_> = SortOrder::ALL.iter().map(|o| o.id()).collect();
                format!("unknown order '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Sorts records with a stable sort. Records without a date sort as the
/// earliest instant.
pub fn sort(records: &[FeedbackRecord], order: SortOrder) -> Vec<FeedbackRecord> {
    let mut sorted = records.to_vec();
    match order {
        SortOrder::DateDesc => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::DateAsc => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::RatingDesc => sorted.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortOrder::RatingAsc => sorted.sort_by_key(|r| r.rating),
    }
    sorted
}

/// Keeps records whose name or comment contains `search`, ignoring case.
pub fn filter(records: Vec<FeedbackRecord>, search: &str) -> Vec<FeedbackRecord> {
    if search.is_empty() {
        return records;
    }
    let needle = search.to_lowercase();
    records
        .into_iter()
        .filter(|r| {
            r.user_name.to_lowercase().contains(&needle) || r.comment.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of pages needed for `count` records; 0 when there are none.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Returns the 1-based page `current` of `records`. Out-of-range pages are empty.
pub fn page(records: &[FeedbackRecord], current: usize) -> &[FeedbackRecord] {
    let start = current.saturating_sub(1).saturating_mul(PAGE_SIZE);
    if current == 0 || start >= records.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(records.len());
    &records[start..end]
}

/// Fetched feedback plus the user's current order, search, and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackList {
    records: Vec<FeedbackRecord>,
    order: SortOrder,
    search: String,
    current_page: usize,
}

impl FeedbackList {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            order: SortOrder::default(),
            search: String::new(),
            current_page: 1,
        }
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Replaces the collection wholesale and returns to page 1.
    pub fn replace(&mut self, records: Vec<FeedbackRecord>) {
        self.records = records;
        self.current_page = 1;
    }

    pub fn set_order(&mut self, order: SortOrder) {
        if self.order != order {
            self.order = order;
            self.current_page = 1;
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.search != search {
            self.search = search;
            self.current_page = 1;
        }
    }

    /// Moves to the previous page. Returns false on page 1.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Moves to the next page. Returns false on the last page.
    pub fn next_page(&mut self) -> bool {
        let total = total_pages(self.filtered().len());
        if self.current_page < total {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    fn filtered(&self) -> Vec<FeedbackRecord> {
        filter(sort(&self.records, self.order), &self.search)
    }

    /// Derives the visible rows: `page(filter(sort(records)))`.
    pub fn view(&self) -> FeedbackView {
        let filtered = self.filtered();
        FeedbackView {
            rows: page(&filtered, self.current_page).to_vec(),
            current_page: self.current_page,
            total_pages: total_pages(filtered.len()),
            filtered_count: filtered.len(),
        }
    }
}

impl Default for FeedbackList {
    fn default() -> Self {
        Self::new()
    }
}

/// One rendered page of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub rows: Vec<FeedbackRecord>,
    pub current_page: usize,
    /// 0 when nothing matches.
    pub total_pages: usize,
    pub filtered_count: usize,
}

impl FeedbackView {
    /// Page count as shown to the user, never below 1.
    pub fn displayed_total_pages(&self) -> usize {
        self.total_pages.max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.total_pages != 0 && self.current_page < self.total_pages
    }

    pub fn page_label(&self) -> String {
        format!(
            "Página {} de {}",
            self.current_page,
            self.displayed_total_pages()
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn record(id: &str, name: &str, comment: &str, rating: i64, day: Option<u32>) -> FeedbackRecord {
        FeedbackRecord {
            id: id.to_string(),
            user_name: name.to_string(),
            comment: comment.to_string(),
            rating,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()),
        }
    }

    fn seven() -> Vec<FeedbackRecord> {
        vec![
            record("a", "Ana", "bom", 3, Some(1)),
            record("b", "Bruno", "excelente", 5, Some(2)),
            record("c", "Carla", "ruim", 1, Some(3)),
            record("d", "Davi", "ok", 4, Some(4)),
            record("e", "Eva", "muito bom", 5, Some(5)),
            record("f", "Fábio", "regular", 2, Some(6)),
            record("g", "Gabi", "gostei", 4, Some(7)),
        ]
    }

    fn ids(records: &[FeedbackRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_seven_records_rating_desc() {
        let mut list = FeedbackList::new();
        list.replace(seven());
        list.set_order(SortOrder::RatingDesc);

        let view = list.view();
        assert_eq!(ids(&view.rows), vec!["b", "e", "d", "g", "a"]);
        assert_eq!(view.page_label(), "Página 1 de 2");
        assert!(view.has_next());
        assert!(!view.has_prev());

        assert!(list.next_page());
        let view = list.view();
        assert_eq!(ids(&view.rows), vec!["f", "c"]);
        assert!(!view.has_next());
        assert!(view.has_prev());
        assert!(!list.next_page());
    }

    #[test]
    fn test_orders_respect_their_keys() {
        let records = seven();
        for order in SortOrder::ALL {
            let sorted = sort(&records, order);
            assert_eq!(sorted.len(), records.len());
            for pair in sorted.windows(2) {
                let ok = match order {
                    SortOrder::DateDesc => pair[0].created_at >= pair[1].created_at,
                    SortOrder::DateAsc => pair[0].created_at <= pair[1].created_at,
                    SortOrder::RatingDesc => pair[0].rating >= pair[1].rating,
                    SortOrder::RatingAsc => pair[0].rating <= pair[1].rating,
                };
                assert!(ok, "{order} out of order: {:?}", ids(pair));
            }
            assert_eq!(sort(&sorted, order), sorted, "{order} is not idempotent");
        }
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let records = seven();
        assert_eq!(
            ids(&sort(&records, SortOrder::RatingDesc)),
            vec!["b", "e", "d", "g", "a", "f", "c"]
        );
        assert_eq!(
            ids(&sort(&records, SortOrder::RatingAsc)),
            vec!["c", "f", "a", "d", "g", "b", "e"]
        );
    }

    #[test]
    fn test_missing_date_sorts_earliest() {
        let records = vec![
            record("dated", "A", "", 1, Some(2)),
            record("undated", "B", "", 1, None),
        ];
        assert_eq!(
            ids(&sort(&records, SortOrder::DateAsc)),
            vec!["undated", "dated"]
        );
        assert_eq!(
            ids(&sort(&records, SortOrder::DateDesc)),
            vec!["dated", "undated"]
        );
    }

    #[test]
    fn test_filter_is_subset_and_case_insensitive() {
        let records = seven();
        let hits = filter(records.clone(), "BOM");
        assert_eq!(ids(&hits), vec!["a", "e"]);
        assert!(hits.iter().all(|h| records.contains(h)));

        assert_eq!(ids(&filter(records.clone(), "fáb")), vec!["f"]);
        assert_eq!(filter(records.clone(), ""), records);
        assert!(filter(records, "zzz").is_empty());
    }

    #[test]
    fn test_pages_concatenate_to_filtered() {
        let records = seven();
        let total = total_pages(records.len());
        assert_eq!(total, 2);

        let mut joined = Vec::new();
        for p in 1..=total {
            let chunk = page(&records, p);
            assert!(chunk.len() <= PAGE_SIZE);
            joined.extend_from_slice(chunk);
        }
        assert_eq!(joined, records);
        assert!(page(&records, 3).is_empty());
        assert!(page(&records, 0).is_empty());
    }

    #[test]
    fn test_empty_list_view() {
        let view = FeedbackList::new().view();
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.page_label(), "Página 1 de 1");
        assert!(!view.has_prev());
        assert!(!view.has_next());
    }

    #[test]
    fn test_search_and_order_changes_reset_page() {
        let mut list = FeedbackList::new();
        list.replace(seven());
        assert!(list.next_page());
        list.set_search("o");
        assert_eq!(list.current_page(), 1);

        list.set_search("");
        assert!(list.next_page());
        list.set_order(SortOrder::DateAsc);
        assert_eq!(list.current_page(), 1);

        assert!(list.next_page());
        list.set_order(SortOrder::DateAsc);
        assert_eq!(list.current_page(), 2, "same order keeps the page");
    }

    #[test]
    fn test_replace_resets_page() {
        let mut list = FeedbackList::new();
        list.replace(seven());
        assert!(list.next_page());
        list.replace(seven());
        assert_eq!(list.current_page(), 1);
    }

    #[test]
    fn test_prev_page_stops_at_one() {
        let mut list = FeedbackList::new();
        assert!(!list.prev_page());
        assert_eq!(list.current_page(), 1);
    }

    #[test]
    fn test_order_ids_round_trip_and_reject_unknown() {
        for order in SortOrder::ALL {
            assert_eq!(order.id().parse::<SortOrder>(), Ok(order));
        }
        let err = "newest".parse::<SortOrder>().unwrap_err();
        assert!(err.contains("date-desc"));
    }
}
