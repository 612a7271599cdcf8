/// Number of pages needed for `total_items`, never less than one.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

/// Half-open `[start, end)` window for a 1-based page, clamped to the item count.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}

pub fn page_slice<T>(items: &[T], per_page: usize, page: usize) -> &[T] {
    let (start, end) = page_window(items.len(), per_page, page);
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::{page_slice, page_window, total_pages};

    #[test]
    fn page_counts() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn windows_clamp_to_items() {
        assert_eq!(page_window(25, 10, 1), (0, 10));
        assert_eq!(page_window(25, 10, 3), (20, 25));
        assert_eq!(page_window(25, 10, 4), (25, 25));
        assert_eq!(page_window(25, 10, 0), (0, 10));
    }

    #[test]
    fn slices_follow_windows() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(page_slice(&items, 2, 2), &[3, 4]);
        assert_eq!(page_slice(&items, 2, 3), &[5]);
        assert!(page_slice(&items, 2, 9).is_empty());
    }
}
