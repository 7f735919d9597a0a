use crate::models::{Item, Page, ViewMode};

/// Number of pages `item_count` items occupy in `mode`.
pub fn page_count(item_count: usize, mode: ViewMode) -> usize {
    item_count.div_ceil(mode.slots_per_page())
}

/// Splits the item list into pages for the given view mode.
///
/// # Algorithm
/// 1. Pick the slot count for the mode (1 for single, 4 for multi).
/// 2. Chunk the items in input order; page `p` holds `[p*n, p*n+n)`.
/// 3. The last page keeps only the items that exist; no padding is added.
///
/// Empty input yields no pages.
pub fn paginate(items: &[Item], mode: ViewMode) -> Vec<Page<'_>> {
    items
        .chunks(mode.slots_per_page())
        .enumerate()
        .map(|(index, chunk)| Page::new(index, chunk))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(count: u32) -> Vec<Item> {
        (1..=count)
            .map(|i| Item::new(i, format!("Item {}", i), format!("{}.jpg", i)))
            .collect()
    }

    #[test]
    fn test_empty_items() {
        assert!(paginate(&[], ViewMode::Single).is_empty());
        assert!(paginate(&[], ViewMode::Multi).is_empty());
        assert_eq!(page_count(0, ViewMode::Multi), 0);
    }

    #[test]
    fn test_single_one_page_per_item() {
        for n in 0..=9 {
            let items = make_items(n);
            let pages = paginate(&items, ViewMode::Single);
            assert_eq!(pages.len(), n as usize);
            for (i, page) in pages.iter().enumerate() {
                assert_eq!(page.index, i);
                assert_eq!(page.len(), 1);
                assert_eq!(page.items[0].id, i as u32 + 1);
            }
        }
    }

    #[test]
    fn test_multi_fills_all_but_last_page() {
        for n in 0..=13u32 {
            let items = make_items(n);
            let pages = paginate(&items, ViewMode::Multi);
            let expected_pages = (n as usize).div_ceil(4);
            assert_eq!(pages.len(), expected_pages, "n = {}", n);
            assert_eq!(page_count(n as usize, ViewMode::Multi), expected_pages);

            if let Some((last, full)) = pages.split_last() {
                assert!(full.iter().all(|page| page.len() == 4));
                let expected_last = if n % 4 == 0 { 4 } else { (n % 4) as usize };
                assert_eq!(last.len(), expected_last, "n = {}", n);
            }
        }
    }

    #[test]
    fn test_multi_keeps_input_order() {
        let items = make_items(10);
        let pages = paginate(&items, ViewMode::Multi);
        let ids: Vec<Vec<u32>> = pages.iter().map(|page| page.ids()).collect();
        assert_eq!(ids, vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10]]);
    }
}
