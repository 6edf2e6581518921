//! Pager integration tests
//!
//! Run with: cargo test --test pager_tests

use crewboard::pager::{PageState, Pager, total_pages, visible_page_numbers};

fn state_at(page: usize, page_size: usize, total_items: usize) -> PageState {
    let mut state = PageState::new(page_size);
    state.go_to(page, total_pages(total_items, page_size));
    state
}

#[test]
fn test_pages_partition_results() {
    let pager = Pager::default();
    for total in 0..40usize {
        for page_size in 1..=7usize {
            let items: Vec<usize> = (0..total).collect();
            let pages = total_pages(total, page_size);

            let mut collected = Vec::new();
            for page in 1..=pages {
                let view = pager.paginate(&items, &state_at(page, page_size, total));
                assert!(view.items.len() <= page_size);
                collected.extend(view.items);
            }
            assert_eq!(collected, items, "total={} size={}", total, page_size);
        }
    }
}

#[test]
fn test_total_pages_never_below_one() {
    assert_eq!(total_pages(0, 5), 1);
    assert_eq!(total_pages(5, 5), 1);
    assert_eq!(total_pages(6, 5), 2);
    assert_eq!(total_pages(12, 5), 3);
    assert_eq!(total_pages(3, 0), 3);
}

#[test]
fn test_window_shapes() {
    assert_eq!(visible_page_numbers(1, 1, 3), vec![1]);
    assert_eq!(visible_page_numbers(2, 2, 3), vec![1, 2]);
    assert_eq!(visible_page_numbers(1, 10, 3), vec![1, 2, 3]);
    assert_eq!(visible_page_numbers(5, 10, 3), vec![4, 5, 6]);
    assert_eq!(visible_page_numbers(10, 10, 3), vec![8, 9, 10]);
    assert_eq!(visible_page_numbers(3, 10, 4), vec![1, 2, 3, 4]);
    assert_eq!(visible_page_numbers(6, 10, 4), vec![4, 5, 6, 7]);
}

#[test]
fn test_window_is_contiguous_and_contains_current() {
    for total in 1..=15usize {
        for window in 1..=5usize {
            for current in 1..=total {
                let pages = visible_page_numbers(current, total, window);
                assert_eq!(pages.len(), window.min(total));
                assert!(pages.contains(&current));
                assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
                assert!(pages[0] >= 1 && *pages.last().unwrap() <= total);
            }
        }
    }
}

#[test]
fn test_empty_results() {
    let view = Pager::default().paginate::<u32>(&[], &PageState::new(5));
    assert!(view.items.is_empty());
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.visible_pages, vec![1]);
    assert!(!view.has_previous);
    assert!(!view.has_next);
    assert_eq!((view.first_item_index, view.last_item_index), (0, 0));
}

#[test]
fn test_go_to_keeps_page_in_range() {
    let mut state = PageState::new(5);
    for page in [0, 4, 100] {
        assert!(!state.go_to(page, 3));
        assert_eq!(state.current_page(), 1);
    }
    assert!(state.go_to(3, 3));
    assert_eq!(state.current_page(), 3);
}

#[test]
fn test_clamp_snaps_to_last_valid_page() {
    let mut state = state_at(3, 5, 11);
    assert_eq!(state.current_page(), 3);
    state.clamp(2);
    assert_eq!(state.current_page(), 2);
    state.clamp(0);
    assert_eq!(state.current_page(), 1);
}

#[test]
fn test_summary_indices() {
    let items: Vec<u32> = (1..=12).collect();
    let view = Pager::new(3).paginate(&items, &state_at(3, 5, items.len()));
    assert_eq!(view.items, vec![11, 12]);
    assert_eq!((view.first_item_index, view.last_item_index), (11, 12));
    assert!(view.has_previous);
    assert!(!view.has_next);
}
