//! Вычисление набора кнопок пагинации.

/// Максимум страниц, отображаемых без «окна» с многоточиями.
const MAX_VISIBLE_PAGES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageItem {
    /// Кнопка с номером страницы.
    Page(u32),
    /// Разрыв между якорными страницами и окном вокруг текущей.
    Ellipsis,
}

/// Список кнопок для панели пагинации.
///
/// До пяти страниц — все подряд. Дальше: первая и последняя страницы
/// всегда, окно до трёх страниц вокруг текущей, многоточие на месте
/// каждого разрыва.
pub(crate) fn page_items(current: u32, total_pages: u32) -> Vec<PageItem> {
    let current = current.max(1);
    let mut items = Vec::new();

    if total_pages <= MAX_VISIBLE_PAGES {
        for page in 1..=total_pages {
            items.push(PageItem::Page(page));
        }
        return items;
    }

    items.push(PageItem::Page(1));

    if current > 3 {
        items.push(PageItem::Ellipsis);
    }

    let mut start = current.saturating_sub(1).max(2);
    let end = (start + 2).min(total_pages - 1);
    if end.saturating_sub(start) < 2 {
        start = end.saturating_sub(2).max(2);
    }
    for page in start..=end {
        items.push(PageItem::Page(page));
    }

    if current < total_pages - 2 {
        items.push(PageItem::Ellipsis);
    }

    items.push(PageItem::Page(total_pages));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn few_pages_render_without_ellipsis() {
        assert_eq!(page_items(1, 3), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn exactly_five_pages_render_all() {
        assert_eq!(
            page_items(3, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn middle_page_gets_two_ellipses() {
        assert_eq!(
            page_items(5, 10),
            vec![
                Page(1),
                Ellipsis,
                Page(4),
                Page(5),
                Page(6),
                Ellipsis,
                Page(10)
            ]
        );
    }

    #[test]
    fn first_page_window_starts_at_two() {
        assert_eq!(
            page_items(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn last_page_window_ends_before_last() {
        assert_eq!(
            page_items(10, 10),
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn near_start_has_only_trailing_ellipsis() {
        assert_eq!(
            page_items(3, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn near_end_has_only_leading_ellipsis() {
        assert_eq!(
            page_items(8, 10),
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn zero_pages_render_nothing() {
        assert!(page_items(1, 0).is_empty());
    }
}
