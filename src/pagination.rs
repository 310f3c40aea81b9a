use std::fmt;

/// Entry in the pagination bar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageItem {
    Page(u64),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(page) => write!(f, "{page}"),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page links to show for `current_page` out of `total_pages`.
///
/// Up to seven pages are all listed. Past that the first and last pages stay
/// visible and the rest collapse around the current page.
pub fn generate_pagination(current_page: u64, total_pages: u64) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![Page(1), Page(2), Page(3), Ellipsis, Page(total_pages - 1), Page(total_pages)];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(items: &[PageItem]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn lists_every_page_up_to_seven() {
        assert_eq!(render(&generate_pagination(1, 5)), ["1", "2", "3", "4", "5"]);
        assert_eq!(render(&generate_pagination(7, 7)), ["1", "2", "3", "4", "5", "6", "7"]);

        for total in 0..=7 {
            for current in 1..=total.max(1) {
                let expected: Vec<_> = (1..=total).map(PageItem::Page).collect();
                assert_eq!(generate_pagination(current, total), expected);
            }
        }
    }

    #[test]
    fn no_pages_renders_nothing() {
        assert!(generate_pagination(1, 0).is_empty());
    }

    #[test]
    fn near_the_start() {
        assert_eq!(render(&generate_pagination(1, 8)), ["1", "2", "3", "...", "7", "8"]);
        assert_eq!(render(&generate_pagination(3, 10)), ["1", "2", "3", "...", "9", "10"]);
    }

    #[test]
    fn near_the_end() {
        assert_eq!(render(&generate_pagination(8, 10)), ["1", "2", "...", "8", "9", "10"]);
        assert_eq!(render(&generate_pagination(20, 20)), ["1", "2", "...", "18", "19", "20"]);
    }

    #[test]
    fn in_the_middle() {
        assert_eq!(render(&generate_pagination(4, 10)), ["1", "...", "3", "4", "5", "...", "10"]);
        assert_eq!(render(&generate_pagination(7, 10)), ["1", "...", "6", "7", "8", "...", "10"]);
    }

    #[test]
    fn out_of_range_page_shows_the_tail() {
        assert_eq!(render(&generate_pagination(50, 10)), ["1", "2", "...", "8", "9", "10"]);
    }
}
