//! Page-number bar layout.

use crate::search::MAX_PAGE;

/// Page numbers shown around the current page.
const PAGE_RANGE: u32 = 5;

/// Page numbers always shown at each end.
const MARGIN_PAGES: u32 = 1;

/// One element of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// "←" control.
    Prev,
    /// A page number.
    Page(u32),
    /// "…" gap between page numbers.
    Break,
    /// "→" control.
    Next,
}

impl PageItem {
    /// Returns the label shown in the bar.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Prev => String::from("\u{2190}"),
            Self::Page(page) => page.to_string(),
            Self::Break => String::from("\u{2026}"),
            Self::Next => String::from("\u{2192}"),
        }
    }

    /// Returns the page this item navigates to, or `None` if it is inert.
    ///
    /// `total` is capped at [`MAX_PAGE`].
    #[must_use]
    pub const fn target(self, current: u32, total: u32) -> Option<u32> {
        let total = if total > MAX_PAGE { MAX_PAGE } else { total };
        match self {
            Self::Prev if current > 1 => Some(current.saturating_sub(1)),
            Self::Next if current < total => Some(current.saturating_add(1)),
            Self::Page(page) if page != current => Some(page),
            Self::Prev | Self::Next | Self::Page(_) | Self::Break => None,
        }
    }
}

/// Lays out the bar for `current` of `total` pages.
///
/// Short ranges list every page. Longer ranges show a window of
/// [`PAGE_RANGE`] pages around `current`, the first and last page, and a
/// break wherever pages are skipped. `total` is capped at [`MAX_PAGE`].
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn items(current: u32, total: u32) -> Vec<PageItem> {
    let total = total.min(MAX_PAGE);
    let mut out = vec![PageItem::Prev];
    if total == 0 {
        out.push(PageItem::Next);
        return out;
    }
    let current = current.clamp(1, total);

    if total <= PAGE_RANGE + 2 * MARGIN_PAGES {
        out.extend((1..=total).map(PageItem::Page));
        out.push(PageItem::Next);
        return out;
    }

    let start = current
        .saturating_sub(PAGE_RANGE / 2)
        .clamp(1, total - PAGE_RANGE + 1);
    let end = start + PAGE_RANGE - 1;

    // A one-page gap shows the page instead of a break.
    if start > MARGIN_PAGES + 2 {
        out.extend((1..=MARGIN_PAGES).map(PageItem::Page));
        out.push(PageItem::Break);
    } else {
        out.extend((1..start).map(PageItem::Page));
    }
    out.extend((start..=end).map(PageItem::Page));
    let tail_start = total - MARGIN_PAGES + 1;
    if tail_start > end + 2 {
        out.push(PageItem::Break);
        out.extend((tail_start..=total).map(PageItem::Page));
    } else {
        out.extend((end + 1..=total).map(PageItem::Page));
    }
    out.push(PageItem::Next);
    out
}
