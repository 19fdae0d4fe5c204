//! Global overflow pass: checks the grand total against the page budget.
//!
//! # Rules
//! - Over budget: shrink the summary one tier if it can shrink, then recompute
//! - Still over and the theme allows more pages: spill onto extra pages when
//!   the overage exceeds the theme's threshold
//! - Still over: one warning reporting the overage, never a failure

use tracing::{info, warn};

use crate::fitting::actions::{FitAction, Stage};
use crate::fitting::result::FittedContent;
use crate::fitting::summary::shrink_summary;
use crate::layout::themes::Theme;

/// Fitted content plus the number of pages it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedContent {
    pub content: FittedContent,
    pub pages: u32,
}

pub fn apply_global_pass(
    content: FittedContent,
    summary_text: Option<&str>,
    theme: &Theme,
) -> Stage<PagedContent> {
    let mut content = content;
    let mut actions = Vec::new();
    let budget = theme.page_budget();
    let mut total = content.total_units();

    if total > budget {
        let shrunk = match (&content.summary, summary_text) {
            (Some(current), Some(text)) => shrink_summary(text, current),
            _ => None,
        };
        if let Some(stage) = shrunk {
            content.summary = Some(stage.record(&mut actions));
            total = content.total_units();
        }
    }

    let pages = pages_needed(total, budget, theme);
    if pages > 1 {
        info!(pages, total, budget, theme = theme.id, "content spills onto extra pages");
        actions.push(FitAction::PageAdded { pages });
    }

    let paged_budget = budget * pages;
    if total > paged_budget {
        warn!(total, budget = paged_budget, theme = theme.id, "content exceeds page budget");
        actions.push(FitAction::Overflow {
            total,
            budget: paged_budget,
        });
    }

    Stage::new(PagedContent { content, pages }, actions)
}

/// One page unless the theme is multi-page and the overage ratio exceeds its
/// threshold; then enough pages for the total, capped at `max_pages`.
fn pages_needed(total: u32, budget: u32, theme: &Theme) -> u32 {
    let policy = &theme.pages;
    if total <= budget || budget == 0 || !policy.supports_multi_page() {
        return 1;
    }
    let overage_ratio = (total - budget) as f32 / budget as f32;
    if overage_ratio <= policy.overflow_threshold {
        return 1;
    }
    total.div_ceil(budget).min(policy.max_pages)
}
