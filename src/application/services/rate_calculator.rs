//! Per-URL share of the campaign-wide clicks.
//!
//! Denominators are always the campaign totals from the report, never a
//! per-URL figure: a rate answers "what fraction of all clicks went here".

use crate::domain::entities::{CampaignSummary, LinkGroups, UrlRate, UrlTotals};
use crate::error::AppError;

/// Computes `click_rate = url.total / campaign.total` and
/// `unique_click_rate = url.unique / campaign.unique` for every URL, sorted
/// by click rate, highest first. Ties keep input order.
///
/// # Errors
///
/// Returns [`AppError::ZeroDenominator`] if the campaign reports zero total
/// or zero unique clicks.
pub fn compute_rates(
    totals: &[UrlTotals],
    summary: &CampaignSummary,
) -> Result<Vec<UrlRate>, AppError> {
    if summary.total_clicks == 0 {
        return Err(AppError::ZeroDenominator("total clicks"));
    }
    if summary.unique_clicks == 0 {
        return Err(AppError::ZeroDenominator("unique clicks"));
    }

    let campaign_total = summary.total_clicks as f64;
    let campaign_unique = summary.unique_clicks as f64;

    let rates = totals
        .iter()
        .map(|t| {
            UrlRate::new(
                t.url.clone(),
                t.total_clicks as f64 / campaign_total,
                t.unique_recipients as f64 / campaign_unique,
            )
        })
        .collect();

    Ok(sort_by_click_rate(rates))
}

/// Uses the provider's own per-link percentages instead of recomputing them.
///
/// For URLs tracked by several links, the first link's figures are taken.
pub fn passthrough_rates(groups: &LinkGroups) -> Vec<UrlRate> {
    let rates = groups
        .iter()
        .map(|g| {
            UrlRate::new(
                g.url.clone(),
                g.representative.click_percentage,
                g.representative.unique_click_percentage,
            )
        })
        .collect();

    sort_by_click_rate(rates)
}

/// Stable descending sort on `click_rate`.
pub fn sort_by_click_rate(mut rates: Vec<UrlRate>) -> Vec<UrlRate> {
    rates.sort_by(|a, b| b.click_rate.total_cmp(&a.click_rate));
    rates
}
