//! Campaign card — server-side rendering of a [`CampaignSummary`].
//!
//! The card is a pure function of its input: [`CampaignCard::from_summary`]
//! resolves every displayed value and its [`Render`] impl turns the result into
//! an HTML fragment. Amounts and progress are displayed exactly as
//! given; negative amounts and progress above 100 are not corrected.

use crate::models::{CampaignStatus, CampaignSummary};
use maud::{html, Markup, Render};
use serde::Serialize;

/// Image shown when a campaign has no image of its own.
pub const DEFAULT_IMAGE: &str = "/amboro-main.jpg";

/// Badge icon shown next to the status of active campaigns.
pub const VERIFIED_ICON: &str = "/icons/verified.svg";

const VERIFIED_ICON_SIZE: u32 = 30;
const CURRENCY: &str = "Bs.";

/// Fully resolved view model of a campaign card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCard {
    pub id: String,
    pub title: String,
    pub image_src: String,
    pub status: CampaignStatus,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub show_verified: bool,
    pub detail_href: String,
    pub manage_href: String,
    pub category: String,
    pub location: String,
    pub amount_line: String,
    pub progress_width: String,
    pub progress_label: String,
}

impl CampaignCard {
    pub fn from_summary(summary: &CampaignSummary) -> Self {
        let info = summary.status.info();
        let progress = format_number(summary.progress);

        Self {
            id: summary.id.clone(),
            title: summary.title.clone(),
            image_src: resolve_image(summary.image_url.as_deref()).to_string(),
            status: summary.status,
            status_label: info.label,
            status_color: info.color,
            show_verified: summary.status == CampaignStatus::Active,
            detail_href: format!("/campaigns/{}", summary.id),
            manage_href: format!("/dashboard/campaigns/{}", summary.id),
            category: summary.category.clone(),
            location: summary.location.clone(),
            amount_line: amount_line(summary.raised_amount, summary.goal_amount),
            progress_width: format!("{progress}%"),
            progress_label: format!("{progress}%"),
        }
    }
}

impl Render for CampaignCard {
    fn render(&self) -> Markup {
        html! {
            div class="rounded-lg overflow-hidden bg-white border border-gray-100 hover:shadow-md transition-all" {
                div class="relative" {
                    div class="h-40 relative" {
                        img src=(self.image_src) alt=(self.title) class="object-cover" sizes="(max-width: 768px) 100vw, 384px";
                    }
                }

                div class="p-4" {
                    // Status badge, with the verified icon for active campaigns
                    div class="flex items-center gap-2 mb-3" {
                        @if self.show_verified {
                            img src=(VERIFIED_ICON) alt="Verified" width=(VERIFIED_ICON_SIZE) height=(VERIFIED_ICON_SIZE);
                        }
                        span
                            class=(format!("text-xs font-medium py-1 px-2 rounded-full {} flex items-center gap-1", self.status_color))
                            data-status=(self.status.as_key()) {
                            span class="text-lg inline-block leading-none" { "•" }
                            " "
                            (self.status_label)
                        }
                    }

                    h3 class="text-lg font-medium text-[#2c6e49] mb-2" {
                        a href=(self.detail_href) class="hover:underline" { (self.title) }
                    }

                    div class="flex text-sm text-gray-600 mb-4" {
                        span class="mr-4" { (self.category) }
                        " "
                        span { (self.location) }
                    }

                    div class="mb-2 flex justify-between text-sm" {
                        span class="text-gray-600" { "Recaudado" }
                        span class="font-medium" { (self.amount_line) }
                    }

                    // Progress track; the bar is allowed to overflow it
                    div class="w-full bg-gray-200 h-2 rounded-full mb-1" {
                        div class="bg-[#2c6e49] h-2 rounded-full" style=(format!("width: {}", self.progress_width)) {}
                    }
                    div class="text-right text-sm text-gray-500 mb-4" { (self.progress_label) }

                    div class="flex justify-start" {
                        a href=(self.manage_href) class="text-[#2c6e49] hover:bg-[#f0f7f1] flex items-center justify-center gap-2 px-0 font-bold" {
                            "Administrar Campaña"
                        }
                    }
                }
            }
        }
    }
}

/// Render a list of campaigns as a grid of cards.
pub fn render_grid(summaries: &[CampaignSummary]) -> Markup {
    metrics::counter!("portal.cards.rendered").increment(summaries.len() as u64);
    html! {
        div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6" {
            @for summary in summaries {
                (CampaignCard::from_summary(summary))
            }
        }
    }
}

fn resolve_image(image_url: Option<&str>) -> &str {
    match image_url {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_IMAGE,
    }
}

fn amount_line(raised: f64, goal: f64) -> String {
    format!(
        "{CURRENCY} {} de {}",
        format_grouped(raised),
        format_grouped(goal)
    )
}

/// Format a number with `,` thousands separators and at most three fraction
/// digits, trailing zeros dropped (`15000` → `15,000`, `1234.5` → `1,234.5`).
/// Ties round away from zero and negative inputs keep their sign, so
/// `-0.0001` gives `-0`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let fixed = fixed_3(value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), ""),
    };
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Three fraction digits of a non-negative number, ties away from zero.
///
/// `{:.3}` rounds the exact binary value correctly except on exact ties, where
/// it picks the even digit. An exact tie at three decimals is an odd multiple
/// of 1/16 (e.g. `0.0625`), which is detected and rounded up here.
fn fixed_3(abs: f64) -> String {
    let sixteenths = abs * 16.0;
    let exact_tie = sixteenths.fract() == 0.0 && sixteenths % 2.0 == 1.0 && abs < 1e12;
    if exact_tie {
        let thousandths = (abs * 1000.0).ceil() as u64;
        format!("{}.{:03}", thousandths / 1000, thousandths % 1000)
    } else {
        format!("{abs:.3}")
    }
}

/// Decimal form of a number as a JavaScript template literal prints it
/// (`120` → `120`, `45.5` → `45.5`, `-0` → `0`, `1e21` → `1e+21`).
fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if !(1e-6..1e21).contains(&abs) {
        let exp = format!("{value:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    format!("{value}")
}
