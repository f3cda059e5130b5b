//! Cost-bounded truncation that keeps the result well-formed.
//!
//! The balancer copies tags and text to the output while the accumulated
//! cost, plus the cost of the end tags needed to close everything still
//! open, fits into the budget. Once something doesn't fit, text is cut at a
//! word boundary, parsing stops and the open tags are closed.

mod cost_filter;

pub use self::cost_filter::{CharCount, CostFilter, TextOnly, UrlEncodedLength};

use crate::html::requires_close;
use crate::token::{BeginTag, EndTag, Serialize, Text};
use crate::transform_stream::{Dispatcher, OutputBuffer, TokenHandler};

const ELLIPSIS: &str = "...";

// NOTE: costs are computed in i64 and clamped to this value, which stands
// for "doesn't fit in any budget".
const SENTINEL: i64 = u32::MAX as i64;

#[derive(Debug, Clone)]
pub struct BalanceSettings<F: CostFilter = CharCount> {
    pub cost_filter: F,
    /// Append `...` when text had to be truncated, if it fits the budget.
    pub ellipsis: bool,
    /// Drop end tags that close nothing the balancer has emitted. By default
    /// they are passed through at their own cost.
    pub drop_unmatched_end_tags: bool,
}

impl<F: CostFilter + Default> Default for BalanceSettings<F> {
    fn default() -> Self {
        BalanceSettings {
            cost_filter: F::default(),
            ellipsis: false,
            drop_unmatched_end_tags: false,
        }
    }
}

impl<F: CostFilter> BalanceSettings<F> {
    #[inline]
    pub fn with_cost_filter(cost_filter: F) -> Self {
        BalanceSettings {
            cost_filter,
            ellipsis: false,
            drop_unmatched_end_tags: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Balancer<F: CostFilter = CharCount> {
    settings: BalanceSettings<F>,
}

impl<F: CostFilter> Balancer<F> {
    #[inline]
    pub fn new(settings: BalanceSettings<F>) -> Self {
        Balancer { settings }
    }

    /// Returns the longest well-formed prefix of `html` whose cost, closing
    /// end tags included, doesn't exceed `max_cost`. Script and style
    /// content, comments and directives are left out.
    pub fn balance(&self, html: &str, max_cost: u32) -> String {
        let pass = BalancePass {
            settings: &self.settings,
            max_cost: i64::from(max_cost),
            used: 0,
            open_tags: Vec::new(),
            close_cost: 0,
            ellipsis_pending: false,
            done: false,
            output: OutputBuffer::with_capacity(html.len().min(max_cost as usize)),
        };

        Dispatcher::new(html, pass).parse().finish()
    }
}

/// Balances `html` to at most `max_cost` characters.
#[inline]
pub fn balance(html: &str, max_cost: u32) -> String {
    Balancer::<CharCount>::default().balance(html, max_cost)
}

#[inline]
fn clamp(cost: i64) -> i64 {
    cost.min(SENTINEL)
}

fn end_tag_markup(name: &str) -> String {
    format!("</{name}>")
}

struct BalancePass<'s, F: CostFilter> {
    settings: &'s BalanceSettings<F>,
    max_cost: i64,
    used: i64,
    // NOTE: names are kept as they were written so `<B>` gets closed by `</B>`.
    open_tags: Vec<String>,
    close_cost: i64,
    ellipsis_pending: bool,
    done: bool,
    output: OutputBuffer,
}

impl<F: CostFilter> BalancePass<'_, F> {
    #[inline]
    fn cost_filter(&self) -> &F {
        &self.settings.cost_filter
    }

    fn end_tag_cost(&self, name: &str) -> i64 {
        i64::from(self.cost_filter().markup_cost(&end_tag_markup(name)))
    }

    fn budget(&self) -> i64 {
        let left = (self.max_cost - self.used - self.close_cost).max(0);

        trace!(@budget "balancer", self.used, left);

        left
    }

    fn last_open(&self, name: &str) -> Option<usize> {
        self.open_tags
            .iter()
            .rposition(|open| open.eq_ignore_ascii_case(name))
    }

    /// Emits a tag if its cost fits, returns `false` once the budget is exhausted.
    fn try_emit(&mut self, markup: &dyn Serialize, raw: &str, tag_cost: i64) -> bool {
        if clamp(tag_cost) > self.budget() {
            trace!(@action "balancer", "stop at {:?}", raw);
            self.done = true;

            return false;
        }

        self.output.write_token(markup);
        self.used = clamp(self.used + i64::from(self.cost_filter().markup_cost(raw)));

        true
    }

    #[inline]
    fn ellipsis_cost(&self) -> i64 {
        i64::from(self.cost_filter().text_cost(ELLIPSIS))
    }

    fn finish(mut self) -> String {
        if self.ellipsis_pending {
            self.used = clamp(self.used + self.ellipsis_cost());
            self.output.write_str(ELLIPSIS);
        }

        for name in self.open_tags.iter().rev() {
            self.output.write_str(&end_tag_markup(name));
        }

        self.output.into_string()
    }
}

impl<F: CostFilter> TokenHandler for BalancePass<'_, F> {
    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        if tag.is_unterminated() {
            return;
        }

        let own_cost = i64::from(self.cost_filter().markup_cost(tag.raw()));
        let needs_close = requires_close(tag.name());

        let close_cost = if needs_close {
            self.end_tag_cost(tag.name())
        } else {
            0
        };

        if self.try_emit(&*tag, tag.raw(), own_cost + close_cost) && needs_close {
            self.open_tags.push(tag.name().to_string());
            self.close_cost = clamp(self.close_cost + close_cost);
        }
    }

    fn end_tag(&mut self, tag: &mut EndTag<'_>) {
        let own_cost = i64::from(self.cost_filter().markup_cost(tag.raw()));

        match self.last_open(tag.name()) {
            Some(idx) => {
                let close_cost = self.end_tag_cost(&self.open_tags[idx]);

                if self.try_emit(&*tag, tag.raw(), own_cost - close_cost) {
                    self.open_tags.remove(idx);
                    self.close_cost = (self.close_cost - close_cost).max(0);
                }
            }
            None if self.settings.drop_unmatched_end_tags => {
                trace!(@action "balancer", "drop unmatched {:?}", tag.raw());
            }
            None => {
                self.try_emit(&*tag, tag.raw(), own_cost);
            }
        }
    }

    fn text(&mut self, text: &mut Text<'_>) {
        let cost = i64::from(self.cost_filter().text_cost(text.raw()));
        let left = self.budget();

        if cost <= left {
            self.output.write_token(text);
            self.used = clamp(self.used + cost);

            return;
        }

        // NOTE: the ellipsis is only written if it fits along with the end
        // tags, otherwise the text gets the whole budget.
        let ellipsis_cost = self.ellipsis_cost();
        let with_ellipsis = self.settings.ellipsis && ellipsis_cost <= left;

        let text_budget = if with_ellipsis {
            left - ellipsis_cost
        } else {
            left
        };

        let text_budget = u32::try_from(text_budget).unwrap_or(u32::MAX);
        let kept = self.cost_filter().truncate_text(text.raw(), text_budget);

        trace!(@action "balancer", "truncate text to {:?}", kept);

        self.output.write_str(kept);
        self.used = clamp(self.used + i64::from(self.cost_filter().text_cost(kept)));
        self.ellipsis_pending = with_ellipsis;
        self.done = true;
    }

    #[inline]
    fn is_done(&self) -> bool {
        self.done
    }
}
