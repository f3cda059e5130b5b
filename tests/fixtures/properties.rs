use html_tamer::parser::Tokenizer;
use html_tamer::token::{Serialize, Token};
use html_tamer::{
    balance, sterilize, thin, BalanceSettings, Balancer, CharCount, CostFilter, IndexedDocument,
    SanitizeFlags, TextOnly, ThinSettings, UrlEncodedLength,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use static_assertions::assert_impl_all;

assert_impl_all!(Balancer: Send, Sync, Clone);
assert_impl_all!(IndexedDocument: Send, Sync);
assert_impl_all!(SanitizeFlags: Send, Sync, Copy);
assert_impl_all!(ThinSettings: Send, Sync, Clone);

const FRAGMENTS: &[&str] = &[
    "<b>",
    "</b>",
    "<i>",
    "</i>",
    "<div class=box>",
    "</div>",
    "<p onclick=go()>",
    "<br>",
    "<a href='javascript:x()'>",
    "<a href=page.html>",
    "</a>",
    "<font color=red>",
    "</font>",
    "<table><tr><td>",
    "</table>",
    "<img src=a.png>",
    "<!-- note -->",
    "<script>run()</script>",
    "<a title=\"<script>go()</script>\">",
    "<span title='a<SCRIPT'>",
    "<scripts>",
    "<!-- <Script>x</script> -->",
    "<style>p{color:red}</style>",
    "one ",
    "two three ",
    "fish &amp; chips ",
    "\n",
];

fn random_html(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..40);

    (0..len)
        .filter_map(|_| FRAGMENTS.choose(rng).copied())
        .collect()
}

fn with_random_documents(mut check: impl FnMut(&str)) {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..300 {
        check(&random_html(&mut rng));
    }
}

/// Prices `html` the way the balancer does: text per character, everything
/// else as a whole.
fn cost_of<F: CostFilter>(cost_filter: &F, html: &str) -> u64 {
    Tokenizer::new(html)
        .map(|token| match &token {
            Token::Text(text) => cost_filter.text_cost(text.raw()),
            _ => cost_filter.markup_cost(&token.to_html()),
        })
        .map(u64::from)
        .sum()
}

fn assert_budget_holds<F: CostFilter + Default>() {
    for ellipsis in [false, true] {
        let balancer = Balancer::new(BalanceSettings {
            ellipsis,
            ..BalanceSettings::<F>::default()
        });

        with_random_documents(|html| {
            for max_cost in [0, 1, 2, 3, 5, 17, 64, 200] {
                let balanced = balancer.balance(html, max_cost);
                let cost = cost_of(&F::default(), &balanced);

                assert!(
                    cost <= u64::from(max_cost),
                    "cost {cost} over {max_cost} (ellipsis: {ellipsis}) for {html:?}: {balanced:?}"
                );
            }
        });
    }
}

#[test]
fn balanced_output_never_exceeds_the_budget() {
    with_random_documents(|html| {
        for max_cost in [0, 5, 17, 64, 200] {
            let balanced = balance(html, max_cost);
            let cost = balanced.chars().count();

            assert!(
                cost <= max_cost as usize,
                "cost {cost} over {max_cost} for {html:?}: {balanced:?}"
            );
        }
    });
}

#[test]
fn char_count_budget_holds() {
    assert_budget_holds::<CharCount>();
}

#[test]
fn url_encoded_budget_holds() {
    assert_budget_holds::<UrlEncodedLength>();
}

#[test]
fn text_only_budget_holds() {
    assert_budget_holds::<TextOnly>();
}

#[test]
fn generous_budget_keeps_text() {
    with_random_documents(|html| {
        let balanced = balance(html, u32::MAX);
        let words = |s: &str| s.matches("three").count();

        assert_eq!(words(&balanced), words(html), "{html:?}");
    });
}

#[test]
fn sterilizing_is_idempotent() {
    with_random_documents(|html| {
        let once = sterilize(html, SanitizeFlags::all());

        assert_eq!(sterilize(&once, SanitizeFlags::all()), once, "{html:?}");
        assert!(!once.to_ascii_lowercase().contains("<script"), "{once:?}");
        assert!(!once.contains("javascript:"), "{once:?}");
        assert!(!once.contains("onclick"), "{once:?}");
    });
}

#[test]
fn removing_script_tags_alone_leaves_no_script_markup() {
    with_random_documents(|html| {
        let once = sterilize(html, SanitizeFlags::REMOVE_SCRIPT_TAGS);

        assert!(!once.to_ascii_lowercase().contains("<script"), "{once:?}");
        assert_eq!(sterilize(&once, SanitizeFlags::REMOVE_SCRIPT_TAGS), once, "{html:?}");
    });
}

#[test]
fn thinned_output_has_no_scripts_or_styles() {
    with_random_documents(|html| {
        let thinned = thin(html, &ThinSettings::default());

        for forbidden in ["<script", "<style", "<font", "<div", "onclick", "<!--"] {
            assert!(!thinned.contains(forbidden), "{forbidden} in {thinned:?}");
        }
    });
}
