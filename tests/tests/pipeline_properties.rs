//! Pipeline properties checked over the fixture dataset.

use chrono::NaiveDate;
use dashboard_core::DateRange;
use integration_tests::setup::TestContext;
use pipeline::{
    derive_revenue, duration_by_review_score, filter_by_delivery, kpi_summary, top_categories,
};
use record_loader::{load_records, parse_records};
use rust_decimal::Decimal;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, day).unwrap()
}

/// Every sub-range of January, both ends inclusive
fn january_ranges() -> Vec<DateRange> {
    let mut ranges = Vec::new();
    for start in (1..=31).step_by(3) {
        for end in (start..=31).step_by(4) {
            ranges.push(DateRange::from_dates(date(start), date(end)).unwrap());
        }
    }
    ranges
}

#[tokio::test]
async fn test_loaded_rows_are_date_sorted_nulls_last() {
    let ctx = TestContext::new().await;
    let dates: Vec<_> = ctx
        .dashboard
        .base()
        .iter()
        .map(|r| r.order_delivered_customer_date)
        .collect();

    let dated: Vec<_> = dates.iter().flatten().collect();
    assert!(dated.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(dates.last(), Some(&None));
    assert_eq!(dates.iter().filter(|d| d.is_none()).count(), 1);
}

#[tokio::test]
async fn test_filtered_rows_fall_inside_range() {
    let ctx = TestContext::new().await;
    let base = ctx.dashboard.base();

    for range in january_ranges() {
        let filtered = filter_by_delivery(base, Some(&range));
        assert!(filtered.len() <= base.len());
        for row in &filtered {
            let d = row.order_delivered_customer_date.expect("dated row");
            assert!(range.start() <= d && d <= range.end());
        }
        // Subset in base order, no duplicates
        let mut cursor = base.iter();
        for row in &filtered {
            assert!(cursor.any(|b| b == row));
        }
    }
}

#[tokio::test]
async fn test_filter_to_own_bounds_keeps_every_dated_row() {
    let ctx = TestContext::new().await;
    let base = ctx.dashboard.base();
    let bounds = base.date_bounds().unwrap();

    let range = DateRange::new(bounds.min, bounds.max).unwrap();
    let filtered = filter_by_delivery(base, Some(&range));
    let dated = base
        .iter()
        .filter(|r| r.order_delivered_customer_date.is_some())
        .count();
    assert_eq!(filtered.len(), dated);
}

#[tokio::test]
async fn test_aggregate_invariants_hold_for_every_range() {
    let ctx = TestContext::new().await;
    let base = ctx.dashboard.base();

    for range in january_ranges() {
        let filtered = filter_by_delivery(base, Some(&range));

        if let Ok(kpis) = kpi_summary(&filtered) {
            assert!(kpis.total_orders <= filtered.len());
            assert!(kpis.total_customers <= filtered.len());
            assert!(kpis.total_revenue >= Decimal::ZERO);
        } else {
            assert!(filtered.is_empty());
        }

        for n in 1..=4 {
            let top = top_categories(&filtered, n).unwrap();
            assert!(top.categories.len() <= n);
            for pair in top.categories.windows(2) {
                assert!(pair[0].total_item_revenue >= pair[1].total_item_revenue);
                if pair[0].total_item_revenue == pair[1].total_item_revenue {
                    assert!(pair[0].category < pair[1].category);
                }
            }
        }

        let by_score = duration_by_review_score(&filtered);
        assert!(by_score.windows(2).all(|w| w[0].review_score < w[1].review_score));
    }
}

#[tokio::test]
async fn test_derived_revenue_matches_inputs() {
    let ctx = TestContext::new().await;
    let revenues: Vec<Option<String>> = ctx
        .dashboard
        .base()
        .iter()
        .map(|r| r.total_item_revenue.map(|v| v.normalize().to_string()))
        .collect();

    // Delivery order: o1/1, o1/2, o2, o3, o4, o5, o7, then undated o6
    let expected = ["110", "55", "35", "220", "45", "30"];
    for (got, want) in revenues.iter().zip(expected) {
        assert_eq!(got.as_deref(), Some(want));
    }
    assert_eq!(revenues[6], None, "null price gives null revenue");
    assert_eq!(revenues[7].as_deref(), Some("18"));
}

#[test]
fn test_cent_amounts_add_without_rounding() {
    let csv = "\
order_id,order_item_id,customer_id,product_category_name_english,price,freight_value,order_delivered_customer_date,review_score,delivery_duration
o1,1,c1,toys,0.10,0.20,2018-01-01 00:00:00,3,2
o2,1,c2,toys,0.10,0.00,2018-01-02 00:00:00,3,2
";
    let table = derive_revenue(&parse_records(csv.as_bytes()).unwrap());
    let cents = |s: &str| s.parse::<Decimal>().unwrap();

    assert_eq!(table.rows()[0].total_item_revenue, Some(cents("0.30")));
    assert_eq!(kpi_summary(&table).unwrap().total_revenue, cents("0.40"));
}

#[tokio::test]
async fn test_duration_by_review_score_on_fixture() {
    let ctx = TestContext::new().await;
    let means: Vec<(u8, f64)> = duration_by_review_score(ctx.dashboard.base())
        .into_iter()
        .map(|r| (r.review_score, r.mean_delivery_duration))
        .collect();

    // Score 1 has no duration; score 5 averages 3, 3 and 2
    assert_eq!(
        means,
        vec![(2, 15.0), (3, 9.0), (4, 6.0), (5, 8.0 / 3.0)]
    );
}

#[tokio::test]
async fn test_full_pipeline_is_idempotent() {
    let ctx = TestContext::new().await;
    let range = DateRange::from_dates(date(3), date(22)).unwrap();

    let reloaded = load_records(&ctx.source).await.unwrap();
    let again = derive_revenue(&reloaded);
    assert_eq!(&again, ctx.dashboard.base().as_ref());

    let first = ctx.dashboard.run(Some(range), 3).unwrap();
    let second = ctx.dashboard.run(Some(range), 3).unwrap();
    assert_eq!(first.aggregates, second.aggregates);
    assert_eq!(ctx.source.fetch_count(), 2);
}

#[test]
fn test_ranking_and_score_means_from_csv() {
    let whole = |v: i64| Decimal::from(v);
    let csv = "\
order_id,order_item_id,customer_id,product_category_name_english,price,freight_value,order_delivered_customer_date,review_score,delivery_duration
o1,1,c1,A,8,2,2018-01-01 00:00:00,3,2
o2,1,c2,B,25,5,2018-01-02 00:00:00,3,4
o3,1,c3,A,4,1,2018-01-03 00:00:00,5,10
";
    let table = derive_revenue(&parse_records(csv.as_bytes()).unwrap());

    let top1: Vec<_> = top_categories(&table, 1)
        .unwrap()
        .categories
        .into_iter()
        .map(|c| (c.category, c.total_item_revenue))
        .collect();
    assert_eq!(top1, vec![("B".to_string(), whole(30))]);

    let top2: Vec<_> = top_categories(&table, 2)
        .unwrap()
        .categories
        .into_iter()
        .map(|c| (c.category, c.total_item_revenue))
        .collect();
    assert_eq!(top2, vec![("B".to_string(), whole(30)), ("A".to_string(), whole(15))]);

    let by_score: Vec<_> = duration_by_review_score(&table)
        .into_iter()
        .map(|r| (r.review_score, r.mean_delivery_duration))
        .collect();
    assert_eq!(by_score, vec![(3, 3.0), (5, 10.0)]);
}
