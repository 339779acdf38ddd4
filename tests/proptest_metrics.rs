use audience_metrics::{
    aggregate_by_dimension, aggregate_by_period, compute_average_cume, compute_tsl, Dimension,
    MetricRecord, Period,
};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

prop_compose! {
    fn arb_record()(
        cume in 0_u32..50_000_u32,
        tlh in 0_u32..200_000_u32,
        sessions in 0_u32..500_u32,
        offset in 0_u64..120_u64,
        daypart in prop::option::of(prop::sample::select(vec!["Morning", "Midday", "Evening"])),
    ) -> MetricRecord {
        let date = base_date().checked_add_days(Days::new(offset)).unwrap();
        let record = MetricRecord::new(cume as f64, tlh as f64, sessions as f64, date);
        match daypart {
            Some(daypart) => record.with_daypart(daypart),
            None => record,
        }
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn average_cume_is_bounded_by_positive_values(
        values in prop::collection::vec(-1_000.0_f64..100_000.0_f64, 0..32)
    ) {
        let average = compute_average_cume(&values);
        let positive: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();

        if positive.is_empty() {
            prop_assert_eq!(average, 0.0);
        } else {
            let min = positive.iter().copied().fold(f64::INFINITY, f64::min);
            let max = positive.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(average >= min.floor() && average <= max.ceil());
            prop_assert_eq!(average, average.round());
        }
    }

    #[test]
    fn tsl_is_zero_without_cume(tlh in any::<f64>()) {
        prop_assert_eq!(compute_tsl(tlh, 0.0), 0.0);
    }

    #[test]
    fn tsl_has_two_decimals(tlh in 0.0_f64..1_000_000.0_f64, cume in 1.0_f64..100_000.0_f64) {
        let tsl = compute_tsl(tlh, cume);
        prop_assert!((tsl * 100.0 - (tsl * 100.0).round()).abs() < 1e-6);
        prop_assert!((tsl - tlh / cume).abs() <= 0.005 + 1e-9);
    }

    #[test]
    fn period_buckets_preserve_tlh_and_recompute_tsl(
        records in prop::collection::vec(arb_record(), 0..40),
        period in prop::sample::select(vec![Period::Daily, Period::Weekly, Period::Monthly]),
    ) {
        let buckets = aggregate_by_period(&records, period);
        let input_tlh: f64 = records.iter().map(|r| r.tlh).sum();
        let output_tlh: f64 = buckets.iter().map(|r| r.tlh).sum();

        prop_assert_eq!(input_tlh, output_tlh);
        for bucket in &buckets {
            prop_assert_eq!(bucket.tsl, compute_tsl(bucket.tlh, bucket.cume));
        }
        for pair in buckets.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn dimension_buckets_never_sum_cume(records in prop::collection::vec(arb_record(), 1..40)) {
        let buckets = aggregate_by_dimension(&records, Dimension::Daypart);
        let max_cume = records.iter().map(|r| r.cume).fold(0.0, f64::max);

        for bucket in &buckets {
            prop_assert!(bucket.cume <= max_cume);
            prop_assert!(bucket.daypart.is_some());
        }
        let input_tlh: f64 = records.iter().map(|r| r.tlh).sum();
        let output_tlh: f64 = buckets.iter().map(|r| r.tlh).sum();
        prop_assert_eq!(input_tlh, output_tlh);
    }
}
