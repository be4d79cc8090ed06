use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use gwref_series::{Alignment, TimeSeries, align, count_pairs};

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn strandangers(ref_year: i32) -> (TimeSeries, TimeSeries) {
    let obs = TimeSeries::calendar([
        (day(2023, 1, 7), 11.4),
        (day(2023, 2, 1), 11.7),
        (day(2023, 2, 25), 11.8),
    ])
    .unwrap();
    let reference = TimeSeries::calendar([
        (day(ref_year, 1, 8), 8.9),
        (day(ref_year, 2, 3), 9.2),
        (day(ref_year, 2, 8), 9.3),
        (day(ref_year, 2, 25), 9.3),
        (day(ref_year, 2, 28), 9.5),
    ])
    .unwrap();
    (obs, reference)
}

#[test]
fn strandangers_time_equivalents() {
    let (obs, reference) = strandangers(2023);
    let rows = align(
        &obs,
        &[&reference],
        Alignment::TimeEquivalent { offset_days: 3.5 },
        NaiveDateTime::default(),
    )
    .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows.response, vec![11.4, 11.7, 11.8]);
    let expected = [8.9, 9.2, 9.4];
    for (got, want) in rows.predictors[0].iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
}

#[test]
fn strandangers_pair_counts_per_offset() {
    let (obs, reference) = strandangers(2023);
    let counts = count_pairs(
        &obs,
        &reference,
        &[0.0, 1.0, 3.5, 5.0, 7.0],
        NaiveDateTime::default(),
    )
    .unwrap();

    let offsets: Vec<f64> = counts.iter().map(|&(o, _)| o).collect();
    assert_eq!(offsets, vec![0.0, 1.0, 3.5, 5.0, 7.0]);
    assert_eq!(counts[0].1, 1);
    assert_eq!(counts[2].1, 3);
    // counts never shrink as the window widens
    assert!(counts.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn disjoint_records_have_no_pairs() {
    let (obs, reference) = strandangers(2024);
    let rows = align(
        &obs,
        &[&reference],
        Alignment::TimeEquivalent { offset_days: 7.0 },
        NaiveDateTime::default(),
    )
    .unwrap();
    assert!(rows.is_empty());
    assert!(rows.predictors[0].is_empty());
}

#[test]
fn calendar_and_elapsed_series_align_on_shared_origin() {
    let origin = day(2023, 1, 1);
    let obs = TimeSeries::calendar([(day(2023, 1, 3), 5.0), (day(2023, 1, 5), 6.0)]).unwrap();
    let reference = TimeSeries::elapsed([(2.0, 1.0), (4.0, 2.0)]).unwrap();

    let rows = align(&obs, &[&reference], Alignment::Exact, origin).unwrap();
    assert_eq!(rows.predictors[0], vec![1.0, 2.0]);

    let rows = align(&obs, &[&reference], Alignment::Linear, day(2023, 1, 2)).unwrap();
    // shifted origin: obs at 1 and 3 days, reference at 2 and 4
    assert_eq!(rows.len(), 1);
    assert_relative_eq!(rows.predictors[0][0], 1.5);
}

#[test]
fn nearest_within_tolerance() {
    let obs = TimeSeries::calendar([(day(2023, 1, 7), 11.4), (day(2023, 2, 1), 11.7)]).unwrap();
    let (_, reference) = strandangers(2023);
    let rows = align(
        &obs,
        &[&reference],
        Alignment::Nearest {
            tolerance_days: 1.0,
        },
        NaiveDateTime::default(),
    )
    .unwrap();
    assert_eq!(rows.response, vec![11.4]);
    assert_eq!(rows.predictors[0], vec![8.9]);
}

#[test]
fn elapsed_view_shifts_with_origin() {
    let (obs, _) = strandangers(2023);
    let a: Vec<(f64, f64)> = obs.as_elapsed(day(2023, 1, 1)).collect();
    let b: Vec<(f64, f64)> = obs.as_elapsed(day(2023, 1, 6)).collect();
    for ((ta, va), (tb, vb)) in a.iter().zip(&b) {
        assert_relative_eq!(ta - tb, 5.0, epsilon = 1e-9);
        assert_eq!(va, vb);
    }
    // restartable
    let view = obs.as_elapsed(day(2023, 1, 1));
    assert_eq!(view.clone().count(), view.count());
}
