use chrono::{Duration, NaiveDate, NaiveDateTime};
use playtime_activity::{
    compute_log_durations, compute_total_durations, Extractor, Log, PlayerDurations, PlayerEvent,
};

fn at(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::seconds(secs)
}

fn join(player: &str, secs: i64) -> PlayerEvent {
    PlayerEvent::join(player, at(secs))
}

fn leave(player: &str, secs: i64) -> PlayerEvent {
    PlayerEvent::disconnect(player, at(secs))
}

fn session_ms(player: &str, start_secs: i64, millis: i64) -> Log {
    let joined = at(start_secs);
    let left = joined + Duration::milliseconds(millis);
    Log::new(
        vec![
            PlayerEvent::join(player, joined),
            PlayerEvent::disconnect(player, left),
        ],
        Some(left),
    )
}

fn sample_logs() -> Vec<Log> {
    vec![
        Log::new(vec![join("A", 0), leave("A", 10)], Some(at(10))),
        Log::new(
            vec![join("A", 0), join("B", 3), leave("A", 5), leave("B", 5)],
            Some(at(5)),
        ),
        Log::new(vec![join("C", 100), join("B", 120)], Some(at(160))),
        Log::new(vec![leave("A", 2), join("A", 4), join("A", 9)], None),
        Log::default(),
    ]
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn test_two_logs_sum_per_player() {
    let first = Log::new(vec![join("A", 0), leave("A", 10)], Some(at(10)));
    let second = Log::new(
        vec![join("A", 0), join("B", 0), leave("B", 2), leave("A", 5)],
        Some(at(5)),
    );

    assert_eq!(
        compute_log_durations(&first),
        [("A", 10.0)].into_iter().collect::<PlayerDurations>()
    );
    assert_eq!(
        compute_log_durations(&second),
        [("A", 5.0), ("B", 2.0)].into_iter().collect::<PlayerDurations>()
    );

    let total = compute_total_durations([&first, &second]);
    assert_eq!(
        total,
        [("A", 15.0), ("B", 2.0)].into_iter().collect::<PlayerDurations>()
    );
}

#[test]
fn test_matched_pairs_sum_exactly() {
    let pairs = [("A", 0, 7), ("B", 1, 4), ("A", 20, 31), ("B", 40, 41), ("A", 50, 52)];

    let mut events = Vec::new();
    for (player, start, end) in pairs {
        events.push(join(player, start));
        events.push(leave(player, end));
    }
    let log = Log::new(events, Some(at(60)));

    let durations = compute_log_durations(&log);
    assert_eq!(durations.get("A"), Some((7 + 11 + 2) as f64));
    assert_eq!(durations.get("B"), Some((3 + 1) as f64));
}

// ============================================================
// Merge properties
// ============================================================

#[test]
fn test_total_invariant_under_reordering() {
    let logs = sample_logs();
    let expected = compute_total_durations(&logs);

    let mut reversed: Vec<&Log> = logs.iter().collect();
    reversed.reverse();
    assert_eq!(compute_total_durations(reversed), expected);

    // Every rotation of the input yields the same totals.
    for shift in 0..logs.len() {
        let mut rotated: Vec<&Log> = logs.iter().collect();
        rotated.rotate_left(shift);
        assert_eq!(compute_total_durations(rotated), expected, "rotation {shift}");
    }
}

#[test]
fn test_total_invariant_under_partitioning() {
    let logs = sample_logs();
    let expected = compute_total_durations(&logs);

    for split in 0..=logs.len() {
        let (left, right) = logs.split_at(split);
        let mut merged = compute_total_durations(right);
        merged.merge(&compute_total_durations(left));
        assert_eq!(merged, expected, "split at {split}");
    }
}

#[test]
fn test_sub_second_totals_invariant_under_reordering() {
    let logs = vec![
        session_ms("A", 0, 100),
        session_ms("A", 10, 200),
        session_ms("A", 20, 300),
    ];

    let forward = compute_total_durations(&logs);
    let reversed = compute_total_durations(logs.iter().rev());

    assert_eq!(forward, reversed);
    assert_eq!(forward.get_millis("A"), Some(600));
    assert_eq!(forward.get("A"), Some(0.6));
}

#[test]
fn test_sub_second_totals_invariant_under_partitioning() {
    let logs = vec![
        session_ms("A", 0, 100),
        session_ms("B", 5, 250),
        session_ms("A", 10, 200),
        session_ms("A", 20, 300),
        session_ms("B", 30, 70),
    ];
    let expected = compute_total_durations(&logs);

    for split in 0..=logs.len() {
        let (left, right) = logs.split_at(split);
        let mut merged = compute_total_durations(right);
        merged.merge(&compute_total_durations(left));
        assert_eq!(merged, expected, "split at {split}");
    }

    assert_eq!(expected.get("A"), Some(0.6));
    assert_eq!(expected.get("B"), Some(0.32));
}

#[test]
fn test_sub_second_pairs_sum_exactly() {
    let start = at(0);
    let log = Log::new(
        vec![
            PlayerEvent::join("A", start),
            PlayerEvent::disconnect("A", start + Duration::milliseconds(100)),
            PlayerEvent::join("A", start + Duration::seconds(1)),
            PlayerEvent::disconnect("A", start + Duration::milliseconds(1_200)),
        ],
        Some(start + Duration::seconds(2)),
    );

    assert_eq!(compute_log_durations(&log).get("A"), Some(0.3));
}

#[test]
fn test_sample_totals() {
    let totals = compute_total_durations(&sample_logs());

    // A: 10 + 5 + 0 (open at end of a log with no end timestamp)
    // B: 2 + 40, C: 60
    assert_eq!(totals.get("A"), Some(15.0));
    assert_eq!(totals.get("B"), Some(42.0));
    assert_eq!(totals.get("C"), Some(60.0));
    assert!(totals.iter().all(|(_, seconds)| seconds >= 0.0));
}

// ============================================================
// End to end from text
// ============================================================

#[test]
fn test_unknown_player_never_reported() {
    let input = "\
[2024.06.01-00.00.00:000]LogNet: Join succeeded: Unknown
[2024.06.01-00.00.01:000]LogNet: Join succeeded: dave
[2024.06.01-00.01.00:000]LogNet: Player disconnected: Unknown
[2024.06.01-00.02.01:000]LogNet: Player disconnected: dave
";
    let log = Extractor::default().parse_reader(input.as_bytes()).unwrap();
    let durations = compute_log_durations(&log);

    assert!(!durations.contains("Unknown"));
    assert_eq!(durations.get("dave"), Some(120.0));
}

#[test]
fn test_event_without_timestamp_does_not_break_pairing() {
    let input = "\
[2024.06.01-00.00.00:000]LogNet: Join succeeded: erin
LogNet: Player disconnected: erin
[2024.06.01-00.00.30:250]LogGame: heartbeat
";
    let log = Extractor::default().parse_reader(input.as_bytes()).unwrap();

    assert_eq!(log.events.len(), 1);
    assert_eq!(compute_log_durations(&log).get("erin"), Some(30.25));
}
