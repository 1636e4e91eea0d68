
use crate::{
    db::{
        Direction, PartitionId, RowId,
        executor::{
            BindError, DistinctRowSource, DistinctStats, ExecutionContext, RowCursor, RowSource,
            ScanRowSource, collect_rows,
        },
        store::PartitionSlice,
    },
    error::{ErrorClass, ErrorOrigin},
    obs::sink::{MetricsEvent, MetricsSink, SourceKind, with_metrics_sink},
    test_support::{
        EmptyCatalog, ListRowSource, SYM, partition_missing_sym, quotes_partition, quotes_table,
        rows,
    },
};
use std::cell::RefCell;

const A: i32 = 100;
const B: i32 = 200;
const X: i32 = 7;
const Y: i32 = 8;

fn prepared<D: RowSource>(delegate: D) -> DistinctRowSource<D> {
    let mut source = DistinctRowSource::new(delegate, SYM);
    source
        .configure(&quotes_table())
        .expect("sym column should resolve");
    source.prepare(&ExecutionContext::new(1));

    source
}

fn drain(source: &mut impl RowSource, slice: &PartitionSlice) -> Vec<RowId> {
    let mut cursor = source
        .prepare_cursor(slice)
        .expect("cursor should bind to partition");

    collect_rows(&mut cursor).expect("distinct iteration should succeed")
}

#[derive(Default)]
struct CaptureSink {
    events: RefCell<Vec<MetricsEvent>>,
}

impl MetricsSink for CaptureSink {
    fn record(&self, event: MetricsEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[test]
fn repeated_code_is_suppressed_after_first_occurrence() {
    let mut codes = vec![0; 10];
    codes[5] = 1;
    codes[7] = 2;
    codes[9] = 1;
    let slice = PartitionSlice::full(quotes_partition(0, &codes));
    let mut source = prepared(ListRowSource::new().with_order(0, &[5, 7, 9]));

    assert_eq!(drain(&mut source, &slice), rows(&[5, 7]));
}

#[test]
fn descending_delegate_keeps_latest_row_per_code() {
    let mut codes = vec![0; 11];
    codes[8] = A;
    codes[9] = B;
    codes[10] = A;
    let partition = quotes_partition(0, &codes);
    let slice = PartitionSlice::new(partition, RowId::new(8), RowId::new(11));
    let mut source = prepared(ScanRowSource::new(Direction::Desc));

    assert_eq!(drain(&mut source, &slice), rows(&[10, 9]));
}

#[test]
fn ascending_delegate_keeps_first_row_per_code() {
    let slice = PartitionSlice::full(quotes_partition(0, &[A, B, A, B, A]));
    let mut source = prepared(ScanRowSource::new(Direction::Asc));

    assert_eq!(drain(&mut source, &slice), rows(&[0, 1]));
}

#[test]
fn seen_codes_persist_across_partitions_within_one_execution() {
    let first = PartitionSlice::full(quotes_partition(1, &[0, X, Y]));
    let second = PartitionSlice::full(quotes_partition(2, &[0, 0, 0, X]));
    let delegate = ListRowSource::new()
        .with_order(1, &[1, 2])
        .with_order(2, &[3]);
    let mut source = prepared(delegate);

    assert_eq!(drain(&mut source, &first), rows(&[1, 2]));
    assert_eq!(drain(&mut source, &second), Vec::<RowId>::new());
    assert_eq!(source.seen().len(), 2);
}

#[test]
fn prepare_clears_seen_codes_between_executions() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, Y, X, Y]));
    let mut source = prepared(ScanRowSource::new(Direction::Asc));

    let first = drain(&mut source, &slice);
    source.prepare(&ExecutionContext::new(2));
    let second = drain(&mut source, &slice);

    assert_eq!(first, rows(&[0, 1]));
    assert_eq!(second, first);
}

#[test]
fn configure_fails_for_unknown_column() {
    let mut source = DistinctRowSource::new(ScanRowSource::default(), "venue");

    let err = source
        .configure(&quotes_table())
        .expect_err("unknown column must fail at bind time");

    assert_eq!(
        err,
        BindError::ColumnNotFound {
            column: "venue".to_string()
        }
    );
    assert_eq!(source.column_index(), None);
}

#[test]
fn configure_forwards_to_delegate_before_resolving() {
    let mut source = DistinctRowSource::new(ListRowSource::new(), SYM);

    let err = source
        .configure(&EmptyCatalog)
        .expect_err("empty catalog has no sym column");

    assert!(matches!(err, BindError::ColumnNotFound { .. }));
    assert_eq!(source.delegate().configured, 1);
}

#[test]
fn configure_resolves_column_exactly_once() {
    let mut source = DistinctRowSource::new(ScanRowSource::default(), SYM);
    source.configure(&quotes_table()).expect("first configure");

    let err = source
        .configure(&quotes_table())
        .expect_err("second configure must be rejected");

    assert_eq!(
        err,
        BindError::AlreadyConfigured {
            column: SYM.to_string()
        }
    );
    assert_eq!(source.column(), SYM);
    assert_eq!(source.column_index().map(|index| index.get()), Some(1));
}

#[test]
fn missing_column_file_fails_cursor_binding_without_touching_delegate() {
    let slice = PartitionSlice::full(partition_missing_sym(3, 4));
    let mut source = prepared(ListRowSource::new().with_order(3, &[0, 1, 2, 3]));

    let Err(err) = source.prepare_cursor(&slice) else {
        panic!("missing sym column must fail to open");
    };

    assert!(err.is_storage_open());
    assert_eq!(err.origin, ErrorOrigin::Store);
    assert_eq!(source.delegate().cursors, 0);
    assert_eq!(source.stats(), DistinctStats::default());
}

#[test]
fn binding_before_configure_or_prepare_is_an_invariant_violation() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X]));

    let mut unconfigured = DistinctRowSource::new(ScanRowSource::default(), SYM);
    let Err(err) = unconfigured.prepare_cursor(&slice) else {
        panic!("unconfigured source must not bind");
    };
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert_eq!(err.origin, ErrorOrigin::Executor);

    let mut unprepared = DistinctRowSource::new(ScanRowSource::default(), SYM);
    unprepared.configure(&quotes_table()).expect("configure");
    let Err(err) = unprepared.prepare_cursor(&slice) else {
        panic!("unprepared source must not bind");
    };
    assert_eq!(err.class, ErrorClass::InvariantViolation);
}

#[test]
fn next_without_successful_has_next_is_a_protocol_error() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X]));
    let mut source = prepared(ScanRowSource::default());
    let mut cursor = source.prepare_cursor(&slice).expect("cursor");

    let err = cursor.next().expect_err("next before has_next must fail");
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert_eq!(err.origin, ErrorOrigin::Cursor);

    assert!(cursor.has_next().expect("has_next"));
    assert_eq!(cursor.next().expect("next"), RowId::new(0));
    assert!(
        cursor.next().is_err(),
        "a ready row must be consumed at most once"
    );
}

#[test]
fn repeated_has_next_does_not_skip_rows() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, Y]));
    let mut source = prepared(ScanRowSource::default());
    let mut cursor = source.prepare_cursor(&slice).expect("cursor");

    assert!(cursor.has_next().expect("has_next"));
    assert!(cursor.has_next().expect("has_next"));
    assert_eq!(cursor.next().expect("next"), RowId::new(0));
    assert!(cursor.has_next().expect("has_next"));
    assert_eq!(cursor.next().expect("next"), RowId::new(1));
}

#[test]
fn exhausted_cursor_keeps_returning_false() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, X]));
    let mut source = prepared(ScanRowSource::default());
    let mut cursor = source.prepare_cursor(&slice).expect("cursor");

    assert_eq!(collect_rows(&mut cursor).expect("drain"), rows(&[0]));
    assert!(!cursor.has_next().expect("has_next"));
    assert!(!cursor.has_next().expect("has_next"));
}

#[test]
fn empty_delegate_yields_nothing() {
    let slice = PartitionSlice::full(quotes_partition(0, &[]));
    let mut source = prepared(ScanRowSource::default());

    assert!(drain(&mut source, &slice).is_empty());
    assert!(source.seen().is_empty());
}

#[test]
fn reset_forwards_to_delegate_and_keeps_seen_codes() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, Y]));
    let mut source = prepared(ListRowSource::new().with_order(0, &[0, 1]));

    assert_eq!(drain(&mut source, &slice), rows(&[0, 1]));
    source.reset();

    assert_eq!(source.delegate().resets, 1);
    assert_eq!(source.seen().len(), 2);
    assert!(drain(&mut source, &slice).is_empty());
}

#[test]
fn cursor_reset_replays_partition_against_existing_seen_set() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, Y, X]));
    let mut source = prepared(ScanRowSource::default());
    let mut cursor = source.prepare_cursor(&slice).expect("cursor");

    assert!(cursor.has_next().expect("has_next"));
    assert_eq!(cursor.next().expect("next"), RowId::new(0));
    cursor.reset();

    // Row 0's code is already seen; only row 1 remains new.
    assert_eq!(collect_rows(&mut cursor).expect("drain"), rows(&[1]));
}

#[test]
fn prepare_forwards_context_and_resets_stats() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, X, Y]));
    let mut source = prepared(ListRowSource::new().with_order(0, &[0, 1, 2]));

    drain(&mut source, &slice);
    assert_eq!(
        source.stats(),
        DistinctStats {
            rows_scanned: 3,
            rows_emitted: 2,
            rows_suppressed: 1,
        }
    );

    source.prepare(&ExecutionContext::new(2));
    assert_eq!(source.stats(), DistinctStats::default());

    let delegate = source.into_delegate();
    assert_eq!(delegate.executions, vec![1, 2]);
}

#[test]
fn column_read_failure_propagates_from_has_next() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, Y]));
    let mut source = prepared(ListRowSource::new().with_order(0, &[1, 40]));
    let mut cursor = source.prepare_cursor(&slice).expect("cursor");

    assert!(cursor.has_next().expect("first row reads"));
    assert_eq!(cursor.next().expect("next"), RowId::new(1));

    let err = cursor
        .has_next()
        .expect_err("row past partition end must fail");
    assert_eq!(err.class, ErrorClass::Corruption);
}

#[test]
fn cursor_lifecycle_is_reported_through_metrics_sink() {
    let capture = CaptureSink::default();
    let good = PartitionSlice::full(quotes_partition(0, &[X, X, Y]));
    let bad = PartitionSlice::full(partition_missing_sym(1, 2));

    with_metrics_sink(&capture, || {
        let mut source = prepared(ScanRowSource::default());
        drain(&mut source, &good);
        assert!(source.prepare_cursor(&bad).is_err());
    });

    let distinct_events: Vec<MetricsEvent> = capture
        .events
        .borrow()
        .iter()
        .copied()
        .filter(|event| {
            !matches!(
                event,
                MetricsEvent::ExecutionPrepared {
                    source: SourceKind::Scan
                } | MetricsEvent::CursorBound {
                    source: SourceKind::Scan,
                    ..
                }
            )
        })
        .collect();

    assert_eq!(
        distinct_events,
        vec![
            MetricsEvent::ExecutionPrepared {
                source: SourceKind::Distinct,
            },
            MetricsEvent::CursorBound {
                source: SourceKind::Distinct,
                partition: PartitionId::new(0),
            },
            MetricsEvent::PartitionFinished {
                source: SourceKind::Distinct,
                partition: PartitionId::new(0),
                rows_scanned: 3,
                rows_emitted: 2,
                rows_suppressed: 1,
            },
            MetricsEvent::StorageOpenFailed {
                source: SourceKind::Distinct,
                partition: PartitionId::new(1),
            },
        ]
    );
}

#[test]
fn abandoned_cursor_still_reports_partition_finish() {
    let capture = CaptureSink::default();
    let slice = PartitionSlice::full(quotes_partition(4, &[X, Y, X]));

    with_metrics_sink(&capture, || {
        let mut source = prepared(ScanRowSource::default());
        let mut cursor = source.prepare_cursor(&slice).expect("cursor");
        assert!(cursor.has_next().expect("has_next"));
    });

    let finished = capture
        .events
        .borrow()
        .iter()
        .copied()
        .find(|event| matches!(event, MetricsEvent::PartitionFinished { .. }));

    // Row 0 was located by has_next but never taken with next; it still
    // counts as emitted.

    assert_eq!(
        finished,
        Some(MetricsEvent::PartitionFinished {
            source: SourceKind::Distinct,
            partition: PartitionId::new(4),
            rows_scanned: 1,
            rows_emitted: 1,
            rows_suppressed: 0,
        })
    );
}

#[test]
fn stats_counts_located_rows_that_were_never_consumed() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, X, Y]));
    let mut source = prepared(ScanRowSource::default());

    {
        let mut cursor = source.prepare_cursor(&slice).expect("cursor");
        assert!(cursor.has_next().expect("has_next"));
        assert_eq!(cursor.next().expect("next"), RowId::new(0));
        // Skips row 1 as a duplicate and parks on row 2 without taking it.
        assert!(cursor.has_next().expect("has_next"));
    }

    assert_eq!(
        source.stats(),
        DistinctStats {
            rows_scanned: 3,
            rows_emitted: 2,
            rows_suppressed: 1,
        }
    );
    assert!(source.seen().contains(X));
    assert!(source.seen().contains(Y));
}

#[test]
fn stats_survive_json_round_trip() {
    let slice = PartitionSlice::full(quotes_partition(0, &[X, Y, X, X]));
    let mut source = prepared(ScanRowSource::default());
    drain(&mut source, &slice);

    let encoded = serde_json::to_string(&source.stats()).expect("stats should encode");
    let decoded: DistinctStats = serde_json::from_str(&encoded).expect("stats should decode");

    assert_eq!(
        decoded,
        DistinctStats {
            rows_scanned: 4,
            rows_emitted: 2,
            rows_suppressed: 2,
        }
    );
}
