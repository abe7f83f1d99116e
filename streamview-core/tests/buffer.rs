use streamview_core::{shared, Sample, StreamBuffer, WindowCapacity};

fn sample(ts: i64) -> Sample {
    Sample::new(ts, ts as f64, "A")
}

fn buffer(max: usize) -> StreamBuffer {
    StreamBuffer::new(WindowCapacity::new(max).unwrap())
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(WindowCapacity::new(0).is_err());
}

#[test]
fn overflow_keeps_most_recent_samples_in_order() {
    let mut buf = buffer(10);
    for ts in 0..15 {
        buf.append(sample(ts));
        assert!(buf.len() <= 10);
    }
    let snap = buf.snapshot();
    let timestamps: Vec<i64> = snap.iter().map(|s| s.timestamp).collect();
    assert_eq!(timestamps, (5..15).collect::<Vec<_>>());
    assert_eq!(buf.evicted_total() as usize + buf.len(), 15);
}

#[test]
fn overflow_evicts_a_tenth_of_capacity() {
    let mut buf = buffer(100);
    for ts in 0..100 {
        buf.append(sample(ts));
    }
    assert_eq!(buf.len(), 100);
    buf.append(sample(100));
    assert_eq!(buf.len(), 91);
    assert_eq!(buf.snapshot()[0].timestamp, 10);
}

#[test]
fn batch_append_matches_single_appends() {
    for (max, preload, incoming) in [(10, 0, 15), (10, 7, 1), (100, 95, 250), (1, 0, 5), (37, 12, 400)] {
        let mut one_by_one = buffer(max);
        let mut batched = buffer(max);
        for ts in 0..preload {
            one_by_one.append(sample(ts));
            batched.append(sample(ts));
        }
        let fresh: Vec<Sample> = (preload..preload + incoming).map(sample).collect();
        for s in fresh.clone() {
            one_by_one.append(s);
        }
        batched.append_batch(fresh);
        assert_eq!(
            one_by_one.snapshot().to_vec(),
            batched.snapshot().to_vec(),
            "max={max} preload={preload} incoming={incoming}"
        );
    }
}

#[test]
fn reset_truncates_to_the_tail() {
    let mut buf = buffer(5);
    buf.reset((0..8).map(sample).collect());
    let timestamps: Vec<i64> = buf.snapshot().iter().map(|s| s.timestamp).collect();
    assert_eq!(timestamps, vec![3, 4, 5, 6, 7]);
}

#[test]
fn snapshot_is_unaffected_by_later_mutation() {
    let mut buf = buffer(4);
    buf.append(sample(1));
    buf.append(sample(2));
    let before = buf.snapshot();
    for ts in 3..10 {
        buf.append(sample(ts));
    }
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].timestamp, 1);
    assert!(buf.generation() > before.generation());
}

#[test]
fn empty_batch_does_not_bump_generation() {
    let mut buf = buffer(4);
    buf.append_batch(Vec::new());
    assert_eq!(buf.generation(), 0);
    assert!(buf.is_empty());
}

#[test]
fn shared_reader_sees_writer_updates() {
    let (writer, reader) = shared(buffer(3));
    let other = reader.clone();
    writer.append_batch((0..5).map(sample).collect());
    assert_eq!(reader.len(), other.len());
    assert!(reader.len() <= 3);
    assert_eq!(reader.snapshot().last().map(|s| s.timestamp), Some(4));
    assert_eq!(writer.reader().generation(), reader.generation());
}
