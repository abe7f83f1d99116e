#![cfg(feature = "tokio")]

use dashboard::ChartKind;
use std::time::Duration;
use streamview_core::{shared, ChartConfig, CoordinateMapper, FrameRate, Sample, StreamBuffer};
use streamview_runtime::{drive_with_tokio, ChartRuntime};

#[tokio::test(start_paused = true)]
async fn tokio_driver_draws_until_stopped() {
    let (writer, reader) = shared(StreamBuffer::default());
    writer.append_batch((0..100).map(|i| Sample::new(i, i as f64, "A")).collect());
    let mut runtime = ChartRuntime::new(
        ChartConfig::new("trend", ChartKind::Line),
        FrameRate::new(50.0).unwrap(),
        reader,
    );
    assert_eq!(runtime.scheduler().frame_interval(), Duration::from_millis(20));

    let stop = runtime.stop_handle();
    let mut draws = 0;
    let mut sink = |_: &[Sample], _: &CoordinateMapper| {
        draws += 1;
        if draws == 5 {
            stop.request_stop();
        }
    };
    let drawn = drive_with_tokio(&mut runtime, &mut sink).await;
    assert_eq!(drawn, 5);
}
