use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use streamview_core::{
    prepare_frame, ChartDimensions, CoordinateMapper, FilterPipeline, FrameRate, Sample,
};
use streamview_runtime::{FrameCell, RenderScheduler, SchedulerState, TickOutcome};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn published_cell() -> FrameCell {
    let series: Vec<Sample> = (0..50).map(|i| Sample::new(i, i as f64, "A")).collect();
    let cell = FrameCell::new();
    cell.publish(prepare_frame(
        &series,
        1,
        &FilterPipeline::default(),
        20,
        ChartDimensions::default(),
    ));
    cell
}

fn running(interval: Duration) -> RenderScheduler {
    let mut scheduler = RenderScheduler::with_interval(interval);
    scheduler.start();
    scheduler
}

fn count_draws(scheduler: &mut RenderScheduler, cell: &FrameCell, ticks: &[u64]) -> usize {
    let mut draws = 0;
    let mut sink = |_: &[Sample], _: &CoordinateMapper| draws += 1;
    for &tick in ticks {
        scheduler.on_tick(ms(tick), cell, &mut sink);
    }
    draws
}

#[test]
fn default_rate_is_sixty_frames_per_second() {
    let scheduler = RenderScheduler::new(FrameRate::default());
    let interval = scheduler.frame_interval().as_secs_f64();
    assert!((interval - 1.0 / 60.0).abs() < 1e-6);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[test]
fn idle_scheduler_does_not_draw() {
    let cell = published_cell();
    let mut scheduler = RenderScheduler::with_interval(ms(10));
    let mut sink = |_: &[Sample], _: &CoordinateMapper| panic!("drew while idle");
    assert_eq!(scheduler.on_tick(ms(100), &cell, &mut sink), TickOutcome::Idle);
}

#[test]
fn ticks_closer_than_interval_draw_fewer_times() {
    let cell = published_cell();
    let mut scheduler = running(ms(16));
    let ticks: Vec<u64> = (0..100).map(|i| i * 5).collect();
    let draws = count_draws(&mut scheduler, &cell, &ticks);
    assert!(draws < ticks.len());
    assert!(draws > 0);
    assert_eq!(scheduler.ticks_skipped() as usize + draws, ticks.len());
}

#[test]
fn ticks_at_exact_interval_draw_every_time() {
    let cell = published_cell();
    let mut scheduler = running(ms(16));
    let ticks: Vec<u64> = (0..50).map(|i| i * 16).collect();
    assert_eq!(count_draws(&mut scheduler, &cell, &ticks), ticks.len());
    assert_eq!(scheduler.frames_drawn(), 50);
}

#[test]
fn late_ticks_rebase_onto_the_frame_grid() {
    let cell = published_cell();
    let mut scheduler = running(ms(10));
    let mut sink = |_: &[Sample], _: &CoordinateMapper| {};

    assert_eq!(scheduler.on_tick(ms(0), &cell, &mut sink), TickOutcome::Drawn);
    assert_eq!(scheduler.on_tick(ms(13), &cell, &mut sink), TickOutcome::Drawn);
    assert_eq!(scheduler.last_frame(), Some(ms(10)));
    assert_eq!(scheduler.on_tick(ms(20), &cell, &mut sink), TickOutcome::Drawn);
    assert_eq!(scheduler.on_tick(ms(29), &cell, &mut sink), TickOutcome::Skipped);
    assert_eq!(scheduler.on_tick(ms(31), &cell, &mut sink), TickOutcome::Drawn);
    assert_eq!(scheduler.last_frame(), Some(ms(30)));
    assert_eq!(scheduler.next_due(), Some(ms(40)));
}

#[test]
fn long_stall_draws_once_without_catch_up() {
    let cell = published_cell();
    let mut scheduler = running(ms(10));
    let draws = count_draws(&mut scheduler, &cell, &[0, 1_005, 1_006, 1_009, 1_010]);
    assert_eq!(draws, 3);
    assert_eq!(scheduler.last_frame(), Some(ms(1_010)));
}

#[test]
fn nothing_published_is_reported_and_keeps_the_tick_due() {
    let cell = FrameCell::new();
    let mut scheduler = running(ms(10));
    let mut sink = |_: &[Sample], _: &CoordinateMapper| {};
    assert_eq!(scheduler.on_tick(ms(0), &cell, &mut sink), TickOutcome::NoFrame);
    assert_eq!(scheduler.last_frame(), None);
    let cell = published_cell();
    assert_eq!(scheduler.on_tick(ms(1), &cell, &mut sink), TickOutcome::Drawn);
}

#[test]
fn draw_receives_latest_published_frame() {
    let cell = published_cell();
    let mut scheduler = running(ms(10));
    let mut seen = Vec::new();
    let mut sink = |series: &[Sample], _: &CoordinateMapper| seen.push(series.len());
    scheduler.on_tick(ms(0), &cell, &mut sink);

    let newer: Vec<Sample> = (0..5).map(|i| Sample::new(i, 1.0, "B")).collect();
    cell.publish(prepare_frame(&newer, 2, &FilterPipeline::default(), 20, ChartDimensions::default()));
    scheduler.on_tick(ms(10), &cell, &mut sink);
    assert_eq!(seen, vec![20, 5]);
}

#[test]
fn stop_prevents_further_draws() {
    let cell = published_cell();
    let mut scheduler = running(ms(10));
    assert_eq!(count_draws(&mut scheduler, &cell, &[0]), 1);
    scheduler.stop();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert_eq!(count_draws(&mut scheduler, &cell, &[100, 200, 300]), 0);
    scheduler.start();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[test]
fn request_stop_from_inside_draw() {
    let cell = published_cell();
    let mut scheduler = running(ms(10));
    let handle = scheduler.stop_handle();
    let mut draws = 0;
    let mut sink = |_: &[Sample], _: &CoordinateMapper| {
        draws += 1;
        if draws == 3 {
            handle.request_stop();
        }
    };
    let mut outcomes = Vec::new();
    for tick in 0..10 {
        outcomes.push(scheduler.on_tick(ms(tick * 10), &cell, &mut sink));
    }
    assert_eq!(draws, 3);
    assert_eq!(outcomes[3], TickOutcome::Stopped);
}

#[test]
fn stop_waits_for_in_flight_draw() {
    let cell = Arc::new(published_cell());
    let mut scheduler = running(ms(1));
    let handle = scheduler.stop_handle();
    let finished = Arc::new(AtomicBool::new(false));
    let (started_tx, started_rx) = mpsc::channel();

    let worker_cell = Arc::clone(&cell);
    let worker_finished = Arc::clone(&finished);
    let worker = thread::spawn(move || {
        let mut first = true;
        let mut sink = move |_: &[Sample], _: &CoordinateMapper| {
            if first {
                first = false;
                let _ = started_tx.send(());
                thread::sleep(ms(50));
                worker_finished.store(true, Ordering::SeqCst);
            }
        };
        let mut tick = 0;
        while scheduler.on_tick(ms(tick), &worker_cell, &mut sink) != TickOutcome::Stopped {
            tick += 1;
        }
        scheduler.frames_drawn()
    });

    started_rx.recv().unwrap();
    handle.stop();
    assert!(finished.load(Ordering::SeqCst));
    assert_eq!(worker.join().unwrap(), 1);
}
