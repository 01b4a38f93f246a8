//! End-to-end checks across the scaling engine

use chrono::{Datelike, TimeZone, Timelike, Utc};
use dq_core::{
    AxisConfig, AxisOptions, CanvasConfig, ChartViewport, DataPoint, PixelPoint, PlotMapper, Range,
    TimeGranularity, ZoomOutcome, adaptive_time_ticks_in, axis_ticks, nice_bounds, plan_time_ticks,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn millis(y: i32, m: u32, d: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp_millis()
}

#[test]
fn zero_range_bounds_are_widened() {
    let bounds = nice_bounds(0.0, 0.0, 4);
    assert!(bounds.min <= -0.5);
    assert!(bounds.max >= 0.5);
    assert!(bounds.step > 0.0);
}

#[test]
fn one_day_uses_hour_based_ticks() {
    init_tracing();
    let dates = [millis(2024, 1, 1), millis(2024, 1, 2)];
    let plan = plan_time_ticks(&dates, 4, 8, &Utc);

    assert!(matches!(
        plan.granularity,
        Some(TimeGranularity::Hour | TimeGranularity::FourHours | TimeGranularity::EightHours)
    ));
    assert!(plan.ticks.len() >= 4 && plan.ticks.len() <= 8);
    assert!(plan.ticks.iter().all(|t| *t >= dates[0] && *t <= dates[1]));

    let ticks = adaptive_time_ticks_in(&dates, 4, 8, &Utc);
    assert_eq!(ticks.len(), plan.ticks.len());
    assert_eq!(ticks[0].hour(), 0);
}

#[test]
fn one_year_uses_calendar_months() {
    init_tracing();
    let dates = [millis(2023, 1, 1), millis(2024, 1, 1)];
    let plan = plan_time_ticks(&dates, 4, 8, &Utc);

    let granularity = plan.granularity.unwrap();
    assert!(matches!(
        granularity,
        TimeGranularity::Quarter | TimeGranularity::HalfYear | TimeGranularity::Year
    ));

    let ticks = adaptive_time_ticks_in(&dates, 4, 8, &Utc);
    assert!(ticks.len() >= 4 && ticks.len() <= 8);
    for tick in &ticks {
        assert_eq!(tick.day(), 1);
        assert_eq!(tick.hour(), 0);
        assert_eq!(tick.month0() % 3, 0);
    }
}

#[test]
fn drag_zoom_then_autoscale() {
    init_tracing();
    let axes = AxisOptions::new(
        AxisConfig::numeric().with_min(0.0).with_max(10.0),
        AxisConfig::numeric().with_min(0.0).with_max(10.0),
    );
    let points = vec![DataPoint::new(1.0, 1.0), DataPoint::new(9.0, 9.0)];
    let initial = axes.initial_viewport(&points);
    assert_eq!(initial.x, Range::new(0.0, 10.0));
    assert_eq!(initial.y, Range::new(0.0, 10.0));

    let area = dq_core::PlotArea::from_bounds(0.0, 0.0, 100.0, 100.0);
    let mut state = ChartViewport::new(initial);
    assert!(state.begin_drag(PixelPoint::new(20.0, 80.0), &area));
    state.update_drag(PixelPoint::new(60.0, 40.0), &area);

    let ZoomOutcome::Zoomed(zoomed) = state.commit_drag(&area) else {
        panic!("drag should zoom");
    };
    // Pixel y grows downwards, so y=80 is the lower data bound.
    assert_eq!(zoomed.x, Range::new(2.0, 6.0));
    assert_eq!(zoomed.y, Range::new(2.0, 6.0));
    assert!(state.is_zoomed());

    // Points outside the zoomed window map outside the plot.
    let mapper = PlotMapper::new(&area, &state.live());
    let outside = mapper.to_pixel(&DataPoint::new(9.0, 9.0));
    assert!(!area.contains(outside));

    assert!(state.autoscale());
    assert!(!state.is_zoomed());
    assert_eq!(state.live().x, Range::new(0.0, 10.0));
    assert_eq!(state.live().y, Range::new(0.0, 10.0));
}

#[test]
fn zoomed_ticks_follow_the_viewport() {
    let config = CanvasConfig::default();
    let axis = AxisConfig::numeric();
    let full = axis_ticks(&axis, Range::new(0.0, 100.0), config.time_ticks, &Utc);
    let zoomed = axis_ticks(&axis, Range::new(20.0, 40.0), config.time_ticks, &Utc);

    assert!(full.iter().any(|t| t.value == 100.0));
    assert!(zoomed.iter().all(|t| t.value >= 20.0 && t.value <= 40.0));
    assert!(zoomed.len() >= 2);
}

#[test]
fn margin_is_stable_across_zoom() {
    let config = CanvasConfig::default();
    let axes = AxisOptions::default();
    let before = config.dimensions(600.0, 300.0, &axes, 24.0, 2);

    let mut state = ChartViewport::new(axes.initial_viewport(&[
        DataPoint::new(millis(2024, 1, 1) as f64, 3.0),
        DataPoint::new(millis(2024, 2, 1) as f64, 7.0),
    ]));
    let area = before.plot_area();
    state.begin_drag(PixelPoint::new(area.left() + 10.0, area.top() + 10.0), &area);
    state.update_drag(PixelPoint::new(area.right() - 10.0, area.bottom() - 10.0), &area);
    state.commit_drag(&area);

    let after = config.dimensions(600.0, 300.0, &axes, 24.0, 2);
    assert_eq!(before, after);
}
