// Example: measured rows reflow the window and the extent estimate.
use row_window::{Virtualizer, VirtualizerOptions, VisibleWindow};

fn main() {
    let mut v = Virtualizer::new(VirtualizerOptions::new(10_000, 40).with_overscan(2));
    v.subscribe(|w: &VisibleWindow| {
        println!(
            "window changed: range={:?} total_extent={}",
            w.range, w.total_extent
        );
    });
    v.notify_resize(400);
    v.flush();

    // Synchronous report: row 0 turned out twice as tall.
    v.report_measured(0, 80);
    println!("item(1)={:?}", v.item(1));

    // Reporting the same size again is a no-op.
    assert!(!v.report_measured(0, 80));

    // The rendering layer can also queue measurements; they land on the next frame.
    let handle = v.measure_handle();
    for index in 1..=12 {
        handle.report(index, 40 + index as u32);
    }
    v.tick(16);
    println!(
        "after queued measurements: measured={} total_extent={}",
        v.measurements().len(),
        v.total_extent()
    );

    v.reset_measurements();
    println!("after reset: total_extent={}", v.total_extent());
}
