// Example: fixed-size rows, a scroll burst and scroll-to-row.
use row_window::{Align, Virtualizer, VirtualizerOptions};

fn main() {
    let mut v = Virtualizer::new(VirtualizerOptions::new(1_000_000, 35));
    v.notify_resize(700);
    v.flush();

    let w = v.visible_window();
    println!("total_extent={}", w.total_extent);
    println!("range={:?} rendered={}", w.range, w.items.len());

    // Many scroll events inside one frame collapse into one recomputation.
    let before = v.recompute_count();
    for offset in (0..=35_000i64).step_by(350) {
        v.notify_scroll(offset);
    }
    v.tick(16);
    println!(
        "after burst: offset={} recomputes={} first={:?}",
        v.scroll_offset(),
        v.recompute_count() - before,
        v.visible_window().items.first()
    );

    let offset = v.scroll_to_index(999_999, Align::End);
    println!(
        "scroll_to_index(last): offset={offset} range={:?}",
        v.visible_range()
    );
}
