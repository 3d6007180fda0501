// Example: a sortable table whose measured row heights survive re-sorting.
use row_window::Align;
use row_window_adapter::{RenderedRow, RowModel, SyncOutcome, TableController};

struct Table {
    // (id, name, loaded)
    rows: Vec<(u32, String, bool)>,
}

impl RowModel for Table {
    type Key = u32;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_key(&self, index: usize) -> u32 {
        self.rows[index].0
    }

    fn is_renderable(&self, index: usize) -> bool {
        self.rows[index].2
    }
}

fn main() {
    let mut table = Table {
        rows: (0..5_000)
            .map(|id| (id, format!("row {id:04}"), id % 50 != 7))
            .collect(),
    };

    let mut c = TableController::new(&table, 35);
    c.on_resize(350);
    c.flush();

    // Pretend the renderer laid out the first few rows with wrapped text.
    for index in 0..4 {
        c.report_measured(index, 70);
    }

    let mut out: Vec<RenderedRow<u32>> = Vec::new();
    c.rendered_rows(&table, &mut out);
    println!("rendered {} rows, total_extent={}", out.len(), c.total_extent());

    // Sort descending by name: the measured rows now sit at the bottom.
    table.rows.sort_by(|a, b| b.1.cmp(&a.1));
    let outcome = c.sync(&table);
    assert_eq!(outcome, SyncOutcome::Reordered);

    let offset = c.scroll_to_row(&0, Align::End);
    c.rendered_rows(&table, &mut out);
    println!(
        "after sort: row 0 at index {:?}, offset={offset:?}, last rendered={:?}",
        c.index_of(&0),
        out.last()
    );
}
