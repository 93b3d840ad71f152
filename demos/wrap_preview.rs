use orikaeshi::{
    FontSlot, FontStorage, TextLayout,
    fontdb::{self, Family, Query},
    text::LayoutConfig,
};

const BOX_WIDTH: f32 = 200.0;
const FONT_PX: f32 = 32.0;

fn main() {
    env_logger::init();

    // 1. Layout exists before its font: inputs wait for metrics.
    let slot = FontSlot::new();
    let mut layout = TextLayout::new(LayoutConfig {
        width: BOX_WIDTH,
        ..Default::default()
    })
    .with_font(slot.clone())
    .with_text(
        "abcde fghij-klm nopqr stuvwxyz\n\
         SuperCalifoRagiListicExpoaliDocious\n\
         \n\
         trailing spaces stay        here",
    );
    println!("before font: {} lines", layout.lines().len());

    // 2. Load a system font and publish its metrics.
    let mut storage = FontStorage::new();
    storage.load_system_fonts();

    let query = Query {
        families: &[Family::Name("Arial"), Family::SansSerif],
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    let Some(metrics) = storage.query_metrics(&query, FONT_PX) else {
        eprintln!("no usable system font found");
        return;
    };
    println!("using {:?}", metrics);
    slot.publish(metrics);

    // 3. Print the lines with their measured widths.
    for box_width in [BOX_WIDTH, 120.0, 1.0] {
        layout.set_width(box_width);
        let Some(snapshot) = layout.snapshot() else {
            continue;
        };
        println!(
            "\nwidth {:.0}: {} lines, {:.2}x{:.2}",
            box_width,
            snapshot.lines.len(),
            snapshot.total_width,
            snapshot.total_height
        );
        for line in snapshot.lines.iter().take(12) {
            println!("  {:7.2} | {:?}", line.width, line.text);
        }
    }

    // 4. Auto width reports the natural width back to the owner.
    layout.set_auto_width(true);
    println!("\nauto width box: {:.2}", layout.box_width());
}
