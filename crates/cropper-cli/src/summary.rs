use std::path::Path;

use console::Style;
use cropper_core::session::CropSession;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_session_summary(session: &CropSession, input: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Crop Image"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Aspect"),
        s.value.apply_to(session.aspect_label())
    );

    if let Some(source) = session.source() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Source"),
            s.value
                .apply_to(format!("{}x{}", source.width(), source.height()))
        );
    }

    if let Some(cb) = session.crop_box() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Crop box"),
            s.value.apply_to(format!(
                "{:.0}x{:.0} at ({:.0}, {:.0})",
                cb.width, cb.height, cb.x, cb.y
            ))
        );
    }

    if let (Some(t), Some((min, max))) = (session.transform(), session.zoom_range()) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Zoom"),
            s.value.apply_to(format!(
                "{:.3} (range {:.3}-{:.3})",
                t.zoom, min, max
            ))
        );
        println!(
            "  {:<14}{}",
            s.label.apply_to("Offset"),
            s.value
                .apply_to(format!("{:.1}, {:.1}", t.offset.x, t.offset.y))
        );
    }

    println!();
}
