//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use querylens_analysis::{Divergence, SequenceDisplay};
use querylens_types::Value;

/// Lists the kind of each value, since `Integer(1)` and `BigInt(1)` both
/// render as `1`.
fn kinds(values: &[Value]) -> String {
    let kinds: Vec<&str> = values.iter().map(Value::kind).collect();
    format!("[{}]", kinds.join(", "))
}

/// Creates a key-value table describing a divergence.
pub fn divergence_table(divergence: &Divergence) -> Table {
    let previous: Vec<String> = divergence
        .previous
        .iter()
        .map(|seq| format!("{} {}", SequenceDisplay(seq), kinds(seq)))
        .collect();
    let position = (divergence.index + 1).to_string();
    let parameters = format!(
        "{} {}",
        SequenceDisplay(&divergence.parameters),
        kinds(&divergence.parameters)
    );
    let previous = previous.join("\n");

    let entries = [
        ("Statement", divergence.statement_text.as_str()),
        ("Position", position.as_str()),
        ("Parameters", parameters.as_str()),
        ("Previously seen", previous.as_str()),
    ];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }

    table
}

/// Prints the divergence table.
pub fn print_divergence_table(divergence: &Divergence) {
    println!("{}", divergence_table(divergence));
}
