use super::classify::{DrumHits, HitSequence, Instrument};
use super::grid::{BEATS_PER_BAR, STEPS_PER_BEAT};

const REST: &str = "~";

/// One `s(...)` block body: a line per bar, beats separated by two spaces.
fn bar_lines(sequence: &HitSequence, token: &str) -> Vec<String> {
    let beats: Vec<String> = sequence
        .hits
        .chunks(STEPS_PER_BEAT)
        .map(|beat| {
            beat.iter()
                .map(|&hit| if hit { token } else { REST })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    beats
        .chunks(BEATS_PER_BAR)
        .map(|bar| bar.join("  "))
        .collect()
}

/// Render the hits as a stacked mini-notation pattern.
///
/// ```text
/// // 4 beat drum loop @ 120 BPM
/// // 32nd note quantization
///
/// stack(
///   s(`
///     bd ~ ~ ~ ~ ~ ~ ~  ~ ~ ~ ~ ~ ~ ~ ~  ...
///   `),
///   ...
/// ).slow(4).cpm(120)
/// ```
pub fn render(hits: &DrumHits, bpm: u32, beat_count: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("// {} beat drum loop @ {} BPM\n", beat_count, bpm));
    out.push_str("// 32nd note quantization\n\n");
    out.push_str("stack(\n");

    let blocks: Vec<String> = Instrument::ALL
        .iter()
        .map(|&instrument| {
            let mut block = String::from("  s(`\n");
            for line in bar_lines(hits.get(instrument), instrument.token()) {
                block.push_str(&format!("    {}\n", line));
            }
            block.push_str("  `)");
            block
        })
        .collect();

    out.push_str(&blocks.join(",\n"));
    out.push_str(&format!("\n).slow({}).cpm({})", beat_count, bpm));
    out
}
