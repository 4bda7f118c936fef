use crate::extraction::WordToken;
use crate::parsing::normalize::normalize_spaces;

/// Group positioned words into text lines, top to bottom.
///
/// Words are sorted by vertical centre, then a new line starts whenever a
/// word sits more than `threshold` away from the first word of the current
/// line. Each line is then read left to right. Rotated or skewed scans
/// break this approximation of reading order.
pub fn cluster_lines(words: &[WordToken], threshold: f64) -> Vec<String> {
    let mut sorted: Vec<&WordToken> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.y_center
            .total_cmp(&b.y_center)
            .then(a.x_left.total_cmp(&b.x_left))
    });

    let mut lines = Vec::new();
    let mut current: Vec<&WordToken> = Vec::new();
    let mut anchor_y = match sorted.first() {
        Some(w) => w.y_center,
        None => return lines,
    };

    for word in sorted {
        if (word.y_center - anchor_y).abs() > threshold {
            flush_line(&mut current, &mut lines);
            anchor_y = word.y_center;
        }
        current.push(word);
    }
    flush_line(&mut current, &mut lines);

    lines
}

fn flush_line(current: &mut Vec<&WordToken>, lines: &mut Vec<String>) {
    current.sort_by(|a, b| a.x_left.total_cmp(&b.x_left));
    let text = normalize_spaces(
        &current
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    );
    if !text.is_empty() {
        lines.push(text);
    }
    current.clear();
}
