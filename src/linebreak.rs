use crate::segment::WrapConfig;

/// Lexicographic cost of a candidate line layout; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Shape {
    descents: usize,
    descent_total: usize,
    longest: usize,
    lines: usize,
}

impl Shape {
    fn of(lengths: &[usize]) -> Self {
        let (descents, descent_total) = lengths
            .windows(2)
            .filter(|w| w[0] > w[1])
            .fold((0, 0), |(n, total), w| (n + 1, total + (w[0] - w[1])));
        Shape {
            descents,
            descent_total,
            longest: lengths.iter().copied().max().unwrap_or(0),
            lines: lengths.len(),
        }
    }
}

/// Split `text` into lines of at most `max_line_length` characters, shaped as a
/// bottom-heavy pyramid where possible.
///
/// Words are packed greedily. Whenever the next word would overflow the line,
/// breaking one word early is also tried, and both layouts are completed
/// greedily and compared by `Shape`. Equal shapes keep the greedy break.
/// A word longer than the limit sits alone on its own line. Text that already
/// fits comes back unchanged apart from trimming.
pub fn wrap_text(text: &str, max_line_length: usize) -> Vec<String> {
    let text = text.trim();
    if max_line_length == 0 || text.chars().count() <= max_line_length {
        return vec![text.to_string()];
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let lens: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();

    let mut lines = Vec::new();
    let mut committed: Vec<usize> = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let mut end = greedy_end(&lens, start, max_line_length);
        if end < words.len() && end - start >= 2 {
            let now = layout_shape(&committed, &lens, start, end, max_line_length);
            let early = layout_shape(&committed, &lens, start, end - 1, max_line_length);
            if early < now {
                end -= 1;
            }
        }
        committed.push(line_len(&lens[start..end]));
        lines.push(words[start..end].join(" "));
        start = end;
    }
    lines
}

/// Wrap `text` according to `wrap` and join the lines with `\n`.
pub fn reflow(text: &str, wrap: WrapConfig) -> String {
    if !wrap.is_enabled() {
        return text.trim().to_string();
    }
    wrap_text(text, wrap.max_line_length).join("\n")
}

fn line_len(lens: &[usize]) -> usize {
    lens.iter().sum::<usize>() + lens.len().saturating_sub(1)
}

// Index one past the last word that fits on a line starting at `start`.
// Always takes at least one word.
fn greedy_end(lens: &[usize], start: usize, max: usize) -> usize {
    let mut len = lens[start];
    let mut end = start + 1;
    while end < lens.len() && len + 1 + lens[end] <= max {
        len += 1 + lens[end];
        end += 1;
    }
    end
}

fn layout_shape(committed: &[usize], lens: &[usize], start: usize, end: usize, max: usize) -> Shape {
    let mut lengths = committed.to_vec();
    lengths.push(line_len(&lens[start..end]));
    let mut next = end;
    while next < lens.len() {
        let stop = greedy_end(lens, next, max);
        lengths.push(line_len(&lens[next..stop]));
        next = stop;
    }
    Shape::of(&lengths)
}
