/// Strips code-fence artifacts from raw oracle output.
///
/// Oracles routinely wrap the CSV block in Markdown fences even when told not
/// to, sometimes with an info string (```` ```csv ````) and sometimes with
/// fences only at the ends. Dropping every pure-fence line, wherever it
/// appears, is a superset of both behaviors and keeps the pass idempotent.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .lines()
        .filter(|line| !is_fence_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with("```") {
        return false;
    }
    // "```", "`````", "```csv" are fences; a line with content after the
    // info string is data that merely starts with backticks.
    let rest = trimmed.trim_start_matches('`');
    rest.chars().all(|c| c.is_ascii_alphanumeric())
}
