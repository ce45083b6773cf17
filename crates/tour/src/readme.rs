//! README cleaning for the welcome step.

/// Cleaned README text is cut to this many characters
pub const MAX_README_CHARS: usize = 4_000;

const BADGE_HOSTS: &[&str] = &[
    "shields.io",
    "badge",
    "travis-ci",
    "circleci",
    "codecov",
    "coveralls",
    "appveyor",
    "badgen.net",
    "/workflows/",
];

const SPONSOR_HEADINGS: &[&str] = &[
    "sponsor",
    "backer",
    "thank",
    "donat",
    "funding",
    "support us",
    "support the project",
    "acknowledg",
];

const PROMO_MARKERS: &[&str] = &[
    "buy me a coffee",
    "buymeacoffee.com",
    "ko-fi.com",
    "patreon.com",
    "opencollective.com",
    "github.com/sponsors",
    "liberapay.com",
    "star this repo",
    "give us a star",
    "give it a star",
    "follow us on",
];

/// Markdown heading (`#` to `######` followed by a space)
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        let rest = &trimmed[hashes..];
        if rest.is_empty() || rest.starts_with(' ') {
            return Some(rest.trim());
        }
    }
    None
}

fn is_badge_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.starts_with("[![") {
        return true;
    }
    let lowered = trimmed.to_lowercase();
    let is_image = lowered.starts_with("![")
        || lowered.starts_with("<img")
        || (lowered.starts_with("<a ") && lowered.contains("<img"));
    is_image && BADGE_HOSTS.iter().any(|host| lowered.contains(host))
}

fn is_sponsor_heading(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SPONSOR_HEADINGS.iter().any(|marker| lowered.contains(marker))
}

fn is_promotional(line: &str) -> bool {
    let lowered = line.to_lowercase();
    PROMO_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Strip badges, sponsor sections and promotional lines.
///
/// A sponsor section runs from its heading to the next heading of any
/// level. Blank-line runs collapse to one and the result is capped at
/// [`MAX_README_CHARS`].
pub fn clean_readme(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_sponsor_section = false;

    for line in text.lines() {
        if let Some(heading) = heading_text(line) {
            in_sponsor_section = is_sponsor_heading(heading);
            if in_sponsor_section {
                continue;
            }
        } else if in_sponsor_section {
            continue;
        }

        if is_badge_line(line) || is_promotional(line) {
            continue;
        }
        if line.trim().is_empty() && kept.last().map_or(true, |prev| prev.trim().is_empty()) {
            continue;
        }
        kept.push(line.trim_end());
    }

    let joined = kept.join("\n");
    let cleaned = joined.trim();
    match cleaned.char_indices().nth(MAX_README_CHARS) {
        Some((cut, _)) => cleaned[..cut].trim_end().to_string(),
        None => cleaned.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_badges_and_sponsor_section() {
        let readme = "\
# Project

[![Build](https://img.shields.io/badge/build-passing-green.svg)](https://ci)

A tool that does things.

### Sponsors

Thanks to ACME Corp for supporting us.
<img src=\"acme.png\">

## Usage

Run `tool --help`.
";
        assert_eq!(
            clean_readme(readme),
            "# Project\n\nA tool that does things.\n\n## Usage\n\nRun `tool --help`."
        );
    }

    #[test]
    fn drops_promotional_lines() {
        let readme = "Intro\nIf you like it, buy me a coffee!\n☕ https://ko-fi.com/me\nMore";
        assert_eq!(clean_readme(readme), "Intro\nMore");
    }

    #[test]
    fn plain_images_survive() {
        let readme = "![Architecture](docs/arch.png)\ntext";
        assert_eq!(clean_readme(readme), readme);
    }

    #[test]
    fn caps_length_on_char_boundary() {
        let readme = "é".repeat(MAX_README_CHARS + 50);
        let cleaned = clean_readme(&readme);
        assert_eq!(cleaned.chars().count(), MAX_README_CHARS);
    }

    #[test]
    fn headings_need_a_space() {
        assert_eq!(heading_text("## Usage"), Some("Usage"));
        assert_eq!(heading_text("#hashtag"), None);
        assert_eq!(heading_text("####### seven"), None);
    }
}
