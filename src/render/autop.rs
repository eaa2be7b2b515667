//! Automatic paragraph wrapping for post bodies.

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Wraps blank-line separated blocks of `text` in `<p>` elements.
///
/// Blocks that already open with a block-level element, HTML comment, or
/// consist of a single shortcode are emitted untouched. Single newlines
/// inside a wrapped paragraph become `<br />`.
pub fn autop(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if text.trim().is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(text.len() + 16);
    for block in split_blocks(&text) {
        if is_block_level(block) || is_standalone_shortcode(block) {
            out.push_str(block);
        } else {
            out.push_str("<p>");
            let lines: Vec<&str> = block.lines().map(str::trim_end).collect();
            out.push_str(&lines.join("<br />\n"));
            out.push_str("</p>");
        }
        out.push('\n');
    }

    out
}

fn split_blocks(text: &str) -> Vec<&str> {
    let spans = shortcode_spans(text);
    let inside_shortcode = |at: usize| spans.iter().any(|&(s, e)| s < at && at < e);

    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() && !inside_shortcode(offset) {
            if let Some(s) = start.take() {
                blocks.push(text[s..offset].trim());
            }
        } else if start.is_none() && !line.trim().is_empty() {
            start = Some(offset);
        }
        offset += line.len();
    }
    if let Some(s) = start {
        blocks.push(text[s..].trim());
    }

    blocks
}

/// Byte ranges of enclosing shortcodes, `[tag …]` through `[/tag]`.
/// A blank line inside one does not end the block.
fn shortcode_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(i) = text[pos..].find('[') {
        let open = pos + i;
        let rest = &text[open + 1..];
        if rest.starts_with('[') {
            pos = open + 2;
            continue;
        }
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        if name.is_empty() || !rest[name_len..].starts_with([' ', '\t', '\n', ']']) {
            pos = open + 1;
            continue;
        }

        let closer = format!("[/{}]", name);
        match text[open..].find(&closer) {
            Some(j) => {
                let end = open + j + closer.len();
                spans.push((open, end));
                pos = end;
            }
            None => pos = open + 1,
        }
    }

    spans
}

fn is_block_level(block: &str) -> bool {
    if block.starts_with("<!--") {
        return true;
    }
    let Some(rest) = block.strip_prefix('<') else {
        return false;
    };
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

fn is_standalone_shortcode(block: &str) -> bool {
    if !block.starts_with('[') || block.starts_with("[[") || !block.ends_with(']') {
        return false;
    }
    // A single opening tag, or an enclosing tag whose closer ends the block.
    let name: String = block[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if name.is_empty() {
        return false;
    }
    block.ends_with(&format!("[/{}]", name)) || !block[1..].contains('[')
}
