//! Bracketed shortcodes (`[tag attr="v"]…[/tag]`) and their handlers.

use std::collections::{BTreeMap, HashMap};
use std::iter::Peekable;
use std::str::Chars;

pub type Handler = Box<dyn Fn(&Shortcode<'_>) -> String + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub named: BTreeMap<String, String>,
    pub positional: Vec<String>,
}

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shortcode<'a> {
    pub tag: &'a str,
    pub attrs: Attributes,
    /// Body of an enclosing shortcode; `None` for self-closing ones.
    pub content: Option<&'a str>,
}

enum Found<'a> {
    Code(Shortcode<'a>, usize),
    Escaped(&'a str, usize),
}

pub struct Shortcodes {
    handlers: HashMap<String, Handler>,
}

impl Default for Shortcodes {
    fn default() -> Self {
        let mut shortcodes = Self::empty();
        shortcodes.register("caption", caption);
        shortcodes.register("embed", embed);
        shortcodes
    }
}

impl Shortcodes {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, tag: &str, handler: F)
    where
        F: Fn(&Shortcode<'_>) -> String + Send + Sync + 'static,
    {
        self.handlers
            .insert(tag.to_ascii_lowercase(), Box::new(handler));
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Replaces every registered shortcode in `text` with its handler's output.
    /// Unknown tags pass through verbatim and `[[tag]]` yields a literal `[tag]`.
    pub fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find('[') {
            out.push_str(&rest[..pos]);
            let candidate = &rest[pos..];
            match self.find_at(candidate) {
                Some(Found::Code(code, consumed)) => {
                    let handler = &self.handlers[code.tag];
                    out.push_str(&handler(&code));
                    rest = &candidate[consumed..];
                }
                Some(Found::Escaped(literal, consumed)) => {
                    out.push_str(literal);
                    rest = &candidate[consumed..];
                }
                None => {
                    out.push('[');
                    rest = &candidate[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// `s` starts with `[`.
    fn find_at<'a>(&self, s: &'a str) -> Option<Found<'a>> {
        let escaped = s.starts_with("[[");
        let name_start = if escaped { 2 } else { 1 };
        let name_len = s[name_start..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(s.len() - name_start);
        if name_len == 0 {
            return None;
        }
        let name_end = name_start + name_len;
        let tag = &s[name_start..name_end];
        if !self.is_registered(tag) {
            return None;
        }
        if !s[name_end..].starts_with([' ', '\t', '\n', ']', '/']) {
            return None;
        }

        let close = find_tag_close(&s[name_end..])? + name_end;
        let mut attr_text = &s[name_end..close];
        let self_closing = attr_text.trim_end().ends_with('/');
        if self_closing {
            attr_text = attr_text.trim_end().trim_end_matches('/');
        }

        let after_open = close + 1;
        let mut end = after_open;
        let mut content = None;
        if !self_closing {
            let closer = format!("[/{}]", tag);
            if let Some(j) = s[after_open..].find(&closer) {
                content = Some(&s[after_open..after_open + j]);
                end = after_open + j + closer.len();
            }
        }

        if escaped {
            return s[end..]
                .starts_with(']')
                .then(|| Found::Escaped(&s[1..end], end + 1));
        }

        Some(Found::Code(
            Shortcode {
                tag,
                attrs: parse_attrs(attr_text),
                content,
            },
            end,
        ))
    }
}

/// Index of the `]` ending an opening tag, skipping quoted attribute values.
fn find_tag_close(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            (None, '[') => return None,
            _ => {}
        }
    }
    None
}

pub fn parse_attrs(text: &str) -> Attributes {
    let mut attrs = Attributes::default();
    let mut chars = text.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        if first == '"' || first == '\'' {
            chars.next();
            attrs.positional.push(read_quoted(&mut chars, first));
            continue;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '=') {
            key.push(c);
        }

        if chars.next_if_eq(&'=').is_some() {
            let value = match chars.peek().copied() {
                Some(q) if q == '"' || q == '\'' => {
                    chars.next();
                    read_quoted(&mut chars, q)
                }
                _ => {
                    let mut value = String::new();
                    while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                        value.push(c);
                    }
                    value
                }
            };
            if !key.is_empty() {
                attrs.named.insert(key.to_ascii_lowercase(), value);
            }
        } else {
            attrs.positional.push(key);
        }
    }

    attrs
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> String {
    let mut value = String::new();
    for c in chars.by_ref() {
        if c == quote {
            break;
        }
        value.push(c);
    }
    value
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

// --- Built-in handlers ---

/// `[caption id="x" align="alignleft" width="300"]<img …> Caption text[/caption]`
fn caption(code: &Shortcode<'_>) -> String {
    let body = code.content.unwrap_or("");
    let (image, mut text) = split_caption(body).unwrap_or((body, ""));
    if let Some(attr) = code.attrs.get("caption") {
        if text.is_empty() {
            text = attr;
        }
    }

    let width: u32 = code
        .attrs
        .get("width")
        .and_then(|w| w.trim().parse().ok())
        .unwrap_or(0);
    if width == 0 || text.trim().is_empty() {
        return body.to_string();
    }

    let align = code.attrs.get("align").unwrap_or("alignnone");
    let mut class = format!("wp-caption {}", align);
    if let Some(extra) = code.attrs.get("class") {
        class.push(' ');
        class.push_str(extra);
    }
    let id = match code.attrs.get("id") {
        Some(id) if !id.is_empty() => format!(" id=\"{}\"", escape_html(id)),
        _ => String::new(),
    };

    format!(
        "<figure{} style=\"width: {}px\" class=\"{}\">{}<figcaption class=\"wp-caption-text\">{}</figcaption></figure>",
        id,
        width,
        escape_html(class.trim()),
        image,
        text.trim()
    )
}

/// Splits a caption body into its leading image (optionally linked) and the
/// trailing caption text.
fn split_caption(body: &str) -> Option<(&str, &str)> {
    let trimmed = body.trim_start();
    let img = trimmed.find("<img ")?;
    let prefix = trimmed[..img].trim();
    let linked = prefix.starts_with("<a ") && prefix.ends_with('>') && !prefix.contains("</a>");
    if !prefix.is_empty() && !linked {
        return None;
    }

    let img_end = img + trimmed[img..].find('>')? + 1;
    let end = if linked {
        img_end + trimmed[img_end..].find("</a>")? + "</a>".len()
    } else {
        img_end
    };

    Some((&trimmed[..end], trimmed[end..].trim()))
}

/// `[embed width="640"]https://www.youtube.com/watch?v=ID[/embed]`
fn embed(code: &Shortcode<'_>) -> String {
    let raw = code
        .content
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| code.attrs.get("src"))
        .or_else(|| code.attrs.positional.first().map(String::as_str))
        .unwrap_or("");

    let Ok(url) = url::Url::parse(raw) else {
        return escape_html(raw);
    };

    if let Some(video_id) = youtube_id(&url) {
        let width = code.attrs.get("width").unwrap_or("560");
        let height = code.attrs.get("height").unwrap_or("315");
        return format!(
            "<div class=\"embed-youtube\"><iframe width=\"{}\" height=\"{}\" src=\"https://www.youtube.com/embed/{}\" frameborder=\"0\" allowfullscreen></iframe></div>",
            escape_html(width),
            escape_html(height),
            video_id
        );
    }

    let href = escape_html(url.as_str());
    format!("<a href=\"{}\">{}</a>", href, escape_html(raw))
}

fn youtube_id(url: &url::Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let id = match host {
        "youtu.be" => url.path_segments()?.next()?.to_string(),
        "youtube.com" if url.path() == "/watch" => url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())?,
        "youtube.com" if url.path().starts_with("/shorts/") => {
            url.path_segments()?.nth(1)?.to_string()
        }
        _ => return None,
    };

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(id)
}
