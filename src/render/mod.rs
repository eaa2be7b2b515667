pub mod autop;
pub mod shortcode;

use shortcode::Shortcodes;

/// Turns a stored post body into the HTML served to readers.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, raw: &str) -> String;
}

/// Paragraph wrapping followed by shortcode expansion.
#[derive(Default)]
pub struct HtmlRenderer {
    shortcodes: Shortcodes,
}

impl HtmlRenderer {
    pub fn new(shortcodes: Shortcodes) -> Self {
        Self { shortcodes }
    }
}

impl ContentRenderer for HtmlRenderer {
    fn render(&self, raw: &str) -> String {
        self.shortcodes.expand(&autop::autop(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs_and_shortcodes() {
        let renderer = HtmlRenderer::default();
        let html = renderer.render(
            "Intro text\n\n[embed]https://youtu.be/abc123[/embed]\n\nOutro [unknown] stays",
        );
        assert_eq!(
            html,
            "<p>Intro text</p>\n\
             <div class=\"embed-youtube\"><iframe width=\"560\" height=\"315\" src=\"https://www.youtube.com/embed/abc123\" frameborder=\"0\" allowfullscreen></iframe></div>\n\
             <p>Outro [unknown] stays</p>\n"
        );
    }

    #[test]
    fn custom_shortcodes_can_be_registered() {
        let mut shortcodes = Shortcodes::empty();
        shortcodes.register("year", |_| "2024".to_string());
        let renderer = HtmlRenderer::new(shortcodes);
        assert_eq!(renderer.render("© [year]"), "<p>© 2024</p>\n");
    }

    #[test]
    fn caption_spanning_blank_line_renders_as_one_figure() {
        let html = HtmlRenderer::default()
            .render("[caption width=\"300\"]<img src=\"a.jpg\">\n\nA cat[/caption]");
        assert_eq!(
            html,
            "<figure style=\"width: 300px\" class=\"wp-caption alignnone\"><img src=\"a.jpg\"><figcaption class=\"wp-caption-text\">A cat</figcaption></figure>\n"
        );
    }

    #[test]
    fn empty_body_renders_empty() {
        assert_eq!(HtmlRenderer::default().render(""), "");
    }
}
