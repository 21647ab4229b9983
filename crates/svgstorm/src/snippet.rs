//! Copy-ready usage snippets for an icon.

/// Color used in snippets unless the caller picks another.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Size used in snippets unless the caller picks another.
pub const DEFAULT_SIZE: u32 = 24;

/// Package name the component snippet imports from.
pub const CLIENT_PACKAGE: &str = "svgstorm-client";

/// Options shared by the snippet generators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Rendered size in pixels.
    pub size: u32,
    /// Stroke color.
    pub color: String,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Component usage for the icon called `name`.
pub fn component_snippet(name: &str, options: &SnippetOptions) -> String {
    format!(
        "import {{ Icon }} from '{CLIENT_PACKAGE}'\n\n<Icon \n  name=\"{name}\" \n  size={{{size}}} \n  color=\"{color}\" \n/>",
        size = options.size,
        color = options.color,
    )
}

/// The SVG markup with `currentColor` strokes pinned to `color`.
pub fn html_snippet(svg: &str, color: &str) -> String {
    svg.replace("stroke=\"currentColor\"", &format!("stroke=\"{color}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_snippet_defaults() {
        let snippet = component_snippet("arrow-left", &SnippetOptions::default());
        assert_eq!(
            snippet,
            "import { Icon } from 'svgstorm-client'\n\n<Icon \n  name=\"arrow-left\" \n  size={24} \n  color=\"#3B82F6\" \n/>"
        );
    }

    #[test]
    fn test_component_snippet_options() {
        let options = SnippetOptions {
            size: 32,
            color: "red".into(),
        };
        let snippet = component_snippet("sun", &options);
        assert!(snippet.contains("size={32}"));
        assert!(snippet.contains("color=\"red\""));
    }

    #[test]
    fn test_html_snippet_replaces_every_stroke() {
        let svg = r#"<svg stroke="currentColor"><path stroke="currentColor"/><path fill="currentColor"/></svg>"#;
        assert_eq!(
            html_snippet(svg, DEFAULT_COLOR),
            r##"<svg stroke="#3B82F6"><path stroke="#3B82F6"/><path fill="currentColor"/></svg>"##
        );
    }
}
